//! Bounded fan-out
//!
//! Fires one task per item, then waits for all of them. A semaphore caps how
//! many item operations hold a file handle at once.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{Result, StoreError};

use super::{BatchResult, Outcome};

/// Run `op` over every item with at most `max_in_flight` running at once
///
/// Outcomes come back in input order. A task that panics or is cancelled
/// yields `Rejected(TaskFailed)` for its own slot only. `max_in_flight` is
/// clamped to `1..=Semaphore::MAX_PERMITS`.
pub async fn run_bounded<I, T, F, Fut>(items: Vec<I>, max_in_flight: usize, op: F) -> BatchResult<T>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let count = items.len();
    let permits = Arc::new(Semaphore::new(max_in_flight.clamp(1, Semaphore::MAX_PERMITS)));
    let mut tasks = JoinSet::new();
    let mut slot_of = HashMap::with_capacity(count);

    for (index, item) in items.into_iter().enumerate() {
        let permits = Arc::clone(&permits);
        let work = op(item);

        let handle = tasks.spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => return (index, Err(StoreError::TaskFailed(err.to_string()))),
            };
            (index, work.await)
        });
        slot_of.insert(handle.id(), index);
    }

    let mut slots: Vec<Option<Outcome<T>>> = (0..count).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(Outcome::from(result)),
            Err(err) => match slot_of.get(&err.id()) {
                Some(&index) => {
                    tracing::warn!(index, error = %err, "batch task did not complete");
                    slots[index] = Some(Outcome::Rejected(StoreError::TaskFailed(format!(
                        "item {index}: {err}"
                    ))));
                }
                None => {
                    tracing::warn!(error = %err, "batch task did not complete");
                }
            },
        }
    }

    let outcomes = slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                Outcome::Rejected(StoreError::TaskFailed(
                    "task panicked or was cancelled".to_string(),
                ))
            })
        })
        .collect();

    BatchResult::new(outcomes)
}
