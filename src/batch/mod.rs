//! Batch Module
//!
//! Partial-success aggregation for multi-record operations.
//!
//! ## Responsibilities
//! - Carry one independent outcome per input item
//! - Preserve input order in the result regardless of completion order
//! - Cap the number of file operations in flight
//!
//! A batch never fails as a whole: an item's failure lands in that item's
//! slot and nowhere else.

mod runner;

pub use runner::run_bounded;

use std::ops::Index;

use crate::error::{Result, StoreError};

/// Outcome of a single batch item
#[derive(Debug)]
pub enum Outcome<T> {
    /// The item's operation succeeded
    Fulfilled(T),

    /// The item's operation failed; other items are unaffected
    Rejected(StoreError),
}

impl<T> Outcome<T> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Outcome::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// The fulfilled value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Fulfilled(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    /// The rejection reason, if any
    pub fn error(&self) -> Option<&StoreError> {
        match self {
            Outcome::Fulfilled(_) => None,
            Outcome::Rejected(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Outcome::Fulfilled(value) => Ok(value),
            Outcome::Rejected(err) => Err(err),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Fulfilled(value),
            Err(err) => Outcome::Rejected(err),
        }
    }
}

/// Ordered outcomes of a batch: `result[i]` belongs to `input[i]`
#[derive(Debug)]
pub struct BatchResult<T> {
    outcomes: Vec<Outcome<T>>,
}

impl<T> BatchResult<T> {
    pub fn new(outcomes: Vec<Outcome<T>>) -> Self {
        Self { outcomes }
    }

    /// A batch where every item failed for the same reason
    ///
    /// Used when a precondition shared by all items (the ref) is broken.
    pub fn rejected_all(count: usize, mut reason: impl FnMut() -> StoreError) -> Self {
        Self {
            outcomes: (0..count).map(|_| Outcome::Rejected(reason())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome<T>> {
        self.outcomes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Outcome<T>> {
        self.outcomes.get(index)
    }

    pub fn fulfilled_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_fulfilled()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_rejected()).count()
    }

    pub fn all_fulfilled(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_fulfilled)
    }

    /// Fulfilled values in input order, dropping rejections
    pub fn into_fulfilled(self) -> Vec<T> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                Outcome::Fulfilled(value) => Some(value),
                Outcome::Rejected(_) => None,
            })
            .collect()
    }

    pub fn into_outcomes(self) -> Vec<Outcome<T>> {
        self.outcomes
    }
}

impl<T> Index<usize> for BatchResult<T> {
    type Output = Outcome<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.outcomes[index]
    }
}

impl<T> IntoIterator for BatchResult<T> {
    type Item = Outcome<T>;
    type IntoIter = std::vec::IntoIter<Outcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a BatchResult<T> {
    type Item = &'a Outcome<T>;
    type IntoIter = std::slice::Iter<'a, Outcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
