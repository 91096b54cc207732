//! Store Module
//!
//! The filesystem-backed record store.
//!
//! ## Responsibilities
//! - Map `(ref, identifier)` to `{base_dir}/{ref}/{identifier}`
//! - Create record files exactly once (create-exclusive, never overwrite)
//! - Read single records, list refs, and fetch batches ("feeds")
//! - Isolate per-record failures inside batch results
//!
//! ## On-Disk Layout
//! ```text
//! {base_dir}/
//!   ├── {ref}/
//!   │     ├── {identifier}   JSON text of the full record
//!   │     └── meta           reserved, excluded from ls()
//!   └── {ref}/
//!         └── ...
//! ```
//!
//! The filesystem is the only lock manager: two writers racing on the same
//! identifier are arbitrated by `O_EXCL`, in this process or any other.

mod names;
mod record_store;

pub use names::{validate as validate_name, violation as name_violation};
pub use record_store::RecordStore;

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::record::Record;

/// Result of `RecordStore::lookup`
///
/// Unlike `read`, this keeps the failure kind so callers can tell a missing
/// record from a corrupt one.
#[derive(Debug)]
pub enum ReadOutcome {
    /// Record file exists and parsed as JSON
    Found(Record),

    /// Ref directory or record file does not exist
    NotFound,

    /// Record file exists but is not valid JSON
    Corrupt(StoreError),

    /// Any other failure (invalid name, permissions, I/O)
    Failed(StoreError),
}

impl ReadOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ReadOutcome::Found(_))
    }

    pub fn into_option(self) -> Option<Record> {
        match self {
            ReadOutcome::Found(record) => Some(record),
            _ => None,
        }
    }

    /// The record, or `{}` for every kind of failure
    pub fn into_record_or_empty(self) -> Record {
        self.into_option()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

/// What a successful write slot did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    /// A new record file was created
    Written { identifier: String },

    /// The record had no `about.identifier`; nothing was written
    Skipped,
}

impl WriteStatus {
    pub fn identifier(&self) -> Option<&str> {
        match self {
            WriteStatus::Written { identifier } => Some(identifier),
            WriteStatus::Skipped => None,
        }
    }
}
