//! # recordstore
//!
//! A write-once JSON record store on the local filesystem:
//! - Records partitioned by logical collection ("ref")
//! - Keyed by the record's own `about.identifier`
//! - Create-exclusive writes (a record is never overwritten)
//! - Batch writes and reads with per-record outcomes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        RecordStore                           │
//! │          read / lookup / write / ls / feed                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Single    │          │    Batch    │
//!   │ read / ls   │          │  (bounded   │
//!   └──────┬──────┘          │   fan-out)  │
//!          │                 └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌────────────────┐
//!               │ {base}/{ref}/  │
//!               │  {identifier}  │
//!               └────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use recordstore::{RecordStore, WriteOptions};
//! use serde_json::json;
//!
//! # async fn demo() -> recordstore::Result<()> {
//! let store = RecordStore::new("./records");
//!
//! let record = json!({ "about": { "identifier": "hello" }, "body": "world" });
//! let outcome = store.write("posts", record, WriteOptions::default()).await;
//! assert!(outcome.all_fulfilled());
//!
//! let ids = store.ls("posts").await?;
//! let feed = store.feed("posts", &ids).await;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod batch;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, WriteOptions};
pub use record::{Record, Records};
pub use batch::{BatchResult, Outcome};
pub use store::{ReadOutcome, RecordStore, WriteStatus};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of recordstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
