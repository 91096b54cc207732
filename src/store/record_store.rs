//! RecordStore
//!
//! Stateless request/response operations against the filesystem. The store
//! holds nothing but its configuration; every call derives its paths from
//! `(base_dir, ref, identifier)`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::batch::{run_bounded, BatchResult};
use crate::config::{Config, WriteOptions};
use crate::error::{Result, StoreError};
use crate::record::{Record, Records};

use super::names;
use super::{ReadOutcome, WriteStatus};

/// Write-once JSON record store rooted at one base directory
///
/// ## Concurrency Model
///
/// - No in-process locks. Create-exclusive opens decide which of several
///   concurrent writers of the same identifier wins.
/// - `write` and `feed` fan out one task per record on the caller's tokio
///   runtime, with at most `max_in_flight` file operations open at once.
/// - Cloning is cheap; clones share the same configuration.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Store configuration (base_dir resolved at construction)
    config: Arc<Config>,
}

/// Per-record plan computed before any I/O is issued
enum WritePlan {
    Skip,
    Reject(StoreError),
    Create {
        identifier: String,
        path: PathBuf,
        payload: Vec<u8>,
    },
}

impl RecordStore {
    /// Open a store at `base_dir` with default settings
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::open(Config::builder().base_dir(base_dir).build())
    }

    /// Open a store with the given config
    ///
    /// Creates the base directory if needed. Failure to create it is logged
    /// and otherwise ignored: the directory may already exist, and any real
    /// problem surfaces on the first operation that touches it.
    pub fn open(mut config: Config) -> Self {
        tracing::debug!(base_dir = %config.base_dir.display(), "instantiating record store");

        if let Err(err) = fs::create_dir_all(&config.base_dir) {
            tracing::warn!(
                base_dir = %config.base_dir.display(),
                error = %err,
                "could not create base directory"
            );
        }

        if let Ok(resolved) = config.base_dir.canonicalize() {
            config.base_dir = resolved;
        }

        tracing::debug!(base_dir = %config.base_dir.display(), "record store ready");

        Self {
            config: Arc::new(config),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Read one record
    ///
    /// Returns `{}` on any failure: missing ref, missing record, malformed
    /// JSON or I/O error all look the same. Use [`RecordStore::lookup`] to
    /// tell them apart.
    pub async fn read(&self, reference: &str, id: &str) -> Record {
        match self.lookup(reference, id).await {
            ReadOutcome::Found(record) => record,
            other => {
                tracing::warn!(
                    reference,
                    id,
                    outcome = ?other,
                    "read failed, returning empty record"
                );
                other.into_record_or_empty()
            }
        }
    }

    /// Read one record, keeping the failure kind
    pub async fn lookup(&self, reference: &str, id: &str) -> ReadOutcome {
        let path = match self.record_path(reference, id) {
            Ok(path) => path,
            Err(err) => return ReadOutcome::Failed(err),
        };

        tracing::debug!(reference, id, path = %path.display(), "reading record");

        match read_json(&path).await {
            Ok(record) => ReadOutcome::Found(record),
            Err(StoreError::NotFound { .. }) => ReadOutcome::NotFound,
            Err(err @ StoreError::MalformedPayload { .. }) => ReadOutcome::Corrupt(err),
            Err(err) => ReadOutcome::Failed(err),
        }
    }

    /// List the identifiers stored in a ref
    ///
    /// Reserved entries are left out. Identifiers come back sorted. A
    /// missing ref is an error, not an empty list.
    pub async fn ls(&self, reference: &str) -> Result<Vec<String>> {
        let dir = self.ref_dir(reference)?;

        tracing::debug!(reference, path = %dir.display(), "listing ref");

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|err| StoreError::from_io(err, &dir))?;

        let mut identifiers = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            match entry.file_name().into_string() {
                Ok(name) if self.config.is_reserved(&name) => {}
                Ok(name) => identifiers.push(name),
                Err(raw) => {
                    tracing::warn!(reference, entry = ?raw, "skipping non UTF-8 entry");
                }
            }
        }

        identifiers.sort();
        Ok(identifiers)
    }

    /// Read a batch of records from one ref
    ///
    /// `result[i]` is the parsed record for `identifiers[i]`, or the reason
    /// it could not be read. One bad identifier never fails the others.
    pub async fn feed<I, S>(&self, reference: &str, identifiers: I) -> BatchResult<Record>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let identifiers: Vec<String> = identifiers
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();

        tracing::debug!(reference, count = identifiers.len(), "feed requested");

        let dir = match self.ref_dir(reference) {
            Ok(dir) => dir,
            Err(err) => {
                tracing::warn!(reference, error = %err, "feed on invalid ref");
                return reject_for_ref(reference, identifiers.len());
            }
        };

        let paths: Vec<Result<PathBuf>> = identifiers
            .iter()
            .map(|id| names::child(&dir, id))
            .collect();

        run_bounded(paths, self.config.effective_max_in_flight(), |path| async move {
            let path = path?;
            tracing::debug!(path = %path.display(), "reading record for feed");
            read_json(&path).await
        })
        .await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create records in a ref
    ///
    /// Accepts one record or many. Each record is stored under its
    /// `about.identifier` and never overwrites an existing file; a second
    /// write of the same identifier comes back `Rejected(AlreadyExists)`.
    /// Records without an identifier are skipped unless
    /// `options.reject_unidentified` is set.
    pub async fn write(
        &self,
        reference: &str,
        records: impl Into<Records>,
        options: WriteOptions,
    ) -> BatchResult<WriteStatus> {
        let records: Records = records.into();

        let dir = match self.ref_dir(reference) {
            Ok(dir) => dir,
            Err(err) => {
                tracing::warn!(reference, error = %err, "write to invalid ref");
                return reject_for_ref(reference, records.len());
            }
        };

        tracing::debug!(
            reference,
            count = records.len(),
            path = %dir.display(),
            "writing records"
        );

        if let Err(err) = tokio::fs::create_dir_all(&dir).await {
            tracing::warn!(reference, error = %err, "could not create ref directory");
        }

        let plans: Vec<WritePlan> = records
            .into_iter()
            .map(|record| self.plan_write(&dir, &record, options))
            .collect();

        let reference = reference.to_string();
        let sync = options.sync;

        run_bounded(plans, self.config.effective_max_in_flight(), move |plan| {
            let reference = reference.clone();
            async move {
                match plan {
                    WritePlan::Skip => Ok(WriteStatus::Skipped),
                    WritePlan::Reject(err) => Err(err),
                    WritePlan::Create {
                        identifier,
                        path,
                        payload,
                    } => {
                        tracing::debug!(path = %path.display(), "attempting to write record");

                        match create_exclusive(&path, &payload, sync).await {
                            Ok(()) => {
                                tracing::debug!(path = %path.display(), "wrote record");
                                Ok(WriteStatus::Written { identifier })
                            }
                            Err(err) => {
                                tracing::warn!(
                                    reference = %reference,
                                    identifier = %identifier,
                                    error = %err,
                                    "failed writing record"
                                );
                                Err(err)
                            }
                        }
                    }
                }
            }
        })
        .await
    }

    fn plan_write(&self, dir: &Path, record: &Record, options: WriteOptions) -> WritePlan {
        let Some(identifier) = crate::record::identifier(record) else {
            return if options.reject_unidentified {
                WritePlan::Reject(StoreError::MissingIdentifier)
            } else {
                WritePlan::Skip
            };
        };

        if self.config.is_reserved(identifier) {
            return WritePlan::Reject(StoreError::ReservedName(identifier.to_string()));
        }

        let path = match names::child(dir, identifier) {
            Ok(path) => path,
            Err(err) => return WritePlan::Reject(err),
        };

        match serde_json::to_vec(record) {
            Ok(payload) => WritePlan::Create {
                identifier: identifier.to_string(),
                path,
                payload,
            },
            Err(err) => WritePlan::Reject(StoreError::Serialization(err)),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the base directory path
    pub fn base_dir(&self) -> &Path {
        &self.config.base_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Directory backing a ref (it may not exist yet)
    pub fn ref_dir(&self, reference: &str) -> Result<PathBuf> {
        names::child(&self.config.base_dir, reference)
    }

    /// File backing a record (it may not exist yet)
    pub fn record_path(&self, reference: &str, id: &str) -> Result<PathBuf> {
        names::child(&self.ref_dir(reference)?, id)
    }
}

// =============================================================================
// File Helpers
// =============================================================================

/// Read and parse a whole JSON file
async fn read_json(path: &Path) -> Result<Record> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| StoreError::from_io(err, path))?;

    serde_json::from_slice(&bytes).map_err(|source| StoreError::MalformedPayload {
        path: path.to_path_buf(),
        source,
    })
}

/// Create `path` with `payload`, failing if it already exists
async fn create_exclusive(path: &Path, payload: &[u8], sync: bool) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|err| StoreError::from_io(err, path))?;

    let written = async {
        file.write_all(payload).await?;
        file.flush().await?;
        if sync {
            file.sync_all().await?;
        }
        Ok::<(), std::io::Error>(())
    }
    .await;

    drop(file);
    discard_if_torn(path, written).await
}

/// Pass a successful payload write through; on failure remove the file the
/// exclusive create just made, so no torn record stays visible
async fn discard_if_torn(path: &Path, written: std::io::Result<()>) -> Result<()> {
    let Err(err) = written else {
        return Ok(());
    };

    if let Err(cleanup) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %cleanup, "could not remove torn record");
    }
    Err(StoreError::Io(err))
}

/// Reject every slot of a batch because the ref name itself is unusable
fn reject_for_ref<T>(reference: &str, count: usize) -> BatchResult<T> {
    let reason = names::violation(reference).unwrap_or("invalid ref");
    BatchResult::rejected_all(count, || StoreError::InvalidName {
        name: reference.to_string(),
        reason,
    })
}
