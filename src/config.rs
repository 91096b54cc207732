//! Configuration for recordstore
//!
//! Centralized configuration with sensible defaults.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

/// Entry name reserved for per-ref metadata by default
pub const META_ENTRY: &str = "meta";

/// Main configuration for a RecordStore instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all refs
    /// Internal structure:
    ///   {base_dir}/
    ///     └── {ref}/
    ///           ├── {identifier}   (one JSON record per file)
    ///           └── meta           (reserved, never listed)
    pub base_dir: PathBuf,

    /// Entry names hidden from listings and refused as record identifiers
    pub reserved_names: BTreeSet<String>,

    // -------------------------------------------------------------------------
    // Batch Configuration
    // -------------------------------------------------------------------------
    /// Max file operations in flight for a single write/feed batch
    pub max_in_flight: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./records"),
            reserved_names: BTreeSet::from([META_ENTRY.to_string()]),
            max_in_flight: 64,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Whether `name` is a reserved entry
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names.contains(name)
    }

    /// Concurrency cap actually applied to batches
    ///
    /// Never zero, and never above what a tokio semaphore can hold, so
    /// `usize::MAX` means "as many as the runtime allows".
    pub fn effective_max_in_flight(&self) -> usize {
        self.max_in_flight.clamp(1, Semaphore::MAX_PERMITS)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the base directory (root for all refs)
    pub fn base_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.base_dir = path.into();
        self
    }

    /// Add a reserved entry name
    pub fn reserve(mut self, name: impl Into<String>) -> Self {
        self.config.reserved_names.insert(name.into());
        self
    }

    /// Replace the whole reserved set
    pub fn reserved_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.reserved_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the maximum number of file operations in flight per batch
    pub fn max_in_flight(mut self, count: usize) -> Self {
        self.config.max_in_flight = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Per-call options for `RecordStore::write`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Report records without `about.identifier` as `MissingIdentifier`
    /// instead of skipping them
    pub reject_unidentified: bool,

    /// fsync each record file before its outcome resolves
    pub sync: bool,
}

impl WriteOptions {
    pub fn reject_unidentified(mut self, yes: bool) -> Self {
        self.reject_unidentified = yes;
        self
    }

    pub fn sync(mut self, yes: bool) -> Self {
        self.sync = yes;
        self
    }
}
