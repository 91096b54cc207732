//! Shared helpers for integration tests

use std::sync::Once;

use recordstore::config::ConfigBuilder;
use recordstore::{Config, Record, RecordStore};
use serde_json::json;
use tempfile::TempDir;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING: Once = Once::new();

/// Route store logs to the test writer (RUST_LOG=recordstore=debug to see them)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_test_writer()
            .try_init();
    });
}

pub fn setup_temp_store() -> (TempDir, RecordStore) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::new(temp_dir.path());
    (temp_dir, store)
}

pub fn setup_temp_store_with<F>(configure: F) -> (TempDir, RecordStore)
where
    F: FnOnce(ConfigBuilder) -> ConfigBuilder,
{
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let config = configure(Config::builder().base_dir(temp_dir.path())).build();
    let store = RecordStore::open(config);
    (temp_dir, store)
}

/// A minimal valid record
pub fn record(id: &str, body: &str) -> Record {
    json!({
        "about": { "identifier": id, "kind": "post" },
        "body": body,
    })
}
