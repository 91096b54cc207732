//! Tests for batch behaviour under concurrency
//!
//! These tests verify:
//! - Racing writers of one identifier: exactly one wins
//! - Batches larger than the in-flight cap complete in order
//! - Independent store instances share the filesystem safely

#[path = "../common/mod.rs"]
mod common;
