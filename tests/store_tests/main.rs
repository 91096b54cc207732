//! Tests for RecordStore
//!
//! These tests verify:
//! - Construction against new and existing directories
//! - Read / lookup degradation rules
//! - Write-once semantics and per-record outcomes
//! - Listing with reserved entries excluded
//! - Feed partial failure

#[path = "../common/mod.rs"]
mod common;

mod read_tests;
mod feed_tests;
