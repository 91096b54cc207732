//! Ref and identifier naming rules
//!
//! Every ref and identifier becomes exactly one path component under the
//! base directory, so anything that could escape or alias a directory is
//! refused before the filesystem is touched.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Why `name` cannot be used as a path component, if it can't
pub fn violation(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative directory component")
    } else if name.contains('/') || name.contains('\\') {
        Some("name contains a path separator")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else {
        None
    }
}

pub fn validate(name: &str) -> Result<()> {
    match violation(name) {
        Some(reason) => Err(StoreError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// `base/name`, provided `name` is a valid single component
pub fn child(base: &Path, name: &str) -> Result<PathBuf> {
    validate(name)?;
    Ok(base.join(name))
}
