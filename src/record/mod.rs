//! Record Module
//!
//! Records are arbitrary JSON documents. The only structure the store relies
//! on is the nested `about.identifier` string, which becomes the filename of
//! the record inside its ref directory.
//!
//! ## Minimum Shape
//! ```text
//! { "about": { "identifier": "<string>", ... }, ...anything else... }
//! ```

use serde_json::Value;

/// A stored record: any JSON value
pub type Record = Value;

/// Extract the storage key of a record
///
/// Returns `None` when `about.identifier` is absent, not a string, or empty;
/// such records cannot be written.
pub fn identifier(record: &Record) -> Option<&str> {
    record
        .get("about")?
        .get("identifier")?
        .as_str()
        .filter(|id| !id.is_empty())
}

/// One-or-many input to `RecordStore::write`
///
/// A single record is normalized into a one-element batch. A JSON array is
/// treated as a batch of its elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Records(Vec<Record>);

impl Records {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Record> {
        self.0
    }
}

impl From<Record> for Records {
    fn from(value: Record) -> Self {
        match value {
            Value::Array(items) => Records(items),
            other => Records(vec![other]),
        }
    }
}

impl From<Vec<Record>> for Records {
    fn from(records: Vec<Record>) -> Self {
        Records(records)
    }
}

impl From<&[Record]> for Records {
    fn from(records: &[Record]) -> Self {
        Records(records.to_vec())
    }
}

impl<const N: usize> From<[Record; N]> for Records {
    fn from(records: [Record; N]) -> Self {
        Records(records.into())
    }
}

impl FromIterator<Record> for Records {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Records(iter.into_iter().collect())
    }
}

impl IntoIterator for Records {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
