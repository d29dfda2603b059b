//! Result envelopes returned by the generated query functions.

use serde::{Serialize, Serializer};
use std::time::Duration;

/// Execution metadata for one statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMeta {
    /// Rows returned to the caller.
    pub rows_read: usize,
    /// Rows inserted, updated or deleted.
    pub changes: u64,
    /// Wall time from send to last row, serialized in milliseconds.
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_micros() as f64 / 1000.0)
}

impl ResultMeta {
    pub fn read(rows_read: usize, duration: Duration) -> Self {
        Self {
            rows_read,
            changes: 0,
            duration,
        }
    }

    pub fn write(changes: u64, duration: Duration) -> Self {
        Self {
            rows_read: 0,
            changes,
            duration,
        }
    }
}

/// Rows plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet<T> {
    pub results: Vec<T>,
    pub meta: ResultMeta,
}

impl<T> ResultSet<T> {
    pub fn new(results: Vec<T>, duration: Duration) -> Self {
        let meta = ResultMeta::read(results.len(), duration);
        Self { results, meta }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}

impl<T> IntoIterator for ResultSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

/// Metadata for a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecResult {
    pub meta: ResultMeta,
}

impl ExecResult {
    pub fn new(changes: u64, duration: Duration) -> Self {
        Self {
            meta: ResultMeta::write(changes, duration),
        }
    }

    /// Rows affected by the statement.
    pub fn changes(&self) -> u64 {
        self.meta.changes
    }
}
