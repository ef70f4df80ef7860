//! Engine types

use serde::Serialize;
use std::time::Duration;

/// How a scan reached the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Paged list call
    #[default]
    List,
    /// One get call per requested id
    Get,
}

/// Outcome of one table scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    /// Table scanned
    pub table: String,
    /// How rows were fetched
    pub mode: ScanMode,
    /// Rows handed to the callback
    pub rows: u64,
    /// Items dropped by quals the API could not apply
    pub filtered: u64,
    /// Wall-clock time of the scan
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ScanStats {
    pub fn new(table: impl Into<String>, mode: ScanMode) -> Self {
        Self {
            table: table.into(),
            mode,
            ..Default::default()
        }
    }

    /// Elapsed time in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}

impl std::fmt::Display for ScanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} rows ({} filtered) in {}ms",
            self.table,
            self.rows,
            self.filtered,
            self.duration_ms()
        )
    }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(duration.as_millis() as u64)
}
