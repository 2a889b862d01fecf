use serde::{Deserialize, Serialize};

use crate::level::Level;

/// One argument of a captured multi-argument console call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
}

/// A structured log record, immutable once constructed.
///
/// Scalar records carry `message` (and `stack` when the input was
/// error-like); batch records from console capture carry `entries` instead,
/// one per argument in call order. Empty fields are omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub timestamp: String,
    pub severity: Level,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stack: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<LogEntry>,
}

impl LogRecord {
    /// Whether this is a batch record (per-argument entries, no scalar message).
    pub fn is_batch(&self) -> bool {
        !self.entries.is_empty()
    }
}
