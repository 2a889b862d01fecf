//! Structured log records for the Logship pipeline.
//!
//! Defines the severity vocabulary, the record wire types, and the
//! normalizer that converts arbitrary application output into records.

pub mod level;
pub mod normalize;
pub mod record;
pub mod timestamp;

pub use level::{InvalidLevel, Level};
pub use normalize::{LogInput, normalize, render_value};
pub use record::{LogEntry, LogRecord};
