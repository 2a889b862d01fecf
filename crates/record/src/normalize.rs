//! Converts raw log inputs into structured records.
//!
//! Every input shape is coerced to a record; nothing is ever rejected.
//! Error-like inputs escalate to [`Level::Error`] regardless of the
//! requested level.

use serde_json::Value;

use crate::level::Level;
use crate::record::{LogEntry, LogRecord};
use crate::timestamp;

/// A raw log input, classified before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum LogInput {
    /// Plain text; preserved exactly as the record message.
    Text(String),
    /// Error-like input. Always normalized at [`Level::Error`].
    Fault { message: String, stack: String },
    /// Any other value; structurally stringified into the message.
    Value(Value),
    /// A captured variadic argument list; normalized into a batch record
    /// with one entry per argument, in call order.
    Args(Vec<Value>),
}

impl LogInput {
    /// Builds a fault input from any error, rendering its source chain as
    /// the stack.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        let mut stack = String::new();
        let mut source = err.source();
        while let Some(cause) = source {
            if !stack.is_empty() {
                stack.push('\n');
            }
            stack.push_str(&format!("caused by: {cause}"));
            source = cause.source();
        }
        LogInput::Fault {
            message: err.to_string(),
            stack,
        }
    }
}

impl From<&str> for LogInput {
    fn from(text: &str) -> Self {
        LogInput::Text(text.to_owned())
    }
}

impl From<String> for LogInput {
    fn from(text: String) -> Self {
        LogInput::Text(text)
    }
}

impl From<Value> for LogInput {
    fn from(value: Value) -> Self {
        LogInput::Value(value)
    }
}

impl From<Vec<Value>> for LogInput {
    fn from(args: Vec<Value>) -> Self {
        LogInput::Args(args)
    }
}

/// Renders a JSON value for display: strings verbatim, everything else as
/// compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds a record from a raw input at the requested level.
pub fn normalize(level: Level, input: LogInput) -> LogRecord {
    let timestamp = timestamp::now();
    match input {
        LogInput::Fault { message, stack } => LogRecord {
            timestamp,
            severity: Level::Error,
            message,
            stack,
            entries: vec![],
        },
        LogInput::Text(message) => LogRecord {
            timestamp,
            severity: level,
            message,
            stack: String::new(),
            entries: vec![],
        },
        LogInput::Value(value) => LogRecord {
            timestamp,
            severity: level,
            message: render_value(&value),
            stack: String::new(),
            entries: vec![],
        },
        LogInput::Args(args) => LogRecord {
            timestamp,
            severity: level,
            message: String::new(),
            stack: String::new(),
            entries: args
                .iter()
                .map(|arg| LogEntry {
                    message: render_value(arg),
                })
                .collect(),
        },
    }
}
