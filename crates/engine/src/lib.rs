//! Log capture-and-dispatch engine.
//!
//! [`Logger`] owns the configuration and the in-memory record buffer,
//! filters by severity, and fans admitted records out to the console
//! passthrough, the persistent store, and (on [`Logger::flush`]) the
//! remote collection endpoint. Console interception is an explicit
//! capability exchange: [`Logger::install_capture`] returns a handle, never
//! mutating ambient globals.

pub mod capture;
pub mod config;
pub mod engine;

pub use capture::{CaptureError, CaptureHandle, Console, StdConsole};
pub use config::{Config, ConfigPatch, FlushFrequency};
pub use engine::{LogError, Logger};
pub use logship_record::{Level, LogEntry, LogInput, LogRecord};
pub use logship_remote::RemoteError;
pub use logship_store::{FileStore, KeyValueStore, LogStore, MemoryStore};
