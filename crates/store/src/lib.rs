//! Persistent storage for buffered log records.
//!
//! The [`KeyValueStore`] trait is the capability boundary; the host decides
//! whether persistence exists at all. [`LogStore`] wraps an optional store
//! and degrades every operation to a no-op when the capability is absent.

pub mod adapter;
pub mod kv;

pub use adapter::LogStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
