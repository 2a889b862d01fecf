use serde::{Deserialize, Serialize};

use logship_record::Level;

/// Reserved batching policy: `limit` is the intended cap on buffered
/// records per send, `timer` a time budget in milliseconds. Carried in the
/// wire format for forward compatibility; not enforced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushFrequency {
    pub limit: u32,
    pub timer: u32,
}

/// Engine configuration. Owned exclusively by one [`Logger`] instance and
/// replaced only through [`ConfigPatch`] merges.
///
/// [`Logger`]: crate::Logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Collection endpoint; empty disables remote shipping.
    pub remote_endpoint_url: String,
    pub flush_frequency: FlushFrequency,
    /// Verbosity ceiling: records numerically above this level (less
    /// severe) are dropped. `Off` silences everything.
    pub min_severity_level: Level,
    /// Echo admitted records through the captured console.
    pub echo_to_console: bool,
    /// Clear buffer and persisted entry after a successful flush.
    pub clear_buffer_after_send: bool,
    /// Warn through `tracing` when the collector is unreachable.
    pub alert_if_no_service: bool,
    pub persist_logs: bool,
    pub persistence_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_endpoint_url: String::new(),
            flush_frequency: FlushFrequency { limit: 1, timer: 0 },
            min_severity_level: Level::Error,
            echo_to_console: true,
            clear_buffer_after_send: false,
            alert_if_no_service: false,
            persist_logs: false,
            persistence_key: "logship".into(),
        }
    }
}

/// Partial configuration. Fields left `None` keep their current value;
/// unknown keys in a deserialized patch are silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub remote_endpoint_url: Option<String>,
    pub flush_frequency: Option<FlushFrequency>,
    pub min_severity_level: Option<Level>,
    pub echo_to_console: Option<bool>,
    pub clear_buffer_after_send: Option<bool>,
    pub alert_if_no_service: Option<bool>,
    pub persist_logs: Option<bool>,
    pub persistence_key: Option<String>,
}

impl Config {
    /// Merges a patch: recognized keys overwrite, everything else stays.
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(v) = patch.remote_endpoint_url {
            self.remote_endpoint_url = v;
        }
        if let Some(v) = patch.flush_frequency {
            self.flush_frequency = v;
        }
        if let Some(v) = patch.min_severity_level {
            self.min_severity_level = v;
        }
        if let Some(v) = patch.echo_to_console {
            self.echo_to_console = v;
        }
        if let Some(v) = patch.clear_buffer_after_send {
            self.clear_buffer_after_send = v;
        }
        if let Some(v) = patch.alert_if_no_service {
            self.alert_if_no_service = v;
        }
        if let Some(v) = patch.persist_logs {
            self.persist_logs = v;
        }
        if let Some(v) = patch.persistence_key {
            self.persistence_key = v;
        }
    }
}
