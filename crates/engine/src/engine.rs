use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use logship_record::{Level, LogInput, LogRecord, normalize};
use logship_remote::{RemoteError, RemoteSink};
use logship_store::LogStore;

use crate::capture::{CaptureError, CaptureHandle, CapturedConsole, Console, StdConsole};
use crate::config::{Config, ConfigPatch};

/// Errors surfaced by the engine. Nothing here is fatal to the host:
/// every variant means "this flush must be retried" or "this call was
/// rejected", never a crash.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("a flush is already in flight")]
    FlushInFlight,

    #[error("remote endpoint is not configured")]
    NoEndpoint,

    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

struct EngineState {
    config: Config,
    buffer: Vec<LogRecord>,
    store: LogStore,
    echo: Arc<dyn Console>,
    capture_installed: bool,
}

/// The log capture-and-dispatch engine.
///
/// Cheap to clone; clones share the buffer and configuration. Constructed
/// explicitly — nothing happens at load time. The lock is never held
/// across an `await`.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Mutex<EngineState>>,
    sink: Arc<RemoteSink>,
    in_flight: Arc<AtomicBool>,
}

impl Logger {
    /// Creates an engine with no persistent store capability.
    pub fn new(config: Config) -> Result<Self, LogError> {
        Self::with_store(config, LogStore::unavailable())
    }

    /// Creates an engine backed by the given store adapter.
    pub fn with_store(config: Config, store: LogStore) -> Result<Self, LogError> {
        let sink = RemoteSink::new()?;
        Ok(Self {
            inner: Arc::new(Mutex::new(EngineState {
                config,
                buffer: Vec::new(),
                store,
                echo: Arc::new(StdConsole),
                capture_installed: false,
            })),
            sink: Arc::new(sink),
            in_flight: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Merges a partial configuration; unknown keys were already dropped
    /// at deserialization and recognized keys overwrite.
    pub fn set_config(&self, patch: ConfigPatch) {
        self.inner.lock().config.apply(patch);
    }

    /// A snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.inner.lock().config.clone()
    }

    pub fn debug(&self, input: impl Into<LogInput>) {
        self.record(Level::Debug, input.into());
    }

    pub fn log(&self, input: impl Into<LogInput>) {
        self.record(Level::Log, input.into());
    }

    pub fn info(&self, input: impl Into<LogInput>) {
        self.record(Level::Info, input.into());
    }

    pub fn warn(&self, input: impl Into<LogInput>) {
        self.record(Level::Warn, input.into());
    }

    pub fn error(&self, input: impl Into<LogInput>) {
        self.record(Level::Error, input.into());
    }

    /// Batch entry point used by console capture: one record per call,
    /// one entry per argument, in call order.
    pub fn record_batch(&self, level: Level, args: Vec<Value>) {
        self.dispatch(normalize(level, LogInput::Args(args)));
    }

    fn record(&self, level: Level, input: LogInput) {
        self.dispatch(normalize(level, input));
    }

    /// Filter and fan out. The threshold in effect at insertion time
    /// decides admission; later threshold changes never retroactively
    /// filter the buffer. A rejected record has no side effects at all.
    fn dispatch(&self, record: LogRecord) {
        let echo_target = {
            let mut state = self.inner.lock();
            if !record.severity.admitted_by(state.config.min_severity_level) {
                return;
            }

            let target = state
                .config
                .echo_to_console
                .then(|| Arc::clone(&state.echo));

            state.buffer.push(record.clone());
            if state.config.persist_logs {
                let key = state.config.persistence_key.clone();
                state.store.store(&key, &state.buffer);
            }
            target
        };

        // Echo outside the lock so a console that logs back cannot
        // deadlock the engine.
        if let Some(console) = echo_target {
            console.write(record.severity, &echo_args(&record));
        }
    }

    /// The current buffer contents, oldest first.
    pub fn logs(&self) -> Vec<LogRecord> {
        self.inner.lock().buffer.clone()
    }

    /// Removes records from the front of the buffer.
    ///
    /// `Some(n)` removes exactly `n` leading records, saturating at the
    /// buffer length; `None` discards the whole buffer.
    pub fn clear(&self, limit: Option<usize>) {
        let mut state = self.inner.lock();
        match limit {
            Some(n) => {
                let n = n.min(state.buffer.len());
                state.buffer.drain(..n);
            }
            None => state.buffer.clear(),
        }
    }

    /// Reads back the persisted record sequence, if the store capability
    /// is present and holds one.
    pub fn persisted_logs(&self) -> Option<Vec<LogRecord>> {
        let state = self.inner.lock();
        state.store.load(&state.config.persistence_key)
    }

    /// Ships the entire buffer to the configured endpoint.
    ///
    /// Single-flight: a second call while one is in flight returns
    /// [`LogError::FlushInFlight`] instead of double-sending. On success
    /// with `clearBufferAfterSend`, the buffer and the persisted entry are
    /// cleared wholesale — records appended while the send was in flight
    /// are discarded with the rest. On failure both are left untouched and
    /// the caller may retry. An empty buffer returns `Ok(0)` without a
    /// request. Returns the number of records shipped.
    pub async fn flush(&self) -> Result<usize, LogError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(LogError::FlushInFlight);
        }
        let result = self.flush_inner().await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn flush_inner(&self) -> Result<usize, LogError> {
        let (endpoint, payload, count, alert) = {
            let state = self.inner.lock();
            if state.config.remote_endpoint_url.is_empty() {
                return Err(LogError::NoEndpoint);
            }
            if state.buffer.is_empty() {
                return Ok(0);
            }
            (
                state.config.remote_endpoint_url.clone(),
                serde_json::to_string(&state.buffer)?,
                state.buffer.len(),
                state.config.alert_if_no_service,
            )
        };

        match self.sink.send(&endpoint, payload).await {
            Ok(()) => {
                let mut state = self.inner.lock();
                if state.config.clear_buffer_after_send {
                    state.buffer.clear();
                    let key = state.config.persistence_key.clone();
                    state.store.clear(&key);
                }
                tracing::debug!(count, "log buffer shipped");
                Ok(count)
            }
            Err(e) => {
                if alert {
                    tracing::warn!(error = %e, "log collector unreachable");
                }
                Err(e.into())
            }
        }
    }

    /// Installs console capture: snapshots `console` as the echo target
    /// and returns a handle whose wrapper routes calls into the engine.
    /// Installing twice without an intervening restore is an error, so a
    /// wrapper can never be captured as the "original".
    pub fn install_capture(
        &self,
        console: Arc<dyn Console>,
    ) -> Result<CaptureHandle, CaptureError> {
        {
            let mut state = self.inner.lock();
            if state.capture_installed {
                return Err(CaptureError::AlreadyInstalled);
            }
            state.capture_installed = true;
            state.echo = Arc::clone(&console);
        }
        tracing::debug!("console capture installed");

        let active = Arc::new(AtomicBool::new(true));
        let wrapper = Arc::new(CapturedConsole::new(self.clone(), Arc::clone(&active)));
        Ok(CaptureHandle::new(self.clone(), wrapper, console, active))
    }

    pub(crate) fn detach_capture(&self) {
        // The echo target stays pointed at the restored console; direct
        // API calls keep echoing after restore.
        self.inner.lock().capture_installed = false;
        tracing::debug!("console capture restored");
    }
}

fn echo_args(record: &LogRecord) -> Vec<Value> {
    if record.is_batch() {
        record
            .entries
            .iter()
            .map(|e| Value::String(e.message.clone()))
            .collect()
    } else {
        vec![Value::String(record.message.clone())]
    }
}
