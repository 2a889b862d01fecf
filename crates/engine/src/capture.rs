//! Reversible console interception.
//!
//! The host console is an explicit capability object, never an ambient
//! global. Installing capture snapshots the supplied console as the
//! engine's echo target and returns a [`CaptureHandle`]; the host swaps
//! the handle's wrapper in where its console used to be, and gets the
//! original back from [`CaptureHandle::restore`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use logship_record::{Level, render_value};

use crate::engine::Logger;

/// Host console capability: the per-level logging functions collapsed into
/// one leveled variadic write.
pub trait Console: Send + Sync {
    fn write(&self, level: Level, args: &[Value]);
}

/// Console backed by the process standard streams. `warn` and `error` go
/// to stderr, everything else to stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write(&self, level: Level, args: &[Value]) {
        let line = args.iter().map(render_value).collect::<Vec<_>>().join(" ");
        match level {
            Level::Warn | Level::Error => eprintln!("[{}] {line}", level.as_str()),
            _ => println!("[{}] {line}", level.as_str()),
        }
    }
}

/// Errors from installing console capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("console capture already installed")]
    AlreadyInstalled,
}

/// Wrapper console that routes every call, as an ordered batch, into the
/// engine's matching entry point. Inert after restore.
pub struct CapturedConsole {
    logger: Logger,
    active: Arc<AtomicBool>,
}

impl CapturedConsole {
    pub(crate) fn new(logger: Logger, active: Arc<AtomicBool>) -> Self {
        Self { logger, active }
    }
}

impl Console for CapturedConsole {
    fn write(&self, level: Level, args: &[Value]) {
        // Stale wrappers held past restore must not feed the engine.
        if self.active.load(Ordering::Relaxed) {
            self.logger.record_batch(level, args.to_vec());
        }
    }
}

/// Proof of an installed capture. Dropping the handle without calling
/// [`restore`](CaptureHandle::restore) leaves capture installed for the
/// logger's lifetime.
pub struct CaptureHandle {
    logger: Logger,
    wrapper: Arc<CapturedConsole>,
    original: Arc<dyn Console>,
    active: Arc<AtomicBool>,
}

impl CaptureHandle {
    pub(crate) fn new(
        logger: Logger,
        wrapper: Arc<CapturedConsole>,
        original: Arc<dyn Console>,
        active: Arc<AtomicBool>,
    ) -> Self {
        Self {
            logger,
            wrapper,
            original,
            active,
        }
    }

    /// The wrapper to hand to the host in place of its console.
    pub fn console(&self) -> Arc<dyn Console> {
        Arc::clone(&self.wrapper) as Arc<dyn Console>
    }

    /// Deactivates the wrapper, detaches capture from the engine, and
    /// returns the exact console captured at install time. Consuming the
    /// handle makes double-restore unrepresentable.
    pub fn restore(self) -> Arc<dyn Console> {
        self.active.store(false, Ordering::Relaxed);
        self.logger.detach_capture();
        self.original
    }
}
