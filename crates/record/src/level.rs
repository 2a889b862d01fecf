use serde::{Deserialize, Serialize};

/// Log severity, ordered by descending verbosity.
///
/// Numeric values match the wire format: `Debug = 5` is the most verbose,
/// `Error = 1` the most severe, `Off = 0` matches nothing. Serialized as a
/// plain integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Log = 4,
    Debug = 5,
}

impl Level {
    /// Whether a record at this level clears the configured threshold.
    ///
    /// The threshold is a verbosity ceiling: lower numeric value means more
    /// severe, so a record passes when its level is at least as severe as
    /// the threshold. `Off` never passes, and a threshold of `Off` admits
    /// nothing.
    pub fn admitted_by(self, threshold: Level) -> bool {
        self != Level::Off && (self as u8) <= (threshold as u8)
    }

    /// Lowercase name matching the console function it maps to.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Off => "off",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Log => "log",
            Level::Debug => "debug",
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level as u8
    }
}

/// Severity value outside the `0..=5` vocabulary.
#[derive(Debug, thiserror::Error)]
#[error("invalid severity level: {0}")]
pub struct InvalidLevel(pub u8);

impl TryFrom<u8> for Level {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, InvalidLevel> {
        match value {
            0 => Ok(Level::Off),
            1 => Ok(Level::Error),
            2 => Ok(Level::Warn),
            3 => Ok(Level::Info),
            4 => Ok(Level::Log),
            5 => Ok(Level::Debug),
            other => Err(InvalidLevel(other)),
        }
    }
}
