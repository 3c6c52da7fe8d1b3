//! Logging configuration and the leveled logger used by the converter
//!
//! The converter never writes to a sink directly. It emits through a
//! [`Logger`], filtered by the configured [`LogLevel`]. The default logger
//! forwards to `tracing`; [`init_logging`] installs a subscriber for callers
//! that do not set one up themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Severity of a converter log message, most severe first
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Whether a message at `level` passes this threshold
    pub fn allows(self, level: LogLevel) -> bool {
        level <= self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leveled emit capability injected into the converter
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
}

/// Logger that forwards every message to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!(target: "submarin_converter", "{}", message),
            LogLevel::Warn => warn!(target: "submarin_converter", "{}", message),
            LogLevel::Info => info!(target: "submarin_converter", "{}", message),
            LogLevel::Debug => debug!(target: "submarin_converter", "{}", message),
        }
    }
}

/// Threshold-filtered handle the converter logs through
#[derive(Clone)]
pub(crate) struct LevelLogger {
    level: LogLevel,
    inner: Arc<dyn Logger>,
}

impl LevelLogger {
    pub(crate) fn new(level: LogLevel, inner: Arc<dyn Logger>) -> Self {
        Self { level, inner }
    }

    pub(crate) fn level(&self) -> LogLevel {
        self.level
    }

    pub(crate) fn enabled(&self, level: LogLevel) -> bool {
        self.level.allows(level)
    }
}

impl Logger for LevelLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if self.enabled(level) {
            self.inner.log(level, message);
        }
    }
}

impl fmt::Debug for LevelLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelLogger")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// Install a `tracing` fmt subscriber for the given level.
///
/// `RUST_LOG` takes precedence when set. Calling this more than once is a
/// no-op after the first successful install.
pub fn init_logging(level: LogLevel) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_str()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(level == LogLevel::Debug)
        .try_init();

    debug!("Converter logging initialized at level: {}", level);
}
