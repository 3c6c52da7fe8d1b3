use thiserror::Error;

use crate::converter::{AttemptError, HookKind};

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// Boxed error type returned by caller-supplied convert functions and hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The unified error type for the converter
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("[E{code:04}] Plugin \"{name}\" is not found")]
    PluginNotFound {
        code: u16,
        name: String,
        step_index: usize,
    },

    #[error("[E{code:04}] Failed to convert with plugin \"{name}\" at step {step_index}: {} convert function(s) failed", .errors.len())]
    StepFailed {
        code: u16,
        name: String,
        step_index: usize,
        errors: Vec<AttemptError>,
    },

    #[error("[E{code:04}] {hook} hook failed at step {step_index}")]
    Hook {
        code: u16,
        hook: HookKind,
        step_index: usize,
        #[source]
        source: BoxError,
    },

    #[error("[E{code:04}] Conversion cancelled at step {step_index}")]
    Cancelled { code: u16, step_index: usize },

    #[error("[E{code:04}] Invalid plugin \"{name}\": {message}")]
    InvalidPlugin {
        code: u16,
        name: String,
        message: String,
    },

    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl ConverterError {
    /// Create a plugin not found error for the given step
    pub fn plugin_not_found(name: impl Into<String>, step_index: usize) -> Self {
        Self::PluginNotFound {
            code: ErrorCode::PLUGIN_NOT_FOUND,
            name: name.into(),
            step_index,
        }
    }

    /// Create an aggregated step failure carrying every attempt error
    pub fn step_failed(
        name: impl Into<String>,
        step_index: usize,
        errors: Vec<AttemptError>,
    ) -> Self {
        Self::StepFailed {
            code: ErrorCode::STEP_ALL_FUNCTIONS_FAILED,
            name: name.into(),
            step_index,
            errors,
        }
    }

    /// Create a hook error wrapping what the hook returned
    pub fn hook(hook: HookKind, step_index: usize, source: BoxError) -> Self {
        let code = match hook {
            HookKind::EndConvertFunction => ErrorCode::HOOK_END_CONVERT_FUNCTION,
            HookKind::EndPluginConvert => ErrorCode::HOOK_END_PLUGIN_CONVERT,
        };
        Self::Hook {
            code,
            hook,
            step_index,
            source,
        }
    }

    /// Create a cancellation error
    pub fn cancelled(step_index: usize) -> Self {
        Self::Cancelled {
            code: ErrorCode::CANCELLED,
            step_index,
        }
    }

    /// Create an invalid plugin error with specific code
    pub fn invalid_plugin(code: u16, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPlugin {
            code,
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::config_with_code(ErrorCode::CONFIG_GENERIC, message)
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error to a configuration error
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        if let Self::Config { source: src, .. } = &mut self {
            *src = Some(source.into());
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::PluginNotFound { code, .. }
            | Self::StepFailed { code, .. }
            | Self::Hook { code, .. }
            | Self::Cancelled { code, .. }
            | Self::InvalidPlugin { code, .. }
            | Self::Config { code, .. } => *code,
        }
    }

    /// Index of the step the pipeline stopped at, when the error came from `convert`
    pub fn step_index(&self) -> Option<usize> {
        match self {
            Self::PluginNotFound { step_index, .. }
            | Self::StepFailed { step_index, .. }
            | Self::Hook { step_index, .. }
            | Self::Cancelled { step_index, .. } => Some(*step_index),
            Self::InvalidPlugin { .. } | Self::Config { .. } => None,
        }
    }

    /// Attempt errors collected for the failing step, if any
    pub fn attempt_errors(&self) -> &[AttemptError] {
        match self {
            Self::StepFailed { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::PluginNotFound { name, .. } => {
                format!("Plugin \"{}\" is not registered in this converter", name)
            }
            Self::StepFailed { name, errors, .. } => {
                let reasons: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                format!(
                    "Every convert function of plugin \"{}\" failed: {}",
                    name,
                    reasons.join("; ")
                )
            }
            Self::Hook {
                hook,
                step_index,
                source,
                ..
            } => format!("{} hook failed at step {}: {}", hook, step_index, source),
            Self::Cancelled { step_index, .. } => {
                format!("Conversion was cancelled at step {}", step_index)
            }
            Self::InvalidPlugin { name, message, .. } => {
                format!("Plugin \"{}\" is invalid: {}", name, message)
            }
            Self::Config { message, .. } => format!("Configuration problem: {}", message),
        }
    }
}

/// Type alias for Results using ConverterError
pub type Result<T> = std::result::Result<T, ConverterError>;

// Conversion from common error types

impl From<std::io::Error> for ConverterError {
    fn from(err: std::io::Error) -> Self {
        ConverterError::config_with_code(
            ErrorCode::CONFIG_IO_ERROR,
            "Failed to read configuration file",
        )
        .with_source(err)
    }
}

impl From<toml::de::Error> for ConverterError {
    fn from(err: toml::de::Error) -> Self {
        ConverterError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "Invalid TOML syntax")
            .with_source(err)
    }
}

impl From<serde_yaml::Error> for ConverterError {
    fn from(err: serde_yaml::Error) -> Self {
        ConverterError::config_with_code(ErrorCode::CONFIG_INVALID_YAML, "Invalid YAML syntax")
            .with_source(err)
    }
}

impl From<serde_json::Error> for ConverterError {
    fn from(err: serde_json::Error) -> Self {
        ConverterError::config_with_code(ErrorCode::CONFIG_INVALID_JSON, "Invalid JSON syntax")
            .with_source(err)
    }
}
