//! Step references, per-step details and the pipeline output.

use crate::error::BoxError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// A requested pipeline stage: a bare plugin id or an id with an option override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepRef {
    Name(String),
    WithOption {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        option: Option<Value>,
    },
}

impl StepRef {
    pub fn with_option(name: impl Into<String>, option: Value) -> Self {
        StepRef::WithOption {
            name: name.into(),
            option: Some(option),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StepRef::Name(name) | StepRef::WithOption { name, .. } => name,
        }
    }

    /// Canonical `(id, option override)` form
    pub fn into_parts(self) -> (String, Option<Value>) {
        match self {
            StepRef::Name(name) => (name, None),
            StepRef::WithOption { name, option } => (name, option),
        }
    }
}

impl From<&str> for StepRef {
    fn from(name: &str) -> Self {
        StepRef::Name(name.to_string())
    }
}

impl From<String> for StepRef {
    fn from(name: String) -> Self {
        StepRef::Name(name)
    }
}

impl<S: Into<String>> From<(S, Value)> for StepRef {
    fn from((name, option): (S, Value)) -> Self {
        StepRef::with_option(name, option)
    }
}

/// A step after resolution: the plugin id and the option actually used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStep {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<Value>,
}

/// Why a single convert function attempt failed
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    #[error("Failed to convert function. Plugin: \"{plugin}\", ConvertFunctionIndex: {index}: {source}")]
    Failed {
        plugin: String,
        index: usize,
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    #[error("Convert function timed out. Plugin: \"{plugin}\", ConvertFunctionIndex: {index}, after {timeout:?}")]
    TimedOut {
        plugin: String,
        index: usize,
        timeout: Duration,
    },
}

impl AttemptError {
    pub fn failed(plugin: impl Into<String>, index: usize, source: BoxError) -> Self {
        AttemptError::Failed {
            plugin: plugin.into(),
            index,
            source: Arc::from(source),
        }
    }

    pub fn timed_out(plugin: impl Into<String>, index: usize, timeout: Duration) -> Self {
        AttemptError::TimedOut {
            plugin: plugin.into(),
            index,
            timeout,
        }
    }

    pub fn plugin(&self) -> &str {
        match self {
            AttemptError::Failed { plugin, .. } | AttemptError::TimedOut { plugin, .. } => plugin,
        }
    }

    /// Index of the convert function that failed
    pub fn index(&self) -> usize {
        match self {
            AttemptError::Failed { index, .. } | AttemptError::TimedOut { index, .. } => *index,
        }
    }

    /// The error the convert function returned, if it returned one
    pub fn convert_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            AttemptError::Failed { source, .. } => Some(&**source),
            AttemptError::TimedOut { .. } => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AttemptError::TimedOut { .. })
    }
}

impl Serialize for AttemptError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("AttemptError", 4)?;
        state.serialize_field("plugin", self.plugin())?;
        state.serialize_field("index", &self.index())?;
        state.serialize_field("timed_out", &self.is_timeout())?;
        let message = match self {
            AttemptError::Failed { source, .. } => source.to_string(),
            AttemptError::TimedOut { timeout, .. } => format!("timed out after {:?}", timeout),
        };
        state.serialize_field("message", &message)?;
        state.end()
    }
}

/// Execution record of one resolved step
#[derive(Debug, Clone, Serialize)]
pub struct StepDetail {
    pub order: ResolvedStep,
    pub ok: bool,
    /// Errors of failed attempts, in attempt order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<AttemptError>,
    /// Text after this step; the step's input when every attempt failed
    pub converted_text: String,
}

impl StepDetail {
    pub(crate) fn pending(order: ResolvedStep, input: &str) -> Self {
        Self {
            order,
            ok: false,
            errors: Vec::new(),
            converted_text: input.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.order.name
    }
}

/// Final text plus one detail per executed step
#[derive(Debug, Clone, Serialize)]
pub struct ConvertOutput {
    pub text: String,
    pub details: Vec<StepDetail>,
}

impl ConvertOutput {
    /// True when every executed step succeeded
    pub fn succeeded(&self) -> bool {
        self.details.iter().all(|detail| detail.ok)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = (usize, &StepDetail)> {
        self.details
            .iter()
            .enumerate()
            .filter(|(_, detail)| !detail.ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_ref_deserializes_both_shapes() {
        let steps: Vec<StepRef> = serde_json::from_value(json!([
            "double",
            { "name": "suffix", "option": { "suffix": "Bar" } },
            { "name": "prefix" },
        ]))
        .unwrap();

        assert_eq!(steps[0], StepRef::Name("double".into()));
        assert_eq!(
            steps[1],
            StepRef::with_option("suffix", json!({ "suffix": "Bar" }))
        );
        assert_eq!(steps[2].clone().into_parts(), ("prefix".to_string(), None));
    }

    #[test]
    fn test_step_ref_conversions() {
        let from_str: StepRef = "double".into();
        let from_pair: StepRef = ("suffix", json!({ "suffix": "!" })).into();

        assert_eq!(from_str.name(), "double");
        assert_eq!(
            from_pair.into_parts(),
            ("suffix".to_string(), Some(json!({ "suffix": "!" })))
        );
    }

    #[test]
    fn test_attempt_error_keeps_cause() {
        let err = AttemptError::failed("prefix", 0, "Foo".into());
        assert_eq!(err.plugin(), "prefix");
        assert_eq!(err.index(), 0);
        assert_eq!(err.convert_error().map(|c| c.to_string()), Some("Foo".to_string()));
        assert!(err.to_string().contains("ConvertFunctionIndex: 0"));
    }

    #[test]
    fn test_detail_serialization_omits_empty_errors() {
        let detail = StepDetail {
            order: ResolvedStep {
                name: "double".into(),
                option: None,
            },
            ok: true,
            errors: Vec::new(),
            converted_text: "FooFoo".into(),
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(
            value,
            json!({ "order": { "name": "double" }, "ok": true, "converted_text": "FooFoo" })
        );
    }

    #[test]
    fn test_detail_serialization_lists_errors() {
        let mut detail = StepDetail::pending(
            ResolvedStep {
                name: "error".into(),
                option: None,
            },
            "Test",
        );
        detail
            .errors
            .push(AttemptError::timed_out("error", 0, Duration::from_millis(10)));

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["converted_text"], json!("Test"));
        assert_eq!(value["errors"][0]["timed_out"], json!(true));
        assert_eq!(value["errors"][0]["index"], json!(0));
    }
}
