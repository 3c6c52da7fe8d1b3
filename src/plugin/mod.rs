use crate::converter::StepDetail;
use crate::error::{self, BoxError, ConverterError, ErrorCode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub mod function;
pub mod registry;

pub use function::{
    async_convert_fn, convert_fn, convert_fn_with_option, typed_convert_fn, AsyncConvertFn,
    OptionConvertFn, PlainConvertFn, TypedConvertFn,
};
pub use registry::{ExtendConvertFunctions, PluginRegistry};

/// Shared handle to a convert function
pub type ConvertFn = Arc<dyn ConvertFunction>;

/// A single way of turning text into new text.
///
/// A plugin holds an ordered list of these; the converter tries them in order
/// and keeps the first success. `option` is `None` for plugins that declare
/// no default option.
#[async_trait]
pub trait ConvertFunction: Send + Sync {
    async fn convert(
        &self,
        text: &str,
        option: Option<&Value>,
        context: &ConvertContext<'_>,
    ) -> Result<String, BoxError>;
}

/// Read-only view handed to every convert function invocation
#[derive(Clone, Copy)]
pub struct ConvertContext<'a> {
    registry: &'a PluginRegistry,
    results: &'a [StepDetail],
}

impl<'a> ConvertContext<'a> {
    pub(crate) fn new(registry: &'a PluginRegistry, results: &'a [StepDetail]) -> Self {
        Self { registry, results }
    }

    /// Every plugin registered in the running converter
    pub fn plugins(&self) -> &'a PluginRegistry {
        self.registry
    }

    /// Details of the steps that already ran in this `convert` call
    pub fn results(&self) -> &'a [StepDetail] {
        self.results
    }
}

impl fmt::Debug for ConvertContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertContext")
            .field("plugins", &self.registry.ids())
            .field("results", &self.results.len())
            .finish()
    }
}

/// One value or a list, as plugin manifests allow for authors and homepages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Descriptive information about a plugin. Never read by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

/// Plugin definition: convert functions, optional default option, metadata
#[derive(Clone)]
pub struct Plugin {
    convert_functions: Vec<ConvertFn>,
    default_option: Option<Value>,
    metadata: PluginMetadata,
}

impl Plugin {
    /// Create a plugin that takes no option
    pub fn new(convert_functions: Vec<ConvertFn>) -> Self {
        Self {
            convert_functions,
            default_option: None,
            metadata: PluginMetadata::default(),
        }
    }

    /// Declare the default option; the plugin's functions then receive one
    pub fn with_default_option(mut self, option: Value) -> Self {
        self.default_option = Some(option);
        self
    }

    /// Declare the default option from any serializable type.
    ///
    /// Fails with [`ConverterError::InvalidPlugin`] when `option` has no JSON
    /// representation.
    pub fn with_typed_default_option<O: Serialize>(self, option: &O) -> error::Result<Self> {
        let value = serde_json::to_value(option).map_err(|err| {
            ConverterError::invalid_plugin(
                ErrorCode::PLUGIN_GENERIC,
                std::any::type_name::<O>(),
                format!("default option cannot be serialized: {err}"),
            )
        })?;
        Ok(self.with_default_option(value))
    }

    pub fn with_metadata(mut self, metadata: PluginMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Append a fallback convert function
    pub fn with_convert_function(mut self, function: ConvertFn) -> Self {
        self.convert_functions.push(function);
        self
    }

    pub fn convert_functions(&self) -> &[ConvertFn] {
        &self.convert_functions
    }

    pub fn default_option(&self) -> Option<&Value> {
        self.default_option.as_ref()
    }

    pub fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    pub(crate) fn into_parts(self) -> (Vec<ConvertFn>, Option<Value>, PluginMetadata) {
        (self.convert_functions, self.default_option, self.metadata)
    }

    pub(crate) fn from_parts(
        convert_functions: Vec<ConvertFn>,
        default_option: Option<Value>,
        metadata: PluginMetadata,
    ) -> Self {
        Self {
            convert_functions,
            default_option,
            metadata,
        }
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("convert_functions", &self.convert_functions.len())
            .field("default_option", &self.default_option)
            .field("metadata", &self.metadata)
            .finish()
    }
}
