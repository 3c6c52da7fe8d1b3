//! Observer hooks invoked inline while a conversion runs.

use super::StepDetail;
use crate::error::{BoxError, ConverterError, Result};
use std::fmt;
use std::sync::Arc;

/// Called after every convert function attempt with
/// `(detail so far, step index, function index)`
pub type EndConvertFunctionHook =
    Arc<dyn Fn(&StepDetail, usize, usize) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Called once per resolved step with `(final detail, step index)`
pub type EndPluginConvertHook =
    Arc<dyn Fn(&StepDetail, usize) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Which hook produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    EndConvertFunction,
    EndPluginConvert,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::EndConvertFunction => f.write_str("end-convert-function"),
            HookKind::EndPluginConvert => f.write_str("end-plugin-convert"),
        }
    }
}

/// The registered hooks of a converter
#[derive(Clone, Default)]
pub struct Hooks {
    pub on_end_convert_function: Option<EndConvertFunctionHook>,
    pub on_end_plugin_convert: Option<EndPluginConvertHook>,
}

impl Hooks {
    pub(crate) fn end_convert_function(
        &self,
        detail: &StepDetail,
        step_index: usize,
        function_index: usize,
    ) -> Result<()> {
        match &self.on_end_convert_function {
            Some(hook) => hook(detail, step_index, function_index).map_err(|source| {
                ConverterError::hook(HookKind::EndConvertFunction, step_index, source)
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn end_plugin_convert(&self, detail: &StepDetail, step_index: usize) -> Result<()> {
        match &self.on_end_plugin_convert {
            Some(hook) => hook(detail, step_index).map_err(|source| {
                ConverterError::hook(HookKind::EndPluginConvert, step_index, source)
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field(
                "on_end_convert_function",
                &self.on_end_convert_function.is_some(),
            )
            .field("on_end_plugin_convert", &self.on_end_plugin_convert.is_some())
            .finish()
    }
}
