use crate::error::{ConverterError, ErrorCode, Result};
use crate::logging::{LevelLogger, Logger};
use crate::merge::merge;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{ConvertFn, Plugin, PluginMetadata};

/// Callback replacing a plugin's convert function list at construction
pub type ExtendConvertFunctions = Arc<dyn Fn(Vec<ConvertFn>) -> Vec<ConvertFn> + Send + Sync>;

/// Immutable table of normalized plugins, keyed by plugin id.
///
/// Option overrides and function-list extensions are applied once, when the
/// registry is built. Nothing mutates it afterwards.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Plugin>,
}

impl PluginRegistry {
    /// Normalize plugin definitions into a registry.
    ///
    /// For each plugin with a default option, the stored default is the
    /// definition's default merged with `plugin_options[id]`. The stored
    /// function list is `extend_convert_functions[id](functions)` when an
    /// extension is given. Entries for unknown ids are ignored.
    pub(crate) fn build(
        plugins: HashMap<String, Plugin>,
        plugin_options: &HashMap<String, Value>,
        extend_convert_functions: &HashMap<String, ExtendConvertFunctions>,
        logger: &LevelLogger,
    ) -> Result<Self> {
        for id in plugin_options.keys().chain(extend_convert_functions.keys()) {
            if !plugins.contains_key(id) {
                logger.debug(&format!(
                    "Override for unknown plugin \"{}\" is ignored",
                    id
                ));
            }
        }

        let mut normalized = HashMap::with_capacity(plugins.len());
        for (id, plugin) in plugins {
            let plugin = normalize_plugin(
                &id,
                plugin,
                plugin_options.get(&id),
                extend_convert_functions.get(&id),
            )?;
            logger.debug(&format!("Plugin \"{}\" is loaded: {:?}", id, plugin));
            normalized.insert(id, plugin);
        }

        Ok(Self {
            plugins: normalized,
        })
    }

    /// Look up a plugin by id
    pub fn get(&self, id: &str) -> Option<&Plugin> {
        self.plugins.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    /// Registered plugin ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Metadata of a registered plugin
    pub fn metadata(&self, id: &str) -> Option<&PluginMetadata> {
        self.plugins.get(id).map(Plugin::metadata)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Plugin)> {
        self.plugins.iter().map(|(id, plugin)| (id.as_str(), plugin))
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

fn normalize_plugin(
    id: &str,
    plugin: Plugin,
    option_override: Option<&Value>,
    extend: Option<&ExtendConvertFunctions>,
) -> Result<Plugin> {
    let (convert_functions, default_option, metadata) = plugin.into_parts();

    let default_option = match (default_option, option_override) {
        (Some(default), Some(overlay)) => Some(merge(&default, overlay)),
        (default, _) => default,
    };

    let convert_functions = match extend {
        Some(extend) => extend(convert_functions),
        None => convert_functions,
    };

    if convert_functions.is_empty() {
        return Err(ConverterError::invalid_plugin(
            ErrorCode::PLUGIN_NO_CONVERT_FUNCTIONS,
            id,
            "a plugin needs at least one convert function",
        ));
    }

    Ok(Plugin::from_parts(
        convert_functions,
        default_option,
        metadata,
    ))
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.plugins.iter().map(|(id, plugin)| (id, plugin)))
            .finish()
    }
}
