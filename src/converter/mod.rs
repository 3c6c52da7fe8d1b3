//! The conversion engine.
//!
//! A [`Converter`] owns a normalized [`PluginRegistry`] and runs pipelines
//! of [`StepRef`]s over input text. Each step resolves a plugin, merges the
//! step's option override onto the plugin's default option, and tries the
//! plugin's convert functions in order until one succeeds. Every resolved
//! step produces a [`StepDetail`].
//!
//! ```no_run
//! use std::collections::HashMap;
//! use submarin_converter::converter::{Converter, ConverterOptions, StepRef};
//! use submarin_converter::plugin::{convert_fn, convert_fn_with_option, Plugin};
//! use serde_json::json;
//!
//! # async fn demo() -> submarin_converter::error::Result<()> {
//! let mut plugins = HashMap::new();
//! plugins.insert(
//!     "double".to_string(),
//!     Plugin::new(vec![convert_fn(|text| Ok(format!("{text}{text}")))]),
//! );
//! plugins.insert(
//!     "suffix".to_string(),
//!     Plugin::new(vec![convert_fn_with_option(|text, option| {
//!         Ok(format!("{}{}", text, option["suffix"].as_str().unwrap_or_default()))
//!     })])
//!     .with_default_option(json!({ "suffix": "" })),
//! );
//!
//! let converter = Converter::new(plugins, ConverterOptions::default())?;
//! let output = converter
//!     .convert(
//!         "Foo",
//!         [
//!             StepRef::from("double"),
//!             StepRef::with_option("suffix", json!({ "suffix": "Bar" })),
//!         ],
//!     )
//!     .await?;
//! assert_eq!(output.text, "FooFooBar");
//! # Ok(())
//! # }
//! ```

mod cancel;
mod executor;
mod hooks;
mod runner;
mod step;

pub use cancel::CancellationToken;
pub use hooks::{EndConvertFunctionHook, EndPluginConvertHook, HookKind, Hooks};
pub use step::{AttemptError, ConvertOutput, ResolvedStep, StepDetail, StepRef};

use crate::config::ConverterConfig;
use crate::error::{BoxError, Result};
use crate::logging::{LevelLogger, LogLevel, Logger, TracingLogger};
use crate::merge::merge;
use crate::plugin::{ExtendConvertFunctions, Plugin, PluginRegistry};
use executor::StepExecutor;
use runner::{InterruptPolicy, PipelineRunner};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Construction-time settings of a [`Converter`]
#[derive(Clone, Default)]
pub struct ConverterOptions {
    plugin_options: HashMap<String, Value>,
    extend_convert_functions: HashMap<String, ExtendConvertFunctions>,
    interrupt_on_missing_plugin: bool,
    interrupt_on_step_failure: bool,
    hooks: Hooks,
    log_level: LogLevel,
    logger: Option<Arc<dyn Logger>>,
    attempt_timeout: Option<Duration>,
}

impl ConverterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from file-backed settings
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::default().with_config(config)
    }

    /// Apply file-backed settings.
    ///
    /// Flags, log level and timeout are taken from `config` only when it
    /// sets them. Per-plugin options from `config` become the base that
    /// options already set here are merged onto.
    pub fn with_config(mut self, config: &ConverterConfig) -> Self {
        if let Some(interrupt) = config.interrupt_on_missing_plugin {
            self.interrupt_on_missing_plugin = interrupt;
        }
        if let Some(interrupt) = config.interrupt_on_step_failure {
            self.interrupt_on_step_failure = interrupt;
        }
        if let Some(level) = config.log_level {
            self.log_level = level;
        }
        if let Some(timeout) = config.attempt_timeout {
            self.attempt_timeout = Some(timeout);
        }

        for (id, option) in &config.plugin_options {
            let combined = match self.plugin_options.remove(id) {
                Some(programmatic) => merge(option, &programmatic),
                None => option.clone(),
            };
            self.plugin_options.insert(id.clone(), combined);
        }
        self
    }

    /// Override the default option of plugin `id`.
    ///
    /// Repeated calls for the same id merge onto each other.
    pub fn with_plugin_option(mut self, id: impl Into<String>, option: Value) -> Self {
        let id = id.into();
        let combined = match self.plugin_options.remove(&id) {
            Some(existing) => merge(&existing, &option),
            None => option,
        };
        self.plugin_options.insert(id, combined);
        self
    }

    /// Replace the convert function list of plugin `id` at construction
    pub fn extend_convert_functions<F>(mut self, id: impl Into<String>, extend: F) -> Self
    where
        F: Fn(Vec<crate::plugin::ConvertFn>) -> Vec<crate::plugin::ConvertFn>
            + Send
            + Sync
            + 'static,
    {
        self.extend_convert_functions
            .insert(id.into(), Arc::new(extend));
        self
    }

    pub fn interrupt_on_missing_plugin(mut self, interrupt: bool) -> Self {
        self.interrupt_on_missing_plugin = interrupt;
        self
    }

    pub fn interrupt_on_step_failure(mut self, interrupt: bool) -> Self {
        self.interrupt_on_step_failure = interrupt;
        self
    }

    /// Observe every convert function attempt
    pub fn on_end_convert_function<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StepDetail, usize, usize) -> std::result::Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.on_end_convert_function = Some(Arc::new(hook));
        self
    }

    /// Observe every finished step
    pub fn on_end_plugin_convert<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StepDetail, usize) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.hooks.on_end_plugin_convert = Some(Arc::new(hook));
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Send log output to `logger` instead of `tracing`
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Bound every convert function attempt
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Option override registered for `id`, if any
    pub fn plugin_option(&self, id: &str) -> Option<&Value> {
        self.plugin_options.get(id)
    }
}

impl fmt::Debug for ConverterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extended: Vec<&str> = self
            .extend_convert_functions
            .keys()
            .map(String::as_str)
            .collect();
        extended.sort_unstable();

        f.debug_struct("ConverterOptions")
            .field("plugin_options", &self.plugin_options)
            .field("extend_convert_functions", &extended)
            .field("interrupt_on_missing_plugin", &self.interrupt_on_missing_plugin)
            .field("interrupt_on_step_failure", &self.interrupt_on_step_failure)
            .field("hooks", &self.hooks)
            .field("log_level", &self.log_level)
            .field("custom_logger", &self.logger.is_some())
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}

/// Sequential text conversion engine over a fixed set of plugins
#[derive(Debug, Clone)]
pub struct Converter {
    registry: PluginRegistry,
    logger: LevelLogger,
    hooks: Hooks,
    policy: InterruptPolicy,
    attempt_timeout: Option<Duration>,
}

impl Converter {
    /// Build a converter, normalizing every plugin definition once.
    ///
    /// Fails with `InvalidPlugin` when a plugin ends up with no convert
    /// functions.
    pub fn new<I, K>(plugins: I, options: ConverterOptions) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Plugin)>,
        K: Into<String>,
    {
        let ConverterOptions {
            plugin_options,
            extend_convert_functions,
            interrupt_on_missing_plugin,
            interrupt_on_step_failure,
            hooks,
            log_level,
            logger,
            attempt_timeout,
        } = options;

        let sink: Arc<dyn Logger> = match logger {
            Some(logger) => logger,
            None => Arc::new(TracingLogger),
        };
        let logger = LevelLogger::new(log_level, sink);

        let plugins: HashMap<String, Plugin> = plugins
            .into_iter()
            .map(|(id, plugin)| (id.into(), plugin))
            .collect();
        let registry =
            PluginRegistry::build(plugins, &plugin_options, &extend_convert_functions, &logger)?;

        logger.debug(&format!(
            "Converter is created with {} plugin(s): {:?}",
            registry.len(),
            registry.ids()
        ));

        Ok(Self {
            registry,
            logger,
            hooks,
            policy: InterruptPolicy {
                on_missing_plugin: interrupt_on_missing_plugin,
                on_step_failure: interrupt_on_step_failure,
            },
            attempt_timeout,
        })
    }

    /// Run `steps` over `input`.
    ///
    /// Returns the final text and one detail per executed step. Fails only
    /// under an interrupt policy or when a hook returns an error.
    pub async fn convert<I, S>(&self, input: &str, steps: I) -> Result<ConvertOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<StepRef>,
    {
        self.run(input, steps, None).await
    }

    /// Like [`convert`](Self::convert), aborting with `Cancelled` once `token` fires
    pub async fn convert_with_cancellation<I, S>(
        &self,
        input: &str,
        steps: I,
        token: &CancellationToken,
    ) -> Result<ConvertOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<StepRef>,
    {
        self.run(input, steps, Some(token)).await
    }

    async fn run<I, S>(
        &self,
        input: &str,
        steps: I,
        cancel: Option<&CancellationToken>,
    ) -> Result<ConvertOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<StepRef>,
    {
        let steps: Vec<StepRef> = steps.into_iter().map(Into::into).collect();

        let runner = PipelineRunner {
            registry: &self.registry,
            hooks: &self.hooks,
            logger: &self.logger,
            policy: self.policy,
            executor: StepExecutor {
                hooks: &self.hooks,
                logger: &self.logger,
                attempt_timeout: self.attempt_timeout,
                cancel,
            },
            cancel,
        };
        runner.run(input, steps).await
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn log_level(&self) -> LogLevel {
        self.logger.level()
    }

    pub fn interrupts_on_missing_plugin(&self) -> bool {
        self.policy.on_missing_plugin
    }

    pub fn interrupts_on_step_failure(&self) -> bool {
        self.policy.on_step_failure
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }
}
