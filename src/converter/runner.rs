use super::executor::StepExecutor;
use super::{CancellationToken, ConvertOutput, Hooks, ResolvedStep, StepDetail, StepRef};
use crate::error::{ConverterError, Result};
use crate::logging::{LevelLogger, LogLevel, Logger};
use crate::merge::merge_optional;
use crate::plugin::{ConvertContext, PluginRegistry};

/// Interrupt policies applied by the pipeline loop
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InterruptPolicy {
    pub(crate) on_missing_plugin: bool,
    pub(crate) on_step_failure: bool,
}

/// Drives one `convert` call: resolve, merge, execute, record, notify
pub(crate) struct PipelineRunner<'a> {
    pub(crate) registry: &'a PluginRegistry,
    pub(crate) hooks: &'a Hooks,
    pub(crate) logger: &'a LevelLogger,
    pub(crate) policy: InterruptPolicy,
    pub(crate) executor: StepExecutor<'a>,
    pub(crate) cancel: Option<&'a CancellationToken>,
}

impl PipelineRunner<'_> {
    pub(crate) async fn run(&self, input: &str, steps: Vec<StepRef>) -> Result<ConvertOutput> {
        let mut text = input.to_string();
        let mut details: Vec<StepDetail> = Vec::with_capacity(steps.len());

        for (step_index, step) in steps.into_iter().enumerate() {
            if self.cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(ConverterError::cancelled(step_index));
            }

            let (name, option_override) = step.into_parts();

            let Some(plugin) = self.registry.get(&name) else {
                if self.policy.on_missing_plugin {
                    return Err(ConverterError::plugin_not_found(name, step_index));
                }
                self.logger
                    .warn(&format!("Plugin \"{}\" is not found. Convert is stopped.", name));
                break;
            };

            let option = plugin
                .default_option()
                .map(|default| merge_optional(default, option_override.as_ref()));
            let order = ResolvedStep { name, option };

            let detail = {
                let context = ConvertContext::new(self.registry, &details);
                self.executor
                    .run(plugin, order, &text, step_index, &context)
                    .await?
            };

            self.hooks.end_plugin_convert(&detail, step_index)?;

            if !detail.ok && self.policy.on_step_failure {
                return Err(ConverterError::step_failed(
                    detail.order.name,
                    step_index,
                    detail.errors,
                ));
            }

            text.clone_from(&detail.converted_text);
            details.push(detail);
        }

        if self.logger.enabled(LogLevel::Debug) {
            self.logger.debug(&format!(
                "Converted text: {:?} ({} step(s) executed)",
                text,
                details.len()
            ));
        }

        Ok(ConvertOutput { text, details })
    }
}
