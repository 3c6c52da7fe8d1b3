//! Runs one resolved step: tries a plugin's convert functions in order until
//! one succeeds.

use super::{AttemptError, CancellationToken, Hooks, ResolvedStep, StepDetail};
use crate::error::{ConverterError, Result};
use crate::logging::{LevelLogger, LogLevel, Logger};
use crate::plugin::{ConvertContext, ConvertFn, Plugin};
use std::time::Duration;

/// Executes the fallback chain of a single step
pub(crate) struct StepExecutor<'a> {
    pub(crate) hooks: &'a Hooks,
    pub(crate) logger: &'a LevelLogger,
    pub(crate) attempt_timeout: Option<Duration>,
    pub(crate) cancel: Option<&'a CancellationToken>,
}

impl StepExecutor<'_> {
    /// Run `plugin` on `input` and return the finalized detail.
    ///
    /// Attempt failures are recorded in the detail, never returned. Only a
    /// hook error or cancellation makes this return `Err`.
    pub(crate) async fn run(
        &self,
        plugin: &Plugin,
        order: ResolvedStep,
        input: &str,
        step_index: usize,
        context: &ConvertContext<'_>,
    ) -> Result<StepDetail> {
        let mut detail = StepDetail::pending(order, input);

        for (function_index, function) in plugin.convert_functions().iter().enumerate() {
            if self.logger.enabled(LogLevel::Debug) {
                self.logger.debug(&format!(
                    "Converting with plugin \"{}\" (ConvertFunctionIndex: {}, option: {})",
                    detail.order.name,
                    function_index,
                    describe_option(&detail.order)
                ));
            }

            let outcome = self
                .attempt(function, &detail.order, input, step_index, function_index, context)
                .await?;

            match outcome {
                Ok(text) => {
                    detail.ok = true;
                    detail.converted_text = text;
                }
                Err(error) => {
                    self.logger.error(&error.to_string());
                    detail.errors.push(error);
                }
            }

            self.hooks
                .end_convert_function(&detail, step_index, function_index)?;

            if detail.ok {
                break;
            }
        }

        Ok(detail)
    }

    /// One bounded, cancellable call of a convert function.
    ///
    /// The outer `Result` carries cancellation; the inner one the attempt outcome.
    async fn attempt(
        &self,
        function: &ConvertFn,
        order: &ResolvedStep,
        input: &str,
        step_index: usize,
        function_index: usize,
        context: &ConvertContext<'_>,
    ) -> Result<std::result::Result<String, AttemptError>> {
        let bounded = async {
            let call = function.convert(input, order.option.as_ref(), context);
            match self.attempt_timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result
                        .map_err(|source| AttemptError::failed(&order.name, function_index, source)),
                    Err(_) => Err(AttemptError::timed_out(&order.name, function_index, limit)),
                },
                None => call
                    .await
                    .map_err(|source| AttemptError::failed(&order.name, function_index, source)),
            }
        };

        match self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(ConverterError::cancelled(step_index)),
                outcome = bounded => Ok(outcome),
            },
            None => Ok(bounded.await),
        }
    }
}

fn describe_option(order: &ResolvedStep) -> String {
    match &order.option {
        Some(option) => option.to_string(),
        None => "none".to_string(),
    }
}
