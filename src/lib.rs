//! # Submarin Converter
//!
//! A sequential text conversion engine driven by pluggable convert functions.
//!
//! ## Usage
//!
//! Register plugins, then run a pipeline of steps over some text. Each step
//! names a plugin and may override its default option; the output of one
//! step is the input of the next.
//!
//! ```no_run
//! use submarin_converter::{convert_fn, Converter, ConverterOptions, Plugin};
//!
//! # async fn demo() -> submarin_converter::Result<()> {
//! let converter = Converter::new(
//!     [("shout", Plugin::new(vec![convert_fn(|text| Ok(text.to_uppercase()))]))],
//!     ConverterOptions::default(),
//! )?;
//! let output = converter.convert("hello", ["shout"]).await?;
//! assert_eq!(output.text, "HELLO");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - `converter` - Pipeline runner, step executor, hooks and cancellation
//! - `plugin` - Plugin definitions, convert function adapters and the registry
//! - `merge` - Deep merge of plugin options
//! - `config` - Converter settings loaded from TOML, YAML or JSON
//! - `error` - Error type and error codes
//! - `logging` - Leveled logger interface and `tracing` integration
pub mod config;
pub mod converter;
pub mod error;
pub mod logging;
pub mod merge;
pub mod plugin;

pub use config::ConverterConfig;
pub use converter::{
    CancellationToken, ConvertOutput, Converter, ConverterOptions, StepDetail, StepRef,
};
pub use error::{BoxError, ConverterError, Result};
pub use logging::{LogLevel, Logger};
pub use plugin::{
    async_convert_fn, convert_fn, convert_fn_with_option, typed_convert_fn, ConvertContext,
    ConvertFunction, Plugin, PluginMetadata,
};
