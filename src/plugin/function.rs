//! Adapters turning plain closures into [`ConvertFunction`]s.
//!
//! Implement [`ConvertFunction`] directly when a function needs the
//! [`ConvertContext`] (sibling plugins or results of earlier steps).

use super::{ConvertContext, ConvertFn, ConvertFunction};
use crate::error::BoxError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Synchronous function of the text alone
pub struct PlainConvertFn<F>(F);

#[async_trait]
impl<F> ConvertFunction for PlainConvertFn<F>
where
    F: Fn(&str) -> Result<String, BoxError> + Send + Sync,
{
    async fn convert(
        &self,
        text: &str,
        _option: Option<&Value>,
        _context: &ConvertContext<'_>,
    ) -> Result<String, BoxError> {
        (self.0)(text)
    }
}

/// Synchronous function of the text and the raw merged option.
///
/// Plugins without a default option hand it an empty object.
pub struct OptionConvertFn<F>(F);

#[async_trait]
impl<F> ConvertFunction for OptionConvertFn<F>
where
    F: Fn(&str, &Value) -> Result<String, BoxError> + Send + Sync,
{
    async fn convert(
        &self,
        text: &str,
        option: Option<&Value>,
        _context: &ConvertContext<'_>,
    ) -> Result<String, BoxError> {
        match option {
            Some(option) => (self.0)(text, option),
            None => (self.0)(text, &Value::Object(Map::new())),
        }
    }
}

/// Synchronous function of the text and a typed option.
///
/// The merged option is deserialized on every call; a mismatch fails the
/// attempt like any other error.
pub struct TypedConvertFn<O, F> {
    function: F,
    _option: PhantomData<fn() -> O>,
}

#[async_trait]
impl<O, F> ConvertFunction for TypedConvertFn<O, F>
where
    O: DeserializeOwned,
    F: Fn(&str, O) -> Result<String, BoxError> + Send + Sync,
{
    async fn convert(
        &self,
        text: &str,
        option: Option<&Value>,
        _context: &ConvertContext<'_>,
    ) -> Result<String, BoxError> {
        let raw = option
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let option: O = serde_json::from_value(raw)?;
        (self.function)(text, option)
    }
}

/// Asynchronous function taking owned text and option
pub struct AsyncConvertFn<F>(F);

#[async_trait]
impl<F, Fut> ConvertFunction for AsyncConvertFn<F>
where
    F: Fn(String, Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, BoxError>> + Send,
{
    async fn convert(
        &self,
        text: &str,
        option: Option<&Value>,
        _context: &ConvertContext<'_>,
    ) -> Result<String, BoxError> {
        (self.0)(text.to_string(), option.cloned()).await
    }
}

/// Wrap `Fn(&str) -> Result<String, BoxError>`
pub fn convert_fn<F>(function: F) -> ConvertFn
where
    F: Fn(&str) -> Result<String, BoxError> + Send + Sync + 'static,
{
    Arc::new(PlainConvertFn(function))
}

/// Wrap `Fn(&str, &Value) -> Result<String, BoxError>`
pub fn convert_fn_with_option<F>(function: F) -> ConvertFn
where
    F: Fn(&str, &Value) -> Result<String, BoxError> + Send + Sync + 'static,
{
    Arc::new(OptionConvertFn(function))
}

/// Wrap `Fn(&str, O) -> Result<String, BoxError>` for a deserializable `O`
pub fn typed_convert_fn<O, F>(function: F) -> ConvertFn
where
    O: DeserializeOwned + 'static,
    F: Fn(&str, O) -> Result<String, BoxError> + Send + Sync + 'static,
{
    Arc::new(TypedConvertFn {
        function,
        _option: PhantomData,
    })
}

/// Wrap an async closure `Fn(String, Option<Value>) -> impl Future`
pub fn async_convert_fn<F, Fut>(function: F) -> ConvertFn
where
    F: Fn(String, Option<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, BoxError>> + Send + 'static,
{
    Arc::new(AsyncConvertFn(function))
}
