//! Operation registry bridging an application shell to plugin crates.
//!
//! Plugin crates expose their operations by name; the shell resolves inbound
//! calls through a [`Registry`] built explicitly at process start, with no
//! reflection and no registration macros. Arguments and results are JSON
//! values, the same marshaling format the plugin crates use across their
//! platform boundaries.

#![warn(missing_docs)]

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A failed operation invocation, as relayed to the shell.
///
/// `message` is developer-facing; `code` is a stable token the caller can
/// localize on, present only when the operation defines one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct InvokeError {
    /// Human-readable description of the failure.
    pub message: String,
    /// Stable error token, when the operation defines one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl InvokeError {
    /// An error without a stable token.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// An error carrying a stable token.
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

/// Outcome of an operation invocation.
pub type InvokeResult = Result<Value, InvokeError>;

type Handler = Box<dyn Fn(Value) -> BoxFuture<'static, InvokeResult> + Send + Sync>;

/// Table mapping operation names to handler functions.
///
/// Built once at startup: each plugin crate registers its operations, then
/// the shell dispatches inbound calls through [`Registry::invoke`].
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<&'static str, Handler>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous handler.
    pub fn register<F, Fut>(&mut self, name: &'static str, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InvokeResult> + Send + 'static,
    {
        self.handlers
            .insert(name, Box::new(move |args| Box::pin(handler(args))));
    }

    /// Whether an operation is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered operation names, in no particular order.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Dispatch a call to the handler registered under `name`.
    ///
    /// # Errors
    /// Returns an [`InvokeError`] when no handler is registered under
    /// `name`, or whatever error the handler itself produces.
    pub async fn invoke(&self, name: &str, args: Value) -> InvokeResult {
        match self.handlers.get(name) {
            Some(handler) => handler(args).await,
            None => Err(InvokeError::new(format!("unknown operation: {name}"))),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("operations", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{InvokeError, Registry, Value};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register("echo", |args| async move { Ok(args) });
        registry.register("fail", |_args| async {
            Err(InvokeError::with_code("broken", "someToken"))
        });
        registry
    }

    #[tokio::test]
    async fn dispatches_to_registered_handler() {
        let result = registry().invoke("echo", json!({"k": 1})).await.unwrap();
        assert_eq!(result, json!({"k": 1}));
    }

    #[tokio::test]
    async fn unknown_operation_is_rejected() {
        let err = registry().invoke("nope", Value::Null).await.unwrap_err();
        assert!(err.message.contains("nope"));
        assert_eq!(err.code, None);
    }

    #[tokio::test]
    async fn handler_errors_pass_through() {
        let err = registry().invoke("fail", Value::Null).await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some("someToken"));
    }

    #[tokio::test]
    async fn registering_twice_replaces_the_handler() {
        let mut registry = registry();
        registry.register("echo", |_args| async { Ok(json!("replaced")) });
        let result = registry.invoke("echo", json!(1)).await.unwrap();
        assert_eq!(result, json!("replaced"));
    }

    #[test]
    fn error_serialization_omits_missing_code() {
        let plain = serde_json::to_value(InvokeError::new("m")).unwrap();
        assert_eq!(plain, json!({"message": "m"}));

        let coded = serde_json::to_value(InvokeError::with_code("m", "userCancel")).unwrap();
        assert_eq!(coded, json!({"message": "m", "code": "userCancel"}));
    }

    #[test]
    fn lists_registered_operations() {
        let registry = registry();
        let mut names: Vec<_> = registry.operations().collect();
        names.sort_unstable();
        assert_eq!(names, ["echo", "fail"]);
        assert!(registry.contains("echo"));
        assert!(!registry.contains("nope"));
    }
}
