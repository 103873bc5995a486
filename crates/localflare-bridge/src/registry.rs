//! Message-type → handler table.
//!
//! Filled during single-threaded startup, then frozen behind an `Arc` and
//! shared read-only with the server. Registering the same type twice keeps
//! the last handler.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use localflare_common::BridgeError;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A registered handler after its output and error types are erased.
type BoxedHandler = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Table of message handlers keyed by message type.
#[derive(Default, Clone)]
pub struct MessageRegistry {
    handlers: HashMap<String, BoxedHandler>,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handler` under `message_type`, replacing any previous one.
    ///
    /// The handler receives the request's `data` value. Its `Ok` value is
    /// serialized into the response `result`; its `Err` is sent back as the
    /// error message via `Display`.
    pub fn register<F, R, E>(&mut self, message_type: impl Into<String>, handler: F)
    where
        F: Fn(Value) -> Result<R, E> + Send + Sync + 'static,
        R: Serialize,
        E: Display,
    {
        let message_type = message_type.into();
        let boxed: BoxedHandler = Arc::new(move |data| {
            let output = handler(data).map_err(|e| e.to_string())?;
            serde_json::to_value(output).map_err(|e| format!("failed to serialize result: {e}"))
        });

        if self.handlers.insert(message_type.clone(), boxed).is_some() {
            debug!(message_type = %message_type, "message handler replaced");
        } else {
            debug!(message_type = %message_type, "message handler registered");
        }
    }

    /// Run the handler registered for `message_type` on `data`.
    ///
    /// A handler that panics is reported as `HandlerError` with the panic
    /// message, the same as one that returns `Err`.
    pub fn dispatch(&self, message_type: &str, data: Value) -> Result<Value, BridgeError> {
        let handler = self
            .handlers
            .get(message_type)
            .ok_or_else(|| BridgeError::UnknownMessageType(message_type.to_string()))?;

        match catch_unwind(AssertUnwindSafe(|| handler(data))) {
            Ok(result) => result.map_err(BridgeError::HandlerError),
            Err(panic) => Err(BridgeError::HandlerError(panic_message(panic.as_ref()))),
        }
    }

    /// Registered message types, sorted.
    pub fn message_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRegistry")
            .field("message_types", &self.message_types())
            .finish()
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
