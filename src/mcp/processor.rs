use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super::context::RequestContext;
use super::dispatcher::{Dispatcher, McpMethod};
use super::protocol::{IncomingMessage, JsonRpcError, JsonRpcResponse};

/// What goes back over the wire for one request body
#[derive(Debug, Clone)]
pub enum Reply {
    Single(JsonRpcResponse),
    Batch(Vec<JsonRpcResponse>),
    /// Every message was a notification: 204 with an empty body
    NoBody,
}

/// Outcome of processing with handshake tracking
#[derive(Debug, Clone)]
pub struct Processed {
    pub reply: Reply,
    pub initialized: bool,
}

/// Turns request bodies into replies, one dispatcher call per element
pub struct RequestProcessor {
    dispatcher: Arc<Dispatcher>,
}

impl RequestProcessor {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Parse a raw body; the error is the -32603 body sent with HTTP 500
    pub fn parse_body(body: &[u8]) -> Result<Value, JsonRpcResponse> {
        serde_json::from_slice(body).map_err(|e| {
            tracing::warn!("Failed to parse JSON-RPC body: {}", e);
            JsonRpcError::internal_error(&format!("Parse error: {}", e)).into_response_body()
        })
    }

    /// True when the body (single or batch) carries an `initialize` call
    pub fn contains_initialize(body: &Value) -> bool {
        let is_initialize = |v: &Value| {
            matches!(
                IncomingMessage::parse(v.clone()),
                IncomingMessage::Call { ref method, .. } if method == McpMethod::Initialize.as_str()
            )
        };
        match body {
            Value::Array(items) => items.iter().any(is_initialize),
            other => is_initialize(other),
        }
    }

    pub async fn process(&self, body: Value, context: &RequestContext) -> Reply {
        self.process_tracked(body, context).await.reply
    }

    pub async fn process_tracked(&self, body: Value, context: &RequestContext) -> Processed {
        let mut initialized = false;

        let reply = match body {
            Value::Array(items) => {
                let mut responses = Vec::with_capacity(items.len());
                for item in items {
                    let (response, init_ok) = self.process_one(IncomingMessage::parse(item), context).await;
                    initialized |= init_ok;
                    responses.extend(response);
                }
                Reply::Batch(responses)
            }
            single => {
                let (response, init_ok) = self.process_one(IncomingMessage::parse(single), context).await;
                initialized = init_ok;
                match response {
                    Some(response) => Reply::Single(response),
                    None => Reply::NoBody,
                }
            }
        };

        Processed { reply, initialized }
    }

    /// Returns the response (none for notifications) and whether this
    /// element was a successful `initialize` call.
    async fn process_one(
        &self,
        message: IncomingMessage,
        context: &RequestContext,
    ) -> (Option<JsonRpcResponse>, bool) {
        let (id, method, params) = match message {
            IncomingMessage::Call { id, method, params } => (Some(id), method, params),
            IncomingMessage::Notify { method, params } => (None, method, params),
            IncomingMessage::Invalid { id: Some(id), reason } => {
                tracing::warn!("Invalid JSON-RPC element: {}", reason);
                return (
                    Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request(&reason))),
                    false,
                );
            }
            IncomingMessage::Invalid { id: None, reason } => {
                tracing::warn!("Dropping invalid notification: {}", reason);
                return (None, false);
            }
        };

        let outcome = AssertUnwindSafe(self.dispatcher.dispatch(&method, params, context))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::debug!(method = %method, code = err.code(), "Method failed: {}", err);
                Err(JsonRpcError::from(err))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(method = %method, "Handler panicked: {}", message);
                Err(JsonRpcError::internal_error(&message))
            }
        };

        let init_ok = result.is_ok() && id.is_some() && method == McpMethod::Initialize.as_str();

        match (id, result) {
            (Some(id), Ok(value)) => (Some(JsonRpcResponse::success(id, value)), init_ok),
            (Some(id), Err(error)) => (Some(JsonRpcResponse::error(id, error)), init_ok),
            (None, Ok(_)) => {
                tracing::debug!("Handled notification {}", method);
                (None, false)
            }
            (None, Err(error)) => {
                tracing::warn!(
                    code = error.code,
                    "Notification {} failed: {}",
                    method,
                    error.message
                );
                (None, false)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Internal error".to_string()
    }
}
