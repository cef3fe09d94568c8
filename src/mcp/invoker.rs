//! Tool invoker
//!
//! Looks a tool up in the registry, runs its handler and turns the outcome
//! into a `tools/call` response. Handler errors and panics both come back
//! as internal errors on the wire; neither escapes to the transport loop.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, warn};

use crate::mcp::error::DispatchError;
use crate::mcp::protocol::{Arguments, JsonRpcResponse, ToolCallParams, ToolCallResult};
use crate::mcp::registry::ToolRegistry;

/// Runs tool calls against a registry
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Invoke a tool and build the response for call `id`
    pub async fn invoke(&self, call: ToolCallParams, id: Value) -> JsonRpcResponse {
        match self.execute(&call.name, &call.arguments).await {
            Ok(text) => JsonRpcResponse::from_result(id, &ToolCallResult::text(text)),
            Err(e) => e.into_response(id),
        }
    }

    /// Run the named tool and return its text payload unmodified
    pub async fn execute(&self, name: &str, arguments: &Arguments) -> Result<String, DispatchError> {
        let handler = self
            .registry
            .handler(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        debug!("Calling tool: {}", name);

        match AssertUnwindSafe(handler.call(arguments)).catch_unwind().await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                warn!("Tool {} failed: {}", name, e);
                Err(DispatchError::HandlerFailure(e.to_string()))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Tool {} panicked: {}", name, message);
                Err(DispatchError::HandlerFailure(format!(
                    "Tool '{}' panicked: {}",
                    name, message
                )))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
