//! Protocol dispatcher
//!
//! Parses one framed request text, routes it by method and produces the
//! response envelope. The dispatcher itself does no I/O; tool handlers are
//! the only code that touches files or the database.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::mcp::error::DispatchError;
use crate::mcp::invoker::ToolInvoker;
use crate::mcp::protocol::{
    Arguments, InitializeResult, JsonRpcRequest, JsonRpcResponse, Method, ServerInfo,
    ToolCallParams, ToolsListResult,
};
use crate::mcp::registry::ToolRegistry;

/// Routes JSON-RPC requests to the protocol handlers
pub struct Dispatcher {
    server_info: ServerInfo,
    invoker: ToolInvoker,
}

impl Dispatcher {
    pub fn new(server_info: ServerInfo, registry: Arc<ToolRegistry>) -> Self {
        Self {
            server_info,
            invoker: ToolInvoker::new(registry),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.invoker.registry()
    }

    /// Handle one request text
    /// 
    /// Returns `None` only for notifications, which never get a response.
    pub async fn handle(&self, text: &str) -> Option<JsonRpcResponse> {
        debug!("Processing request: {}", text);

        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                debug!("Failed to parse JSON-RPC request: {}", e);
                return Some(DispatchError::ParseFailure.into_response(Value::Null));
            }
        };

        if !value.is_object() {
            debug!("Request is not a JSON object");
            return Some(DispatchError::UnknownMethod(None).into_response(Value::Null));
        }

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                debug!("Failed to read request envelope: {}", e);
                Some(DispatchError::UnknownMethod(None).into_response(id))
            }
        }
    }

    /// Handle an already-parsed request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.response_id();
        let method = match request.method_name() {
            Some(name) => Method::parse(name),
            None => return Some(DispatchError::UnknownMethod(None).into_response(id)),
        };

        match method {
            Method::Initialize => Some(self.handle_initialize(id)),
            Method::ToolsList => Some(self.handle_tools_list(id)),
            Method::ToolsCall => Some(self.handle_tools_call(id, request.params).await),
            Method::Notification(name) if request.is_notification() => {
                info!("Received notification: {}", name);
                None
            }
            Method::Notification(name) | Method::Unknown(name) => {
                Some(DispatchError::UnknownMethod(Some(name)).into_response(id))
            }
        }
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");
        JsonRpcResponse::from_result(id, &InitializeResult::new(self.server_info.clone()))
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.registry().definitions().collect(),
        };
        JsonRpcResponse::from_result(id, &result)
    }

    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match tool_call_params(params) {
            Ok(call) => self.invoker.invoke(call, id).await,
            Err(e) => e.into_response(id),
        }
    }
}

/// Read `{ name, arguments }` out of `tools/call` params
///
/// Absent or `null` arguments become an empty object. Every failure here is
/// reported as an internal error, like any other failed tool call.
fn tool_call_params(params: Option<Value>) -> Result<ToolCallParams, DispatchError> {
    let mut params = match params {
        Some(Value::Object(params)) => params,
        _ => Arguments::new(),
    };

    let name = match params.remove("name") {
        Some(Value::String(name)) => name,
        _ => return Err(DispatchError::UnknownTool("undefined".to_string())),
    };

    let arguments = match params.remove("arguments") {
        None | Some(Value::Null) => Arguments::new(),
        Some(Value::Object(arguments)) => arguments,
        Some(_) => {
            return Err(DispatchError::HandlerFailure(format!(
                "Invalid arguments for tool '{}': expected an object",
                name
            )));
        }
    };

    Ok(ToolCallParams { name, arguments })
}
