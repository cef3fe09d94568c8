//! Dispatch error taxonomy
//!
//! Every failure the dispatcher can hit while answering one request maps
//! to exactly one JSON-RPC error object. None of them are fatal to the
//! transport loop.

use serde_json::Value;
use thiserror::Error;

use crate::mcp::protocol::{error_codes, JsonRpcResponse};

/// Errors produced while dispatching a single request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The request text was not valid JSON
    #[error("Parse error")]
    ParseFailure,

    /// Any method other than the three served ones. `None` covers JSON that
    /// is not an object or has no string `method`.
    #[error("Method not found{}", method_suffix(.0))]
    UnknownMethod(Option<String>),

    /// No registered tool has this name; a `tools/call` without a string
    /// `name` reports `undefined`
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool handler reported failure; the message is passed through verbatim
    #[error("{0}")]
    HandlerFailure(String),
}

impl DispatchError {
    /// JSON-RPC error code for this failure
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::ParseFailure => error_codes::PARSE_ERROR,
            DispatchError::UnknownMethod(_) => error_codes::METHOD_NOT_FOUND,
            DispatchError::UnknownTool(_) | DispatchError::HandlerFailure(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Build the error response for a request with the given id
    /// 
    /// Parse failures always answer with a `null` id since the request id
    /// could not be read.
    pub fn into_response(self, id: Value) -> JsonRpcResponse {
        let id = match self {
            DispatchError::ParseFailure => Value::Null,
            _ => id,
        };
        JsonRpcResponse::error(id, self.code(), self.to_string())
    }
}

fn method_suffix(method: &Option<String>) -> String {
    match method {
        Some(name) => format!(": {}", name),
        None => String::new(),
    }
}
