//! MCP (Model Context Protocol) message structures and JSON-RPC handling
//!
//! This module defines the JSON-RPC message format that MCP clients use to
//! talk to the server, plus the tool descriptor types advertised by `tools/list`.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MCP protocol version we support
pub const MCP_VERSION: &str = "2024-11-05";

/// JSON-RPC version tag carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// Arguments passed to a tool: parameter name to value
pub type Arguments = Map<String, Value>;

/// JSON-RPC 2.0 request message
///
/// Fields are kept as raw values so that any JSON object deserializes; a
/// missing or non-string `method` is then answered with "method not found".
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    #[serde(default)]
    pub jsonrpc: Option<Value>,
    /// Correlation token; absent or null on notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// The protocol method to call (e.g., "tools/call")
    #[serde(default)]
    pub method: Option<Value>,
    /// Parameters for the method call
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// The id to echo back, `null` when the request carried none
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }

    /// The method name, if the request carried a string one
    pub fn method_name(&self) -> Option<&str> {
        self.method.as_ref().and_then(Value::as_str)
    }

    /// Notifications carry no id and never get a response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Protocol methods understood by the dispatcher
/// 
/// Anything else lands in `Unknown` so it can be answered with
/// "method not found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    /// Client-to-server notification such as `notifications/initialized`
    Notification(String),
    Unknown(String),
}

impl Method {
    pub fn parse(name: &str) -> Self {
        match name {
            "initialize" => Method::Initialize,
            "tools/list" => Method::ToolsList,
            "tools/call" => Method::ToolsCall,
            other if other.starts_with("notifications/") => Method::Notification(other.to_string()),
            other => Method::Unknown(other.to_string()),
        }
    }
}

/// JSON-RPC 2.0 response message
/// 
/// Exactly one of `result` or `error` is set. Use the constructors below
/// rather than building the struct by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID that we're responding to
    pub id: Value,
    /// Successful result (if no error occurred)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information (if something went wrong)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code (standard JSON-RPC codes)
    pub code: i32,
    /// Human-readable error message
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }
    
    /// Create an error response
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Create a successful response from any serializable result payload
    /// 
    /// A payload that fails to serialize is reported as an internal error
    /// against the same id.
    pub fn from_result<T: Serialize>(id: Value, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self::success(id, value),
            Err(e) => {
                tracing::error!("Failed to serialize result: {}", e);
                Self::error(id, error_codes::INTERNAL_ERROR, format!("Failed to serialize result: {}", e))
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// MCP tool call parameters
/// 
/// Built by the dispatcher from the `params` of a `tools/call` request.
#[derive(Debug, Clone)]
pub struct ToolCallParams {
    /// Name of the tool to call (e.g., "get_markets")
    pub name: String,
    /// Arguments to pass to the tool
    pub arguments: Arguments,
}

/// MCP tool call result
/// 
/// This is what we return after successfully executing a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Tool execution results
    pub content: Vec<ToolContent>,
}

/// Content returned by a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContent {
    /// Type of content (always "text" here)
    #[serde(rename = "type")]
    pub content_type: String,
    /// The actual content/result
    pub text: String,
}

impl ToolCallResult {
    /// Create a successful tool result with a single text block
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
        }
    }
}

/// MCP tool definition
/// 
/// This describes one tool our server provides to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name (e.g., "get_markets")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema for the tool's input parameters
    pub input_schema: InputSchema,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: InputSchema) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// JSON schema of a tool's argument object
/// 
/// Advertised for discovery only; handlers check their own arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Properties in declaration order
    #[serde(serialize_with = "serialize_properties")]
    pub properties: Vec<(String, PropertySchema)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl InputSchema {
    /// An object schema with no properties
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Add an optional property
    pub fn property(mut self, name: &str, schema: PropertySchema) -> Self {
        self.insert(name, schema);
        self
    }

    /// Add a property and list it under `required`
    pub fn required_property(mut self, name: &str, schema: PropertySchema) -> Self {
        self.insert(name, schema);
        if !self.required.iter().any(|required| required == name) {
            self.required.push(name.to_string());
        }
        self
    }

    /// Look up a declared property by name
    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, schema)| schema)
    }

    // Redeclaring a name replaces its schema in place
    fn insert(&mut self, name: &str, schema: PropertySchema) {
        match self.properties.iter_mut().find(|(property, _)| property == name) {
            Some((_, existing)) => *existing = schema,
            None => self.properties.push((name.to_string(), schema)),
        }
    }
}

fn serialize_properties<S: Serializer>(
    properties: &[(String, PropertySchema)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(properties.iter().map(|(name, schema)| (name, schema)))
}

/// JSON types a tool property can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
}

/// Schema for a single tool property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertySchema {
    pub fn new(property_type: PropertyType, description: impl Into<String>) -> Self {
        Self {
            property_type,
            description: description.into(),
            default: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(PropertyType::String, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(PropertyType::Number, description)
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Result of `tools/list`
#[derive(Debug, Serialize)]
pub struct ToolsListResult<'a> {
    pub tools: Vec<&'a ToolDefinition>,
}

/// MCP server capabilities
/// 
/// This tells clients what features our server supports.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tools that this server provides
    pub tools: ToolsCapability,
}

/// Tools capability information (serialized as an empty object)
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolsCapability {}

/// MCP initialization response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// MCP protocol version we support
    pub protocol_version: String,
    /// Our server capabilities
    pub capabilities: ServerCapabilities,
    /// Information about our server
    pub server_info: ServerInfo,
}

impl InitializeResult {
    pub fn new(server_info: ServerInfo) -> Self {
        Self {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability::default(),
            },
            server_info,
        }
    }
}

/// Name and version reported in the `initialize` result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

// JSON-RPC error codes (standard codes)
pub mod error_codes {
    /// Parse error - Invalid JSON was received by the server
    pub const PARSE_ERROR: i32 = -32700;
    /// Method not found - The requested method doesn't exist
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Internal error - unknown tool or a failing tool handler
    pub const INTERNAL_ERROR: i32 = -32603;
}
