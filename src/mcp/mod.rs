//! MCP protocol implementation
//!
//! This module handles the Model Context Protocol communication: framing
//! stdin into request texts, JSON-RPC parsing, method routing, the tool
//! registry and tool invocation.
//!
//! Data flows transport -> framer -> dispatcher -> invoker -> registry
//! handler, and the response goes back out through the transport.

pub mod dispatcher;
pub mod error;
pub mod framer;
pub mod invoker;
pub mod protocol;
pub mod registry;
pub mod transport;

// Re-export main types
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use framer::{Framer, FramingPolicy};
pub use invoker::ToolInvoker;
pub use protocol::{Arguments, JsonRpcRequest, JsonRpcResponse, ServerInfo, ToolDefinition, MCP_VERSION};
pub use registry::{HandlerError, RegistryError, ToolHandler, ToolRegistry};
pub use transport::{Transport, TransportState};
