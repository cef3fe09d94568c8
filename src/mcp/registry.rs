//! Tool registry
//!
//! The registry is built once at startup and is read-only afterwards. It
//! keeps tool descriptors in registration order for `tools/list` and maps
//! each name to the handler that implements it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::mcp::protocol::{Arguments, ToolDefinition};

/// Error type returned by tool handlers
/// 
/// Only its `Display` text reaches the client.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Implementation of a single tool
/// 
/// Handlers receive the raw argument object and return the text payload of
/// the result. Argument checking is up to each handler.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: &Arguments) -> Result<String, HandlerError>;
}

/// Errors raised while building the registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool name cannot be empty")]
    EmptyName,

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}

struct RegisteredTool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
}

/// Immutable catalog of tools
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Tool descriptors in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(|tool| &tool.definition)
    }

    /// Look up the handler bound to `name`
    pub fn handler(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.index
            .get(name)
            .map(|&position| Arc::clone(&self.tools[position].handler))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Collects tools before the registry is frozen
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistryBuilder {
    /// Register a tool under the name in its definition
    pub fn register<H>(mut self, definition: ToolDefinition, handler: H) -> Result<Self, RegistryError>
    where
        H: ToolHandler + 'static,
    {
        if definition.name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.index.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateTool(definition.name));
        }

        tracing::debug!("Registered tool: {}", definition.name);
        self.index.insert(definition.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            definition,
            handler: Arc::new(handler),
        });
        Ok(self)
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            tools: self.tools,
            index: self.index,
        }
    }
}
