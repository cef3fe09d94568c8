//! File tools: `read_file` and `write_file`
//!
//! Paths are used as given, relative to the server's working directory.

use async_trait::async_trait;

use crate::mcp::protocol::{Arguments, InputSchema, PropertySchema, ToolDefinition};
use crate::mcp::registry::{HandlerError, ToolHandler};
use crate::tools::{required_str, ToolError};

/// Read a UTF-8 file and render it for the `read_file` tool
pub async fn read_file(file_path: &str) -> Result<String, ToolError> {
    let content = tokio::fs::read_to_string(file_path)
        .await
        .map_err(ToolError::ReadFile)?;

    tracing::debug!("Read {} bytes from {}", content.len(), file_path);
    Ok(format!("File content of {}:\n\n{}", file_path, content))
}

/// Create or truncate `file_path` and write `content` to it
pub async fn write_file(file_path: &str, content: &str) -> Result<String, ToolError> {
    tokio::fs::write(file_path, content)
        .await
        .map_err(ToolError::WriteFile)?;

    tracing::debug!("Wrote {} bytes to {}", content.len(), file_path);
    Ok(format!("Successfully wrote content to {}", file_path))
}

pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        "read_file",
        "Read contents of a file",
        InputSchema::object()
            .required_property("file_path", PropertySchema::string("Path to the file to read")),
    )
}

pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        "write_file",
        "Write content to a file",
        InputSchema::object()
            .required_property("file_path", PropertySchema::string("Path to the file to write"))
            .required_property("content", PropertySchema::string("Content to write to the file")),
    )
}

/// Handler for `read_file`
pub struct ReadFile;

#[async_trait]
impl ToolHandler for ReadFile {
    async fn call(&self, arguments: &Arguments) -> Result<String, HandlerError> {
        let file_path = required_str(arguments, "file_path")?;
        Ok(read_file(file_path).await?)
    }
}

/// Handler for `write_file`
pub struct WriteFile;

#[async_trait]
impl ToolHandler for WriteFile {
    async fn call(&self, arguments: &Arguments) -> Result<String, HandlerError> {
        let file_path = required_str(arguments, "file_path")?;
        let content = required_str(arguments, "content")?;
        Ok(write_file(file_path, content).await?)
    }
}
