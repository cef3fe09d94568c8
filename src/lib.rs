//! Public library interface for the Polymarket MCP server
//!
//! This module exports the server implementation and the public types
//! that can be used by other applications or tests.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use domain::*;
pub use mcp::{Dispatcher, FramingPolicy, JsonRpcResponse, ServerInfo, ToolRegistry, Transport};
pub use storage::{MarketStorage, SharedStorage, SqliteStorage, StorageError};
pub use tools::ToolError;

/// Name reported in the `initialize` result
pub const SERVER_NAME: &str = "polymarket-mcp-server";

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),
    
    #[error("Tool registry error: {0}")]
    Registry(#[from] mcp::RegistryError),
    
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings resolved from the command line
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// How stdin chunks are split into requests
    pub framing: FramingPolicy,
}

/// Identity reported to MCP clients
pub fn server_info() -> ServerInfo {
    ServerInfo::new(SERVER_NAME, env!("CARGO_PKG_VERSION"))
}

/// Main server that implements the MCP protocol
/// 
/// Owns the market store, the tool registry built on top of it and the
/// dispatcher that answers requests.
pub struct PolymarketServer {
    storage: SharedStorage,
    dispatcher: Dispatcher,
    framing: FramingPolicy,
}

impl PolymarketServer {
    /// Create a new server with the database at `config.database_path`
    /// 
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing Polymarket MCP server with database: {:?}", config.database_path);
        
        let storage = SqliteStorage::new(&config.database_path)?;
        Self::with_storage(storage, config.framing)
    }
    
    /// Create a server around an already opened store
    pub fn with_storage(storage: SqliteStorage, framing: FramingPolicy) -> Result<Self, ServerError> {
        let storage = storage::shared(storage);
        let registry = tools::default_registry(storage.clone())?;
        let dispatcher = Dispatcher::new(server_info(), Arc::new(registry));
        
        Ok(Self {
            storage,
            dispatcher,
            framing,
        })
    }
    
    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    /// 
    /// This returns once stdin is closed, or with an error if stdin or
    /// stdout fails.
    pub async fn run(&self) -> Result<(), ServerError> {
        let mut transport = Transport::stdio(self.framing);
        transport.run(&self.dispatcher).await?;
        Ok(())
    }
    
    /// Serve requests from any reader and write responses to any writer
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<W, ServerError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut transport = Transport::new(reader, writer, self.framing);
        transport.run(&self.dispatcher).await?;
        Ok(transport.into_writer())
    }
    
    /// Get the shared market store (useful for testing)
    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }
    
    /// Get the request dispatcher
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
