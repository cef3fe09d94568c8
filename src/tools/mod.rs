//! MCP tools exposed by the server
//!
//! Each submodule implements one family of tools: its argument parsing, the
//! operation itself and the `ToolDefinition` advertised by `tools/list`.
//! `default_registry` wires them together in the order clients see them.

pub mod files;
pub mod markets;
pub mod time;

pub use files::*;
pub use markets::*;
pub use time::*;

use serde_json::Value;
use thiserror::Error;

use crate::domain::DomainError;
use crate::mcp::protocol::Arguments;
use crate::mcp::registry::{RegistryError, ToolRegistry};
use crate::storage::{SharedStorage, StorageError};

/// Errors reported by tool handlers
/// 
/// The `Display` text is what the client sees as the error message.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument '{name}': expected {expected}")]
    InvalidArgument { name: &'static str, expected: &'static str },

    #[error("Invalid date '{0}': expected an ISO 8601 date or date-time")]
    InvalidDate(String),

    #[error("Failed to read file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    WriteFile(#[source] std::io::Error),

    #[error("Failed to {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Failed to {action}: {source}")]
    Domain {
        action: &'static str,
        #[source]
        source: DomainError,
    },
}

/// Build the registry with every tool this server provides
pub fn default_registry(storage: SharedStorage) -> Result<ToolRegistry, RegistryError> {
    let registry = ToolRegistry::builder()
        .register(time::current_time_definition(), GetCurrentTime)?
        .register(time::time_difference_definition(), CalculateTimeDifference)?
        .register(files::read_file_definition(), ReadFile)?
        .register(files::write_file_definition(), WriteFile)?
        .register(markets::add_market_definition(), AddMarket::new(storage.clone()))?
        .register(markets::get_markets_definition(), GetMarkets::new(storage.clone()))?
        .register(markets::add_market_data_definition(), AddMarketData::new(storage))?
        .build();

    tracing::info!("Registered {} tools", registry.len());
    Ok(registry)
}

// Argument helpers. A `null` value counts as absent.

fn present<'a>(arguments: &'a Arguments, name: &str) -> Option<&'a Value> {
    arguments.get(name).filter(|value| !value.is_null())
}

pub(crate) fn optional_str<'a>(
    arguments: &'a Arguments,
    name: &'static str,
) -> Result<Option<&'a str>, ToolError> {
    match present(arguments, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ToolError::InvalidArgument { name, expected: "string" }),
    }
}

pub(crate) fn required_str<'a>(arguments: &'a Arguments, name: &'static str) -> Result<&'a str, ToolError> {
    optional_str(arguments, name)?.ok_or(ToolError::MissingArgument(name))
}

pub(crate) fn optional_f64(arguments: &Arguments, name: &'static str) -> Result<Option<f64>, ToolError> {
    match present(arguments, name) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or(ToolError::InvalidArgument { name, expected: "number" }),
    }
}

pub(crate) fn required_f64(arguments: &Arguments, name: &'static str) -> Result<f64, ToolError> {
    optional_f64(arguments, name)?.ok_or(ToolError::MissingArgument(name))
}

/// Integral number; `3.0` is accepted, `3.5` is not
pub(crate) fn required_i64(arguments: &Arguments, name: &'static str) -> Result<i64, ToolError> {
    let value = present(arguments, name).ok_or(ToolError::MissingArgument(name))?;
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
        .ok_or(ToolError::InvalidArgument { name, expected: "integer" })
}
