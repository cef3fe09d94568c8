//! Market store tools: `add_market`, `get_markets` and `add_market_data`
//!
//! These tools share one storage handle. Each call takes the lock for the
//! duration of its database work only.

use std::sync::MutexGuard;

use async_trait::async_trait;

use crate::domain::{MarketId, NewMarket, NewMarketData};
use crate::mcp::protocol::{Arguments, InputSchema, PropertySchema, ToolDefinition};
use crate::mcp::registry::{HandlerError, ToolHandler};
use crate::storage::{MarketStorage, SharedStorage, SqliteStorage, StorageError};
use crate::tools::{optional_f64, optional_str, required_f64, required_i64, required_str, ToolError};

fn lock<'a>(storage: &'a SharedStorage, action: &'static str) -> Result<MutexGuard<'a, SqliteStorage>, ToolError> {
    storage.lock().map_err(|_| ToolError::Storage {
        action,
        source: StorageError::LockPoisoned,
    })
}

/// Insert a market and report its id
pub fn add_market<S: MarketStorage>(storage: &S, market: NewMarket) -> Result<String, ToolError> {
    let id = storage
        .create_market(&market)
        .map_err(|source| ToolError::Storage { action: "add market", source })?;

    Ok(format!("Market added with ID: {}", id))
}

/// List every market, newest first
pub fn get_markets<S: MarketStorage>(storage: &S) -> Result<String, ToolError> {
    let markets = storage
        .list_markets()
        .map_err(|source| ToolError::Storage { action: "get markets", source })?;

    if markets.is_empty() {
        return Ok("Markets:\nNo markets found".to_string());
    }

    let lines = markets
        .iter()
        .map(|market| market.summary_line())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(format!("Markets:\n{}", lines))
}

/// Record a price/volume observation for an existing market
pub fn add_market_data<S: MarketStorage>(storage: &S, data: NewMarketData) -> Result<String, ToolError> {
    let action = "add market data";
    storage
        .get_market(data.market_id)
        .map_err(|source| ToolError::Storage { action, source })?;

    let id = storage
        .create_market_data(&data)
        .map_err(|source| ToolError::Storage { action, source })?;

    Ok(format!("Market data added with ID: {}", id))
}

pub fn add_market_definition() -> ToolDefinition {
    ToolDefinition::new(
        "add_market",
        "Add a new market to the database",
        InputSchema::object()
            .required_property("title", PropertySchema::string("Market title"))
            .property("description", PropertySchema::string("Market description"))
            .property("end_date", PropertySchema::string("Market end date (ISO format)")),
    )
}

pub fn get_markets_definition() -> ToolDefinition {
    ToolDefinition::new(
        "get_markets",
        "Get all markets from the database",
        InputSchema::object(),
    )
}

pub fn add_market_data_definition() -> ToolDefinition {
    ToolDefinition::new(
        "add_market_data",
        "Add market data (price, volume)",
        InputSchema::object()
            .required_property("market_id", PropertySchema::number("Market ID"))
            .required_property("price", PropertySchema::number("Market price"))
            .property("volume", PropertySchema::number("Trading volume")),
    )
}

/// Handler for `add_market`
pub struct AddMarket {
    storage: SharedStorage,
}

impl AddMarket {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ToolHandler for AddMarket {
    async fn call(&self, arguments: &Arguments) -> Result<String, HandlerError> {
        let action = "add market";
        let market = NewMarket::new(
            required_str(arguments, "title")?.to_string(),
            optional_str(arguments, "description")?.map(str::to_string),
            optional_str(arguments, "end_date")?.map(str::to_string),
        )
        .map_err(|source| ToolError::Domain { action, source })?;

        let storage = lock(&self.storage, action)?;
        Ok(add_market(&*storage, market)?)
    }
}

/// Handler for `get_markets`
pub struct GetMarkets {
    storage: SharedStorage,
}

impl GetMarkets {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ToolHandler for GetMarkets {
    async fn call(&self, _arguments: &Arguments) -> Result<String, HandlerError> {
        let storage = lock(&self.storage, "get markets")?;
        Ok(get_markets(&*storage)?)
    }
}

/// Handler for `add_market_data`
pub struct AddMarketData {
    storage: SharedStorage,
}

impl AddMarketData {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ToolHandler for AddMarketData {
    async fn call(&self, arguments: &Arguments) -> Result<String, HandlerError> {
        let action = "add market data";
        let data = NewMarketData::new(
            MarketId(required_i64(arguments, "market_id")?),
            required_f64(arguments, "price")?,
            optional_f64(arguments, "volume")?,
        )
        .map_err(|source| ToolError::Domain { action, source })?;

        let storage = lock(&self.storage, action)?;
        Ok(add_market_data(&*storage, data)?)
    }
}
