//! Storage layer for persisting market data
//!
//! This module handles all database operations using SQLite. It provides
//! a narrow interface for storing and retrieving markets and their price history.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use std::sync::{Arc, Mutex};
use thiserror::Error;
use crate::domain::{Market, MarketDataId, MarketId, NewMarket, NewMarketData};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),
    
    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),
    
    #[error("Market not found: {market_id}")]
    MarketNotFound { market_id: MarketId },
    
    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Trait defining the storage interface for markets
/// 
/// Tool handlers only see this trait, so the SQLite backend can be swapped
/// for another store without touching the tools.
pub trait MarketStorage {
    /// Insert a new market and return its assigned id
    fn create_market(&self, market: &NewMarket) -> Result<MarketId, StorageError>;
    
    /// Get a market by ID
    fn get_market(&self, market_id: MarketId) -> Result<Market, StorageError>;
    
    /// List all markets, newest first
    fn list_markets(&self) -> Result<Vec<Market>, StorageError>;
    
    /// Insert a price/volume observation and return its assigned id
    fn create_market_data(&self, data: &NewMarketData) -> Result<MarketDataId, StorageError>;
}

/// Storage handle shared by the market tools
/// 
/// The mutex keeps at most one writer on the connection even if tool calls
/// are ever run concurrently.
pub type SharedStorage = Arc<Mutex<SqliteStorage>>;

/// Wrap a storage instance for sharing between tool handlers
pub fn shared(storage: SqliteStorage) -> SharedStorage {
    Arc::new(Mutex::new(storage))
}
