//! SQLite implementation of the market storage interface
//!
//! This module provides the concrete SQLite implementation for storing
//! and retrieving market data. It handles all SQL queries and row conversion.

use std::path::Path;
use rusqlite::{Connection, Row, params};

use crate::domain::{Market, MarketDataId, MarketId, NewMarket, NewMarketData};
use crate::storage::{StorageError, MarketStorage, migrations};

/// SQLite-based storage implementation
/// 
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the MarketStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    /// 
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        
        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }
    
    /// Create a storage instance backed by a private in-memory database
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }
    
    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;
        
        migrations::initialize_database(&conn)?;
        
        Ok(Self { conn })
    }
    
    fn market_from_row(row: &Row<'_>) -> rusqlite::Result<Market> {
        Ok(Market {
            id: MarketId(row.get(0)?),
            title: row.get(1)?,
            description: row.get(2)?,
            end_date: row.get(3)?,
            created_at: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    }
}

impl MarketStorage for SqliteStorage {
    fn create_market(&self, market: &NewMarket) -> Result<MarketId, StorageError> {
        self.conn.execute(
            "INSERT INTO markets (title, description, end_date) VALUES (?1, ?2, ?3)",
            params![market.title, market.description, market.end_date],
        )?;
        
        let id = MarketId(self.conn.last_insert_rowid());
        tracing::debug!("Created market: {} ({})", market.title, id);
        Ok(id)
    }
    
    fn get_market(&self, market_id: MarketId) -> Result<Market, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, end_date, created_at FROM markets WHERE id = ?1"
        )?;
        
        match stmt.query_row(params![market_id.0], Self::market_from_row) {
            Ok(market) => Ok(market),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StorageError::MarketNotFound { market_id })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }
    
    /// List markets, newest first
    /// 
    /// `created_at` only has second resolution, so ties fall back to the
    /// insertion order.
    fn list_markets(&self) -> Result<Vec<Market>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, end_date, created_at FROM markets
             ORDER BY created_at DESC, id DESC"
        )?;
        
        let markets = stmt
            .query_map([], Self::market_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        
        Ok(markets)
    }
    
    fn create_market_data(&self, data: &NewMarketData) -> Result<MarketDataId, StorageError> {
        self.conn.execute(
            "INSERT INTO market_data (market_id, price, volume) VALUES (?1, ?2, ?3)",
            params![data.market_id.0, data.price, data.volume],
        )?;
        
        let id = MarketDataId(self.conn.last_insert_rowid());
        tracing::debug!("Created market data {} for market {}", id, data.market_id);
        Ok(id)
    }
}
