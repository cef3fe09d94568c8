//! Market entities and market data observations
//!
//! A market is a prediction market tracked by title, with an optional
//! description and end date. Market data rows record a price (and optionally
//! a traded volume) observed for a market at a point in time.

use serde::{Deserialize, Serialize};
use crate::domain::{DomainError, MarketId};

/// A market as stored in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    pub title: String,
    pub description: Option<String>,
    pub end_date: Option<String>,
    /// SQLite `CURRENT_TIMESTAMP` text (`YYYY-MM-DD HH:MM:SS`, UTC)
    pub created_at: String,
}

impl Market {
    /// One-line rendering used by the `get_markets` tool
    pub fn summary_line(&self) -> String {
        format!(
            "ID: {}, Title: {}, Description: {}, End Date: {}",
            self.id,
            self.title,
            self.description.as_deref().unwrap_or("N/A"),
            self.end_date.as_deref().unwrap_or("N/A"),
        )
    }
}

/// A validated market that has not been inserted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarket {
    pub title: String,
    pub description: Option<String>,
    pub end_date: Option<String>,
}

impl NewMarket {
    /// Create a new market with validation
    /// 
    /// Empty description and end date strings are stored as NULL so that
    /// listings show "N/A" for them.
    pub fn new(
        title: String,
        description: Option<String>,
        end_date: Option<String>,
    ) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::InvalidTitle(
                "Market title cannot be empty".to_string()
            ));
        }

        Ok(Self {
            title,
            description: description.filter(|d| !d.is_empty()),
            end_date: end_date.filter(|d| !d.is_empty()),
        })
    }
}

/// A validated observation that has not been inserted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarketData {
    pub market_id: MarketId,
    pub price: f64,
    pub volume: Option<f64>,
}

impl NewMarketData {
    pub fn new(market_id: MarketId, price: f64, volume: Option<f64>) -> Result<Self, DomainError> {
        if !price.is_finite() {
            return Err(DomainError::InvalidValue {
                message: format!("price must be a finite number, got {}", price),
            });
        }

        if let Some(volume) = volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(DomainError::InvalidValue {
                    message: format!("volume must be a non-negative number, got {}", volume),
                });
            }
        }

        Ok(Self {
            market_id,
            price,
            volume,
        })
    }
}
