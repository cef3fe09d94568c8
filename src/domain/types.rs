//! Identifier types used throughout the domain layer
//!
//! SQLite assigns row ids on insert, so these wrap the `INTEGER PRIMARY KEY`
//! values instead of generating ids client-side.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Unique identifier for a market
/// 
/// This is a wrapper around the row id to provide type safety - you can't accidentally
/// pass a market data id where a market id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketId(pub i64);

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a single price/volume observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketDataId(pub i64);

impl fmt::Display for MarketDataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
