//! Domain module containing the market data types
//!
//! This module defines the core entities (Market, NewMarket, NewMarketData) and their
//! validation rules. These are the records the market tools create and
//! read back from storage.

pub mod market;
pub mod types;

// Re-export public types for easy access
pub use market::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },
    
    #[error("Invalid market title: {0}")]
    InvalidTitle(String),
    
    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
