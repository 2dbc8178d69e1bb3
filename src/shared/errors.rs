//! Error handling for the application

use thiserror::Error;

/// Asset registry errors. Everything except `UnknownSymbol` is fatal at startup.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read registry file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse registry document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Duplicate symbol in registry: {0}")]
    DuplicateSymbol(String),

    #[error("Invalid mint address for {symbol}: {address}")]
    InvalidAddress { symbol: String, address: String },

    #[error("Decimals for {symbol} out of range: {decimals} (max {max})")]
    InvalidDecimals { symbol: String, decimals: u8, max: u8 },

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Registry needs at least two symbols to form a pair, found {0}")]
    TooFewSymbols(usize),
}

/// Quote source errors. Reported per cycle, never fatal.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Quote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Quote API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode quote response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Quote response is missing field `{0}`")]
    MissingField(&'static str),

    #[error("Quote field `{field}` is not an atomic amount: {value}")]
    InvalidAmount { field: &'static str, value: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
