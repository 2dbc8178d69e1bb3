//! Common types used across the application

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::RegistryError;

/// Asset ticker as written in the registry file. Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryError> {
        let value = value.into();
        if value.trim().is_empty() || value.trim() != value {
            return Err(RegistryError::InvalidSymbol(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl FromStr for Symbol {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::new(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetInfo {
    pub symbol: Symbol,
    pub mint: Pubkey,
    pub decimals: u8,
}

/// Ordered pair scanned by one scheduler task: sell `input` for `output`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradePair {
    pub input: Symbol,
    pub output: Symbol,
}

impl TradePair {
    pub fn new(input: Symbol, output: Symbol) -> Self {
        Self { input, output }
    }
}

impl fmt::Display for TradePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.input, self.output)
    }
}
