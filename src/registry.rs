// src/registry.rs
use std::collections::HashMap;
use std::{fs, path::Path};

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::shared::errors::RegistryError;
use crate::shared::types::{AssetInfo, Symbol, TradePair};
use crate::shared::utils::MAX_DECIMALS;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryFile {
    stable_coins: Vec<StableCoinEntry>,
}

#[derive(Debug, Deserialize)]
struct StableCoinEntry {
    symbol: String,
    address: String,
    decimals: u8,
}

/// Symbol -> mint/decimals lookup, loaded once at startup and read-only after.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    symbols: Vec<Symbol>,
    assets: HashMap<Symbol, AssetInfo>,
}

impl AssetRegistry {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json(&content)?;
        info!("Loaded {} assets from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn from_json(content: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(content)?;
        let assets = file
            .stable_coins
            .into_iter()
            .map(|entry| -> Result<AssetInfo, RegistryError> {
                let symbol = Symbol::new(entry.symbol)?;
                let mint = entry.address.parse::<Pubkey>().map_err(|_| RegistryError::InvalidAddress {
                    symbol: symbol.to_string(),
                    address: entry.address.clone(),
                })?;
                Ok(AssetInfo {
                    symbol,
                    mint,
                    decimals: entry.decimals,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(assets)
    }

    /// Build a registry, keeping the given order for pair enumeration.
    pub fn new(assets: Vec<AssetInfo>) -> Result<Self, RegistryError> {
        if assets.len() < 2 {
            return Err(RegistryError::TooFewSymbols(assets.len()));
        }

        let mut symbols = Vec::with_capacity(assets.len());
        let mut by_symbol = HashMap::with_capacity(assets.len());
        for asset in assets {
            if asset.decimals > MAX_DECIMALS {
                return Err(RegistryError::InvalidDecimals {
                    symbol: asset.symbol.to_string(),
                    decimals: asset.decimals,
                    max: MAX_DECIMALS,
                });
            }
            if by_symbol.contains_key(&asset.symbol) {
                return Err(RegistryError::DuplicateSymbol(asset.symbol.to_string()));
            }
            symbols.push(asset.symbol.clone());
            by_symbol.insert(asset.symbol.clone(), asset);
        }

        Ok(Self {
            symbols,
            assets: by_symbol,
        })
    }

    pub fn get(&self, symbol: &Symbol) -> Result<&AssetInfo, RegistryError> {
        self.assets
            .get(symbol)
            .ok_or_else(|| RegistryError::UnknownSymbol(symbol.to_string()))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Every ordered pair of distinct symbols, in registry order.
    pub fn ordered_pairs(&self) -> Vec<TradePair> {
        let mut pairs = Vec::with_capacity(self.len() * (self.len() - 1));
        for input in &self.symbols {
            for output in &self.symbols {
                if input == output {
                    continue;
                }
                pairs.push(TradePair::new(input.clone(), output.clone()));
            }
        }
        pairs
    }
}
