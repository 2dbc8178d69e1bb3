use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

use crate::exchanges::api_clients::jupiter_quote_client::DEFAULT_QUOTE_URL;
use crate::opportunity::ScanParams;
use crate::shared::errors::AppError;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScanCfg {
    pub start_amount: f64,
    pub min_amount: f64,
    pub network_fee_estimate: f64,
    pub slippage_bps: u32,
    pub floor_interval_ms: u64,
}

impl Default for ScanCfg {
    fn default() -> Self {
        let params = ScanParams::default();
        Self {
            start_amount: params.start_amount,
            min_amount: params.min_amount,
            network_fee_estimate: params.network_fee_estimate,
            slippage_bps: params.slippage_bps,
            floor_interval_ms: params.floor_interval.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QuoteApiCfg {
    pub base_url: String,
}

impl Default for QuoteApiCfg {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUOTE_URL.to_string(),
        }
    }
}

/// Optional runtime settings; every field falls back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scan: ScanCfg,
    pub quote_api: QuoteApiCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read settings file {}", path.as_ref().display()))?;
        let cfg: Self = toml::from_str(&s).context("parse settings file")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let scan = &self.scan;
        if !(scan.min_amount > 0.0) {
            return Err(AppError::ConfigError(format!("min_amount must be positive, got {}", scan.min_amount)));
        }
        if !(scan.start_amount > scan.min_amount) {
            return Err(AppError::ConfigError(format!(
                "start_amount ({}) must exceed min_amount ({})",
                scan.start_amount, scan.min_amount
            )));
        }
        if !(scan.network_fee_estimate >= 0.0) {
            return Err(AppError::ConfigError(format!(
                "network_fee_estimate must not be negative, got {}",
                scan.network_fee_estimate
            )));
        }
        if scan.floor_interval_ms == 0 {
            return Err(AppError::ConfigError("floor_interval_ms must be positive".to_string()));
        }
        if self.quote_api.base_url.trim().is_empty() {
            return Err(AppError::ConfigError("quote_api.base_url is empty".to_string()));
        }
        Ok(())
    }

    /// Replace the quote endpoint (from the command line) and re-check the settings.
    pub fn override_quote_url(&mut self, url: String) -> Result<(), AppError> {
        self.quote_api.base_url = url;
        self.validate()
    }

    pub fn scan_params(&self) -> ScanParams {
        ScanParams {
            start_amount: self.scan.start_amount,
            min_amount: self.scan.min_amount,
            network_fee_estimate: self.scan.network_fee_estimate,
            slippage_bps: self.scan.slippage_bps,
            floor_interval: Duration::from_millis(self.scan.floor_interval_ms),
        }
    }
}
