// src/app.rs
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::exchanges::{JupiterQuoteApiClient, QuoteApiClient};
use crate::opportunity::{OptimalTradeSearch, PairScheduler, ScanParams};
use crate::registry::AssetRegistry;

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub registry_path: PathBuf,
    pub quote_url: String,
    pub scan: ScanParams,
}

impl AppCfg {
    pub fn from_config(cfg: Config, registry_path: PathBuf) -> Self {
        Self {
            registry_path,
            scan: cfg.scan_params(),
            quote_url: cfg.quote_api.base_url,
        }
    }
}

pub async fn run(app_cfg: AppCfg) -> Result<()> {
    info!("Starting stablecoin pair scanner");
    info!("Configuration: {:?}", app_cfg);

    let registry = AssetRegistry::from_file(&app_cfg.registry_path)
        .with_context(|| format!("load asset registry {}", app_cfg.registry_path.display()))?;
    let registry = Arc::new(registry);
    let pairs = registry.ordered_pairs();

    let jupiter = JupiterQuoteApiClient::with_base_url(app_cfg.quote_url.clone());
    info!("Quoting against {}", jupiter.base_url());
    let client: Arc<dyn QuoteApiClient> = Arc::new(jupiter);
    let search = Arc::new(OptimalTradeSearch::new(client, Arc::clone(&registry), app_cfg.scan.slippage_bps));

    let scheduler = PairScheduler::new(search, pairs, app_cfg.scan.clone());
    info!(
        "Scanning {} ordered pairs over {:?} every {:?}",
        scheduler.pairs().len(),
        registry.symbols().iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        app_cfg.scan.floor_interval
    );

    let handle = scheduler.start();

    tokio::signal::ctrl_c().await.context("listen for Ctrl+C")?;
    info!("Received Ctrl+C, shutting down");

    let stats = handle.shutdown().await;
    stats.log_summary();

    Ok(())
}
