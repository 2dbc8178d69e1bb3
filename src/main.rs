use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::{self, FilterExt};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use stablescan::report::{self, OPPORTUNITY_TARGET};
use stablescan::{app, config};

#[derive(Parser, Debug)]
#[command(version, about = "Scan stablecoin pairs for profitable trade sizes")]
struct Args {
    /// Asset registry file with a `stableCoins` list
    #[arg(long, default_value = "config.json")]
    registry: PathBuf,

    /// Path to TOML settings file (optional)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Quote API URL (overrides settings)
    #[arg(long)]
    quote_url: Option<String>,

    /// Log filter directive
    #[arg(long, default_value = "info")]
    log_filter: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Warnings and errors go to stderr, everything else to stdout.
    // Opportunity lines bypass this layer and are printed bare.
    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);
    let general = tracing_subscriber::fmt::layer().with_writer(writer).with_filter(
        EnvFilter::new(&args.log_filter).and(filter::filter_fn(|meta| meta.target() != OPPORTUNITY_TARGET)),
    );
    tracing_subscriber::registry()
        .with(general)
        .with(report::opportunity_layer(std::io::stdout))
        .init();

    let mut cfg = match &args.settings {
        Some(path) => config::Config::from_file(path)?,
        None => config::Config::default(),
    };
    if let Some(quote_url) = args.quote_url {
        cfg.override_quote_url(quote_url)?;
    }

    let app_cfg = app::AppCfg::from_config(cfg, args.registry);
    app::run(app_cfg).await
}
