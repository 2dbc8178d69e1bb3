// src/report.rs
use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::{debug, error, info, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{filter, fmt, Layer};

use crate::opportunity::ScanEvent;
use crate::shared::types::TradePair;

/// Counters accumulated by the reporter over the scheduler's lifetime.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub cycles: u64,
    pub opportunities: u64,
    pub failures: u64,
    pub best_gain: Option<(TradePair, f64)>,
}

impl ScanStats {
    pub fn record(&mut self, event: &ScanEvent) {
        self.cycles += 1;
        match event {
            ScanEvent::Opportunity { pair, quote, .. } => {
                self.opportunities += 1;
                let gain = quote.net_gain();
                let is_best = self.best_gain.as_ref().map_or(true, |(_, best)| gain > *best);
                if is_best {
                    self.best_gain = Some((pair.clone(), gain));
                }
            }
            ScanEvent::NoOpportunity { .. } => {}
            ScanEvent::Failed { .. } => self.failures += 1,
        }
    }

    pub fn log_summary(&self) {
        info!("📊 Scan summary:");
        info!("   Cycles: {}", self.cycles);
        info!("   Opportunities: {}", self.opportunities);
        info!("   Failed cycles: {}", self.failures);
        if let Some((pair, gain)) = &self.best_gain {
            info!("   Best gain: {} on {}", gain, pair);
        }
    }
}

/// Log target carrying opportunity lines. They are written by
/// [`opportunity_layer`] only, exactly as [`format_opportunity`] renders them.
pub const OPPORTUNITY_TARGET: &str = "opportunity";

/// Bare fmt layer for the opportunity target: no time, level, target or colour.
pub fn opportunity_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter::filter_fn(|meta| meta.target() == OPPORTUNITY_TARGET))
}

/// Opportunity line: `<timestamp> -- \n  sell <in> for <out> gain=<decimal>`.
pub fn format_opportunity(pair: &TradePair, gain: f64, observed_at: &DateTime<Local>) -> String {
    format!(
        "{} -- \n  sell {} for {} gain={}",
        observed_at.format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
        pair.input,
        pair.output,
        gain
    )
}

pub fn report_event(event: &ScanEvent) {
    match event {
        ScanEvent::Opportunity { pair, quote, observed_at } => {
            info!(target: OPPORTUNITY_TARGET, "{}", format_opportunity(pair, quote.net_gain(), observed_at));
            match quote.to_json() {
                Ok(json) => debug!("{} quote: {}", pair, json),
                Err(e) => debug!("{} quote not serializable: {}", pair, e),
            }
        }
        ScanEvent::NoOpportunity { .. } => {}
        ScanEvent::Failed { pair, error } => {
            error!("Scan of {} failed: {:?}", pair, error);
        }
    }
}

/// Single consumer of scan events. Returns once every sender is gone.
pub async fn run_reporter(mut events: mpsc::Receiver<ScanEvent>) -> ScanStats {
    let mut stats = ScanStats::default();
    while let Some(event) = events.recv().await {
        report_event(&event);
        stats.record(&event);
    }
    stats
}
