use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::exchanges::types::Quote;
use crate::opportunity::OptimalTradeSearch;
use crate::report::{run_reporter, ScanStats};
use crate::shared::errors::QuoteError;
use crate::shared::types::TradePair;

const EVENT_BUFFER: usize = 1000;

/// Fixed search parameters shared by every pair loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanParams {
    pub start_amount: f64,
    pub min_amount: f64,
    pub network_fee_estimate: f64,
    pub slippage_bps: u32,
    /// Minimum time between the starts of two consecutive cycles of one pair.
    pub floor_interval: Duration,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            start_amount: 1000.0,
            min_amount: 1.0,
            network_fee_estimate: 0.00001,
            slippage_bps: 10,
            floor_interval: Duration::from_millis(10_000),
        }
    }
}

/// Outcome of one cycle of one pair loop.
#[derive(Debug)]
pub enum ScanEvent {
    Opportunity {
        pair: TradePair,
        quote: Quote,
        observed_at: DateTime<Local>,
    },
    NoOpportunity {
        pair: TradePair,
    },
    Failed {
        pair: TradePair,
        error: QuoteError,
    },
}

impl ScanEvent {
    pub fn pair(&self) -> &TradePair {
        match self {
            ScanEvent::Opportunity { pair, .. }
            | ScanEvent::NoOpportunity { pair }
            | ScanEvent::Failed { pair, .. } => pair,
        }
    }
}

/// Runs one independent polling loop per ordered pair.
pub struct PairScheduler {
    search: Arc<OptimalTradeSearch>,
    pairs: Vec<TradePair>,
    params: ScanParams,
}

impl PairScheduler {
    pub fn new(search: Arc<OptimalTradeSearch>, pairs: Vec<TradePair>, params: ScanParams) -> Self {
        Self { search, pairs, params }
    }

    pub fn pairs(&self) -> &[TradePair] {
        &self.pairs
    }

    /// Spawn the reporter and one task per pair. Must be called inside a tokio runtime.
    pub fn start(self) -> SchedulerHandle {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let reporter = tokio::spawn(run_reporter(event_rx));

        let tasks = self
            .pairs
            .into_iter()
            .map(|pair| {
                tokio::spawn(run_pair_loop(
                    Arc::clone(&self.search),
                    pair,
                    self.params.clone(),
                    event_tx.clone(),
                    shutdown_rx.clone(),
                ))
            })
            .collect::<Vec<_>>();

        info!("Started {} pair scan loops", tasks.len());

        SchedulerHandle {
            shutdown_tx,
            tasks,
            reporter,
        }
    }
}

/// Lifecycle handle for a started scheduler.
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    reporter: JoinHandle<ScanStats>,
}

impl SchedulerHandle {
    pub fn pair_count(&self) -> usize {
        self.tasks.len()
    }

    /// Stop every pair loop, drain the reporter and return the accumulated stats.
    pub async fn shutdown(self) -> ScanStats {
        let _ = self.shutdown_tx.send(true);

        for result in join_all(self.tasks).await {
            if let Err(e) = result {
                warn!("Pair scan task ended abnormally: {}", e);
            }
        }

        match self.reporter.await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Reporter task ended abnormally: {}", e);
                ScanStats::default()
            }
        }
    }
}

/// Run one cycle: search the pair and classify the outcome.
pub async fn run_cycle(search: &OptimalTradeSearch, pair: &TradePair, params: &ScanParams) -> ScanEvent {
    let outcome = search
        .search(pair, params.start_amount, params.min_amount, params.network_fee_estimate)
        .await;

    match outcome {
        Ok(Some(quote)) => ScanEvent::Opportunity {
            pair: pair.clone(),
            quote,
            observed_at: Local::now(),
        },
        Ok(None) => ScanEvent::NoOpportunity { pair: pair.clone() },
        Err(error) => ScanEvent::Failed {
            pair: pair.clone(),
            error,
        },
    }
}

async fn run_pair_loop(
    search: Arc<OptimalTradeSearch>,
    pair: TradePair,
    params: ScanParams,
    events: mpsc::Sender<ScanEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    debug!("Scan loop for {} started", pair);

    loop {
        if *shutdown.borrow() {
            break;
        }

        // Armed before the search so search latency is not added to the interval.
        let floor = sleep(params.floor_interval);
        tokio::pin!(floor);

        let event = tokio::select! {
            event = run_cycle(&search, &pair, &params) => event,
            _ = shutdown.changed() => break,
        };

        if events.send(event).await.is_err() {
            break;
        }

        tokio::select! {
            _ = &mut floor => {}
            _ = shutdown.changed() => break,
        }
    }

    debug!("Scan loop for {} stopped", pair);
}
