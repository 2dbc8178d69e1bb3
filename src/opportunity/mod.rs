pub mod optimal_trade;
pub mod scheduler;

pub use optimal_trade::OptimalTradeSearch;
pub use scheduler::{PairScheduler, ScanEvent, ScanParams, SchedulerHandle};
