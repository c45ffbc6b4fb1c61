use std::sync::Arc;
use std::time::Duration;

use ledgerlens_core::HistoryEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<HistoryEngine>,
    /// Wall-clock budget handed to the engine per request
    pub request_budget: Duration,
}
