pub mod deadline;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use deadline::Deadline;
use models::history::PortfolioHistory;
use models::price::SeriesCache;
use models::timeframe::Timeframe;
use models::transaction::{sanitize_records, TransactionRecord};
use providers::traits::PriceHistoryProvider;
use services::price_history_service::PriceHistoryService;
use services::valuation_service::ValuationService;

/// How long a fetched price series stays fresh before it is re-fetched.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Main entry point for the LedgerLens core library.
///
/// Given a user's transaction ledger and a timeframe, reconstructs
/// historical holdings and produces the portfolio value / cost basis /
/// PnL time series that the dashboard charts, fetching price history
/// from the injected provider.
///
/// Everything is computed fresh per call — the only state shared
/// across calls is the TTL-bounded price-series cache.
#[must_use]
pub struct HistoryEngine {
    price_history_service: PriceHistoryService,
    valuation_service: ValuationService,
}

impl HistoryEngine {
    /// Build an engine around a price-history provider with a
    /// default-TTL series cache.
    pub fn new(provider: Arc<dyn PriceHistoryProvider>) -> Self {
        Self::with_cache(provider, Arc::new(SeriesCache::new(DEFAULT_CACHE_TTL)))
    }

    /// Build an engine with an explicitly-owned cache, so callers (and
    /// tests) control TTL and sharing.
    pub fn with_cache(provider: Arc<dyn PriceHistoryProvider>, cache: Arc<SeriesCache>) -> Self {
        Self {
            price_history_service: PriceHistoryService::new(provider, cache),
            valuation_service: ValuationService::new(),
        }
    }

    /// Compute the portfolio-history series for a raw transaction list.
    ///
    /// Degradation, never failure:
    /// - malformed records are dropped from replay;
    /// - an empty (or fully-dropped) ledger short-circuits to the empty
    ///   shape with no error;
    /// - per-asset fetch failures value that asset at 0;
    /// - deadline expiry truncates the series, and if fewer than 2
    ///   points survive, the empty shape carries an explanatory error
    ///   string.
    pub async fn portfolio_history(
        &self,
        records: &[TransactionRecord],
        timeframe: Timeframe,
        deadline: &Deadline,
    ) -> PortfolioHistory {
        let transactions = sanitize_records(records);
        if transactions.is_empty() {
            return PortfolioHistory::empty();
        }

        let window = timeframe.resolve(&transactions);

        // Distinct asset ids, first-seen order
        let mut asset_ids: Vec<String> = Vec::new();
        for txn in &transactions {
            if !asset_ids.contains(&txn.asset_id) {
                asset_ids.push(txn.asset_id.clone());
            }
        }

        let price_map = self
            .price_history_service
            .fetch_all(&asset_ids, window.lookback_days)
            .await;

        self.valuation_service
            .sample(&transactions, window, &price_map, deadline)
    }
}
