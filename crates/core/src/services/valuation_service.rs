use std::collections::HashMap;

use crate::deadline::Deadline;
use crate::models::history::PortfolioHistory;
use crate::models::price::PriceSeries;
use crate::models::timeframe::Window;
use crate::models::transaction::Transaction;
use crate::services::holdings_service::HoldingsService;

/// Number of sampling steps across the window (the series has up to
/// `MAX_DATA_POINTS + 1` entries, endpoints included).
pub const MAX_DATA_POINTS: usize = 80;

/// Message attached when the computation could not produce a drawable
/// series — charts need at least two points for a line.
const NOT_ENOUGH_DATA: &str = "Not enough data to render chart.";

/// Drives the valuation: partitions the window into sample points and
/// values the reconstructed holdings at each one.
///
/// Per sample, per asset above the dust threshold:
/// 1. Reconstruct the position (incrementally — see `sample`)
/// 2. Value it at the last known price (`PriceSeries::price_at`)
/// 3. Sum value and cost basis across assets (order-independent)
///
/// The deadline is checked before every sample; on expiry the loop
/// stops and returns whatever was produced. Graceful truncation, not an
/// error — the host kills the invocation outright at its own deadline.
pub struct ValuationService {
    holdings_service: HoldingsService,
}

impl ValuationService {
    pub fn new() -> Self {
        Self {
            holdings_service: HoldingsService::new(),
        }
    }

    /// Compute the value/cost/pnl series for `transactions` over
    /// `window`, pricing each asset from `price_map` (missing or empty
    /// series value at 0).
    ///
    /// Uses an incremental sweep: the ledger is sorted by date once and
    /// a cursor advances across sample points, applying only the
    /// transactions that newly fall into range — O(samples + txns)
    /// instead of re-replaying the full ledger per sample, with the
    /// same observable result.
    pub fn sample(
        &self,
        transactions: &[Transaction],
        window: Window,
        price_map: &HashMap<String, PriceSeries>,
        deadline: &Deadline,
    ) -> PortfolioHistory {
        let mut sorted: Vec<&Transaction> = transactions.iter().collect();
        sorted.sort_by_key(|t| t.timestamp_ms);

        // Positions at the window start (includes everything earlier)
        let mut holdings = self
            .holdings_service
            .holdings_at(transactions, window.start_ms);
        let mut cursor = sorted.partition_point(|t| t.timestamp_ms <= window.start_ms);

        let step = window.span_ms() as f64 / MAX_DATA_POINTS as f64;

        let mut pnl_history = Vec::with_capacity(MAX_DATA_POINTS + 1);
        let mut value_history = Vec::with_capacity(MAX_DATA_POINTS + 1);
        let mut cost_history = Vec::with_capacity(MAX_DATA_POINTS + 1);

        for i in 0..=MAX_DATA_POINTS {
            if deadline.is_expired() {
                tracing::warn!(
                    samples = value_history.len(),
                    "deadline approaching, returning partial series"
                );
                break;
            }

            let current_ts = window.start_ms + (i as f64 * step) as i64;

            // On sub-millisecond steps the truncation can land two
            // samples on the same timestamp; emit each instant once so
            // the series stays strictly increasing
            if value_history
                .last()
                .is_some_and(|&(ts, _)| current_ts <= ts)
            {
                continue;
            }

            // Advance the cursor: apply transactions that entered range
            // since the previous sample
            while cursor < sorted.len() && sorted[cursor].timestamp_ms <= current_ts {
                let txn = sorted[cursor];
                holdings.entry(txn.asset_id.clone()).or_default().apply(txn);
                cursor += 1;
            }

            let mut total_value = 0.0;
            let mut total_cost_basis = 0.0;

            for (asset_id, snapshot) in &holdings {
                if !snapshot.is_above_dust() {
                    continue;
                }
                total_cost_basis += snapshot.cost_basis();

                let price = price_map
                    .get(asset_id)
                    .map_or(0.0, |series| series.price_at(current_ts));
                total_value += snapshot.quantity * price;
            }

            // The first point is normalized to 0 so the chart has a
            // clean baseline
            let pnl = if i == 0 {
                0.0
            } else {
                total_value - total_cost_basis
            };

            pnl_history.push((current_ts, pnl));
            value_history.push((current_ts, total_value));
            cost_history.push((current_ts, total_cost_basis));
        }

        if value_history.len() < 2 {
            return PortfolioHistory::empty_with_error(NOT_ENOUGH_DATA);
        }

        PortfolioHistory {
            pnl: pnl_history,
            value: value_history,
            cost: cost_history,
            error: None,
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
