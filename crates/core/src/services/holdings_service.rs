use std::collections::HashMap;

use crate::models::holdings::HoldingSnapshot;
use crate::models::transaction::Transaction;

/// Reconstructs per-asset positions by replaying the transaction ledger
/// up to a point in time.
///
/// Pure business logic — no I/O, no error conditions. An asset with no
/// relevant transactions simply has no entry.
pub struct HoldingsService;

impl HoldingsService {
    pub fn new() -> Self {
        Self
    }

    /// Replay every transaction with `date <= timestamp_ms` and return
    /// the resulting position per asset.
    ///
    /// Only the declared transaction date matters — the ledger may be
    /// supplied in any array order and replays identically. Entries at
    /// or below the dust threshold are kept here; valuation is where
    /// they get filtered out.
    pub fn holdings_at(
        &self,
        transactions: &[Transaction],
        timestamp_ms: i64,
    ) -> HashMap<String, HoldingSnapshot> {
        let mut holdings: HashMap<String, HoldingSnapshot> = HashMap::new();

        for txn in transactions {
            if txn.timestamp_ms > timestamp_ms {
                continue; // future transaction
            }
            holdings
                .entry(txn.asset_id.clone())
                .or_default()
                .apply(txn);
        }

        holdings
    }

    /// Replay for a single asset, ignoring the rest of the ledger.
    pub fn holdings_at_for_asset(
        &self,
        transactions: &[Transaction],
        asset_id: &str,
        timestamp_ms: i64,
    ) -> HoldingSnapshot {
        let mut snapshot = HoldingSnapshot::default();
        for txn in transactions {
            if txn.asset_id == asset_id && txn.timestamp_ms <= timestamp_ms {
                snapshot.apply(txn);
            }
        }
        snapshot
    }
}

impl Default for HoldingsService {
    fn default() -> Self {
        Self::new()
    }
}
