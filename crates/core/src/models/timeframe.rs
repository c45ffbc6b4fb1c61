use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::transaction::Transaction;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Symbolic chart timeframe requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    /// "24h"
    Day,
    /// "7d"
    Week,
    /// "30d"
    Month,
    /// "3m"
    ThreeMonths,
    /// "1y" — also the fallback for unrecognized tokens
    #[default]
    Year,
    /// "all" — from the earliest transaction
    All,
}

impl Timeframe {
    /// Parse a timeframe token (case-insensitive). Unrecognized tokens
    /// fall back to the 1-year window rather than erroring.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "24h" => Timeframe::Day,
            "7d" => Timeframe::Week,
            "30d" => Timeframe::Month,
            "3m" => Timeframe::ThreeMonths,
            "1y" => Timeframe::Year,
            "all" => Timeframe::All,
            _ => Timeframe::default(),
        }
    }

    /// Nominal lookback in days; `None` for `All`.
    fn days(self) -> Option<i64> {
        match self {
            Timeframe::Day => Some(1),
            Timeframe::Week => Some(7),
            Timeframe::Month => Some(30),
            Timeframe::ThreeMonths => Some(90),
            Timeframe::Year => Some(365),
            Timeframe::All => None,
        }
    }

    /// Resolve this timeframe against a transaction list into a concrete
    /// sampling window ending now.
    pub fn resolve(self, transactions: &[Transaction]) -> Window {
        self.resolve_at(transactions, Utc::now())
    }

    /// Same as [`resolve`](Self::resolve) with an explicit "now", so the
    /// window logic stays deterministic under test.
    ///
    /// The window start is NOT clamped forward to the first transaction:
    /// when the requested lookback predates it, the extra span simply
    /// shows zero holdings, which is what a chart should display.
    pub fn resolve_at(self, transactions: &[Transaction], now: DateTime<Utc>) -> Window {
        let now_ms = now.timestamp_millis();
        let end_ms = now_ms;

        let mut start_ms = match self.days() {
            Some(days) => now_ms - days * DAY_MS,
            None => {
                // "all": from the earliest transaction; an empty ledger
                // degenerates to "now" (forced to a 1-day window below)
                transactions
                    .iter()
                    .map(|t| t.timestamp_ms)
                    .min()
                    .unwrap_or(now_ms)
            }
        };

        // Guarantee a non-degenerate window even when every transaction
        // is at or after "now".
        if start_ms >= end_ms {
            start_ms = end_ms - DAY_MS;
        }

        let lookback_days = ((end_ms - start_ms + DAY_MS - 1) / DAY_MS).max(1) as u32;

        Window {
            start_ms,
            end_ms,
            lookback_days,
        }
    }
}

impl<'de> Deserialize<'de> for Timeframe {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Ok(Timeframe::parse(&token))
    }
}

/// A concrete sampling window: `[start, end]` in epoch milliseconds plus
/// the lookback used to request price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start_ms: i64,
    pub end_ms: i64,
    /// `ceil((end - start) / 1 day)`, at least 1
    pub lookback_days: u32,
}

impl Window {
    pub fn span_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}
