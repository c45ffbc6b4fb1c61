use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A single price sample: (epoch milliseconds UTC, price in USD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

/// A time-ordered price-history series for one asset.
///
/// The upstream provider returns candles sorted non-decreasing by
/// timestamp; the series relies on that order and never re-sorts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// An empty series — the degraded form used when a fetch fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The most recent known price at or before `timestamp_ms`
    /// (step-function interpolation), or `0.0` when the series is empty
    /// or the target predates the first candle.
    ///
    /// Providers return discrete candles; a held asset's value between
    /// candles is best approximated by the last known price, not a
    /// projected one. Binary search — the series is sorted by timestamp.
    pub fn price_at(&self, timestamp_ms: i64) -> f64 {
        let idx = self
            .points
            .partition_point(|p| p.timestamp_ms <= timestamp_ms);
        if idx == 0 {
            0.0
        } else {
            self.points[idx - 1].price
        }
    }
}

/// Cache key: (asset id, lookback days). A 7-day series and a 365-day
/// series for the same asset have different granularity upstream, so
/// they are cached independently.
pub type SeriesCacheKey = (String, u32);

struct CachedSeries {
    fetched_at: Instant,
    series: PriceSeries,
}

/// In-memory TTL cache for fetched price-history series.
///
/// Passed explicitly into the fetch service (capability-passing) rather
/// than living as process-global state, so tests can construct their own
/// and horizontal scaling stays honest about cache misses. Failed
/// fetches (empty series) are never cached — a transient upstream error
/// should not pin an asset at zero for a whole TTL.
pub struct SeriesCache {
    ttl: Duration,
    entries: Mutex<HashMap<SeriesCacheKey, CachedSeries>>,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get a cached series if present and younger than the TTL.
    pub fn get(&self, asset_id: &str, lookback_days: u32) -> Option<PriceSeries> {
        let key = (asset_id.to_string(), lookback_days);
        let entries = self.entries.lock();
        let cached = entries.get(&key)?;
        if cached.fetched_at.elapsed() >= self.ttl {
            return None;
        }
        Some(cached.series.clone())
    }

    /// Insert a freshly fetched series. Empty series are ignored.
    pub fn insert(&self, asset_id: &str, lookback_days: u32, series: PriceSeries) {
        if series.is_empty() {
            return;
        }
        let key = (asset_id.to_string(), lookback_days);
        self.entries.lock().insert(
            key,
            CachedSeries {
                fetched_at: Instant::now(),
                series,
            },
        );
    }

    /// Drop every entry older than the TTL. Returns the number removed.
    pub fn prune_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, cached| cached.fetched_at.elapsed() < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
