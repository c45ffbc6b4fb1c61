use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use crate::models::price::{PriceSeries, SeriesCache};
use crate::providers::traits::PriceHistoryProvider;

/// Retrieves price-history series for every asset the ledger touches.
///
/// All per-asset fetches run concurrently (fan-out/fan-in), so total
/// latency is bounded by the slowest single fetch rather than the sum —
/// the whole invocation is wall-clock budgeted. A failed fetch degrades
/// to an empty series for that asset; the valuation must stay
/// computable for the assets that did resolve.
pub struct PriceHistoryService {
    provider: Arc<dyn PriceHistoryProvider>,
    cache: Arc<SeriesCache>,
}

impl PriceHistoryService {
    pub fn new(provider: Arc<dyn PriceHistoryProvider>, cache: Arc<SeriesCache>) -> Self {
        Self { provider, cache }
    }

    /// Fetch (or serve from cache) one series per distinct asset id.
    /// Never fails — per-asset errors are absorbed into empty series.
    pub async fn fetch_all(
        &self,
        asset_ids: &[String],
        lookback_days: u32,
    ) -> HashMap<String, PriceSeries> {
        let mut series_map = HashMap::with_capacity(asset_ids.len());
        let mut misses = Vec::new();

        for asset_id in asset_ids {
            match self.cache.get(asset_id, lookback_days) {
                Some(series) => {
                    series_map.insert(asset_id.clone(), series);
                }
                None => misses.push(asset_id.clone()),
            }
        }

        let fetches = misses.iter().map(|asset_id| async move {
            let result = self.provider.market_chart(asset_id, lookback_days).await;
            (asset_id.clone(), result)
        });

        for (asset_id, result) in join_all(fetches).await {
            let series = match result {
                Ok(points) => {
                    let series = PriceSeries::new(points);
                    self.cache.insert(&asset_id, lookback_days, series.clone());
                    series
                }
                Err(e) => {
                    tracing::warn!(
                        asset_id = %asset_id,
                        provider = self.provider.name(),
                        error = %e,
                        "price history fetch failed, valuing asset from an empty series"
                    );
                    PriceSeries::empty()
                }
            };
            series_map.insert(asset_id, series);
        }

        series_map
    }
}
