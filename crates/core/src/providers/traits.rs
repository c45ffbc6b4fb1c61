use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::price::PricePoint;

/// Trait abstraction over the external price-history source.
///
/// The engine only ever asks one question: "give me the USD price
/// candles for this asset over the last N days". Anything that can
/// answer it can back the engine — the real CoinGecko client in
/// production, a canned map in tests.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the USD price history for one asset over the last
    /// `lookback_days` days. Points are returned sorted non-decreasing
    /// by timestamp.
    async fn market_chart(
        &self,
        asset_id: &str,
        lookback_days: u32,
    ) -> Result<Vec<PricePoint>, CoreError>;
}
