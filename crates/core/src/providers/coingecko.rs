use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::PriceHistoryProvider;
use crate::errors::CoreError;
use crate::models::price::PricePoint;

const BASE_URL: &str = "https://pro-api.coingecko.com/api/v3";

/// CoinGecko Pro API provider for historical crypto prices.
///
/// - **Auth**: Pro API key, sent via the `x-cg-pro-api-key` header.
/// - **Endpoint**: `/coins/{id}/market_chart?vs_currency=usd&days={n}`
/// - **Granularity**: hourly candles for lookbacks up to 90 days,
///   daily above that — matching the upstream's own auto-granularity.
///
/// CoinGecko ids are lowercase slugs ("bitcoin", "ripple"). The one
/// alias the dashboard needs is `xrp` → `ripple`; everything else is
/// passed through as supplied.
pub struct CoinGeckoProvider {
    client: Client,
    api_key: String,
}

impl CoinGeckoProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_key }
    }

    /// Map a dashboard asset id to the CoinGecko coin id.
    fn resolve_id(asset_id: &str) -> &str {
        if asset_id.eq_ignore_ascii_case("xrp") {
            "ripple"
        } else {
            asset_id
        }
    }

    fn interval_for(lookback_days: u32) -> &'static str {
        if lookback_days <= 90 {
            "hourly"
        } else {
            "daily"
        }
    }
}

// ── CoinGecko API response types ────────────────────────────────────

#[derive(Deserialize)]
struct MarketChartResponse {
    /// `[[timestampMs, price], ...]`
    #[serde(default)]
    prices: Vec<(i64, f64)>,
}

#[async_trait]
impl PriceHistoryProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn market_chart(
        &self,
        asset_id: &str,
        lookback_days: u32,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let coin_id = Self::resolve_id(asset_id);
        let interval = Self::interval_for(lookback_days);
        let url = format!(
            "{BASE_URL}/coins/{coin_id}/market_chart?vs_currency=usd&days={lookback_days}&interval={interval}"
        );

        let response = self
            .client
            .get(&url)
            .header("x-cg-pro-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Api {
                provider: "CoinGecko".into(),
                message: format!("{status} for {coin_id}: {body}"),
            });
        }

        let chart: MarketChartResponse =
            response.json().await.map_err(|e| CoreError::Api {
                provider: "CoinGecko".into(),
                message: format!("Failed to parse market chart for {coin_id}: {e}"),
            })?;

        let points = chart
            .prices
            .into_iter()
            .map(|(timestamp_ms, price)| PricePoint {
                timestamp_ms,
                price,
            })
            .collect();

        Ok(points)
    }
}
