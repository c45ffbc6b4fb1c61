use std::sync::Arc;

use tokio::net::TcpListener;

use ledgerlens_core::models::price::SeriesCache;
use ledgerlens_core::providers::coingecko::CoinGeckoProvider;
use ledgerlens_core::HistoryEngine;

use ledgerlens_server::config::ServerConfig;
use ledgerlens_server::state::AppState;
use ledgerlens_server::{app, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_logging(&logging::LoggingConfig::from_env());

    let config = ServerConfig::from_env().map_err(|e| {
        tracing::error!("FATAL: {e}");
        e
    })?;
    tracing::info!("Authenticating with key: {}", config.masked_api_key());

    let provider = Arc::new(CoinGeckoProvider::new(config.coingecko_api_key.clone()));
    let cache = Arc::new(SeriesCache::new(config.cache_ttl));
    let engine = Arc::new(HistoryEngine::with_cache(provider, cache));

    let state = AppState {
        engine,
        request_budget: config.request_budget,
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
