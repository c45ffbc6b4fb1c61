use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// CoinGecko Pro API key. Required — the engine cannot price
    /// anything without it, so a missing key is fatal at cold start
    /// rather than a per-request error.
    pub coingecko_api_key: String,
    /// Wall-clock budget per portfolio-history request
    pub request_budget: Duration,
    /// How long fetched price series stay cached
    pub cache_ttl: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let coingecko_api_key = std::env::var("COINGECKO_API_KEY")
            .map_err(|_| "COINGECKO_API_KEY environment variable was not found or is empty".to_string())?;
        if coingecko_api_key.trim().is_empty() {
            return Err("COINGECKO_API_KEY environment variable was not found or is empty".into());
        }

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| format!("Invalid PORT: {e}"))?;

        let request_budget_ms: u64 = std::env::var("REQUEST_BUDGET_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|e| format!("Invalid REQUEST_BUDGET_MS: {e}"))?;

        let cache_ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .map_err(|e| format!("Invalid CACHE_TTL_SECS: {e}"))?;

        Ok(Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            coingecko_api_key,
            request_budget: Duration::from_millis(request_budget_ms),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }

    /// Masked form of the API key for startup logs: enough to confirm
    /// which key is loaded, never the key itself.
    pub fn masked_api_key(&self) -> String {
        // Counted in chars, not bytes — an env var is not guaranteed
        // to be ASCII and a byte slice could split a code point
        let chars: Vec<char> = self.coingecko_api_key.chars().collect();
        if chars.len() <= 10 {
            return "***".to_string();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}
