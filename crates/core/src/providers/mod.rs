pub mod coingecko;
pub mod traits;
