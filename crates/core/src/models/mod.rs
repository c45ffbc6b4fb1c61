pub mod history;
pub mod holdings;
pub mod price;
pub mod timeframe;
pub mod transaction;
