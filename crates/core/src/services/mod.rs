pub mod holdings_service;
pub mod price_history_service;
pub mod valuation_service;
