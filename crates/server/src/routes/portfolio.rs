use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use ledgerlens_core::deadline::Deadline;
use ledgerlens_core::models::history::PortfolioHistory;
use ledgerlens_core::models::timeframe::Timeframe;
use ledgerlens_core::models::transaction::TransactionRecord;

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/portfolio-history", post(portfolio_history))
}

#[derive(Debug, Deserialize)]
struct HistoryRequest {
    transactions: Vec<TransactionRecord>,
    #[serde(default)]
    timeframe: Timeframe,
}

/// POST /portfolio-history
///
/// Body: `{ "transactions": [...], "timeframe": "24h"|"7d"|"30d"|"3m"|"1y"|"all" }`
/// Response: `{ "pnl": [[ms, n], ...], "value": [...], "cost": [...] }`,
/// with empty arrays (and an optional `error` string) for degenerate
/// input. A malformed body is the only per-request client error.
async fn portfolio_history(
    State(state): State<AppState>,
    payload: Result<Json<HistoryRequest>, JsonRejection>,
) -> Result<Json<PortfolioHistory>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let deadline = Deadline::with_budget(state.request_budget);
    let history = state
        .engine
        .portfolio_history(&request.transactions, request.timeframe, &deadline)
        .await;

    Ok(Json(history))
}
