use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// What a transaction does to holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Acquiring an asset at a known price — counts toward cost basis
    Buy,
    /// Disposing of an asset
    Sell,
    /// Moving an asset in from elsewhere. Increases holdings but is
    /// cost-free inventory: a price at transfer time is not guaranteed
    /// to be available, so transfers never touch cost basis.
    Transfer,
}

impl TransactionKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "buy" => Some(TransactionKind::Buy),
            "sell" => Some(TransactionKind::Sell),
            "transfer" => Some(TransactionKind::Transfer),
            _ => None,
        }
    }
}

/// One ledger entry exactly as the caller supplied it.
///
/// Every field is optional on the wire: a single malformed record must
/// not reject the whole request. Records that cannot be resolved into a
/// [`Transaction`] are dropped during sanitization instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default)]
    pub asset_id: Option<String>,

    /// "buy", "sell" or "transfer"
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub quantity: Option<f64>,

    /// Price paid per unit; meaningful only for buys
    #[serde(default)]
    pub price_per_coin: Option<f64>,

    /// ISO-8601 timestamp or plain date
    #[serde(default)]
    pub date: Option<String>,
}

/// A validated, replay-ready transaction. Immutable input to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub asset_id: String,
    pub kind: TransactionKind,
    /// Units moved, non-negative
    pub quantity: f64,
    /// Price per unit at transaction time; zero unless it was supplied
    pub price_per_coin: f64,
    /// Transaction instant, epoch milliseconds UTC
    pub timestamp_ms: i64,
}

impl Transaction {
    /// Validate a raw record. Returns `None` when the record is missing
    /// its asset id, has an unparseable date, or an unknown type.
    pub fn from_record(record: &TransactionRecord) -> Option<Self> {
        let asset_id = record.asset_id.as_deref()?.trim();
        if asset_id.is_empty() {
            return None;
        }
        let kind = TransactionKind::parse(record.kind.as_deref()?)?;
        let timestamp_ms = parse_timestamp_ms(record.date.as_deref()?)?;

        let quantity = record.quantity.unwrap_or(0.0);
        if !quantity.is_finite() || quantity < 0.0 {
            return None;
        }

        Some(Self {
            asset_id: asset_id.to_string(),
            kind,
            quantity,
            price_per_coin: record.price_per_coin.unwrap_or(0.0).max(0.0),
            timestamp_ms,
        })
    }
}

/// Drop malformed records, keeping the valid transactions in input order.
/// One bad record should not deny the whole portfolio view.
pub fn sanitize_records(records: &[TransactionRecord]) -> Vec<Transaction> {
    let mut transactions = Vec::with_capacity(records.len());
    for record in records {
        match Transaction::from_record(record) {
            Some(txn) => transactions.push(txn),
            None => {
                tracing::debug!(?record, "dropping malformed transaction record");
            }
        }
    }
    transactions
}

/// Parse a transaction date leniently: RFC 3339 first, then a naive
/// datetime, then a plain date (taken as midnight UTC).
fn parse_timestamp_ms(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    None
}
