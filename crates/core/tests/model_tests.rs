// ═══════════════════════════════════════════════════════════════════
// Model Tests — TransactionRecord sanitization, Timeframe/Window
// resolution, PriceSeries step lookup, SeriesCache TTL
// ═══════════════════════════════════════════════════════════════════

use std::time::Duration;

use chrono::{TimeZone, Utc};

use ledgerlens_core::models::price::{PricePoint, PriceSeries, SeriesCache};
use ledgerlens_core::models::timeframe::Timeframe;
use ledgerlens_core::models::transaction::{
    sanitize_records, Transaction, TransactionKind, TransactionRecord,
};

fn record(asset: &str, kind: &str, date: &str) -> TransactionRecord {
    TransactionRecord {
        asset_id: Some(asset.to_string()),
        kind: Some(kind.to_string()),
        quantity: Some(1.0),
        price_per_coin: Some(10.0),
        date: Some(date.to_string()),
    }
}

fn txn(asset: &str, kind: TransactionKind, quantity: f64, price: f64, ts_ms: i64) -> Transaction {
    Transaction {
        asset_id: asset.to_string(),
        kind,
        quantity,
        price_per_coin: price,
        timestamp_ms: ts_ms,
    }
}

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

// ═══════════════════════════════════════════════════════════════════
// Transaction sanitization
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_accepts_rfc3339_naive_and_plain_dates() {
    assert!(Transaction::from_record(&record("xrp", "buy", "2024-05-01T12:30:00Z")).is_some());
    assert!(Transaction::from_record(&record("xrp", "buy", "2024-05-01T12:30:00+02:00")).is_some());
    assert!(Transaction::from_record(&record("xrp", "buy", "2024-05-01T12:30:00")).is_some());
    assert!(Transaction::from_record(&record("xrp", "buy", "2024-05-01")).is_some());
}

#[test]
fn test_plain_date_is_midnight_utc() {
    let txn = Transaction::from_record(&record("xrp", "buy", "2024-05-01")).unwrap();
    let expected = Utc
        .with_ymd_and_hms(2024, 5, 1, 0, 0, 0)
        .unwrap()
        .timestamp_millis();
    assert_eq!(txn.timestamp_ms, expected);
}

#[test]
fn test_rejects_unparseable_date() {
    assert!(Transaction::from_record(&record("xrp", "buy", "not a date")).is_none());
    assert!(Transaction::from_record(&record("xrp", "buy", "")).is_none());
}

#[test]
fn test_rejects_missing_or_blank_asset_id() {
    let mut r = record("", "buy", "2024-05-01");
    assert!(Transaction::from_record(&r).is_none());
    r.asset_id = Some("   ".to_string());
    assert!(Transaction::from_record(&r).is_none());
    r.asset_id = None;
    assert!(Transaction::from_record(&r).is_none());
}

#[test]
fn test_rejects_unknown_transaction_type() {
    assert!(Transaction::from_record(&record("xrp", "stake", "2024-05-01")).is_none());
    assert!(Transaction::from_record(&record("xrp", "", "2024-05-01")).is_none());
}

#[test]
fn test_missing_quantity_defaults_to_zero() {
    let mut r = record("xrp", "sell", "2024-05-01");
    r.quantity = None;
    let txn = Transaction::from_record(&r).unwrap();
    assert_eq!(txn.quantity, 0.0);
}

#[test]
fn test_rejects_negative_or_non_finite_quantity() {
    let mut r = record("xrp", "buy", "2024-05-01");
    r.quantity = Some(-1.0);
    assert!(Transaction::from_record(&r).is_none());
    r.quantity = Some(f64::NAN);
    assert!(Transaction::from_record(&r).is_none());
}

#[test]
fn test_sanitize_drops_only_bad_records() {
    let records = vec![
        record("xrp", "buy", "2024-05-01"),
        record("xrp", "buy", "garbage"),          // bad date
        record("", "buy", "2024-05-02"),          // missing asset
        record("bitcoin", "transfer", "2024-05-03"),
        record("bitcoin", "airdrop", "2024-05-04"), // unknown type
    ];
    let transactions = sanitize_records(&records);
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].asset_id, "xrp");
    assert_eq!(transactions[1].asset_id, "bitcoin");
    assert_eq!(transactions[1].kind, TransactionKind::Transfer);
}

#[test]
fn test_wire_names_are_camel_case() {
    let json = r#"{"assetId":"xrp","type":"buy","quantity":5.0,"pricePerCoin":0.5,"date":"2024-05-01"}"#;
    let record: TransactionRecord = serde_json::from_str(json).unwrap();
    let txn = Transaction::from_record(&record).unwrap();
    assert_eq!(txn.asset_id, "xrp");
    assert_eq!(txn.quantity, 5.0);
    assert_eq!(txn.price_per_coin, 0.5);
}

// ═══════════════════════════════════════════════════════════════════
// Timeframe resolution
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_timeframe_tokens() {
    assert_eq!(Timeframe::parse("24h"), Timeframe::Day);
    assert_eq!(Timeframe::parse("7d"), Timeframe::Week);
    assert_eq!(Timeframe::parse("30d"), Timeframe::Month);
    assert_eq!(Timeframe::parse("3m"), Timeframe::ThreeMonths);
    assert_eq!(Timeframe::parse("1y"), Timeframe::Year);
    assert_eq!(Timeframe::parse("all"), Timeframe::All);
    // Case-insensitive
    assert_eq!(Timeframe::parse("24H"), Timeframe::Day);
    assert_eq!(Timeframe::parse("ALL"), Timeframe::All);
}

#[test]
fn test_unrecognized_token_defaults_to_one_year() {
    assert_eq!(Timeframe::parse("90d"), Timeframe::Year);
    assert_eq!(Timeframe::parse(""), Timeframe::Year);
    assert_eq!(Timeframe::parse("forever"), Timeframe::Year);
}

#[test]
fn test_fixed_timeframes_ignore_first_transaction_date() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let now_ms = now.timestamp_millis();
    // First transaction only 3 days ago — the 7d window still reaches
    // back the full 7 days (zero-holdings history stays visible)
    let transactions = vec![txn(
        "xrp",
        TransactionKind::Buy,
        1.0,
        1.0,
        now_ms - 3 * DAY_MS,
    )];

    let window = Timeframe::Week.resolve_at(&transactions, now);
    assert_eq!(window.start_ms, now_ms - 7 * DAY_MS);
    assert_eq!(window.end_ms, now_ms);
    assert_eq!(window.lookback_days, 7);
}

#[test]
fn test_all_starts_at_earliest_transaction() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let now_ms = now.timestamp_millis();
    let transactions = vec![
        txn("xrp", TransactionKind::Buy, 1.0, 1.0, now_ms - 10 * DAY_MS),
        txn("xrp", TransactionKind::Buy, 1.0, 1.0, now_ms - 40 * DAY_MS),
        txn("xrp", TransactionKind::Sell, 1.0, 0.0, now_ms - 2 * DAY_MS),
    ];

    let window = Timeframe::All.resolve_at(&transactions, now);
    assert_eq!(window.start_ms, now_ms - 40 * DAY_MS);
    assert_eq!(window.lookback_days, 40);
}

#[test]
fn test_all_with_empty_ledger_forces_one_day_window() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let window = Timeframe::All.resolve_at(&[], now);
    assert_eq!(window.end_ms - window.start_ms, DAY_MS);
    assert_eq!(window.lookback_days, 1);
}

#[test]
fn test_future_only_transactions_force_one_day_window() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let now_ms = now.timestamp_millis();
    let transactions = vec![txn(
        "xrp",
        TransactionKind::Buy,
        1.0,
        1.0,
        now_ms + 5 * DAY_MS,
    )];

    let window = Timeframe::All.resolve_at(&transactions, now);
    assert_eq!(window.start_ms, now_ms - DAY_MS);
    assert_eq!(window.end_ms, now_ms);
}

#[test]
fn test_lookback_days_rounds_up_and_floors_at_one() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let now_ms = now.timestamp_millis();
    // Earliest transaction 1.5 days ago → ceil to 2
    let transactions = vec![txn(
        "xrp",
        TransactionKind::Buy,
        1.0,
        1.0,
        now_ms - 3 * DAY_MS / 2,
    )];
    let window = Timeframe::All.resolve_at(&transactions, now);
    assert_eq!(window.lookback_days, 2);
}

#[test]
fn test_timeframe_deserializes_from_json_string() {
    let tf: Timeframe = serde_json::from_str("\"7d\"").unwrap();
    assert_eq!(tf, Timeframe::Week);
    let tf: Timeframe = serde_json::from_str("\"whatever\"").unwrap();
    assert_eq!(tf, Timeframe::Year);
}

// ═══════════════════════════════════════════════════════════════════
// PriceSeries step lookup
// ═══════════════════════════════════════════════════════════════════

fn series(points: &[(i64, f64)]) -> PriceSeries {
    PriceSeries::new(
        points
            .iter()
            .map(|&(timestamp_ms, price)| PricePoint {
                timestamp_ms,
                price,
            })
            .collect(),
    )
}

#[test]
fn test_price_lookup_is_a_step_function() {
    let s = series(&[(100, 1.0), (200, 2.0)]);
    assert_eq!(s.price_at(150), 1.0); // between candles → last known
    assert_eq!(s.price_at(50), 0.0); // before the first candle
    assert_eq!(s.price_at(200), 2.0); // exact hit
    assert_eq!(s.price_at(100), 1.0);
    assert_eq!(s.price_at(10_000), 2.0); // after the last candle
}

#[test]
fn test_empty_series_prices_at_zero() {
    assert_eq!(PriceSeries::empty().price_at(12345), 0.0);
}

// ═══════════════════════════════════════════════════════════════════
// SeriesCache
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_cache_hit_within_ttl() {
    let cache = SeriesCache::new(Duration::from_secs(60));
    let s = series(&[(100, 1.0)]);
    cache.insert("xrp", 7, s.clone());

    assert_eq!(cache.get("xrp", 7), Some(s));
    // Different lookback is a different entry
    assert_eq!(cache.get("xrp", 30), None);
    assert_eq!(cache.get("bitcoin", 7), None);
}

#[test]
fn test_cache_entry_expires_after_ttl() {
    let cache = SeriesCache::new(Duration::from_millis(10));
    cache.insert("xrp", 7, series(&[(100, 1.0)]));

    std::thread::sleep(Duration::from_millis(25));
    assert_eq!(cache.get("xrp", 7), None);
    assert_eq!(cache.prune_expired(), 1);
    assert!(cache.is_empty());
}

#[test]
fn test_cache_never_stores_empty_series() {
    let cache = SeriesCache::new(Duration::from_secs(60));
    cache.insert("xrp", 7, PriceSeries::empty());
    assert!(cache.is_empty());
    assert_eq!(cache.get("xrp", 7), None);
}
