// ==========================================
// ReplenishmentApi End-to-End Tests
// ==========================================
// Scope: full data flow from a seeded SQLite mirror through every
// report operation, with a pinned reference time so expectations
// stay exact.
// ==========================================

use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::{params, Connection};
use tempfile::NamedTempFile;

use retail_replen_aps::api::{AnalysisRequest, ReplenishmentApi};
use retail_replen_aps::db::init_schema;
use retail_replen_aps::domain::{
    OptimizationAction, Runway, StockLevelGrade, TrendDirection, UrgencyTier,
};
use retail_replen_aps::repository::{ScopeFilter, SqliteInventoryStore};

// ==========================================
// Test fixtures
// ==========================================

/// Pinned reference time: 2025-07-12 00:00 UTC.
fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 12, 0, 0, 0).unwrap()
}

/// Seed a network of three stores selling one coat SKU at different
/// speeds, plus a dormant bag SKU:
/// - S01/SKU-1: 100 on hand, 20/day  ->  5-day runway (critical)
/// - S02/SKU-1: 300 on hand, 10/day  -> 30-day runway (donor)
/// - S03/SKU-1:  20 on hand, 10/day  ->  2-day runway (recipient)
/// - S01/SKU-2: 500 on hand, no sales -> unbounded
fn seeded_api() -> (NamedTempFile, ReplenishmentApi<SqliteInventoryStore>) {
    let temp = NamedTempFile::new().unwrap();
    let db_path = temp.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path).unwrap();
    init_schema(&conn).unwrap();

    let stocks: [(&str, &str, &str, i64); 4] = [
        ("S01", "SKU-1", "COATS", 100),
        ("S02", "SKU-1", "COATS", 300),
        ("S03", "SKU-1", "COATS", 20),
        ("S01", "SKU-2", "BAGS", 500),
    ];
    for (store, sku, category, qty) in stocks {
        conn.execute(
            "INSERT INTO stock_records (store_id, sku_id, category, on_hand_qty, as_of)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![store, sku, category, qty, as_of()],
        )
        .unwrap();
    }

    let insert_daily = |store: &str, qty: i64, days: i64| {
        for d in 1..=days {
            conn.execute(
                "INSERT INTO sale_events (store_id, sku_id, quantity, sold_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![store, "SKU-1", qty, as_of() - Duration::days(d)],
            )
            .unwrap();
        }
    };
    insert_daily("S01", 20, 5);
    insert_daily("S02", 10, 10);
    insert_daily("S03", 10, 10);
    drop(conn);

    let store = SqliteInventoryStore::new(&db_path).unwrap();
    (temp, ReplenishmentApi::new(store))
}

fn pinned_request() -> AnalysisRequest {
    AnalysisRequest {
        as_of: Some(as_of()),
        ..AnalysisRequest::default()
    }
}

// ==========================================
// Test 1: velocity report covers every scope
// ==========================================
#[tokio::test]
async fn test_sales_velocity_one_row_per_scope() {
    let (_temp, api) = seeded_api();
    let envelope = api.sales_velocity(&pinned_request()).await.unwrap();

    assert_eq!(envelope.status, "success");
    assert_eq!(envelope.row_count, 4);
    assert_eq!(envelope.generated_at, as_of());

    let s01 = envelope
        .data
        .iter()
        .find(|v| v.store_id == "S01" && v.sku_id == "SKU-1")
        .unwrap();
    assert!((s01.units_per_day - 20.0).abs() < 1e-9);

    // the dormant bag SKU reports exactly zero, never NaN
    let bags = envelope
        .data
        .iter()
        .find(|v| v.sku_id == "SKU-2")
        .unwrap();
    assert_eq!(bags.units_per_day, 0.0);
}

// ==========================================
// Test 2: stockout prediction within the horizon
// ==========================================
#[tokio::test]
async fn test_stockout_prediction_sorted_by_urgency() {
    let (_temp, api) = seeded_api();
    let envelope = api.stockout_prediction(&pinned_request()).await.unwrap();

    // Only the 2-day and 5-day runways fall inside the 7-day horizon
    assert_eq!(envelope.row_count, 2);
    assert_eq!(envelope.data[0].stock.store_id, "S03");
    assert_eq!(envelope.data[0].forecast.runway, Runway::Bounded(2.0));
    assert_eq!(envelope.data[1].stock.store_id, "S01");
    assert_eq!(envelope.data[1].forecast.runway, Runway::Bounded(5.0));
}

// ==========================================
// Test 3: replenishment schedule drops NORMAL rows by default
// ==========================================
#[tokio::test]
async fn test_replenishment_schedule_quantities() {
    let (_temp, api) = seeded_api();
    let envelope = api.replenishment_schedule(&pinned_request()).await.unwrap();

    assert_eq!(envelope.row_count, 2);
    // most urgent first
    assert_eq!(envelope.data[0].store_id, "S03");
    assert_eq!(envelope.data[0].recommended_order_qty, 80); // (10-2)d * 10/d
    assert_eq!(envelope.data[1].store_id, "S01");
    assert_eq!(envelope.data[1].recommended_order_qty, 100); // (10-5)d * 20/d
    assert!(envelope.data.iter().all(|r| r.tier != UrgencyTier::Normal));
}

#[tokio::test]
async fn test_replenishment_schedule_can_include_normal() {
    let (_temp, api) = seeded_api();
    let mut request = pinned_request();
    request.config.include_normal = true;

    let envelope = api.replenishment_schedule(&request).await.unwrap();
    assert_eq!(envelope.row_count, 4);
}

// ==========================================
// Test 4: critical alerts agree with the schedule
// ==========================================
#[tokio::test]
async fn test_critical_alerts_match_schedule() {
    let (_temp, api) = seeded_api();
    let request = pinned_request();

    let alerts = api.critical_stock_alerts(&request).await.unwrap();
    let schedule = api.replenishment_schedule(&request).await.unwrap();

    assert_eq!(alerts.row_count, 2);
    assert!(alerts.data.iter().all(|a| a.tier == UrgencyTier::Critical));
    // same rows the schedule marked CRITICAL
    let critical_from_schedule: Vec<_> = schedule
        .data
        .iter()
        .filter(|r| r.tier == UrgencyTier::Critical)
        .cloned()
        .collect();
    assert_eq!(alerts.data, critical_from_schedule);
}

// ==========================================
// Test 5: store health overview
// ==========================================
#[tokio::test]
async fn test_store_health_overview() {
    let (_temp, api) = seeded_api();
    let envelope = api.store_health_overview(&pinned_request()).await.unwrap();

    assert_eq!(envelope.row_count, 3);
    let s01 = &envelope.data[0];
    assert_eq!(s01.store_id, "S01");
    assert_eq!(s01.total_skus, 2);
    assert_eq!(s01.critical_count, 1);
    // only the bounded runway feeds the average
    assert_eq!(s01.avg_cover_days, Some(5.0));
}

// ==========================================
// Test 6: transfer pairs the donor with the recipient
// ==========================================
#[tokio::test]
async fn test_transfer_recommendations() {
    let (_temp, api) = seeded_api();
    let envelope = api
        .transfer_recommendations(&pinned_request())
        .await
        .unwrap();

    assert_eq!(envelope.row_count, 1);
    let transfer = &envelope.data[0];
    assert_eq!(transfer.source_store_id, "S02");
    assert_eq!(transfer.destination_store_id, "S03");
    assert_eq!(transfer.sku_id, "SKU-1");
    assert_eq!(transfer.quantity, 30);
}

// ==========================================
// Test 7: warehouse and network rollups
// ==========================================
#[tokio::test]
async fn test_warehouse_summary_tier_totals() {
    let (_temp, api) = seeded_api();
    let envelope = api.warehouse_summary(&pinned_request()).await.unwrap();

    assert_eq!(envelope.row_count, 3);
    let s01 = &envelope.data[0];
    assert_eq!(s01.store_id, "S01");
    assert_eq!(s01.critical, 1);
    assert_eq!(s01.normal, 1); // the dormant bag SKU
    assert_eq!(s01.total_recommended_qty, 100);
}

#[tokio::test]
async fn test_network_inventory_rollup() {
    let (_temp, api) = seeded_api();
    let envelope = api.network_inventory(&pinned_request()).await.unwrap();

    assert_eq!(envelope.row_count, 2);
    let coats = &envelope.data[0];
    assert_eq!(coats.sku_id, "SKU-1");
    assert_eq!(coats.total_units, 420);
    assert_eq!(coats.store_coverage, 3);
    assert_eq!(coats.min_store_stock, 20);
    assert_eq!(coats.max_store_stock, 300);

    let bags = &envelope.data[1];
    assert_eq!(bags.sku_id, "SKU-2");
    assert_eq!(bags.weeks_of_supply, None);
}

// ==========================================
// Test 8: inventory optimization exception list
// ==========================================
#[tokio::test]
async fn test_inventory_optimization_flags_dead_and_skewed_stock() {
    let (_temp, api) = seeded_api();
    let envelope = api
        .inventory_optimization(&pinned_request())
        .await
        .unwrap();

    // every seeded scope is far from its optimal level
    assert_eq!(envelope.row_count, 4);

    // dead stock first, deepest shortfall second
    let dead = &envelope.data[0];
    assert_eq!((dead.store_id.as_str(), dead.sku_id.as_str()), ("S01", "SKU-2"));
    assert_eq!(dead.grade, StockLevelGrade::DeadStock);
    assert_eq!(dead.action, OptimizationAction::LiquidateOrTransfer);
    assert_eq!(dead.stock_difference, 500);

    let short = &envelope.data[1];
    assert_eq!(short.store_id, "S03");
    assert_eq!(short.grade, StockLevelGrade::CriticalLow);
    assert_eq!(short.action, OptimizationAction::OrderUrgently);
    assert_eq!(short.stock_difference, -100);

    // remaining rows ordered by gap size
    let excess = &envelope.data[2];
    assert_eq!(excess.store_id, "S02");
    assert_eq!(excess.grade, StockLevelGrade::Excess);
    assert_eq!(excess.recommended_stock, 120); // 12 cover days * 10/day
    assert_eq!(excess.stock_difference, 180);

    let low = &envelope.data[3];
    assert_eq!((low.store_id.as_str(), low.sku_id.as_str()), ("S01", "SKU-1"));
    assert_eq!(low.grade, StockLevelGrade::Low);
    assert!((low.monthly_turnover - 6.0).abs() < 1e-9); // 20/day * 30 / 100
}

// ==========================================
// Test 9: demand trends
// ==========================================
#[tokio::test]
async fn test_demand_trends_new_demand_surges() {
    let (_temp, api) = seeded_api();
    let envelope = api.demand_trends(&pinned_request()).await.unwrap();

    // all seeded sales fall in the recent half of the 30-day window
    assert_eq!(envelope.row_count, 1);
    assert_eq!(envelope.data[0].category, "COATS");
    assert_eq!(envelope.data[0].direction, TrendDirection::Surging);
    assert_eq!(envelope.data[0].change_pct, None);
}

// ==========================================
// Test 10: a scoped request with no history recovers cleanly
// ==========================================
#[tokio::test]
async fn test_unknown_scope_yields_empty_envelope() {
    let (_temp, api) = seeded_api();
    let request = AnalysisRequest {
        scope: ScopeFilter {
            store_id: Some("S99".to_string()),
            sku_id: None,
        },
        ..pinned_request()
    };

    let envelope = api.replenishment_schedule(&request).await.unwrap();

    assert_eq!(envelope.status, "success");
    assert_eq!(envelope.row_count, 0);
    let message = envelope.message.unwrap();
    assert!(message.contains("S99"));
}

// ==========================================
// Test 11: scoping narrows every downstream report
// ==========================================
#[tokio::test]
async fn test_store_scope_narrows_reports() {
    let (_temp, api) = seeded_api();
    let request = AnalysisRequest {
        scope: ScopeFilter {
            store_id: Some("S03".to_string()),
            sku_id: None,
        },
        ..pinned_request()
    };

    let velocity = api.sales_velocity(&request).await.unwrap();
    assert_eq!(velocity.row_count, 1);
    assert_eq!(velocity.data[0].store_id, "S03");

    // a lone recipient has no donor to draw from
    let transfers = api.transfer_recommendations(&request).await.unwrap();
    assert_eq!(transfers.row_count, 0);
}

// ==========================================
// Test 12: pinned as_of makes runs repeatable
// ==========================================
#[tokio::test]
async fn test_pinned_time_is_deterministic() {
    let (_temp, api) = seeded_api();
    let request = pinned_request();

    let first = api.replenishment_schedule(&request).await.unwrap();
    let second = api.replenishment_schedule(&request).await.unwrap();

    assert_eq!(first.data, second.data);
    assert_eq!(first.generated_at, second.generated_at);
}
