// ==========================================
// Retail Replenishment APS - Category Demand Trends
// ==========================================
// Responsibility: compare the two consecutive halves of the
// lookback window per category and classify the rate-of-change.
// Category labels come from the stock snapshot; events whose scope
// has no snapshot row fall into UNCATEGORIZED rather than being
// dropped.
// ==========================================

use crate::domain::{SaleEvent, StockRecord, TrendDirection};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use tracing::instrument;

/// Relative change above this is SURGING.
const SURGE_THRESHOLD: f64 = 0.5;

/// Relative change above this is RISING.
const RISE_THRESHOLD: f64 = 0.2;

/// Relative change below this is FALLING.
const FALL_THRESHOLD: f64 = -0.3;

/// Relative change below this is EASING.
const EASE_THRESHOLD: f64 = -0.1;

// ==========================================
// CategoryTrend - one row per category
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrend {
    pub category: String,

    /// Units per day over the older half of the window.
    pub early_units_per_day: f64,

    /// Units per day over the recent half of the window.
    pub late_units_per_day: f64,

    /// Relative change between the halves; None when the early half
    /// had no sales (change from zero is not a ratio).
    pub change_pct: Option<f64>,

    pub direction: TrendDirection,
}

/// Per-category demand trend over [now - lookback, now], sorted by
/// category.
#[instrument(skip(stocks, events), fields(events = events.len()))]
pub fn category_trends(
    stocks: &[StockRecord],
    events: &[SaleEvent],
    lookback_days: i32,
    now: DateTime<Utc>,
) -> Vec<CategoryTrend> {
    let window_start = now - Duration::days(lookback_days as i64);
    let midpoint = now - Duration::days((lookback_days / 2) as i64);
    let half_days = (lookback_days as f64 / 2.0).max(1.0);

    // Scope -> category, taken from the snapshot.
    let categories: HashMap<(&str, &str), &str> = stocks
        .iter()
        .map(|s| ((s.store_id.as_str(), s.sku_id.as_str()), s.category_label()))
        .collect();

    let mut totals: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for event in events {
        if event.sold_at < window_start || event.sold_at > now {
            continue;
        }
        let category = categories
            .get(&(event.store_id.as_str(), event.sku_id.as_str()))
            .copied()
            .unwrap_or("UNCATEGORIZED");
        let entry = totals.entry(category.to_string()).or_insert((0, 0));
        if event.sold_at < midpoint {
            entry.0 += event.quantity;
        } else {
            entry.1 += event.quantity;
        }
    }

    totals
        .into_iter()
        .map(|(category, (early_units, late_units))| {
            let early = early_units as f64 / half_days;
            let late = late_units as f64 / half_days;
            let change_pct = if early > 0.0 {
                Some((late - early) / early)
            } else {
                None
            };
            CategoryTrend {
                category,
                early_units_per_day: early,
                late_units_per_day: late,
                change_pct,
                direction: classify(early, late, change_pct),
            }
        })
        .collect()
}

fn classify(early: f64, late: f64, change_pct: Option<f64>) -> TrendDirection {
    match change_pct {
        // Demand appeared from nothing
        None if late > 0.0 && early == 0.0 => TrendDirection::Surging,
        None => TrendDirection::Stable,
        Some(pct) if pct > SURGE_THRESHOLD => TrendDirection::Surging,
        Some(pct) if pct > RISE_THRESHOLD => TrendDirection::Rising,
        Some(pct) if pct < FALL_THRESHOLD => TrendDirection::Falling,
        Some(pct) if pct < EASE_THRESHOLD => TrendDirection::Easing,
        Some(_) => TrendDirection::Stable,
    }
}

// ==========================================
// Unit tests
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 12, 0, 0, 0).unwrap()
    }

    fn stock(store: &str, sku: &str, category: Option<&str>) -> StockRecord {
        StockRecord {
            store_id: store.to_string(),
            sku_id: sku.to_string(),
            category: category.map(str::to_string),
            on_hand_qty: 100,
            as_of: now(),
        }
    }

    fn event(store: &str, sku: &str, qty: i64, days_ago: i64) -> SaleEvent {
        SaleEvent {
            store_id: store.to_string(),
            sku_id: sku.to_string(),
            quantity: qty,
            sold_at: now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_rising_category() {
        // 30-day window, midpoint 15 days back. Early half sells 100,
        // late half sells 130: +30% => RISING.
        let stocks = vec![stock("S01", "SKU-1", Some("SHOES"))];
        let events = vec![
            event("S01", "SKU-1", 100, 20),
            event("S01", "SKU-1", 130, 5),
        ];

        let trends = category_trends(&stocks, &events, 30, now());

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].category, "SHOES");
        assert!((trends[0].change_pct.unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(trends[0].direction, TrendDirection::Rising);
    }

    #[test]
    fn test_direction_thresholds() {
        assert_eq!(classify(10.0, 16.0, Some(0.6)), TrendDirection::Surging);
        assert_eq!(classify(10.0, 13.0, Some(0.3)), TrendDirection::Rising);
        assert_eq!(classify(10.0, 10.5, Some(0.05)), TrendDirection::Stable);
        assert_eq!(classify(10.0, 8.0, Some(-0.2)), TrendDirection::Easing);
        assert_eq!(classify(10.0, 6.0, Some(-0.4)), TrendDirection::Falling);
    }

    #[test]
    fn test_new_demand_from_zero_is_surging() {
        let stocks = vec![stock("S01", "SKU-1", Some("BAGS"))];
        let events = vec![event("S01", "SKU-1", 50, 3)]; // late half only

        let trends = category_trends(&stocks, &events, 30, now());

        assert_eq!(trends[0].change_pct, None);
        assert_eq!(trends[0].direction, TrendDirection::Surging);
    }

    #[test]
    fn test_unlabelled_scope_lands_in_uncategorized() {
        // SKU-2 has no snapshot row at all
        let stocks = vec![stock("S01", "SKU-1", Some("SHOES"))];
        let events = vec![
            event("S01", "SKU-1", 10, 5),
            event("S01", "SKU-2", 10, 5),
        ];

        let trends = category_trends(&stocks, &events, 30, now());

        let categories: Vec<&str> = trends.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(categories, vec!["SHOES", "UNCATEGORIZED"]);
    }

    #[test]
    fn test_events_outside_window_excluded() {
        let stocks = vec![stock("S01", "SKU-1", Some("SHOES"))];
        let events = vec![
            event("S01", "SKU-1", 10, 5),
            event("S01", "SKU-1", 999, 45),
        ];

        let trends = category_trends(&stocks, &events, 30, now());

        // Only the in-window sale counted, all of it in the late half
        assert_eq!(trends[0].early_units_per_day, 0.0);
        assert!(trends[0].late_units_per_day > 0.0);
    }

    #[test]
    fn test_sorted_by_category() {
        let stocks = vec![
            stock("S01", "SKU-1", Some("SHOES")),
            stock("S01", "SKU-2", Some("BAGS")),
        ];
        let events = vec![
            event("S01", "SKU-1", 10, 5),
            event("S01", "SKU-2", 10, 5),
        ];

        let trends = category_trends(&stocks, &events, 30, now());
        assert_eq!(trends[0].category, "BAGS");
        assert_eq!(trends[1].category, "SHOES");
    }
}
