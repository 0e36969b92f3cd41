// ==========================================
// Retail Replenishment APS - Alert Aggregation
// ==========================================
// Responsibility: dashboard-facing cuts of the planning output.
// Critical alerts are a filter, never a recomputation: the alert
// list and the replenishment schedule can never disagree.
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::{ReplenishmentRecommendation, SkuPosition, StoreStatus, UrgencyTier};
use crate::engine::ReplenishmentPlanner;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

// ==========================================
// StoreAlertSummary - one dashboard row per store
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreAlertSummary {
    pub store_id: String,

    /// Distinct SKUs in the store's snapshot.
    pub total_skus: u32,

    /// SKUs with zero units on hand.
    pub out_of_stock: u32,

    pub critical_count: u32,

    pub warning_count: u32,

    /// Mean bounded runway across the store's forecastable SKUs;
    /// None when nothing in the store is forecastable.
    pub avg_cover_days: Option<f64>,

    pub status: StoreStatus,
}

/// CRITICAL-tier rows of an already-computed schedule, in the
/// schedule's own order.
pub fn critical_alerts(
    recommendations: &[ReplenishmentRecommendation],
) -> Vec<ReplenishmentRecommendation> {
    recommendations
        .iter()
        .filter(|r| r.tier == UrgencyTier::Critical)
        .cloned()
        .collect()
}

/// Per-store alert rollup, one row per store, sorted by store_id.
#[instrument(skip(positions, config), fields(count = positions.len()))]
pub fn store_alert_summaries(
    positions: &[SkuPosition],
    config: &PlanningConfig,
) -> Vec<StoreAlertSummary> {
    let mut by_store: BTreeMap<&str, Vec<&SkuPosition>> = BTreeMap::new();
    for position in positions {
        by_store.entry(position.store_id()).or_default().push(position);
    }

    by_store
        .into_iter()
        .map(|(store_id, store_positions)| summarize_store(store_id, &store_positions, config))
        .collect()
}

fn summarize_store(
    store_id: &str,
    positions: &[&SkuPosition],
    config: &PlanningConfig,
) -> StoreAlertSummary {
    let mut out_of_stock = 0u32;
    let mut critical_count = 0u32;
    let mut warning_count = 0u32;
    let mut bounded_days: Vec<f64> = Vec::new();

    for position in positions {
        if position.stock.is_out_of_stock() {
            out_of_stock += 1;
        }
        match ReplenishmentPlanner::classify_tier(&position.forecast.runway, config.critical_days) {
            UrgencyTier::Critical => critical_count += 1,
            UrgencyTier::Warning => warning_count += 1,
            UrgencyTier::Normal => {}
        }
        if let Some(days) = position.forecast.runway.days() {
            bounded_days.push(days);
        }
    }

    let avg_cover_days = if bounded_days.is_empty() {
        None
    } else {
        Some(bounded_days.iter().sum::<f64>() / bounded_days.len() as f64)
    };

    StoreAlertSummary {
        store_id: store_id.to_string(),
        total_skus: positions.len() as u32,
        out_of_stock,
        critical_count,
        warning_count,
        avg_cover_days,
        status: grade_store(critical_count, warning_count, out_of_stock),
    }
}

/// Grading ladder, most severe condition first.
fn grade_store(critical: u32, warning: u32, out_of_stock: u32) -> StoreStatus {
    if critical > 5 {
        StoreStatus::Critical
    } else if critical > 2 {
        StoreStatus::HighRisk
    } else if warning > 5 || out_of_stock > 2 {
        StoreStatus::Attention
    } else {
        StoreStatus::Normal
    }
}

// ==========================================
// Unit tests
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        OrderTiming, Runway, StockRecord, StockoutForecast, VelocityEstimate,
    };
    use chrono::{TimeZone, Utc};

    fn position(store: &str, sku: &str, on_hand: i64, units_per_day: f64) -> SkuPosition {
        let runway = if units_per_day > 0.0 {
            Runway::Bounded(on_hand as f64 / units_per_day)
        } else {
            Runway::Unbounded
        };
        SkuPosition {
            stock: StockRecord {
                store_id: store.to_string(),
                sku_id: sku.to_string(),
                category: None,
                on_hand_qty: on_hand,
                as_of: Utc.with_ymd_and_hms(2025, 7, 12, 0, 0, 0).unwrap(),
            },
            velocity: VelocityEstimate {
                store_id: store.to_string(),
                sku_id: sku.to_string(),
                units_per_day,
                peak_units_per_day: units_per_day,
                trough_units_per_day: units_per_day,
                lookback_window_days: 30,
                sample_count: if units_per_day > 0.0 { 10 } else { 0 },
            },
            forecast: StockoutForecast {
                store_id: store.to_string(),
                sku_id: sku.to_string(),
                runway,
                projected_stockout_date: None,
                pessimistic_days: None,
                optimistic_days: None,
            },
        }
    }

    fn recommendation(store: &str, sku: &str, tier: UrgencyTier) -> ReplenishmentRecommendation {
        ReplenishmentRecommendation {
            store_id: store.to_string(),
            sku_id: sku.to_string(),
            tier,
            runway: Runway::Bounded(1.0),
            recommended_order_qty: 10,
            recommended_order_date: None,
            order_timing: OrderTiming::Immediate,
        }
    }

    #[test]
    fn test_critical_alerts_are_a_pure_filter() {
        let schedule = vec![
            recommendation("S01", "SKU-1", UrgencyTier::Critical),
            recommendation("S01", "SKU-2", UrgencyTier::Warning),
            recommendation("S02", "SKU-1", UrgencyTier::Critical),
        ];

        let alerts = critical_alerts(&schedule);

        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.tier == UrgencyTier::Critical));
        // same rows, same order as the schedule
        assert_eq!(alerts[0], schedule[0]);
        assert_eq!(alerts[1], schedule[2]);
    }

    #[test]
    fn test_store_grading_ladder() {
        assert_eq!(grade_store(6, 0, 0), StoreStatus::Critical);
        assert_eq!(grade_store(3, 0, 0), StoreStatus::HighRisk);
        assert_eq!(grade_store(0, 6, 0), StoreStatus::Attention);
        assert_eq!(grade_store(0, 0, 3), StoreStatus::Attention);
        assert_eq!(grade_store(2, 5, 2), StoreStatus::Normal);
    }

    #[test]
    fn test_summary_counts_and_average() {
        let config = PlanningConfig::default(); // critical 5, warning 10
        let positions = vec![
            position("S01", "SKU-1", 20, 10.0), // 2 days: critical
            position("S01", "SKU-2", 80, 10.0), // 8 days: warning
            position("S01", "SKU-3", 0, 0.0),   // out of stock, unbounded
        ];

        let summaries = store_alert_summaries(&positions, &config);

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.total_skus, 3);
        assert_eq!(s.out_of_stock, 1);
        assert_eq!(s.critical_count, 1);
        assert_eq!(s.warning_count, 1);
        // mean of the two bounded runways only
        assert_eq!(s.avg_cover_days, Some(5.0));
        assert_eq!(s.status, StoreStatus::Normal);
    }

    #[test]
    fn test_no_forecastable_skus_yields_no_average() {
        let config = PlanningConfig::default();
        let positions = vec![position("S01", "SKU-1", 100, 0.0)];

        let summaries = store_alert_summaries(&positions, &config);
        assert_eq!(summaries[0].avg_cover_days, None);
    }

    #[test]
    fn test_summaries_sorted_by_store_id() {
        let config = PlanningConfig::default();
        let positions = vec![
            position("S09", "SKU-1", 100, 1.0),
            position("S01", "SKU-1", 100, 1.0),
            position("S05", "SKU-1", 100, 1.0),
        ];

        let summaries = store_alert_summaries(&positions, &config);
        let ids: Vec<&str> = summaries.iter().map(|s| s.store_id.as_str()).collect();
        assert_eq!(ids, vec!["S01", "S05", "S09"]);
    }
}
