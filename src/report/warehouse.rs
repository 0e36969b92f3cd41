// ==========================================
// Retail Replenishment APS - Warehouse & Network Rollups
// ==========================================
// Responsibility: the warehouse-operator views. Per-store tier
// totals for pick planning, and per-SKU network rollups grading
// overall stock health and cross-store distribution.
// ==========================================

use crate::domain::{
    DistributionStatus, ReplenishmentRecommendation, SkuPosition, StockHealth, UrgencyTier,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

const DAYS_PER_WEEK: f64 = 7.0;

/// Network weeks-of-supply above this grades EXCESS.
const EXCESS_WEEKS: f64 = 8.0;

/// Network weeks-of-supply below this grades SHORT.
const SHORT_WEEKS: f64 = 2.0;

/// A max/min stock ratio above this grades the distribution UNEVEN.
const SKEW_RATIO: f64 = 5.0;

// ==========================================
// StoreTierSummary - pick-planning row per store
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreTierSummary {
    pub store_id: String,

    pub critical: u32,

    pub warning: u32,

    pub normal: u32,

    /// Units the store would receive if every recommendation shipped.
    pub total_recommended_qty: i64,
}

// ==========================================
// SkuNetworkRollup - one row per SKU across all stores
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuNetworkRollup {
    pub sku_id: String,

    pub category: String,

    /// Units on hand summed across every store.
    pub total_units: i64,

    /// Stores holding at least one unit.
    pub store_coverage: u32,

    pub min_store_stock: i64,

    pub max_store_stock: i64,

    /// Mean per-store daily sell-through rate.
    pub mean_units_per_day: f64,

    /// total_units / (mean velocity * 7); None when nothing sells.
    pub weeks_of_supply: Option<f64>,

    pub stock_health: StockHealth,

    pub distribution: DistributionStatus,
}

/// Per-store tier totals over an already-computed schedule, sorted
/// by store_id.
#[instrument(skip(recommendations), fields(count = recommendations.len()))]
pub fn store_tier_summaries(
    recommendations: &[ReplenishmentRecommendation],
) -> Vec<StoreTierSummary> {
    let mut by_store: BTreeMap<&str, StoreTierSummary> = BTreeMap::new();

    for rec in recommendations {
        let entry = by_store
            .entry(rec.store_id.as_str())
            .or_insert_with(|| StoreTierSummary {
                store_id: rec.store_id.clone(),
                critical: 0,
                warning: 0,
                normal: 0,
                total_recommended_qty: 0,
            });
        match rec.tier {
            UrgencyTier::Critical => entry.critical += 1,
            UrgencyTier::Warning => entry.warning += 1,
            UrgencyTier::Normal => entry.normal += 1,
        }
        entry.total_recommended_qty += rec.recommended_order_qty;
    }

    by_store.into_values().collect()
}

/// Network-wide per-SKU rollup, sorted by sku_id.
#[instrument(skip(positions), fields(count = positions.len()))]
pub fn sku_network_rollups(positions: &[SkuPosition]) -> Vec<SkuNetworkRollup> {
    let mut by_sku: BTreeMap<&str, Vec<&SkuPosition>> = BTreeMap::new();
    for position in positions {
        by_sku.entry(position.sku_id()).or_default().push(position);
    }

    by_sku
        .into_iter()
        .map(|(sku_id, sku_positions)| rollup_sku(sku_id, &sku_positions))
        .collect()
}

fn rollup_sku(sku_id: &str, positions: &[&SkuPosition]) -> SkuNetworkRollup {
    let total_units: i64 = positions.iter().map(|p| p.stock.on_hand_qty).sum();
    let store_coverage = positions
        .iter()
        .filter(|p| p.stock.on_hand_qty > 0)
        .count() as u32;
    let min_store_stock = positions
        .iter()
        .map(|p| p.stock.on_hand_qty)
        .min()
        .unwrap_or(0);
    let max_store_stock = positions
        .iter()
        .map(|p| p.stock.on_hand_qty)
        .max()
        .unwrap_or(0);

    let mean_units_per_day = positions
        .iter()
        .map(|p| p.velocity.units_per_day)
        .sum::<f64>()
        / positions.len().max(1) as f64;

    let weeks_of_supply = if mean_units_per_day > 0.0 {
        Some(total_units as f64 / (mean_units_per_day * DAYS_PER_WEEK))
    } else {
        None
    };

    // Category comes from the snapshot; the first labelled store wins.
    let category = positions
        .iter()
        .find_map(|p| p.stock.category.clone())
        .unwrap_or_else(|| positions[0].stock.category_label().to_string());

    SkuNetworkRollup {
        sku_id: sku_id.to_string(),
        category,
        total_units,
        store_coverage,
        min_store_stock,
        max_store_stock,
        mean_units_per_day,
        weeks_of_supply,
        stock_health: grade_health(weeks_of_supply),
        distribution: grade_distribution(min_store_stock, max_store_stock),
    }
}

fn grade_health(weeks_of_supply: Option<f64>) -> StockHealth {
    match weeks_of_supply {
        Some(weeks) if weeks > EXCESS_WEEKS => StockHealth::Excess,
        Some(weeks) if weeks < SHORT_WEEKS => StockHealth::Short,
        // Nothing selling anywhere: stock is not "short", it is idle.
        None => StockHealth::Excess,
        _ => StockHealth::Balanced,
    }
}

fn grade_distribution(min_stock: i64, max_stock: i64) -> DistributionStatus {
    if min_stock == 0 {
        DistributionStatus::StockoutPresent
    } else if max_stock as f64 > SKEW_RATIO * min_stock as f64 {
        DistributionStatus::Uneven
    } else {
        DistributionStatus::Balanced
    }
}
