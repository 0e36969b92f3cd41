// ==========================================
// Retail Replenishment APS - Inventory Optimization View
// ==========================================
// Responsibility: compare each store-SKU against its optimal stock
// level and surface the positions worth acting on: dead stock,
// excess piles and deep shortfalls. Positions already near optimal
// are filtered out, so this view is an exception list, not a census.
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::{OptimizationAction, SkuPosition, StockLevelGrade};
use serde::{Deserialize, Serialize};
use tracing::instrument;

const DAYS_PER_MONTH: f64 = 30.0;

/// Gaps at or below this many units are not worth a row.
const MIN_GAP_UNITS: i64 = 10;

/// Zero-velocity stock above this is graded dead.
const DEAD_STOCK_UNITS: i64 = 50;

/// Zero-velocity stock above this still earns a row (idle, not yet
/// dead).
const IDLE_STOCK_UNITS: i64 = 20;

/// Fewer monthly turns than this marks a slow mover.
const SLOW_TURNOVER: f64 = 1.0;

// ==========================================
// StockOptimization - one exception row per store-SKU
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOptimization {
    pub store_id: String,

    pub sku_id: String,

    pub on_hand_qty: i64,

    /// Optimal level: (target cover + lead time) days of supply at the
    /// current velocity.
    pub recommended_stock: i64,

    /// on_hand - recommended; negative means shortfall.
    pub stock_difference: i64,

    /// Stock turns per month at the current velocity; 0 when the
    /// shelf is empty.
    pub monthly_turnover: f64,

    pub grade: StockLevelGrade,

    pub action: OptimizationAction,
}

/// Exception list of store-SKUs away from their optimal level, worst
/// first: dead stock, then critical shortfalls, then by gap size.
#[instrument(skip(positions, config), fields(count = positions.len()))]
pub fn stock_optimizations(
    positions: &[SkuPosition],
    config: &PlanningConfig,
) -> Vec<StockOptimization> {
    let cover_days = (config.target_cover_days + config.lead_time_days) as f64;

    let mut rows: Vec<StockOptimization> = positions
        .iter()
        .filter_map(|position| assess(position, cover_days))
        .collect();

    rows.sort_by(|a, b| {
        sort_rank(a)
            .cmp(&sort_rank(b))
            .then_with(|| b.stock_difference.abs().cmp(&a.stock_difference.abs()))
            .then_with(|| a.store_id.cmp(&b.store_id))
            .then_with(|| a.sku_id.cmp(&b.sku_id))
    });
    rows
}

fn assess(position: &SkuPosition, cover_days: f64) -> Option<StockOptimization> {
    let on_hand = position.stock.on_hand_qty;
    let units_per_day = position.velocity.units_per_day;

    let optimal = units_per_day * cover_days;
    let recommended_stock = optimal.ceil() as i64;
    let stock_difference = on_hand - recommended_stock;

    let idle = units_per_day == 0.0 && on_hand > IDLE_STOCK_UNITS;
    if stock_difference.abs() <= MIN_GAP_UNITS && !idle {
        return None;
    }

    let monthly_turnover = if on_hand > 0 {
        units_per_day * DAYS_PER_MONTH / on_hand as f64
    } else {
        0.0
    };

    let grade = grade_level(on_hand, units_per_day, optimal);
    let action = pick_action(grade, monthly_turnover, units_per_day);

    Some(StockOptimization {
        store_id: position.store_id().to_string(),
        sku_id: position.sku_id().to_string(),
        on_hand_qty: on_hand,
        recommended_stock,
        stock_difference,
        monthly_turnover,
        grade,
        action,
    })
}

/// Grading ladder against the raw optimal level, dead stock first.
fn grade_level(on_hand: i64, units_per_day: f64, optimal: f64) -> StockLevelGrade {
    let stock = on_hand as f64;
    if units_per_day == 0.0 && on_hand > DEAD_STOCK_UNITS {
        StockLevelGrade::DeadStock
    } else if stock > optimal * 2.0 {
        StockLevelGrade::Excess
    } else if stock > optimal * 1.5 {
        StockLevelGrade::High
    } else if stock < optimal * 0.3 {
        StockLevelGrade::CriticalLow
    } else if stock < optimal * 0.5 {
        StockLevelGrade::Low
    } else if stock >= optimal * 0.8 && stock <= optimal * 1.2 {
        StockLevelGrade::Optimal
    } else {
        StockLevelGrade::Watch
    }
}

fn pick_action(
    grade: StockLevelGrade,
    monthly_turnover: f64,
    units_per_day: f64,
) -> OptimizationAction {
    match grade {
        StockLevelGrade::DeadStock => OptimizationAction::LiquidateOrTransfer,
        StockLevelGrade::Excess => OptimizationAction::ConsiderTransfer,
        StockLevelGrade::CriticalLow => OptimizationAction::OrderUrgently,
        StockLevelGrade::Low => OptimizationAction::PlaceOrder,
        _ if units_per_day > 0.0 && monthly_turnover < SLOW_TURNOVER => {
            OptimizationAction::RunPromotion
        }
        _ => OptimizationAction::Monitor,
    }
}

fn sort_rank(row: &StockOptimization) -> u8 {
    match row.grade {
        StockLevelGrade::DeadStock => 0,
        StockLevelGrade::CriticalLow => 1,
        _ => 2,
    }
}
