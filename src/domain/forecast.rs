// ==========================================
// Retail Replenishment APS - Derived Entities
// ==========================================
// Everything in this file is recomputed fresh on each planning run
// from StockRecord + SaleEvent; nothing here is a source of truth.
// ==========================================

use crate::domain::inventory::StockRecord;
use crate::domain::types::{OrderTiming, Runway, UrgencyTier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// VelocityEstimate - rolling sell-through rate
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityEstimate {
    pub store_id: String,

    pub sku_id: String,

    /// Average units sold per day over the covered window. Always >= 0,
    /// exactly 0.0 when no sales fell inside the window.
    pub units_per_day: f64,

    /// Busiest single-day total inside the window (pessimistic band input).
    pub peak_units_per_day: f64,

    /// Quietest selling-day total inside the window (optimistic band input).
    /// Only days with sales count; 0.0 when there were none.
    pub trough_units_per_day: f64,

    /// Nominal lookback window requested by the caller.
    pub lookback_window_days: i32,

    /// Number of sale events that fed the estimate.
    pub sample_count: u32,
}

impl VelocityEstimate {
    /// A scope with zero observed sales cannot be forecast; callers must
    /// treat it as "non-forecastable", not as infinite runway.
    pub fn is_forecastable(&self) -> bool {
        self.units_per_day > 0.0
    }
}

// ==========================================
// StockoutForecast - projected runway
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutForecast {
    pub store_id: String,

    pub sku_id: String,

    /// Days until on-hand reaches zero at current velocity.
    pub runway: Runway,

    /// Calendar date the shelf is expected to empty; None when the
    /// runway is unbounded or too long to place on the calendar.
    pub projected_stockout_date: Option<NaiveDate>,

    /// Worst-case days assuming every day sells like the busiest one.
    pub pessimistic_days: Option<f64>,

    /// Best-case days assuming every day sells like the quietest one.
    pub optimistic_days: Option<f64>,
}

// ==========================================
// SkuPosition - joined per store-SKU planning row
// ==========================================
// The unit of work the planners consume: one snapshot, its velocity
// and its forecast, all for the same store-SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuPosition {
    pub stock: StockRecord,
    pub velocity: VelocityEstimate,
    pub forecast: StockoutForecast,
}

impl SkuPosition {
    pub fn store_id(&self) -> &str {
        &self.stock.store_id
    }

    pub fn sku_id(&self) -> &str {
        &self.stock.sku_id
    }
}

// ==========================================
// ReplenishmentRecommendation
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentRecommendation {
    pub store_id: String,

    pub sku_id: String,

    pub tier: UrgencyTier,

    pub runway: Runway,

    /// Units to order; 0 when cover already meets the target.
    pub recommended_order_qty: i64,

    /// Latest date the order should be placed so it lands before the
    /// shelf empties; None when the runway is unbounded or too long
    /// to place on the calendar.
    pub recommended_order_date: Option<NaiveDate>,

    pub order_timing: OrderTiming,
}

// ==========================================
// TransferRecommendation
// ==========================================
// Invariant: the transfer never drags the source below its own
// target cover (enforced by the recommender's surplus draw-down).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecommendation {
    pub source_store_id: String,

    pub destination_store_id: String,

    pub sku_id: String,

    /// Units to move; always positive (zero-quantity proposals are
    /// suppressed at the source).
    pub quantity: i64,

    /// Donor runway before the transfer, in days.
    pub source_runway_days: f64,

    /// Recipient runway before the transfer, in days.
    pub destination_runway_days: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_velocity_is_not_forecastable() {
        let estimate = VelocityEstimate {
            store_id: "S01".to_string(),
            sku_id: "SKU-1".to_string(),
            units_per_day: 0.0,
            peak_units_per_day: 0.0,
            trough_units_per_day: 0.0,
            lookback_window_days: 30,
            sample_count: 0,
        };
        assert!(!estimate.is_forecastable());
    }
}
