// ==========================================
// Retail Replenishment APS - Stockout Prediction Engine
// ==========================================
// Responsibility: project days until on-hand stock is exhausted
// Input: StockRecord + VelocityEstimate for the same store-SKU
// Output: StockoutForecast
// Red line: zero velocity => Runway::Unbounded. Never divide by
// zero, never emit an IEEE infinity.
// ==========================================

use crate::domain::{
    Runway, SkuPosition, StockRecord, StockoutForecast, VelocityEstimate, MAX_PROJECTION_DAYS,
};
use crate::error::{EngineError, EngineResult};
use chrono::{Days, NaiveDate};
use tracing::instrument;

// ==========================================
// StockoutEngine
// ==========================================
pub struct StockoutEngine;

impl StockoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Forecast a batch of snapshot/velocity pairs into joined
    /// planning positions. Pairs are matched by index and must agree
    /// on scope.
    #[instrument(skip(self, pairs), fields(count = pairs.len()))]
    pub fn forecast_batch(
        &self,
        pairs: Vec<(StockRecord, VelocityEstimate)>,
    ) -> EngineResult<Vec<SkuPosition>> {
        pairs
            .into_iter()
            .map(|(stock, velocity)| {
                let forecast = self.forecast(&stock, &velocity)?;
                Ok(SkuPosition {
                    stock,
                    velocity,
                    forecast,
                })
            })
            .collect()
    }

    /// Forecast a single store-SKU.
    ///
    /// The pair must share store_id and sku_id; a mismatch is a
    /// contract violation, not recoverable data noise.
    pub fn forecast(
        &self,
        stock: &StockRecord,
        velocity: &VelocityEstimate,
    ) -> EngineResult<StockoutForecast> {
        if stock.store_id != velocity.store_id || stock.sku_id != velocity.sku_id {
            return Err(EngineError::ScopeMismatch {
                stage: "stockout_predictor",
                expected: format!("{}/{}", stock.store_id, stock.sku_id),
                actual: format!("{}/{}", velocity.store_id, velocity.sku_id),
            });
        }

        let (runway, projected_stockout_date) = if velocity.units_per_day > 0.0 {
            let days = stock.on_hand_qty as f64 / velocity.units_per_day;
            let date = Self::project_date(stock.as_of.date_naive(), days);
            (Runway::Bounded(days), date)
        } else {
            (Runway::Unbounded, None)
        };

        let pessimistic_days = if velocity.peak_units_per_day > 0.0 {
            Some(stock.on_hand_qty as f64 / velocity.peak_units_per_day)
        } else {
            None
        };
        let optimistic_days = if velocity.trough_units_per_day > 0.0 {
            Some(stock.on_hand_qty as f64 / velocity.trough_units_per_day)
        } else {
            None
        };

        Ok(StockoutForecast {
            store_id: stock.store_id.clone(),
            sku_id: stock.sku_id.clone(),
            runway,
            projected_stockout_date,
            pessimistic_days,
            optimistic_days,
        })
    }

    /// Convert a runway into a calendar date. Runways past the
    /// projection bound (or otherwise non-representable) yield None
    /// instead of overflowing date arithmetic.
    fn project_date(from: NaiveDate, days: f64) -> Option<NaiveDate> {
        if !days.is_finite() || days < 0.0 || days > MAX_PROJECTION_DAYS {
            return None;
        }
        from.checked_add_days(Days::new(days.floor() as u64))
    }
}

impl Default for StockoutEngine {
    fn default() -> Self {
        Self::new()
    }
}
