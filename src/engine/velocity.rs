// ==========================================
// Retail Replenishment APS - Sales Velocity Engine
// ==========================================
// Responsibility: rolling daily sell-through rate per store-SKU
// Input: sale events + lookback window + explicit "now"
// Output: VelocityEstimate
// Red line: zero sales in window => units_per_day = 0.0 exactly,
// never NaN, never an error. Division uses days actually covered,
// not the nominal window, so short histories are not diluted.
// ==========================================

use crate::domain::{SaleEvent, StockRecord, VelocityEstimate};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use tracing::instrument;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ==========================================
// VelocityEngine
// ==========================================
pub struct VelocityEngine;

impl VelocityEngine {
    pub fn new() -> Self {
        Self
    }

    /// Estimate velocity for every store-SKU present in the snapshot
    /// (one estimate per stock record, zero-sales scopes included).
    #[instrument(skip(self, stocks, events), fields(scopes = stocks.len(), events = events.len()))]
    pub fn estimate_batch(
        &self,
        stocks: &[StockRecord],
        events: &[SaleEvent],
        lookback_days: i32,
        now: DateTime<Utc>,
    ) -> Vec<VelocityEstimate> {
        stocks
            .iter()
            .map(|stock| self.estimate(events, &stock.store_id, &stock.sku_id, lookback_days, now))
            .collect()
    }

    /// Estimate velocity for a single store-SKU scope.
    ///
    /// Sums quantity over [now - lookback, now] and divides by the days
    /// the history actually covers: when the earliest in-window event is
    /// younger than the window, the covered span shrinks accordingly
    /// (minimum one day).
    pub fn estimate(
        &self,
        events: &[SaleEvent],
        store_id: &str,
        sku_id: &str,
        lookback_days: i32,
        now: DateTime<Utc>,
    ) -> VelocityEstimate {
        let window_start = now - Duration::days(lookback_days as i64);

        let in_window: Vec<&SaleEvent> = events
            .iter()
            .filter(|e| {
                e.matches_scope(store_id, sku_id) && e.sold_at >= window_start && e.sold_at <= now
            })
            .collect();

        if in_window.is_empty() {
            // Non-forecastable, not "infinite runway"
            return VelocityEstimate {
                store_id: store_id.to_string(),
                sku_id: sku_id.to_string(),
                units_per_day: 0.0,
                peak_units_per_day: 0.0,
                trough_units_per_day: 0.0,
                lookback_window_days: lookback_days,
                sample_count: 0,
            };
        }

        let total_sold: i64 = in_window.iter().map(|e| e.quantity).sum();

        let earliest = in_window
            .iter()
            .map(|e| e.sold_at)
            .min()
            .unwrap_or(window_start);
        let covered_days = Self::covered_days(earliest, now, lookback_days);

        // Per-calendar-day totals for the pessimistic/optimistic bands
        let mut daily_totals: HashMap<NaiveDate, i64> = HashMap::new();
        for event in &in_window {
            *daily_totals.entry(event.sold_at.date_naive()).or_insert(0) += event.quantity;
        }
        let peak = daily_totals.values().copied().max().unwrap_or(0) as f64;
        let trough = daily_totals.values().copied().min().unwrap_or(0) as f64;

        VelocityEstimate {
            store_id: store_id.to_string(),
            sku_id: sku_id.to_string(),
            units_per_day: total_sold as f64 / covered_days,
            peak_units_per_day: peak,
            trough_units_per_day: trough,
            lookback_window_days: lookback_days,
            sample_count: in_window.len() as u32,
        }
    }

    /// Days the history actually covers, clamped to [1, lookback].
    fn covered_days(earliest: DateTime<Utc>, now: DateTime<Utc>, lookback_days: i32) -> f64 {
        let span = (now - earliest).num_seconds() as f64 / SECONDS_PER_DAY;
        span.ceil().clamp(1.0, lookback_days as f64)
    }
}

impl Default for VelocityEngine {
    fn default() -> Self {
        Self::new()
    }
}
