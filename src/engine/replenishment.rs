// ==========================================
// Retail Replenishment APS - Replenishment Planner
// ==========================================
// Responsibility: turn stockout forecasts into ranked order
// recommendations with quantities and timing
// Input: joined SkuPositions + PlanningConfig + explicit "now"
// Output: Vec<ReplenishmentRecommendation>, most urgent first
// Red line: tier assignment is a pure function of runway and
// critical_days; tiers never overlap.
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::{
    OrderTiming, ReplenishmentRecommendation, Runway, SkuPosition, UrgencyTier,
    MAX_PROJECTION_DAYS,
};
use crate::error::EngineResult;
use chrono::{DateTime, Days, NaiveDate, Utc};
use tracing::instrument;

// ==========================================
// ReplenishmentPlanner
// ==========================================
pub struct ReplenishmentPlanner;

impl ReplenishmentPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plan replenishment for every position.
    ///
    /// NORMAL rows are computed here as well; leaving them out of a
    /// report is a presentation choice made by the caller.
    #[instrument(skip(self, positions, config), fields(count = positions.len()))]
    pub fn plan(
        &self,
        positions: &[SkuPosition],
        config: &PlanningConfig,
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<ReplenishmentRecommendation>> {
        config.validate()?;

        let mut recommendations: Vec<ReplenishmentRecommendation> = positions
            .iter()
            .map(|position| self.recommend(position, config, now))
            .collect();

        // Most urgent first; ties broken by store then SKU for
        // deterministic output.
        recommendations.sort_by(|a, b| {
            a.runway
                .compare(&b.runway)
                .then_with(|| a.store_id.cmp(&b.store_id))
                .then_with(|| a.sku_id.cmp(&b.sku_id))
        });

        Ok(recommendations)
    }

    fn recommend(
        &self,
        position: &SkuPosition,
        config: &PlanningConfig,
        now: DateTime<Utc>,
    ) -> ReplenishmentRecommendation {
        let runway = position.forecast.runway;
        let tier = Self::classify_tier(&runway, config.critical_days);
        let qty = Self::order_quantity(position, config);
        let (order_date, timing) = Self::order_schedule(&runway, config, now);

        ReplenishmentRecommendation {
            store_id: position.store_id().to_string(),
            sku_id: position.sku_id().to_string(),
            tier,
            runway,
            recommended_order_qty: qty,
            recommended_order_date: order_date,
            order_timing: timing,
        }
    }

    /// Tier policy. Non-forecastable scopes (unbounded runway) are
    /// NORMAL: without velocity there is no urgency signal.
    pub fn classify_tier(runway: &Runway, critical_days: i32) -> UrgencyTier {
        match runway.days() {
            Some(days) if days <= critical_days as f64 => UrgencyTier::Critical,
            Some(days) if days <= 2.0 * critical_days as f64 => UrgencyTier::Warning,
            _ => UrgencyTier::Normal,
        }
    }

    /// Units needed to restore target_cover_days of supply, floored at
    /// zero, then shaped by supplier constraints: raised to the order
    /// minimum and rounded up to the order multiple.
    fn order_quantity(position: &SkuPosition, config: &PlanningConfig) -> i64 {
        let units_per_day = position.velocity.units_per_day;
        let Some(runway_days) = position.forecast.runway.days() else {
            // Unbounded runway: no velocity to convert days into units
            return 0;
        };

        let deficit_days = config.target_cover_days as f64 - runway_days;
        if deficit_days <= 0.0 {
            return 0;
        }

        let mut units = (deficit_days * units_per_day).ceil() as i64;
        if units <= 0 {
            return 0;
        }
        units = units.max(config.min_order_qty);
        let multiple = config.order_multiple;
        ((units + multiple - 1) / multiple) * multiple
    }

    /// Order date lands the delivery before the shelf empties:
    /// now + max(0, runway - lead_time).
    fn order_schedule(
        runway: &Runway,
        config: &PlanningConfig,
        now: DateTime<Utc>,
    ) -> (Option<NaiveDate>, OrderTiming) {
        match runway.days() {
            Some(days) => {
                let slack = (days - config.lead_time_days as f64).max(0.0);
                // Slack past the projection bound has no meaningful
                // calendar date; the timing bucket still applies.
                let date = if slack <= MAX_PROJECTION_DAYS {
                    now.date_naive().checked_add_days(Days::new(slack.floor() as u64))
                } else {
                    None
                };
                let timing = if days - (config.lead_time_days as f64) <= 0.0 {
                    OrderTiming::Immediate
                } else if slack <= 1.0 {
                    OrderTiming::Today
                } else if slack <= 3.0 {
                    OrderTiming::ThisWeek
                } else if slack <= 7.0 {
                    OrderTiming::NextWeek
                } else {
                    OrderTiming::Monitor
                };
                (date, timing)
            }
            None => (None, OrderTiming::Monitor),
        }
    }
}

impl Default for ReplenishmentPlanner {
    fn default() -> Self {
        Self::new()
    }
}
