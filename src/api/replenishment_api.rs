// ==========================================
// Retail Replenishment APS - Operation Facade
// ==========================================
// Responsibility: orchestrate repository reads and engine runs into
// the report operations callers invoke. One facade method per
// operation, all sharing a single load path.
// Recovery policy: a constrained scope with no inventory history
// produces an empty envelope with a note, never a hard failure.
// ==========================================

use crate::api::request::AnalysisRequest;
use crate::api::response::ReportEnvelope;
use crate::domain::{
    ReplenishmentRecommendation, SkuPosition, TransferRecommendation, UrgencyTier,
    VelocityEstimate,
};
use crate::engine::{ReplenishmentPlanner, StockoutEngine, TransferRecommender, VelocityEngine};
use crate::error::{EngineError, EngineResult};
use crate::report::{
    category_trends, critical_alerts, sku_network_rollups, stock_optimizations,
    store_alert_summaries, store_tier_summaries, CategoryTrend, SkuNetworkRollup,
    StockOptimization, StoreAlertSummary, StoreTierSummary,
};
use crate::repository::{fetch_with_retry, InventoryStore};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use tracing::{info, instrument};

/// Everything a single planning run reads and derives, loaded once
/// and shared by whichever report the caller asked for.
struct PlanningRun {
    now: DateTime<Utc>,
    stocks: Vec<crate::domain::StockRecord>,
    events: Vec<crate::domain::SaleEvent>,
    positions: Vec<SkuPosition>,
}

// ==========================================
// ReplenishmentApi
// ==========================================
pub struct ReplenishmentApi<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> ReplenishmentApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Per-scope sell-through rates.
    #[instrument(skip(self, request))]
    pub async fn sales_velocity(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<VelocityEstimate>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };
        let velocities = run.positions.into_iter().map(|p| p.velocity).collect();
        Ok(ReportEnvelope::success(velocities, run.now))
    }

    /// Scopes projected to stock out within the forecast horizon,
    /// soonest first.
    #[instrument(skip(self, request))]
    pub async fn stockout_prediction(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<SkuPosition>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };

        let horizon = request.config.forecast_days as f64;
        let mut at_risk: Vec<SkuPosition> = run
            .positions
            .into_iter()
            .filter(|p| p.forecast.runway.days().is_some_and(|d| d <= horizon))
            .collect();
        at_risk.sort_by(|a, b| {
            a.forecast
                .runway
                .compare(&b.forecast.runway)
                .then_with(|| a.stock.store_id.cmp(&b.stock.store_id))
                .then_with(|| a.stock.sku_id.cmp(&b.stock.sku_id))
        });

        Ok(ReportEnvelope::success(at_risk, run.now))
    }

    /// Ranked order recommendations. NORMAL rows are dropped unless
    /// the request opts in.
    #[instrument(skip(self, request))]
    pub async fn replenishment_schedule(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<ReplenishmentRecommendation>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };

        let mut schedule =
            ReplenishmentPlanner::new().plan(&run.positions, &request.config, run.now)?;
        if !request.config.include_normal {
            schedule.retain(|r| r.tier != UrgencyTier::Normal);
        }
        info!(rows = schedule.len(), "replenishment schedule computed");
        Ok(ReportEnvelope::success(schedule, run.now))
    }

    /// CRITICAL rows of the schedule, as a standalone alert feed.
    #[instrument(skip(self, request))]
    pub async fn critical_stock_alerts(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<ReplenishmentRecommendation>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };

        let schedule =
            ReplenishmentPlanner::new().plan(&run.positions, &request.config, run.now)?;
        Ok(ReportEnvelope::success(critical_alerts(&schedule), run.now))
    }

    /// Per-store alert dashboard.
    #[instrument(skip(self, request))]
    pub async fn store_health_overview(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<StoreAlertSummary>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };
        let summaries = store_alert_summaries(&run.positions, &request.config);
        Ok(ReportEnvelope::success(summaries, run.now))
    }

    /// Inter-store transfer proposals.
    #[instrument(skip(self, request))]
    pub async fn transfer_recommendations(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<TransferRecommendation>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };
        let transfers =
            TransferRecommender::new().recommend(&run.positions, &request.config)?;
        Ok(ReportEnvelope::success(transfers, run.now))
    }

    /// Per-store tier totals for warehouse pick planning.
    #[instrument(skip(self, request))]
    pub async fn warehouse_summary(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<StoreTierSummary>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };

        let schedule =
            ReplenishmentPlanner::new().plan(&run.positions, &request.config, run.now)?;
        Ok(ReportEnvelope::success(
            store_tier_summaries(&schedule),
            run.now,
        ))
    }

    /// Network-wide per-SKU stock rollup.
    #[instrument(skip(self, request))]
    pub async fn network_inventory(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<SkuNetworkRollup>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };
        let rollups = sku_network_rollups(&run.positions);
        Ok(ReportEnvelope::success(rollups, run.now))
    }

    /// Exception list of scopes far from their optimal stock level:
    /// dead stock, excess piles and deep shortfalls.
    #[instrument(skip(self, request))]
    pub async fn inventory_optimization(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<StockOptimization>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };
        let rows = stock_optimizations(&run.positions, &request.config);
        info!(rows = rows.len(), "optimization exceptions computed");
        Ok(ReportEnvelope::success(rows, run.now))
    }

    /// Category demand trends over the lookback window.
    #[instrument(skip(self, request))]
    pub async fn demand_trends(
        &self,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<CategoryTrend>> {
        let run = match self.load(request).await {
            Ok(run) => run,
            Err(err) => return Self::recover(err, request),
        };
        let trends = category_trends(
            &run.stocks,
            &run.events,
            request.config.lookback_days,
            run.now,
        );
        Ok(ReportEnvelope::success(trends, run.now))
    }

    // ==========================================
    // Shared load path
    // ==========================================
    /// Validate, read snapshot + sales concurrently under the guard,
    /// then run velocity and stockout estimation.
    async fn load(&self, request: &AnalysisRequest) -> EngineResult<PlanningRun> {
        request.config.validate()?;

        let now = request.effective_now();
        let timeout = Duration::from_millis(request.config.read_timeout_ms);
        let window_start = now - ChronoDuration::days(request.config.lookback_days as i64);
        let scope = &request.scope;

        let (stocks, events) = tokio::try_join!(
            fetch_with_retry("on_hand_snapshot", timeout, || {
                self.store.on_hand_snapshot(scope)
            }),
            fetch_with_retry("sales_events", timeout, || {
                self.store.sales_events(scope, window_start, now)
            }),
        )?;

        if stocks.is_empty() && scope.is_constrained() {
            return Err(EngineError::InsufficientData {
                store_id: scope.store_id.clone().unwrap_or_else(|| "*".to_string()),
                sku_id: scope.sku_id.clone().unwrap_or_else(|| "*".to_string()),
            });
        }

        let velocities =
            VelocityEngine::new().estimate_batch(&stocks, &events, request.config.lookback_days, now);
        let pairs = stocks.iter().cloned().zip(velocities).collect();
        let positions = StockoutEngine::new().forecast_batch(pairs)?;

        Ok(PlanningRun {
            now,
            stocks,
            events,
            positions,
        })
    }

    /// InsufficientData becomes an empty success envelope; every other
    /// error surfaces unmodified.
    fn recover<T>(
        err: EngineError,
        request: &AnalysisRequest,
    ) -> EngineResult<ReportEnvelope<T>> {
        match err {
            EngineError::InsufficientData { .. } => {
                info!(scope = %request.scope.describe(), "scope has no inventory history");
                Ok(ReportEnvelope::empty_with_note(
                    err.to_string(),
                    request.effective_now(),
                ))
            }
            other => Err(other),
        }
    }
}
