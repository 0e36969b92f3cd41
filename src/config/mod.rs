// ==========================================
// Retail Replenishment APS - Configuration Layer
// ==========================================

pub mod planning_config;

pub use planning_config::{
    PlanningConfig, DEFAULT_CRITICAL_DAYS, DEFAULT_FORECAST_DAYS, DEFAULT_LEAD_TIME_DAYS,
    DEFAULT_LOOKBACK_DAYS, DEFAULT_READ_TIMEOUT_MS,
};
