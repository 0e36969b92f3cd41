// ==========================================
// Retail Replenishment APS - Planning Configuration
// ==========================================
// Responsibility: the explicit parameter object passed into every
// component. No ambient/global configuration state anywhere in the
// engine; pure-function testability depends on it.
// ==========================================

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Default critical-day threshold (runway at or below => CRITICAL).
pub const DEFAULT_CRITICAL_DAYS: i32 = 5;

/// Default velocity lookback window in days.
pub const DEFAULT_LOOKBACK_DAYS: i32 = 30;

/// Default stockout-prediction horizon in days.
pub const DEFAULT_FORECAST_DAYS: i32 = 7;

/// Default supplier lead time in days.
pub const DEFAULT_LEAD_TIME_DAYS: i32 = 2;

/// Default analytical-store read timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5_000;

// ==========================================
// PlanningConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Runway at or below this many days is CRITICAL.
    pub critical_days: i32,

    /// Velocity lookback window in days.
    pub lookback_days: i32,

    /// Horizon for the stockout-prediction report.
    pub forecast_days: i32,

    /// Supplier lead time used to back-date order placement.
    pub lead_time_days: i32,

    /// Days of cover an order should restore. Must exceed critical_days;
    /// defaults to twice the critical threshold.
    pub target_cover_days: i32,

    /// Minimum order size a supplier accepts (0 = no minimum).
    pub min_order_qty: i64,

    /// Order quantities are rounded up to this multiple (1 = no rounding).
    pub order_multiple: i64,

    /// Presentation policy: include NORMAL-tier rows in the schedule.
    pub include_normal: bool,

    /// Timeout applied to each analytical-store read.
    pub read_timeout_ms: u64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            critical_days: DEFAULT_CRITICAL_DAYS,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            forecast_days: DEFAULT_FORECAST_DAYS,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            target_cover_days: 2 * DEFAULT_CRITICAL_DAYS,
            min_order_qty: 0,
            order_multiple: 1,
            include_normal: false,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl PlanningConfig {
    /// Upper bound of the WARNING tier: twice the critical threshold.
    pub fn warning_days(&self) -> i32 {
        2 * self.critical_days
    }

    /// Validation runs before any computation begins; a rejected
    /// configuration never reaches an engine.
    pub fn validate(&self) -> EngineResult<()> {
        if self.critical_days <= 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "critical_days must be positive, got {}",
                self.critical_days
            )));
        }
        if self.lookback_days <= 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "lookback_days must be positive, got {}",
                self.lookback_days
            )));
        }
        if self.forecast_days <= 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "forecast_days must be positive, got {}",
                self.forecast_days
            )));
        }
        if self.lead_time_days < 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "lead_time_days must not be negative, got {}",
                self.lead_time_days
            )));
        }
        if self.target_cover_days <= self.critical_days {
            return Err(EngineError::InvalidConfiguration(format!(
                "target_cover_days ({}) must exceed critical_days ({})",
                self.target_cover_days, self.critical_days
            )));
        }
        if self.min_order_qty < 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "min_order_qty must not be negative, got {}",
                self.min_order_qty
            )));
        }
        if self.order_multiple < 1 {
            return Err(EngineError::InvalidConfiguration(format!(
                "order_multiple must be at least 1, got {}",
                self.order_multiple
            )));
        }
        if self.read_timeout_ms == 0 {
            return Err(EngineError::InvalidConfiguration(
                "read_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlanningConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.critical_days, 5);
        assert_eq!(config.target_cover_days, 10);
        assert_eq!(config.warning_days(), 10);
    }

    #[test]
    fn test_negative_critical_days_rejected() {
        let config = PlanningConfig {
            critical_days: -1,
            ..PlanningConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_target_cover_must_exceed_critical() {
        let config = PlanningConfig {
            critical_days: 5,
            target_cover_days: 5,
            ..PlanningConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_order_multiple_rejected() {
        let config = PlanningConfig {
            order_multiple: 0,
            ..PlanningConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_read_timeout_rejected() {
        // 0 would make every repository read time out instantly
        let config = PlanningConfig {
            read_timeout_ms: 0,
            ..PlanningConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("read_timeout_ms"));
    }
}
