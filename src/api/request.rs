// ==========================================
// Retail Replenishment APS - Analysis Request
// ==========================================
// Responsibility: turn a caller-supplied JSON options object into a
// validated AnalysisRequest. Unknown keys are ignored; present keys
// with the wrong JSON type are rejected, never coerced.
// ==========================================

use crate::config::PlanningConfig;
use crate::error::{EngineError, EngineResult};
use crate::repository::ScopeFilter;
use chrono::{DateTime, Utc};
use serde_json::Value;

// ==========================================
// AnalysisRequest
// ==========================================
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub config: PlanningConfig,

    pub scope: ScopeFilter,

    /// Pinned reference time. When set, two identical requests produce
    /// identical reports regardless of when they run.
    pub as_of: Option<DateTime<Utc>>,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            config: PlanningConfig::default(),
            scope: ScopeFilter::default(),
            as_of: None,
        }
    }
}

impl AnalysisRequest {
    /// Build a request from a JSON options object.
    ///
    /// When `critical_days` is overridden without `target_cover_days`,
    /// the target follows at twice the critical threshold.
    pub fn from_options(options: &Value) -> EngineResult<Self> {
        if !options.is_object() {
            return Err(EngineError::InvalidConfiguration(
                "options must be a JSON object".to_string(),
            ));
        }

        let mut config = PlanningConfig::default();

        let critical_override = get_i32(options, "critical_days")?;
        let target_override = get_i32(options, "target_cover_days")?;

        if let Some(critical) = critical_override {
            config.critical_days = critical;
            config.target_cover_days = 2 * critical;
        }
        if let Some(target) = target_override {
            config.target_cover_days = target;
        }
        if let Some(lookback) = get_i32(options, "lookback_days")? {
            config.lookback_days = lookback;
        }
        if let Some(forecast) = get_i32(options, "forecast_days")? {
            config.forecast_days = forecast;
        }
        if let Some(lead_time) = get_i32(options, "lead_time_days")? {
            config.lead_time_days = lead_time;
        }
        if let Some(min_qty) = get_i64(options, "min_order_qty")? {
            config.min_order_qty = min_qty;
        }
        if let Some(multiple) = get_i64(options, "order_multiple")? {
            config.order_multiple = multiple;
        }
        if let Some(include_normal) = get_bool(options, "include_normal")? {
            config.include_normal = include_normal;
        }
        if let Some(timeout_ms) = get_u64(options, "read_timeout_ms")? {
            config.read_timeout_ms = timeout_ms;
        }
        config.validate()?;

        let scope = ScopeFilter {
            store_id: get_string(options, "store_id")?,
            sku_id: get_string(options, "sku_id")?,
        };

        let as_of = match get_string(options, "as_of")? {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        EngineError::InvalidConfiguration(format!(
                            "as_of must be an RFC 3339 timestamp: {e}"
                        ))
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            config,
            scope,
            as_of,
        })
    }

    /// The reference time for this run: pinned as_of when present,
    /// wall clock otherwise.
    pub fn effective_now(&self) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now)
    }
}

fn get_i32(options: &Value, key: &str) -> EngineResult<Option<i32>> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| bad_type(key, "an integer", value)),
    }
}

fn get_i64(options: &Value, key: &str) -> EngineResult<Option<i64>> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| bad_type(key, "an integer", value)),
    }
}

fn get_u64(options: &Value, key: &str) -> EngineResult<Option<u64>> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| bad_type(key, "a non-negative integer", value)),
    }
}

fn get_bool(options: &Value, key: &str) -> EngineResult<Option<bool>> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| bad_type(key, "a boolean", value)),
    }
}

fn get_string(options: &Value, key: &str) -> EngineResult<Option<String>> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| bad_type(key, "a string", value)),
    }
}

fn bad_type(key: &str, expected: &str, got: &Value) -> EngineError {
    EngineError::InvalidConfiguration(format!("{key} must be {expected}, got {got}"))
}
