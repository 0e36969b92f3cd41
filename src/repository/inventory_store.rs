// ==========================================
// Retail Replenishment APS - Analytical Store Interface
// ==========================================
// Responsibility: the two read-only query shapes the engine consumes.
// The engine is agnostic to the storage engine behind them and never
// writes through this interface.
// ==========================================

use crate::domain::{SaleEvent, StockRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// ==========================================
// ScopeFilter
// ==========================================
/// Optional store/SKU narrowing applied to both query shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeFilter {
    pub store_id: Option<String>,
    pub sku_id: Option<String>,
}

impl ScopeFilter {
    pub fn is_constrained(&self) -> bool {
        self.store_id.is_some() || self.sku_id.is_some()
    }

    pub fn matches(&self, store_id: &str, sku_id: &str) -> bool {
        self.store_id.as_deref().map_or(true, |s| s == store_id)
            && self.sku_id.as_deref().map_or(true, |s| s == sku_id)
    }

    /// Human-readable form for error context and log lines.
    pub fn describe(&self) -> String {
        format!(
            "store_id={}, sku_id={}",
            self.store_id.as_deref().unwrap_or("*"),
            self.sku_id.as_deref().unwrap_or("*")
        )
    }
}

// ==========================================
// InventoryStore
// ==========================================
/// Read-only access to the analytical data store.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Current on-hand snapshot by store/SKU (latest observation per
    /// store-SKU pair), optionally narrowed by scope.
    async fn on_hand_snapshot(&self, scope: &ScopeFilter) -> RepositoryResult<Vec<StockRecord>>;

    /// Sale events for a scope within [from, to], ordered by
    /// (store_id, sku_id, sold_at) for deterministic downstream runs.
    async fn sales_events(
        &self,
        scope: &ScopeFilter,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SaleEvent>>;
}
