// ==========================================
// Retail Replenishment APS - Report Layer
// ==========================================
// Responsibility: aggregation views over engine output. Reports
// filter and group; they never re-derive runways or tiers.
// ==========================================

pub mod alerts;
pub mod optimization;
pub mod trends;
pub mod warehouse;

pub use alerts::{critical_alerts, store_alert_summaries, StoreAlertSummary};
pub use optimization::{stock_optimizations, StockOptimization};
pub use trends::{category_trends, CategoryTrend};
pub use warehouse::{
    sku_network_rollups, store_tier_summaries, SkuNetworkRollup, StoreTierSummary,
};
