// ==========================================
// Retail Replenishment APS - Domain Model Layer
// ==========================================
// Responsibility: entities and types only.
// Red line: no data access logic, no engine logic.
// ==========================================

pub mod forecast;
pub mod inventory;
pub mod types;

// Re-export core types
pub use forecast::{
    ReplenishmentRecommendation, SkuPosition, StockoutForecast, TransferRecommendation,
    VelocityEstimate,
};
pub use inventory::{SaleEvent, StockRecord};
pub use types::{
    DistributionStatus, OptimizationAction, OrderTiming, Runway, StockHealth, StockLevelGrade,
    StoreStatus, TrendDirection, UrgencyTier, MAX_PROJECTION_DAYS,
};
