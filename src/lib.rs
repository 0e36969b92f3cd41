// ==========================================
// Retail Replenishment APS - Core Library
// ==========================================
// Stack: Rust + SQLite (analytical mirror) + tokio
// System role: decision support (store managers keep final say)
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - analytical store access
pub mod repository;

// Engine layer - planning computations
pub mod engine;

// Report layer - aggregation views
pub mod report;

// Configuration layer - planning parameters
pub mod config;

// Database infrastructure (connection init / unified PRAGMAs)
pub mod db;

// Logging
pub mod logging;

// API layer - operation facade
pub mod api;

// Error taxonomy
pub mod error;

// ==========================================
// Core type re-exports
// ==========================================

// Domain types
pub use domain::types::{
    DistributionStatus, OrderTiming, Runway, StockHealth, StoreStatus, TrendDirection,
    UrgencyTier,
};

// Domain entities
pub use domain::{
    ReplenishmentRecommendation, SaleEvent, SkuPosition, StockRecord, StockoutForecast,
    TransferRecommendation, VelocityEstimate,
};

// Engines
pub use engine::{ReplenishmentPlanner, StockoutEngine, TransferRecommender, VelocityEngine};

// Configuration
pub use config::PlanningConfig;

// Errors
pub use error::{EngineError, EngineResult};

// Repository
pub use repository::{InventoryStore, ScopeFilter, SqliteInventoryStore};

// API
pub use api::{AnalysisRequest, ReplenishmentApi, ReportEnvelope};

// ==========================================
// Constants
// ==========================================

// System version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Retail Replenishment APS";
