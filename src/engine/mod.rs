// ==========================================
// Retail Replenishment APS - Engine Layer
// ==========================================
// Responsibility: pure planning computations over domain entities.
// Red line: no I/O in this layer; repositories feed it, the API
// layer orchestrates it.
// ==========================================

pub mod replenishment;
pub mod stockout;
pub mod transfer;
pub mod velocity;

pub use replenishment::ReplenishmentPlanner;
pub use stockout::StockoutEngine;
pub use transfer::TransferRecommender;
pub use velocity::VelocityEngine;
