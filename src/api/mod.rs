// ==========================================
// Retail Replenishment APS - API Layer
// ==========================================
// Responsibility: request parsing, operation orchestration and the
// uniform report envelope.
// ==========================================

pub mod replenishment_api;
pub mod request;
pub mod response;

pub use replenishment_api::ReplenishmentApi;
pub use request::AnalysisRequest;
pub use response::{ReportEnvelope, STATUS_SUCCESS};
