// ==========================================
// Retail Replenishment APS - Engine Error Taxonomy
// ==========================================
// Tooling: thiserror derive macro
// Propagation policy:
// - InvalidConfiguration fails fast at component entry
// - InsufficientData is recovered into a "non-forecastable" marker
//   at the API boundary, never a hard failure
// - ScopeMismatch is a programming invariant violation, fatal to
//   the current request
// - DataUnavailable is the only retryable failure; the read guard
//   performs exactly one bounded retry before producing it
// ==========================================

use thiserror::Error;

/// Engine-level error taxonomy.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no inventory history for scope: store_id={store_id}, sku_id={sku_id}")]
    InsufficientData { store_id: String, sku_id: String },

    #[error("scope mismatch in {stage}: expected {expected}, got {actual}")]
    ScopeMismatch {
        stage: &'static str,
        expected: String,
        actual: String,
    },

    #[error("analytical store unavailable: {source_desc}")]
    DataUnavailable { source_desc: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl EngineError {
    /// Retryable failures may be re-issued by the caller; everything
    /// else must surface unmodified.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::DataUnavailable { .. })
    }
}

impl From<crate::repository::RepositoryError> for EngineError {
    fn from(err: crate::repository::RepositoryError) -> Self {
        EngineError::DataUnavailable {
            source_desc: err.to_string(),
        }
    }
}

/// Result type alias for the engine layer.
pub type EngineResult<T> = Result<T, EngineError>;
