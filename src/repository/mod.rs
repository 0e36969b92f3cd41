// ==========================================
// Retail Replenishment APS - Repository Layer
// ==========================================
// Responsibility: read-only access to the analytical store.
// Red line: no business rules here; engines never see SQL.
// ==========================================

pub mod error;
pub mod guard;
pub mod inventory_store;
pub mod sqlite_store;

pub use error::{RepositoryError, RepositoryResult};
pub use guard::{fetch_with_retry, RETRY_BACKOFF_MS};
pub use inventory_store::{InventoryStore, ScopeFilter};
pub use sqlite_store::SqliteInventoryStore;
