// ==========================================
// Retail Replenishment APS - SQLite Analytical Store
// ==========================================
// Local columnar-store stand-in backed by SQLite. Read-only from the
// engine's point of view; schema creation lives in db.rs.
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::{SaleEvent, StockRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::inventory_store::{InventoryStore, ScopeFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ToSql};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteInventoryStore
// ==========================================
pub struct SqliteInventoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteInventoryStore {
    /// Open a store at the given database path.
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Wrap an existing connection. Re-applies the unified PRAGMAs so
    /// behavior matches connections opened through `new` (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)
                .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn on_hand_snapshot(&self, scope: &ScopeFilter) -> RepositoryResult<Vec<StockRecord>> {
        let conn = self.lock()?;

        let mut sql = String::from(
            "SELECT store_id, sku_id, category, on_hand_qty, as_of
             FROM stock_records s
             WHERE as_of = (SELECT MAX(as_of) FROM stock_records i
                            WHERE i.store_id = s.store_id AND i.sku_id = s.sku_id)",
        );
        let mut params: Vec<&dyn ToSql> = Vec::new();
        if let Some(store_id) = &scope.store_id {
            sql.push_str(" AND s.store_id = ?");
            params.push(store_id);
        }
        if let Some(sku_id) = &scope.sku_id {
            sql.push_str(" AND s.sku_id = ?");
            params.push(sku_id);
        }
        sql.push_str(" ORDER BY s.store_id, s.sku_id");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params.as_slice(), |row| {
            Ok(StockRecord {
                store_id: row.get(0)?,
                sku_id: row.get(1)?,
                category: row.get(2)?,
                on_hand_qty: row.get(3)?,
                as_of: row.get(4)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    async fn sales_events(
        &self,
        scope: &ScopeFilter,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<SaleEvent>> {
        let conn = self.lock()?;

        let mut sql = String::from(
            "SELECT store_id, sku_id, quantity, sold_at
             FROM sale_events
             WHERE sold_at >= ? AND sold_at <= ?",
        );
        let mut params: Vec<&dyn ToSql> = vec![&from, &to];
        if let Some(store_id) = &scope.store_id {
            sql.push_str(" AND store_id = ?");
            params.push(store_id);
        }
        if let Some(sku_id) = &scope.sku_id {
            sql.push_str(" AND sku_id = ?");
            params.push(sku_id);
        }
        sql.push_str(" ORDER BY store_id, sku_id, sold_at");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params.as_slice(), |row| {
            Ok(SaleEvent {
                store_id: row.get(0)?,
                sku_id: row.get(1)?,
                quantity: row.get(2)?,
                sold_at: row.get(3)?,
            })
        })?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }
}
