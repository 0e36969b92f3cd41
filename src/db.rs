// ==========================================
// Retail Replenishment APS - SQLite Connection Setup
// ==========================================
// Goals:
// - one place applying PRAGMAs so every Connection behaves the same
// - unified busy_timeout to reduce spurious busy errors under
//   concurrent readers
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMAs to a connection.
///
/// foreign_keys and busy_timeout are per-connection settings and must
/// be applied to every connection this crate opens.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the two source tables when they do not exist yet.
///
/// The engine only ever reads these tables; creation exists for the
/// CLI entry point and for test fixtures.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS stock_records (
            store_id    TEXT NOT NULL,
            sku_id      TEXT NOT NULL,
            category    TEXT,
            on_hand_qty INTEGER NOT NULL CHECK (on_hand_qty >= 0),
            as_of       TEXT NOT NULL,
            PRIMARY KEY (store_id, sku_id, as_of)
        );
        CREATE TABLE IF NOT EXISTS sale_events (
            store_id    TEXT NOT NULL,
            sku_id      TEXT NOT NULL,
            quantity    INTEGER NOT NULL CHECK (quantity > 0),
            sold_at     TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sale_events_scope_time
            ON sale_events (store_id, sku_id, sold_at);",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
                 AND name IN ('stock_records', 'sale_events')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }
}
