// ==========================================
// Retail Replenishment APS - CLI Entry Point
// ==========================================
// Runs the full report suite against a SQLite analytical mirror and
// prints each report as pretty JSON. Intended for operators and for
// smoke-testing a freshly synced mirror.
// ==========================================

use anyhow::Context;
use retail_replen_aps::api::{AnalysisRequest, ReplenishmentApi};
use retail_replen_aps::repository::SqliteInventoryStore;
use retail_replen_aps::{db, logging};
use serde::Serialize;

const DEFAULT_DB_PATH: &str = "replenishment.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - decision support", retail_replen_aps::APP_NAME);
    tracing::info!("version: {}", retail_replen_aps::VERSION);
    tracing::info!("==================================================");

    // First positional argument: database path, optional second: a JSON
    // options object (scope, thresholds, as_of).
    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
    let request = match args.next() {
        Some(raw) => {
            let options: serde_json::Value =
                serde_json::from_str(&raw).context("options must be valid JSON")?;
            AnalysisRequest::from_options(&options).context("invalid options")?
        }
        None => AnalysisRequest::default(),
    };
    tracing::info!("using database: {}", db_path);

    let conn = db::open_sqlite_connection(&db_path)
        .with_context(|| format!("cannot open database at {db_path}"))?;
    db::init_schema(&conn).context("schema initialization failed")?;
    drop(conn);

    let store = SqliteInventoryStore::new(&db_path).context("cannot initialize store")?;
    let api = ReplenishmentApi::new(store);

    print_report(
        "sales_velocity",
        &api.sales_velocity(&request).await?,
    )?;
    print_report(
        "stockout_prediction",
        &api.stockout_prediction(&request).await?,
    )?;
    print_report(
        "replenishment_schedule",
        &api.replenishment_schedule(&request).await?,
    )?;
    print_report(
        "critical_stock_alerts",
        &api.critical_stock_alerts(&request).await?,
    )?;
    print_report(
        "store_health_overview",
        &api.store_health_overview(&request).await?,
    )?;
    print_report(
        "transfer_recommendations",
        &api.transfer_recommendations(&request).await?,
    )?;
    print_report(
        "warehouse_summary",
        &api.warehouse_summary(&request).await?,
    )?;
    print_report(
        "network_inventory",
        &api.network_inventory(&request).await?,
    )?;
    print_report(
        "inventory_optimization",
        &api.inventory_optimization(&request).await?,
    )?;
    print_report("demand_trends", &api.demand_trends(&request).await?)?;

    tracing::info!("all reports completed");
    Ok(())
}

fn print_report<T: Serialize>(name: &str, envelope: &T) -> anyhow::Result<()> {
    println!("=== {name} ===");
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}
