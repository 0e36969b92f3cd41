// ==========================================
// Retail Replenishment APS - Source Entities
// ==========================================
// The two source tables of the analytical store. Both are immutable
// snapshots/history; the engine never writes them back.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// StockRecord - point-in-time on-hand snapshot
// ==========================================
// One row per store-SKU per observation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub store_id: String,

    pub sku_id: String,

    /// Merchandise category, used only for demand-trend grouping.
    pub category: Option<String>,

    /// Units on hand; never negative.
    pub on_hand_qty: i64,

    /// Observation time of this snapshot.
    pub as_of: DateTime<Utc>,
}

impl StockRecord {
    pub fn is_out_of_stock(&self) -> bool {
        self.on_hand_qty == 0
    }

    /// Category label with the fallback used by trend grouping.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("UNCATEGORIZED")
    }
}

// ==========================================
// SaleEvent - append-only sales history
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub store_id: String,

    pub sku_id: String,

    /// Units sold in this event; always positive.
    pub quantity: i64,

    pub sold_at: DateTime<Utc>,
}

impl SaleEvent {
    /// True when the event belongs to the given store-SKU scope.
    pub fn matches_scope(&self, store_id: &str, sku_id: &str) -> bool {
        self.store_id == store_id && self.sku_id == sku_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_out_of_stock_flag() {
        let record = StockRecord {
            store_id: "S01".to_string(),
            sku_id: "SKU-1".to_string(),
            category: None,
            on_hand_qty: 0,
            as_of: Utc.with_ymd_and_hms(2025, 7, 12, 0, 0, 0).unwrap(),
        };
        assert!(record.is_out_of_stock());
        assert_eq!(record.category_label(), "UNCATEGORIZED");
    }

    #[test]
    fn test_sale_event_scope_match() {
        let event = SaleEvent {
            store_id: "S01".to_string(),
            sku_id: "SKU-1".to_string(),
            quantity: 3,
            sold_at: Utc.with_ymd_and_hms(2025, 7, 10, 12, 0, 0).unwrap(),
        };
        assert!(event.matches_scope("S01", "SKU-1"));
        assert!(!event.matches_scope("S02", "SKU-1"));
    }
}
