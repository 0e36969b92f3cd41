// ==========================================
// Retail Replenishment APS - Domain Type Definitions
// ==========================================
// Urgency is tiered, not scored: a recommendation is CRITICAL,
// WARNING or NORMAL, never a number.
// Serialization format: SCREAMING_SNAKE_CASE (consistent with reports)
// ==========================================

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ==========================================
// Urgency Tier
// ==========================================
// Ordering: Critical < Warning < Normal (most urgent first when sorted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyTier {
    Critical, // runway at or below critical_days
    Warning,  // runway within 2x critical_days
    Normal,   // everything else, including non-forecastable
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyTier::Critical => write!(f, "CRITICAL"),
            UrgencyTier::Warning => write!(f, "WARNING"),
            UrgencyTier::Normal => write!(f, "NORMAL"),
        }
    }
}

/// Upper bound for converting a runway into a calendar date (one
/// hundred years). Longer runways stay Bounded but carry no date.
pub const MAX_PROJECTION_DAYS: f64 = 36_500.0;

// ==========================================
// Runway (days of supply until stockout)
// ==========================================
// Zero velocity yields Unbounded, never an IEEE infinity that
// downstream arithmetic could silently propagate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Runway {
    Bounded(f64),
    Unbounded,
}

impl Runway {
    /// Projected days until stockout, when forecastable.
    pub fn days(&self) -> Option<f64> {
        match self {
            Runway::Bounded(d) => Some(*d),
            Runway::Unbounded => None,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, Runway::Bounded(_))
    }

    /// Total order for sorting: bounded runways ascending, Unbounded last.
    pub fn compare(&self, other: &Runway) -> Ordering {
        match (self, other) {
            (Runway::Bounded(a), Runway::Bounded(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Runway::Bounded(_), Runway::Unbounded) => Ordering::Less,
            (Runway::Unbounded, Runway::Bounded(_)) => Ordering::Greater,
            (Runway::Unbounded, Runway::Unbounded) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Runway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runway::Bounded(d) => write!(f, "{:.1}d", d),
            Runway::Unbounded => write!(f, "UNBOUNDED"),
        }
    }
}

// ==========================================
// Order Timing
// ==========================================
// Bucketed from (runway - lead_time_days); drives the weekly
// ordering calendar in the replenishment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderTiming {
    Immediate, // order is already late relative to lead time
    Today,     // must be placed within a day
    ThisWeek,  // within 3 days
    NextWeek,  // within 7 days
    Monitor,   // no order pressure
}

impl fmt::Display for OrderTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderTiming::Immediate => write!(f, "IMMEDIATE"),
            OrderTiming::Today => write!(f, "TODAY"),
            OrderTiming::ThisWeek => write!(f, "THIS_WEEK"),
            OrderTiming::NextWeek => write!(f, "NEXT_WEEK"),
            OrderTiming::Monitor => write!(f, "MONITOR"),
        }
    }
}

// ==========================================
// Trend Direction
// ==========================================
// Classification of rate-of-change between two consecutive
// velocity windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Surging, // > +50%
    Rising,  // > +20%
    Stable,
    Easing,  // < -10%
    Falling, // < -30%
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Surging => write!(f, "SURGING"),
            TrendDirection::Rising => write!(f, "RISING"),
            TrendDirection::Stable => write!(f, "STABLE"),
            TrendDirection::Easing => write!(f, "EASING"),
            TrendDirection::Falling => write!(f, "FALLING"),
        }
    }
}

// ==========================================
// Store Status (alert dashboard grade)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreStatus {
    Critical,  // store needs immediate replenishment action
    HighRisk,  // several SKUs inside the critical window
    Attention, // warnings or stockouts accumulating
    Normal,
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreStatus::Critical => write!(f, "CRITICAL"),
            StoreStatus::HighRisk => write!(f, "HIGH_RISK"),
            StoreStatus::Attention => write!(f, "ATTENTION"),
            StoreStatus::Normal => write!(f, "NORMAL"),
        }
    }
}

// ==========================================
// Network Stock Health (per-SKU rollup grade)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockHealth {
    Excess, // more than 8 weeks of supply network-wide
    Balanced,
    Short, // under 2 weeks of supply network-wide
}

impl fmt::Display for StockHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockHealth::Excess => write!(f, "EXCESS"),
            StockHealth::Balanced => write!(f, "BALANCED"),
            StockHealth::Short => write!(f, "SHORT"),
        }
    }
}

// ==========================================
// Distribution Status (per-SKU rollup grade)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionStatus {
    StockoutPresent, // at least one store holds zero units
    Uneven,          // heavily skewed across stores
    Balanced,
}

impl fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionStatus::StockoutPresent => write!(f, "STOCKOUT_PRESENT"),
            DistributionStatus::Uneven => write!(f, "UNEVEN"),
            DistributionStatus::Balanced => write!(f, "BALANCED"),
        }
    }
}

// ==========================================
// Stock Level Grade (optimization view)
// ==========================================
// Where a store-SKU sits relative to its optimal stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockLevelGrade {
    DeadStock,   // sizeable pile with zero sales
    Excess,      // more than twice the optimal level
    High,        // more than 1.5x the optimal level
    CriticalLow, // under 30% of the optimal level
    Low,         // under half the optimal level
    Optimal,     // within 80-120% of the optimal level
    Watch,
}

impl fmt::Display for StockLevelGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockLevelGrade::DeadStock => write!(f, "DEAD_STOCK"),
            StockLevelGrade::Excess => write!(f, "EXCESS"),
            StockLevelGrade::High => write!(f, "HIGH"),
            StockLevelGrade::CriticalLow => write!(f, "CRITICAL_LOW"),
            StockLevelGrade::Low => write!(f, "LOW"),
            StockLevelGrade::Optimal => write!(f, "OPTIMAL"),
            StockLevelGrade::Watch => write!(f, "WATCH"),
        }
    }
}

// ==========================================
// Optimization Action (optimization view)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizationAction {
    LiquidateOrTransfer, // dead stock: move it out of the store
    ConsiderTransfer,
    OrderUrgently,
    PlaceOrder,
    RunPromotion, // slow mover: less than one turn per month
    Monitor,
}

impl fmt::Display for OptimizationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationAction::LiquidateOrTransfer => write!(f, "LIQUIDATE_OR_TRANSFER"),
            OptimizationAction::ConsiderTransfer => write!(f, "CONSIDER_TRANSFER"),
            OptimizationAction::OrderUrgently => write!(f, "ORDER_URGENTLY"),
            OptimizationAction::PlaceOrder => write!(f, "PLACE_ORDER"),
            OptimizationAction::RunPromotion => write!(f, "RUN_PROMOTION"),
            OptimizationAction::Monitor => write!(f, "MONITOR"),
        }
    }
}
