// ==========================================
// Retail Replenishment APS - Transfer Recommender
// ==========================================
// Responsibility: propose inter-store transfers from surplus stores
// to critical ones, per SKU
// Input: joined SkuPositions + PlanningConfig
// Output: Vec<TransferRecommendation>
// Heuristic, not an optimizer: each recipient greedily takes from
// the donor with the largest surplus-to-target ratio. Donor surplus
// is drawn down across recipients, so a donor can never be pulled
// below its own target cover within a run.
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::{SkuPosition, TransferRecommendation};
use crate::error::EngineResult;
use std::collections::BTreeMap;
use tracing::instrument;

struct Donor {
    store_id: String,
    runway_days: f64,
    target_units: i64,
    surplus: i64,
}

struct Recipient {
    store_id: String,
    runway_days: f64,
    deficit: i64,
}

// ==========================================
// TransferRecommender
// ==========================================
pub struct TransferRecommender;

impl TransferRecommender {
    pub fn new() -> Self {
        Self
    }

    /// Recommend transfers across all stores, per SKU.
    ///
    /// An empty result is a normal outcome (no surplus anywhere),
    /// not an error.
    #[instrument(skip(self, positions, config), fields(count = positions.len()))]
    pub fn recommend(
        &self,
        positions: &[SkuPosition],
        config: &PlanningConfig,
    ) -> EngineResult<Vec<TransferRecommendation>> {
        config.validate()?;

        // BTreeMap keeps SKU iteration deterministic.
        let mut by_sku: BTreeMap<&str, Vec<&SkuPosition>> = BTreeMap::new();
        for position in positions {
            by_sku.entry(position.sku_id()).or_default().push(position);
        }

        let mut recommendations = Vec::new();
        for (sku_id, sku_positions) in by_sku {
            self.recommend_for_sku(sku_id, &sku_positions, config, &mut recommendations);
        }
        Ok(recommendations)
    }

    fn recommend_for_sku(
        &self,
        sku_id: &str,
        positions: &[&SkuPosition],
        config: &PlanningConfig,
        out: &mut Vec<TransferRecommendation>,
    ) {
        let target_days = config.target_cover_days as f64;
        let critical_days = config.critical_days as f64;

        // Donors: bounded runway strictly above target cover, with real
        // surplus units above their own target. Recipients: bounded
        // runway at or below the critical threshold with a real deficit.
        // target > critical is enforced by config validation, so the two
        // sets are disjoint by construction: no store is ever both.
        let mut donors: Vec<Donor> = Vec::new();
        let mut recipients: Vec<Recipient> = Vec::new();

        for position in positions {
            let units_per_day = position.velocity.units_per_day;
            let Some(runway_days) = position.forecast.runway.days() else {
                continue; // non-forecastable stores join neither side
            };

            if runway_days > target_days {
                let target_units = (units_per_day * target_days).ceil() as i64;
                let surplus = position.stock.on_hand_qty - target_units;
                if surplus > 0 {
                    donors.push(Donor {
                        store_id: position.store_id().to_string(),
                        runway_days,
                        target_units,
                        surplus,
                    });
                }
            } else if runway_days <= critical_days {
                let needed = (units_per_day * critical_days).ceil() as i64;
                let deficit = needed - position.stock.on_hand_qty;
                if deficit > 0 {
                    recipients.push(Recipient {
                        store_id: position.store_id().to_string(),
                        runway_days,
                        deficit,
                    });
                }
            }
        }

        if donors.is_empty() || recipients.is_empty() {
            return;
        }

        // Most urgent recipient first; store_id breaks ties.
        recipients.sort_by(|a, b| {
            a.runway_days
                .partial_cmp(&b.runway_days)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.store_id.cmp(&b.store_id))
        });

        for recipient in &recipients {
            let Some(donor) = Self::pick_donor(&mut donors) else {
                break; // every donor exhausted
            };

            let quantity = donor.surplus.min(recipient.deficit);
            if quantity <= 0 {
                continue;
            }

            out.push(TransferRecommendation {
                source_store_id: donor.store_id.clone(),
                destination_store_id: recipient.store_id.clone(),
                sku_id: sku_id.to_string(),
                quantity,
                source_runway_days: donor.runway_days,
                destination_runway_days: recipient.runway_days,
            });
            donor.surplus -= quantity;
        }
    }

    /// Greedy donor choice: the largest surplus relative to its own
    /// target cover; store_id breaks ties deterministically.
    fn pick_donor(donors: &mut [Donor]) -> Option<&mut Donor> {
        donors
            .iter_mut()
            .filter(|d| d.surplus > 0)
            .max_by(|a, b| {
                let ratio_a = a.surplus as f64 / (a.target_units.max(1)) as f64;
                let ratio_b = b.surplus as f64 / (b.target_units.max(1)) as f64;
                ratio_a
                    .partial_cmp(&ratio_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| b.store_id.cmp(&a.store_id))
            })
    }
}

impl Default for TransferRecommender {
    fn default() -> Self {
        Self::new()
    }
}
