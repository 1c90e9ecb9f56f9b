//! Rotation aggregation: purchased vs. sold per product, color, and point of
//! sale
//!
//! Purchase data carries no color dimension, so the purchased total is keyed
//! by product only and shared across that product's color variants. Sales
//! groups whose product has no purchase record at all are additionally
//! reported as unsourced demand.

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::{
    normalize_key, ProductRotation, PurchaseDetailRecord, RotationReport, SaleRecord,
    UnsourcedSale,
};

use crate::config::EngineConfig;

/// Rotation analysis service
#[derive(Clone)]
pub struct RotationService {
    config: Arc<EngineConfig>,
}

impl RotationService {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Aggregate purchased and sold quantities.
    ///
    /// Purchased per product clamps negative quantities (corrections) to a
    /// zero contribution; sold per group keeps the sign so returns reduce
    /// the total. Output ordering is deterministic (sorted by group key).
    pub fn rotation(
        &self,
        purchases: &[PurchaseDetailRecord],
        sales: &[SaleRecord],
    ) -> RotationReport {
        let mut purchased_by_product: BTreeMap<String, i32> = BTreeMap::new();
        for purchase in purchases {
            let key = normalize_key(&purchase.base_product);
            *purchased_by_product.entry(key).or_insert(0) += purchase.quantity.max(0);
        }

        let mut sold_by_group: BTreeMap<(String, Option<String>, String), i32> = BTreeMap::new();
        for sale in sales {
            if self.config.is_excluded_category(&sale.raw_category) {
                continue;
            }
            let key = (
                normalize_key(&sale.base_product),
                sale.color_variant.as_deref().map(normalize_key),
                self.config.resolve_point_of_sale(&sale.point_of_sale),
            );
            *sold_by_group.entry(key).or_insert(0) += sale.quantity;
        }

        let mut rotations = Vec::with_capacity(sold_by_group.len());
        let mut unsourced = Vec::new();

        for ((base_product, color_variant, point_of_sale), quantity_sold) in sold_by_group {
            // Purchased quantity is looked up by product only.
            let quantity_purchased = purchased_by_product
                .get(&base_product)
                .copied()
                .unwrap_or(0);

            if !purchased_by_product.contains_key(&base_product) {
                unsourced.push(UnsourcedSale {
                    base_product: base_product.clone(),
                    color_variant: color_variant.clone(),
                    point_of_sale: point_of_sale.clone(),
                    quantity_sold,
                });
            }

            rotations.push(ProductRotation {
                base_product,
                color_variant,
                point_of_sale,
                quantity_purchased,
                quantity_sold,
            });
        }

        tracing::info!(
            groups = rotations.len(),
            unsourced = unsourced.len(),
            "rotation aggregated"
        );
        RotationReport {
            rotations,
            unsourced,
        }
    }
}
