//! Rotation (purchased vs. sold) models

use serde::{Deserialize, Serialize};

/// Purchased vs. sold quantities for one (product, color, point-of-sale)
/// key observed in sales.
///
/// `quantity_purchased` is looked up by product only: purchase data carries
/// no color dimension, so every color variant of a product shares the same
/// purchased total. This asymmetry is intentional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRotation {
    pub base_product: String,
    pub color_variant: Option<String>,
    pub point_of_sale: String,
    pub quantity_purchased: i32,
    pub quantity_sold: i32,
}

/// A sales group with no recorded purchases for its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsourcedSale {
    pub base_product: String,
    pub color_variant: Option<String>,
    pub point_of_sale: String,
    pub quantity_sold: i32,
}

/// Full rotation analysis output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationReport {
    pub rotations: Vec<ProductRotation>,
    /// Same grouping as `rotations`, restricted to products sold with zero
    /// recorded purchases.
    pub unsourced: Vec<UnsourcedSale>,
}
