//! Sales models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Marker emitted when the point-of-sale code embedded in an invoice number
/// is missing or not present in the code map.
pub const UNKNOWN_POINT_OF_SALE: &str = "DESCONOCIDO";

/// One merchandise sale line extracted from a sales export.
///
/// Branch and seller come from the spreadsheet's carry-forward convention:
/// they are written on the first row of a run and implied until they change.
/// A negative quantity denotes a return/discount line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub invoice_number: String,
    pub branch: String,
    pub seller: String,
    /// Product label text before the `" - "` separator.
    pub base_product: String,
    /// Product label text after the separator, when present.
    pub color_variant: Option<String>,
    /// Canonical selling location resolved from the invoice number.
    pub point_of_sale: String,
    pub quantity: i32,
    pub raw_category: String,
}
