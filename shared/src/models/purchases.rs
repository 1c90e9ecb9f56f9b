//! Purchase models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One purchase line, produced by joining the detail sheet against the
/// header sheet on invoice number.
///
/// `date` is populated only when the detail's invoice number exists in the
/// header map; otherwise it is the empty string. An unresolved date is not an
/// error condition, the record is still emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseDetailRecord {
    pub invoice_number: String,
    pub supplier: String,
    pub base_product: String,
    pub quantity: i32,
    pub total: Decimal,
    pub date: String,
}
