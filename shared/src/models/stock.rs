//! Stock evolution models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Label of the series covering all points of sale.
pub const GLOBAL_SERIES: &str = "GLOBAL";

/// Running stock balance at the end of one day.
///
/// Computed fresh per simulation over a contiguous day sequence; never
/// mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDayPoint {
    pub date: NaiveDate,
    pub running_stock: i32,
}

/// A daily stock curve for one series: "GLOBAL" or a single point of sale.
///
/// Points are append-only in date order, one per day of the simulated range,
/// including days with no flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSeries {
    pub label: String,
    pub points: Vec<StockDayPoint>,
}
