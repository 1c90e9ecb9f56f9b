//! Common types used across the engine

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount produced by the lenient currency coercer.
///
/// Malformed currency cells coerce to zero instead of aborting a batch;
/// `was_defaulted` records when that happened so reports can surface how many
/// cells were silently zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercedAmount {
    pub value: Decimal,
    pub was_defaulted: bool,
}

impl CoercedAmount {
    pub fn parsed(value: Decimal) -> Self {
        Self {
            value,
            was_defaulted: false,
        }
    }

    /// The lenient zero default for an unparseable cell.
    pub fn defaulted() -> Self {
        Self {
            value: Decimal::ZERO,
            was_defaulted: true,
        }
    }
}

/// A recoverable error scoped to a single spreadsheet row.
///
/// The row is skipped and processing continues; `row` is the 1-based row
/// number as seen in the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

/// Summary of an import run, communicating partial success.
///
/// `success` is true iff at least one valid record was produced, even when
/// some rows were malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: bool,
    pub message: String,
    pub row_errors: Vec<RowError>,
    /// Count of currency cells leniently coerced to zero.
    pub defaulted_amounts: usize,
}

/// Records extracted from a sheet together with the import report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome<T> {
    pub records: Vec<T>,
    pub report: ImportReport,
}

/// Inclusive day range for a stock simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}
