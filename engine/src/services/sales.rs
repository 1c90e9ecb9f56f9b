//! Sales sheet interpretation
//!
//! Exports carry branch and seller only on the first row of a contiguous run
//! (carry-forward convention), mix subtotal rows between transactions, and
//! trail off into large blank regions. The interpreter is an explicit left
//! fold: a pure step function maps `(context, row)` to `(new context, row
//! outcome)`, which keeps the carried state visible and testable against
//! synthetic rows.

use std::sync::Arc;

use calamine::Data;

use shared::{
    is_blank, normalize_key, split_product_label, ImportOutcome, ImportReport, RowError,
    SaleRecord, UNKNOWN_POINT_OF_SALE,
};

use crate::coerce::{parse_amount, parse_date, parse_quantity};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::sheet::{self, Grid};

/// Keywords every sales header row must contain.
const REQUIRED_KEYWORDS: [&str; 4] = ["FECHA", "NRO", "PRODUCTO", "CANT"];

/// Literal marking aggregate rows that must not become records.
const SUBTOTAL_MARKER: &str = "SUB TOTAL";

/// Sales import service
#[derive(Clone)]
pub struct SalesImportService {
    config: Arc<EngineConfig>,
}

/// Carry-forward accumulator: the last non-blank branch and seller seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowContext {
    pub branch: String,
    pub seller: String,
}

/// Classification of one data row by the fold step.
#[derive(Debug)]
pub enum RowOutcome {
    /// A merchandise sale line. `amount_defaulted` is true when the row's
    /// currency cell was leniently coerced to zero.
    Record {
        record: SaleRecord,
        amount_defaulted: bool,
    },
    /// Blank under carry-forward rules, or a subtotal marker. Preserves the
    /// accumulators and counts toward the end-of-data heuristic.
    Empty,
    /// Utility/adjustment line or excluded category; dropped entirely.
    Excluded,
    /// Malformed date or quantity; the row is skipped and reported.
    Error(RowError),
}

/// Resolved column layout of a sales sheet.
struct SalesColumns {
    date: usize,
    invoice: usize,
    product: usize,
    quantity: usize,
    branch: Option<usize>,
    seller: Option<usize>,
    category: Option<usize>,
    total: Option<usize>,
}

impl SalesColumns {
    fn locate(grid: &Grid, header_row: usize) -> EngineResult<Self> {
        Ok(Self {
            date: sheet::find_column(grid, header_row, "FECHA")?,
            invoice: sheet::find_column(grid, header_row, "NRO")?,
            product: sheet::find_column(grid, header_row, "PRODUCTO")?,
            quantity: sheet::find_column(grid, header_row, "CANT")?,
            branch: sheet::find_column_opt(grid, header_row, "SUCURSAL"),
            seller: sheet::find_column_opt(grid, header_row, "VENDEDOR"),
            category: sheet::find_column_opt(grid, header_row, "CATEGORIA"),
            total: sheet::find_column_opt(grid, header_row, "TOTAL"),
        })
    }
}

impl SalesImportService {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Import sale records from a raw spreadsheet byte stream (first
    /// worksheet only).
    pub fn import(&self, bytes: &[u8]) -> EngineResult<ImportOutcome<SaleRecord>> {
        let grid = sheet::load_first_worksheet(bytes)?;
        self.import_grid(&grid)
    }

    /// Import sale records from a materialized worksheet grid.
    pub fn import_grid(&self, grid: &Grid) -> EngineResult<ImportOutcome<SaleRecord>> {
        let header_row = sheet::find_header_row(grid, &REQUIRED_KEYWORDS, self.config.header_scan_rows)?;
        let columns = SalesColumns::locate(grid, header_row)?;

        let mut context = RowContext::default();
        let mut records: Vec<SaleRecord> = Vec::new();
        let mut row_errors: Vec<RowError> = Vec::new();
        let mut defaulted_amounts = 0usize;
        let mut consecutive_empty = 0usize;

        for (offset, row) in grid.iter().enumerate().skip(header_row + 1) {
            // 1-based row number as seen in the spreadsheet.
            let row_number = offset + 1;
            let (next, outcome) = interpret_row(&self.config, &columns, &context, row, row_number);
            context = next;

            match outcome {
                RowOutcome::Record {
                    record,
                    amount_defaulted,
                } => {
                    consecutive_empty = 0;
                    if amount_defaulted {
                        defaulted_amounts += 1;
                    }
                    records.push(record);
                }
                RowOutcome::Empty => {
                    consecutive_empty += 1;
                    if consecutive_empty > self.config.empty_row_limit {
                        tracing::debug!(
                            row = row_number,
                            "trailing blank region reached, stopping scan"
                        );
                        break;
                    }
                }
                RowOutcome::Excluded => {
                    consecutive_empty = 0;
                }
                RowOutcome::Error(error) => {
                    consecutive_empty = 0;
                    tracing::warn!(row = error.row, message = %error.message, "sales row skipped");
                    row_errors.push(error);
                }
            }
        }

        let report = ImportReport {
            success: !records.is_empty(),
            message: format!(
                "Imported {} sales records ({} rows skipped)",
                records.len(),
                row_errors.len()
            ),
            row_errors,
            defaulted_amounts,
        };
        tracing::info!(records = records.len(), errors = report.row_errors.len(), "sales import finished");

        Ok(ImportOutcome { records, report })
    }
}

/// Fold step: interpret one data row against the carried context.
///
/// Pure with respect to its inputs; the caller owns the accumulator
/// threading.
fn interpret_row(
    config: &EngineConfig,
    columns: &SalesColumns,
    state: &RowContext,
    row: &[Data],
    row_number: usize,
) -> (RowContext, RowOutcome) {
    let mut next = state.clone();

    // Non-blank branch/seller cells overwrite the carried values.
    if let Some(col) = columns.branch {
        let branch = sheet::text_at(row, col);
        if !is_blank(&branch) {
            next.branch = branch;
        }
    }
    if let Some(col) = columns.seller {
        let seller = sheet::text_at(row, col);
        if !is_blank(&seller) {
            next.seller = seller;
        }
    }

    let product_text = sheet::text_at(row, columns.product);

    // Emptiness uses the carried context, not just this row's own cells.
    let branch_missing = columns.branch.is_some() && is_blank(&next.branch);
    let seller_missing = columns.seller.is_some() && is_blank(&next.seller);
    let is_subtotal = [&next.branch, &next.seller, &product_text]
        .iter()
        .any(|value| normalize_key(value).contains(SUBTOTAL_MARKER));

    if branch_missing || seller_missing || is_blank(&product_text) || is_subtotal {
        return (next, RowOutcome::Empty);
    }

    if config.is_utility_product(&product_text) {
        return (next, RowOutcome::Excluded);
    }

    let raw_category = columns
        .category
        .map(|col| sheet::text_at(row, col))
        .unwrap_or_default();
    if config.is_excluded_category(&raw_category) {
        return (next, RowOutcome::Excluded);
    }

    let date = match parse_date(sheet::cell_at(row, columns.date)) {
        Ok(date) => date,
        Err(message) => {
            return (
                next,
                RowOutcome::Error(RowError {
                    row: row_number,
                    message,
                }),
            );
        }
    };

    let quantity = match parse_quantity(sheet::cell_at(row, columns.quantity)) {
        Ok(quantity) => quantity,
        Err(message) => {
            return (
                next,
                RowOutcome::Error(RowError {
                    row: row_number,
                    message,
                }),
            );
        }
    };

    let invoice_number = sheet::text_at(row, columns.invoice);
    let point_of_sale = point_of_sale_from_invoice(config, &invoice_number);

    let amount_defaulted = columns
        .total
        .map(|col| parse_amount(sheet::cell_at(row, col)).was_defaulted)
        .unwrap_or(false);

    let (base_product, color_variant) = split_product_label(&product_text);

    let record = SaleRecord {
        date,
        invoice_number,
        branch: next.branch.clone(),
        seller: next.seller.clone(),
        base_product,
        color_variant,
        point_of_sale,
        quantity,
        raw_category,
    };

    (
        next,
        RowOutcome::Record {
            record,
            amount_defaulted,
        },
    )
}

/// Point of sale from the invoice number's second hyphen-delimited segment.
///
/// Unmapped or missing codes yield the literal unknown marker rather than
/// failing the row.
fn point_of_sale_from_invoice(config: &EngineConfig, invoice_number: &str) -> String {
    invoice_number
        .split('-')
        .nth(1)
        .map(normalize_key)
        .and_then(|code| config.point_of_sale_for_code(&code))
        .unwrap_or_else(|| UNKNOWN_POINT_OF_SALE.to_string())
}
