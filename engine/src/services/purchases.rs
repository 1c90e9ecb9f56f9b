//! Purchase header/detail merging
//!
//! Purchases arrive as two independently-exported sheets: a header sheet
//! mapping invoice numbers to dates and a detail sheet carrying the product
//! lines. They share no key with the sales data; the join here is on invoice
//! number only, and a detail whose invoice is missing from the header map is
//! still emitted with an empty date.

use std::collections::HashMap;
use std::sync::Arc;

use shared::{is_blank, ImportOutcome, ImportReport, PurchaseDetailRecord, RowError};

use crate::coerce::{parse_amount, parse_date, parse_quantity};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::sheet::{self, Grid};

/// Keywords every purchase-header row must contain.
const HEADER_KEYWORDS: [&str; 2] = ["NRO", "FECHA"];

/// Keywords every purchase-detail header row must contain.
const DETAIL_KEYWORDS: [&str; 5] = ["NRO", "PROVEEDOR", "PRODUCTO", "CANT", "TOTAL"];

/// Purchase import service
#[derive(Clone)]
pub struct PurchaseImportService {
    config: Arc<EngineConfig>,
}

impl PurchaseImportService {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Build the invoice-number → date map from a purchase header sheet.
    pub fn import_headers(&self, bytes: &[u8]) -> EngineResult<HashMap<String, String>> {
        let grid = sheet::load_first_worksheet(bytes)?;
        self.import_headers_grid(&grid)
    }

    /// Grid-level entry point for [`Self::import_headers`].
    ///
    /// First occurrence wins on duplicate invoice numbers. Dates that parse
    /// are stored in ISO form; unparseable date cells keep their raw text.
    pub fn import_headers_grid(&self, grid: &Grid) -> EngineResult<HashMap<String, String>> {
        let header_row = sheet::find_header_row(grid, &HEADER_KEYWORDS, self.config.header_scan_rows)?;
        let invoice_col = sheet::find_column(grid, header_row, "NRO")?;
        let date_col = sheet::find_column(grid, header_row, "FECHA")?;

        let mut dates_by_invoice: HashMap<String, String> = HashMap::new();
        for row in grid.iter().skip(header_row + 1) {
            let invoice = sheet::text_at(row, invoice_col);
            if is_blank(&invoice) {
                continue;
            }

            let date_cell = sheet::cell_at(row, date_col);
            let date = match parse_date(date_cell) {
                Ok(date) => date.format("%Y-%m-%d").to_string(),
                Err(_) => sheet::cell_text(date_cell),
            };

            dates_by_invoice.entry(invoice).or_insert(date);
        }

        tracing::info!(invoices = dates_by_invoice.len(), "purchase headers imported");
        Ok(dates_by_invoice)
    }

    /// Import dated purchase details, joining each row against the header
    /// map.
    pub fn import_details(
        &self,
        bytes: &[u8],
        dates_by_invoice: &HashMap<String, String>,
    ) -> EngineResult<ImportOutcome<PurchaseDetailRecord>> {
        let grid = sheet::load_first_worksheet(bytes)?;
        self.import_details_grid(&grid, dates_by_invoice)
    }

    /// Grid-level entry point for [`Self::import_details`].
    pub fn import_details_grid(
        &self,
        grid: &Grid,
        dates_by_invoice: &HashMap<String, String>,
    ) -> EngineResult<ImportOutcome<PurchaseDetailRecord>> {
        let header_row = sheet::find_header_row(grid, &DETAIL_KEYWORDS, self.config.header_scan_rows)?;
        let invoice_col = sheet::find_column(grid, header_row, "NRO")?;
        let supplier_col = sheet::find_column(grid, header_row, "PROVEEDOR")?;
        let product_col = sheet::find_column(grid, header_row, "PRODUCTO")?;
        let quantity_col = sheet::find_column(grid, header_row, "CANT")?;
        let total_col = sheet::find_column(grid, header_row, "TOTAL")?;

        let mut records: Vec<PurchaseDetailRecord> = Vec::new();
        let mut row_errors: Vec<RowError> = Vec::new();
        let mut defaulted_amounts = 0usize;
        let mut unresolved_dates = 0usize;

        for (offset, row) in grid.iter().enumerate().skip(header_row + 1) {
            let row_number = offset + 1;
            let invoice_number = sheet::text_at(row, invoice_col);
            let base_product = sheet::text_at(row, product_col);
            if is_blank(&invoice_number) && is_blank(&base_product) {
                continue;
            }

            let quantity = match parse_quantity(sheet::cell_at(row, quantity_col)) {
                Ok(quantity) => quantity,
                Err(message) => {
                    tracing::warn!(row = row_number, message = %message, "purchase row skipped");
                    row_errors.push(RowError {
                        row: row_number,
                        message,
                    });
                    continue;
                }
            };

            let total = parse_amount(sheet::cell_at(row, total_col));
            if total.was_defaulted {
                defaulted_amounts += 1;
            }

            // An invoice absent from the header map is not an error; the
            // record is emitted with an unresolved (empty) date.
            let date = dates_by_invoice
                .get(&invoice_number)
                .cloned()
                .unwrap_or_default();
            if date.is_empty() {
                unresolved_dates += 1;
            }

            records.push(PurchaseDetailRecord {
                invoice_number,
                supplier: sheet::text_at(row, supplier_col),
                base_product,
                quantity,
                total: total.value,
                date,
            });
        }

        let report = ImportReport {
            success: !records.is_empty(),
            message: format!(
                "Imported {} purchase details ({} unresolved dates, {} rows skipped)",
                records.len(),
                unresolved_dates,
                row_errors.len()
            ),
            row_errors,
            defaulted_amounts,
        };
        tracing::info!(
            records = records.len(),
            unresolved = unresolved_dates,
            "purchase details imported"
        );

        Ok(ImportOutcome { records, report })
    }
}
