//! Sales sheet interpretation tests
//!
//! Covers the carry-forward fold, subtotal and utility-row filtering,
//! point-of-sale resolution from invoice numbers, row-scoped error
//! reporting, and the trailing-blank-region early abort.

use std::sync::Arc;

use calamine::Data;
use chrono::NaiveDate;

use retail_stock_analytics_engine::services::SalesImportService;
use retail_stock_analytics_engine::sheet::Grid;
use retail_stock_analytics_engine::EngineConfig;
use shared::UNKNOWN_POINT_OF_SALE;

fn s(value: &str) -> Data {
    Data::String(value.to_string())
}

fn row(values: &[&str]) -> Vec<Data> {
    values.iter().map(|v| s(v)).collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn service() -> SalesImportService {
    SalesImportService::new(Arc::new(EngineConfig::default()))
}

/// Standard sales layout: SUCURSAL, VENDEDOR, FECHA, NRO, PRODUCTO,
/// CATEGORIA, CANTIDAD, TOTAL.
fn header() -> Vec<Data> {
    row(&[
        "SUCURSAL",
        "VENDEDOR",
        "FECHA",
        "NRO COMPROBANTE",
        "PRODUCTO",
        "CATEGORIA",
        "CANTIDAD",
        "TOTAL",
    ])
}

// ============================================================================
// Carry-forward interpretation
// ============================================================================

#[test]
fn test_carry_forward_attributes_blank_rows_to_last_run() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-00001234", "Shoe - Red", "CALZADO", "2", "$ 3,000.00"]),
        // Branch and seller blank: carried forward from the row above.
        row(&["", "", "02/01/2025", "A-0002-00001240", "Shoe - Blue", "CALZADO", "-1", "$ -1,500.00"]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.report.success);

    let first = &outcome.records[0];
    let second = &outcome.records[1];
    assert_eq!(first.branch, "Dean Funes");
    assert_eq!(first.seller, "PEREZ");
    assert_eq!(second.branch, "Dean Funes");
    assert_eq!(second.seller, "PEREZ");

    assert_eq!(first.base_product, "Shoe");
    assert_eq!(first.color_variant.as_deref(), Some("Red"));
    assert_eq!(first.date, date(2025, 1, 1));
    assert_eq!(first.quantity, 2);

    // Return line: negative quantity preserved.
    assert_eq!(second.color_variant.as_deref(), Some("Blue"));
    assert_eq!(second.quantity, -1);
}

#[test]
fn test_new_branch_overwrites_carried_context() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-1", "Zapato Paris", "CALZADO", "1", ""]),
        row(&["Nueva Cordoba", "GOMEZ", "01/01/2025", "A-0004-7", "Zapato Paris", "CALZADO", "1", ""]),
        row(&["", "", "02/01/2025", "A-0004-8", "Bota Alta", "CALZADO", "1", ""]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records[2].branch, "Nueva Cordoba");
    assert_eq!(outcome.records[2].seller, "GOMEZ");
}

#[test]
fn test_rows_before_first_branch_are_empty() {
    // No branch has been seen yet: the carried context is blank, so the row
    // is classified empty even though its own product cell is filled.
    let grid: Grid = vec![
        header(),
        row(&["", "", "01/01/2025", "A-0002-1", "Zapato Paris", "CALZADO", "1", ""]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert!(outcome.records.is_empty());
    assert!(!outcome.report.success);
    assert!(outcome.report.row_errors.is_empty());
}

#[test]
fn test_seller_not_tracked_when_column_absent() {
    let grid: Grid = vec![
        row(&["SUCURSAL", "FECHA", "NRO COMPROBANTE", "PRODUCTO", "CANTIDAD"]),
        row(&["Dean Funes", "01/01/2025", "A-0002-1", "Zapato Paris", "1"]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].seller, "");
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_subtotal_rows_are_skipped_without_resetting_context() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-1", "Zapato Paris", "CALZADO", "1", ""]),
        row(&["", "", "", "", "Sub Total", "", "", "$ 1,500.00"]),
        row(&["", "", "02/01/2025", "A-0002-2", "Bota Alta", "CALZADO", "1", ""]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[1].branch, "Dean Funes");
}

#[test]
fn test_utility_rows_are_excluded() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-1", "AJUSTE POR REDONDEO", "", "1", ""]),
        row(&["", "", "01/01/2025", "A-0002-2", "DESCUENTO POR PROMOCION", "", "1", ""]),
        row(&["", "", "02/01/2025", "A-0002-3", "Zapato Paris", "CALZADO", "1", ""]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].base_product, "Zapato Paris");
}

#[test]
fn test_excluded_categories_never_produce_records() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-1", "Cartera Milano", "CARTERAS", "1", ""]),
        row(&["", "", "01/01/2025", "A-0002-2", "Perfume Brisa", "Perfumeria", "2", ""]),
        row(&["", "", "02/01/2025", "A-0002-3", "Zapato Paris", "CALZADO", "1", ""]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].raw_category, "CALZADO");
}

// ============================================================================
// Point-of-sale resolution
// ============================================================================

#[test]
fn test_point_of_sale_resolved_from_invoice_code() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-00001234", "Zapato Paris", "CALZADO", "1", ""]),
        row(&["", "", "01/01/2025", "B-0005-00000019", "Zapato Paris", "CALZADO", "1", ""]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    // Codes 0002 and 0005 both map to the same commercial name.
    assert_eq!(outcome.records[0].point_of_sale, "DEAN FUNES");
    assert_eq!(outcome.records[1].point_of_sale, "DEAN FUNES");
}

#[test]
fn test_unmapped_code_yields_unknown_marker() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-9999-00000001", "Zapato Paris", "CALZADO", "1", ""]),
        row(&["", "", "01/01/2025", "SINGUION", "Bota Alta", "CALZADO", "1", ""]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records[0].point_of_sale, UNKNOWN_POINT_OF_SALE);
    assert_eq!(outcome.records[1].point_of_sale, UNKNOWN_POINT_OF_SALE);
}

// ============================================================================
// Row-scoped errors and partial success
// ============================================================================

#[test]
fn test_unparseable_date_is_row_scoped() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "sin fecha", "A-0002-1", "Zapato Paris", "CALZADO", "1", ""]),
        row(&["", "", "02/01/2025", "A-0002-2", "Bota Alta", "CALZADO", "1", ""]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.report.success);
    assert_eq!(outcome.report.row_errors.len(), 1);
    assert_eq!(outcome.report.row_errors[0].row, 2);
    assert!(outcome.report.row_errors[0].message.contains("sin fecha"));
}

#[test]
fn test_unparseable_quantity_is_row_scoped() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-1", "Zapato Paris", "CALZADO", "dos", ""]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert!(outcome.records.is_empty());
    assert!(!outcome.report.success);
    assert!(outcome.report.row_errors[0].message.contains("dos"));
}

#[test]
fn test_defaulted_currency_cells_are_counted_not_fatal() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-1", "Zapato Paris", "CALZADO", "1", "ver nota"]),
        row(&["", "", "01/01/2025", "A-0002-2", "Bota Alta", "CALZADO", "1", "$ 2,500.00"]),
    ];

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.report.defaulted_amounts, 1);
}

// ============================================================================
// End-of-data heuristic
// ============================================================================

#[test]
fn test_trailing_blank_region_aborts_scan() {
    let mut grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-1", "Zapato Paris", "CALZADO", "1", ""]),
    ];
    for _ in 0..11 {
        grid.push(vec![]);
    }
    // Data beyond the blank region is treated as past end-of-data.
    grid.push(row(&["Dean Funes", "PEREZ", "05/01/2025", "A-0002-9", "Bota Alta", "CALZADO", "1", ""]));

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records.len(), 1);
}

#[test]
fn test_short_blank_runs_do_not_abort() {
    let mut grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-1", "Zapato Paris", "CALZADO", "1", ""]),
    ];
    for _ in 0..10 {
        grid.push(vec![]);
    }
    grid.push(row(&["", "", "05/01/2025", "A-0002-9", "Bota Alta", "CALZADO", "1", ""]));

    let outcome = service().import_grid(&grid).unwrap();
    assert_eq!(outcome.records.len(), 2);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_input_yields_identical_output() {
    let grid: Grid = vec![
        header(),
        row(&["Dean Funes", "PEREZ", "01/01/2025", "A-0002-1", "Zapato Paris - Rojo", "CALZADO", "2", "$ 3,000.00"]),
        row(&["", "", "sin fecha", "A-0002-2", "Bota Alta", "CALZADO", "1", ""]),
        row(&["", "", "02/01/2025", "A-0005-3", "Zapato Paris - Negro", "CALZADO", "1", "$ 1,500.00"]),
    ];

    let first = service().import_grid(&grid).unwrap();
    let second = service().import_grid(&grid).unwrap();
    assert_eq!(first.records, second.records);
    assert_eq!(first.report.row_errors, second.report.row_errors);
    assert_eq!(first.report.defaulted_amounts, second.report.defaulted_amounts);
}
