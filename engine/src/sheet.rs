//! Worksheet access, cell extraction, and header location
//!
//! Exports arrive as in-memory byte streams; only the first worksheet is
//! read. The header row's position and exact wording vary between exports,
//! so it is located by keyword scan rather than assumed at row 0.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::{EngineError, EngineResult};

/// A fully materialized worksheet: rows of cells.
pub type Grid = Vec<Vec<Data>>;

/// Placeholder for cells beyond the end of a ragged row.
pub const EMPTY_CELL: Data = Data::Empty;

/// Open a workbook from an in-memory byte stream (xls or xlsx) and
/// materialize its first worksheet.
pub fn load_first_worksheet(bytes: &[u8]) -> EngineResult<Grid> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| EngineError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EngineError::Workbook("workbook contains no worksheets".to_string()))?
        .map_err(|e| EngineError::Workbook(e.to_string()))?;

    tracing::debug!(rows = range.height(), cols = range.width(), "worksheet loaded");
    Ok(range.rows().map(<[Data]>::to_vec).collect())
}

/// Convert a cell to a trimmed string.
///
/// Whole floats render without a decimal point so numeric invoice and code
/// cells compare equal to their text counterparts.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if *f == f.floor() && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ndt| ndt.to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// True when a cell is empty or whitespace-only.
pub fn cell_is_blank(cell: &Data) -> bool {
    matches!(cell, Data::Empty) || cell_text(cell).is_empty()
}

/// Cell at `col`, tolerating ragged rows.
pub fn cell_at(row: &[Data], col: usize) -> &Data {
    row.get(col).unwrap_or(&EMPTY_CELL)
}

/// Trimmed text of the cell at `col`.
pub fn text_at(row: &[Data], col: usize) -> String {
    cell_text(cell_at(row, col))
}

/// Locate the header row: the first row within the scanned prefix whose
/// cells collectively contain every keyword (case-insensitive substring).
///
/// Keywords and column purpose are independent; one cell may satisfy several
/// keywords.
pub fn find_header_row(grid: &Grid, keywords: &[&str], scan_rows: usize) -> EngineResult<usize> {
    let needles: Vec<String> = keywords.iter().map(|k| k.to_uppercase()).collect();

    for (idx, row) in grid.iter().take(scan_rows).enumerate() {
        let cells: Vec<String> = row.iter().map(|c| cell_text(c).to_uppercase()).collect();
        let qualifies = needles
            .iter()
            .all(|needle| cells.iter().any(|cell| cell.contains(needle)));
        if qualifies {
            tracing::debug!(row = idx, "header row located");
            return Ok(idx);
        }
    }

    Err(EngineError::HeaderRowNotFound {
        scanned: scan_rows.min(grid.len()),
    })
}

/// Column index of the first header cell containing `keyword`
/// (case-insensitive). Failing to find a required column aborts the sheet.
pub fn find_column(grid: &Grid, header_row: usize, keyword: &str) -> EngineResult<usize> {
    find_column_opt(grid, header_row, keyword)
        .ok_or_else(|| EngineError::ColumnNotFound(keyword.to_string()))
}

/// Like [`find_column`] for columns that may legitimately be absent.
pub fn find_column_opt(grid: &Grid, header_row: usize, keyword: &str) -> Option<usize> {
    let needle = keyword.to_uppercase();
    grid.get(header_row)?
        .iter()
        .position(|cell| cell_text(cell).to_uppercase().contains(&needle))
}
