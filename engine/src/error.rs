//! Error handling for the stock analytics engine
//!
//! Only conditions that abort a whole sheet (or a whole simulation) are
//! modeled as error variants. Malformed individual rows are recoverable and
//! travel as [`shared::RowError`] data inside the import report instead.

use thiserror::Error;

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    /// The input stream could not be opened as a workbook, or the workbook
    /// has no worksheets.
    #[error("Could not read workbook: {0}")]
    Workbook(String),

    /// No row within the scanned prefix of the sheet contained all required
    /// header keywords.
    #[error("No header row found within the first {scanned} rows")]
    HeaderRowNotFound { scanned: usize },

    /// The header row was located but a required column keyword matched no
    /// cell. Processing of the sheet stops.
    #[error("Required column not found in header row: {0}")]
    ColumnNotFound(String),

    /// Stock evolution was requested for a base product with no usable
    /// purchase records; the simulation is undefined without a starting
    /// supply.
    #[error("No purchases found for base product: {0}")]
    NoPurchases(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
