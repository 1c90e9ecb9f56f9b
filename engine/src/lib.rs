//! Retail Stock Analytics - stock-evolution and rotation-analysis engine
//!
//! Ingests manually-exported sales and purchase spreadsheets (inconsistent
//! headers, carry-forward row values, mixed currency/date formats) and
//! reconstructs, purely from flow data, a day-by-day stock curve and
//! purchased-vs-sold rotation per product, color variant, and point of sale.
//!
//! The engine is single-threaded per invocation and holds no shared mutable
//! state; [`EngineConfig`] is read-only and safe to share across concurrent
//! uploads.

pub mod coerce;
pub mod config;
pub mod error;
pub mod services;
pub mod sheet;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
