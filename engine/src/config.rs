//! Configuration for the stock analytics engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with STOCK_ prefix
//!
//! The loaded value is immutable and shared via `Arc`; concurrent uploads may
//! read it simultaneously.

use std::collections::HashMap;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use shared::normalize_key;

/// Engine configuration
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Current environment (development, production)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Legacy 4-digit branch codes (as embedded in invoice numbers) mapped to
    /// canonical commercial branch names. Many codes map to one name because
    /// of branch relocations and renumbering.
    #[serde(default = "default_point_of_sale_codes")]
    pub point_of_sale_codes: HashMap<String, String>,

    /// Non-merchandise categories dropped before rotation/stock computation.
    #[serde(default = "default_excluded_categories")]
    pub excluded_categories: Vec<String>,

    /// Markers identifying utility/adjustment product lines that are not
    /// merchandise sales.
    #[serde(default = "default_utility_markers")]
    pub utility_markers: Vec<String>,

    /// How many leading rows of a sheet are scanned for the header row.
    #[serde(default = "default_header_scan_rows")]
    pub header_scan_rows: usize,

    /// Consecutive empty rows tolerated before a sales scan treats the rest
    /// of the sheet as trailing blank region and stops.
    #[serde(default = "default_empty_row_limit")]
    pub empty_row_limit: usize,
}

impl EngineConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("STOCK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (STOCK_ prefix)
            .add_source(
                Environment::with_prefix("STOCK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Canonical branch name for a legacy point-of-sale code, if mapped.
    pub fn point_of_sale_for_code(&self, code: &str) -> Option<String> {
        self.point_of_sale_codes.get(code.trim()).cloned()
    }

    /// Resolve a point-of-sale key for aggregation.
    ///
    /// Mapped legacy codes become the canonical branch name; anything else is
    /// treated as already canonical (e.g. an e-commerce channel identifier)
    /// and passes through normalized but otherwise unchanged.
    pub fn resolve_point_of_sale(&self, raw: &str) -> String {
        let key = normalize_key(raw);
        self.point_of_sale_codes
            .get(key.as_str())
            .cloned()
            .unwrap_or(key)
    }

    /// True when a raw category belongs to the configured non-merchandise
    /// exclusion set.
    pub fn is_excluded_category(&self, raw_category: &str) -> bool {
        let key = normalize_key(raw_category);
        self.excluded_categories
            .iter()
            .any(|excluded| normalize_key(excluded) == key)
    }

    /// True when a product label is a utility/adjustment line rather than
    /// merchandise (rounding, promotions, manual adjustments).
    pub fn is_utility_product(&self, product_label: &str) -> bool {
        let label = normalize_key(product_label);
        self.utility_markers
            .iter()
            .any(|marker| label.contains(&normalize_key(marker)))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            point_of_sale_codes: default_point_of_sale_codes(),
            excluded_categories: default_excluded_categories(),
            utility_markers: default_utility_markers(),
            header_scan_rows: default_header_scan_rows(),
            empty_row_limit: default_empty_row_limit(),
        }
    }
}

fn default_environment() -> String {
    "development".to_string()
}

/// Consolidated code map. Codes 0002 and 0005 both resolve to Dean Funes
/// (branch relocation kept the commercial name).
fn default_point_of_sale_codes() -> HashMap<String, String> {
    [
        ("0001", "CASA CENTRAL"),
        ("0002", "DEAN FUNES"),
        ("0003", "GENERAL PAZ"),
        ("0004", "NUEVA CORDOBA"),
        ("0005", "DEAN FUNES"),
        ("0007", "PATIO OLMOS"),
    ]
    .into_iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

fn default_excluded_categories() -> Vec<String> {
    ["CARTERAS", "BILLETERAS", "PERFUMERIA"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_utility_markers() -> Vec<String> {
    [
        "AJUSTE POR",
        "DESCUENTO POR",
        "BONIFICACION POR",
        "REDONDEO",
        "PROMOCION",
        "GENERICO",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_header_scan_rows() -> usize {
    20
}

fn default_empty_row_limit() -> usize {
    10
}
