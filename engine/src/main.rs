//! Retail Stock Analytics - command line runner
//!
//! Runs the stock-evolution and rotation-analysis engine over manually
//! exported sales and purchase spreadsheets and prints the result DTOs as
//! JSON for the reporting layer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use retail_stock_analytics_engine::services::{
    PurchaseImportService, RotationService, SalesImportService, StockEvolutionService,
};
use retail_stock_analytics_engine::EngineConfig;

#[derive(Parser)]
#[command(name = "stock-analytics", about = "Spreadsheet-derived stock evolution and rotation analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a sales export and print the extracted sale records
    Sales {
        /// Sales spreadsheet (first worksheet is read)
        file: PathBuf,
    },
    /// Merge purchase header and detail exports into dated purchase records
    Purchases {
        /// Purchase detail spreadsheet
        details: PathBuf,
        /// Purchase header spreadsheet (invoice number → date)
        #[arg(long)]
        headers: PathBuf,
    },
    /// Simulate the daily stock curve of one base product
    Stock {
        /// Sales spreadsheet
        sales: PathBuf,
        /// Purchase detail spreadsheet
        #[arg(long)]
        details: PathBuf,
        /// Purchase header spreadsheet
        #[arg(long)]
        headers: PathBuf,
        /// Base product to simulate
        #[arg(long)]
        product: String,
    },
    /// Aggregate purchased vs. sold rotation per product, color, and point
    /// of sale
    Rotation {
        /// Sales spreadsheet
        sales: PathBuf,
        /// Purchase detail spreadsheet
        #[arg(long)]
        details: PathBuf,
        /// Purchase header spreadsheet
        #[arg(long)]
        headers: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stock_analytics=info,retail_stock_analytics_engine=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Arc::new(EngineConfig::load()?);
    tracing::info!(environment = %config.environment, "starting stock analytics");

    let cli = Cli::parse();
    match cli.command {
        Commands::Sales { file } => {
            let sales = SalesImportService::new(config).import(&read(&file)?)?;
            print_json(&sales)
        }
        Commands::Purchases { details, headers } => {
            let service = PurchaseImportService::new(config);
            let header_map = service.import_headers(&read(&headers)?)?;
            let purchases = service.import_details(&read(&details)?, &header_map)?;
            print_json(&purchases)
        }
        Commands::Stock {
            sales,
            details,
            headers,
            product,
        } => {
            let sale_records = SalesImportService::new(config.clone())
                .import(&read(&sales)?)?
                .records;
            let purchase_service = PurchaseImportService::new(config.clone());
            let header_map = purchase_service.import_headers(&read(&headers)?)?;
            let purchase_records = purchase_service
                .import_details(&read(&details)?, &header_map)?
                .records;

            let series = StockEvolutionService::new(config).evolution(
                &product,
                &purchase_records,
                &sale_records,
            )?;
            print_json(&series)
        }
        Commands::Rotation {
            sales,
            details,
            headers,
        } => {
            let sale_records = SalesImportService::new(config.clone())
                .import(&read(&sales)?)?
                .records;
            let purchase_service = PurchaseImportService::new(config.clone());
            let header_map = purchase_service.import_headers(&read(&headers)?)?;
            let purchase_records = purchase_service
                .import_details(&read(&details)?, &header_map)?
                .records;

            let report = RotationService::new(config).rotation(&purchase_records, &sale_records);
            print_json(&report)
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("could not read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
