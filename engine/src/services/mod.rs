//! Analysis services for the stock analytics engine

pub mod purchases;
pub mod rotation;
pub mod sales;
pub mod stock;

pub use purchases::PurchaseImportService;
pub use rotation::RotationService;
pub use sales::SalesImportService;
pub use stock::StockEvolutionService;
