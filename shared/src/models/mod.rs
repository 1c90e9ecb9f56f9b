//! Domain models for the Retail Stock Analytics engine

mod purchases;
mod rotation;
mod sales;
mod stock;

pub use purchases::*;
pub use rotation::*;
pub use sales::*;
pub use stock::*;
