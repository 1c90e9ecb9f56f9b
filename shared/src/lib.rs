//! Shared types and models for the Retail Stock Analytics engine
//!
//! This crate contains the DTOs exchanged between the analysis engine and its
//! consumers (reporting/API layers), plus the pure string-normalization
//! helpers both sides rely on.

pub mod models;
pub mod normalize;
pub mod types;

pub use models::*;
pub use normalize::*;
pub use types::*;
