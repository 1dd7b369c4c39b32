//! Core domain types and logic.

pub mod analysis;
pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod price_series;
pub mod returns;
pub mod simulation;
pub mod summary;
pub mod weights;
