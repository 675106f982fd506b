#![forbid(unsafe_code)]

//! Core domain model and computation for runlog.
//!
//! This crate provides:
//! - Domain types (run entries, metrics, predictions)
//! - CSV parsing and validation
//! - Metrics engine (aggregates, consistency, trend, weekly buckets)
//! - Linear-regression forecasting
//! - Chart series, reports and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod parser;
pub mod validate;
pub mod metrics;
pub mod forecast;
pub mod series;
pub mod report;
pub mod export;

// Re-export commonly used types
pub use error::{Error, FormatError, Result, ValidationError};
pub use types::*;
pub use config::Config;
pub use parser::parse;
pub use validate::validate;
pub use metrics::{
    advanced_metrics, advanced_metrics_by_person, basic_metrics, iso_week_key, metrics_by_person,
};
pub use forecast::predict;
pub use report::{load, load_file, OverallReport, PersonReport};
