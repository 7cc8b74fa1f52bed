//! Error types for the flight analysis pipeline.
//!
//! - [`RuleError`] - a derivation rule could not read its inputs
//! - [`LoadError`] - reading or enriching the CSV directory failed
//! - [`AnalysisError`] - an aggregation was refused or misconfigured
//!
//! Lookups in the reference tables never fail except for the weekday
//! translation, which has no sensible default.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the row-level derivation rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Timestamp not in `dd/mm/yyyy HH:MM:SS`.
    #[error("Invalid timestamp '{value}', expected dd/mm/yyyy HH:MM:SS")]
    InvalidTimestamp { value: String },

    /// English weekday name not in the translation table.
    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),
}

/// Errors while loading and enriching the CSV directory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a file or the directory.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader failure (headers, encoding).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Directory holds no `.csv` file.
    #[error("No CSV files found in {}", .0.display())]
    NoCsvFiles(PathBuf),

    /// A derivation rule failed on a loaded row.
    #[error("Row {row}: {source}")]
    Rule {
        row: usize,
        #[source]
        source: RuleError,
    },
}

/// Errors from the aggregation engine and the reports built on it.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The dataset was not loaded, or its transformation failed.
    #[error("Dataset not loaded or compromised during transformation")]
    NotSolid,

    /// Column name not exposed by flight records or the summary table.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

/// Result type for derivation rules.
pub type RuleResult<T> = Result<T, RuleError>;

/// Result type for loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for aggregations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
