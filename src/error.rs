//! Error taxonomy shared by the analyzer core and its I/O collaborators.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, analyzing or reporting spore measurements
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The measurement column is not present in the header row
    #[error("Column '{column}' not found in CSV header (available: {available})")]
    Schema { column: String, available: String },

    /// A measurement cell is missing or is not a `height,width` pair
    #[error("Row {row}: invalid measurement '{value}': {reason}")]
    Parse {
        /// 1-based data row, header excluded
        row: usize,
        value: String,
        reason: String,
    },

    /// Fewer samples than a statistic requires
    #[error("Insufficient data: {statistic} needs at least {required} samples, got {actual}")]
    InsufficientData {
        statistic: &'static str,
        required: usize,
        actual: usize,
    },

    /// A statistic came out NaN or infinite
    #[error("Computation produced a non-finite {statistic}: {value}")]
    Computation { statistic: &'static str, value: f64 },

    #[error("File '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, AnalyzerError>;
