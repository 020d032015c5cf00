//! # Spore Dimension Analyzer
//!
//! Computes spore size statistics and mycology parameters (Q, C, Me, Qe)
//! from AmScope CSV exports whose `Length` column holds `height,width`
//! pairs in micrometers, and writes a plain text report per file.
//!
//! ## Usage
//!
//! ### As a library
//!
//! ```no_run
//! use spore_dimension_analyzer::csv_table::read_csv_table;
//! use spore_dimension_analyzer::dimension_analyzer::{analyze, parse_samples, MEASUREMENT_COLUMN};
//! use spore_dimension_analyzer::report::console_summary;
//!
//! fn main() -> spore_dimension_analyzer::Result<()> {
//!     let table = read_csv_table("spores.csv")?;
//!     let results = analyze(parse_samples(&table, MEASUREMENT_COLUMN)?)?;
//!     println!("{}", console_summary(&results));
//!     Ok(())
//! }
//! ```
//!
//! ### From command line
//!
//! ```bash
//! $ cargo run --release -- path/to/spores.csv
//! $ cargo run --release -- --directory path/to/exports --output-dir reports
//! ```

pub mod cli;
pub mod csv_table;
pub mod dimension_analyzer;
pub mod error;
pub mod report;
pub mod spore_analyzer;

pub use dimension_analyzer::{analyze, parse_samples, AnalysisResult, Sample, SampleSet};
pub use error::{AnalyzerError, Result};
