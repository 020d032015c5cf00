//! Spore Dimension Analyzer - Main Application
//!
//! # Usage
//!
//! ```bash
//! # Single export, report written next to it
//! $ cargo run --release -- path/to/spores.csv
//!
//! # Every CSV file in a directory
//! $ cargo run --release -- --directory path/to/exports
//! ```

use spore_dimension_analyzer::cli::spore_analyzer_main;

/// call from module
fn main() {
    spore_analyzer_main();
}
