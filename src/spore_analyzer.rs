//! File-level driver: read one export, analyze it, write its report.
//!
//! Directory mode runs the same per-file pipeline on scoped worker threads.
//! Each worker owns its files outright, so nothing is shared between them
//! and results come back through the join handles in file-name order.

use crate::csv_table::read_csv_table;
use crate::dimension_analyzer::{analyze, parse_samples, AnalysisResult, MEASUREMENT_COLUMN};
use crate::error::{AnalyzerError, Result};
use crate::report::write_report;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, warn};

/// Number of worker threads used in directory mode unless overridden
pub const WORKER_THREADS: usize = 8;

/// Settings shared by every analyzed file
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Header of the `height,width` column
    pub column: String,
    /// Where reports go; `None` puts each next to its input
    pub output_directory: Option<PathBuf>,
    pub write_report: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            column: MEASUREMENT_COLUMN.to_string(),
            output_directory: None,
            write_report: true,
        }
    }
}

/// Outcome of analyzing one file
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub results: AnalysisResult,
    /// Path of the written report, if one was requested
    pub report_path: Option<PathBuf>,
}

/// Analyzes a single CSV export and optionally writes its report.
///
/// # Arguments
///
/// * `input_file_path` - The AmScope CSV export
/// * `options` - Column name and report settings
///
/// # Returns
///
/// * `Result<FileAnalysis>` - Statistics plus the report location, or the
///   first error met while reading, parsing, analyzing or writing
pub fn analyze_file(input_file_path: &Path, options: &AnalysisOptions) -> Result<FileAnalysis> {
    if !input_file_path.exists() {
        return Err(AnalyzerError::InputNotFound(input_file_path.to_path_buf()));
    }

    info!("Analyzing {}", input_file_path.display());

    let table = read_csv_table(input_file_path)?;
    let samples = parse_samples(&table, &options.column)?;
    let results = analyze(samples)?;

    let report_path = if options.write_report {
        Some(write_report(
            input_file_path,
            options.output_directory.as_deref(),
            &results,
        )?)
    } else {
        None
    };

    Ok(FileAnalysis {
        results,
        report_path,
    })
}

/// CSV files directly inside `directory_path`, sorted by name
pub fn list_csv_files(directory_path: &Path) -> Result<Vec<PathBuf>> {
    let mut csv_files = Vec::new();

    for entry in fs::read_dir(directory_path)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map(|extension| extension.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if path.is_file() && is_csv {
            csv_files.push(path);
        }
    }

    csv_files.sort();
    Ok(csv_files)
}

/// Analyzes every CSV file in a directory in parallel.
///
/// A file that fails does not stop the others; its error is returned in
/// its slot. Only failing to list the directory is an error of the whole call.
///
/// # Arguments
///
/// * `directory_path` - Directory holding the exports
/// * `options` - Settings applied to every file
/// * `worker_threads` - Upper bound on concurrently analyzed files (at least 1)
///
/// # Returns
///
/// * `Result<Vec<(PathBuf, Result<FileAnalysis>)>>` - One entry per CSV file, sorted by path
pub fn analyze_directory(
    directory_path: &Path,
    options: &AnalysisOptions,
    worker_threads: usize,
) -> Result<Vec<(PathBuf, Result<FileAnalysis>)>> {
    let csv_files = list_csv_files(directory_path)?;
    if csv_files.is_empty() {
        warn!("No CSV files found in {}", directory_path.display());
        return Ok(Vec::new());
    }

    let files_per_worker = csv_files.len().div_ceil(worker_threads.max(1));
    debug!(
        "Analyzing {} files, {} per worker",
        csv_files.len(),
        files_per_worker
    );

    let outcomes = thread::scope(|scope| {
        let handles: Vec<_> = csv_files
            .chunks(files_per_worker)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|path| (path.clone(), analyze_file(path, options)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect::<Vec<_>>()
    });

    Ok(outcomes)
}
