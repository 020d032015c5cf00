//! Command-line front end.
//!
//! ```bash
//! # Analyze one export; the report lands next to it as spores_analysis.log
//! spore-dims spores.csv
//!
//! # Analyze every CSV file of a directory, reports collected elsewhere
//! spore-dims --directory ./exports --output-dir ./reports
//! ```

use crate::dimension_analyzer::MEASUREMENT_COLUMN;
use crate::error::AnalyzerError;
use crate::report::console_summary;
use crate::spore_analyzer::{analyze_directory, analyze_file, AnalysisOptions, WORKER_THREADS};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spore-dims")]
#[command(about = "Calculate spore dimensions from CSV with mycology parameters.")]
#[command(version)]
pub struct Cli {
    /// Path to the CSV file containing the measurement column (format: height,width)
    #[arg(required_unless_present = "directory", conflicts_with = "directory")]
    pub csv_file: Option<PathBuf>,

    /// Analyze every CSV file in this directory instead of a single file
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Write reports here instead of next to each input file
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Header of the column holding height,width pairs
    #[arg(long, default_value = MEASUREMENT_COLUMN)]
    pub column: String,

    /// Files analyzed concurrently in directory mode
    #[arg(long, default_value_t = WORKER_THREADS)]
    pub threads: usize,

    /// Print the summary only, without writing a report file
    #[arg(long)]
    pub no_report: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Represents the source of CSV files to process
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    SingleFile(PathBuf),
    Directory(PathBuf),
}

impl Cli {
    pub fn input_source(&self) -> Option<InputSource> {
        match (&self.directory, &self.csv_file) {
            (Some(directory), _) => Some(InputSource::Directory(directory.clone())),
            (None, Some(file)) => Some(InputSource::SingleFile(file.clone())),
            (None, None) => None,
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            column: self.column.clone(),
            output_directory: self.output_dir.clone(),
            write_report: !self.no_report,
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the verbosity flag
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report_single_file(input_file: &Path, options: &AnalysisOptions) -> i32 {
    match analyze_file(input_file, options) {
        Ok(analysis) => {
            println!("{}", console_summary(&analysis.results));
            if let Some(report_path) = analysis.report_path {
                println!("\nAnalysis log saved to: {}", report_path.display());
            }
            0
        }
        Err(e @ AnalyzerError::InputNotFound(_)) => {
            eprintln!("Error: {}.", e);
            1
        }
        Err(e) => {
            eprintln!("Error processing file: {}", e);
            1
        }
    }
}

fn report_directory(directory_path: &Path, options: &AnalysisOptions, worker_threads: usize) -> i32 {
    let outcomes = match analyze_directory(directory_path, options, worker_threads) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("Error processing directory: {}", e);
            return 1;
        }
    };

    let mut failed = 0;
    for (path, outcome) in &outcomes {
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        match outcome {
            Ok(analysis) => {
                println!("{}: {}", basename, console_summary(&analysis.results));
                if let Some(report_path) = &analysis.report_path {
                    println!("  Analysis log saved to: {}", report_path.display());
                }
            }
            Err(e) => {
                debug!("Skipping {}: {:?}", path.display(), e);
                eprintln!("Error processing file {}: {}", basename, e);
                failed += 1;
            }
        }
    }

    println!(
        "\nSuccessfully processed {} of {} CSV files from directory",
        outcomes.len() - failed,
        outcomes.len()
    );

    if failed > 0 { 1 } else { 0 }
}

/// Runs the analysis described by `cli` and returns the process exit code
pub fn run(cli: &Cli) -> i32 {
    let options = cli.analysis_options();

    match cli.input_source() {
        Some(InputSource::SingleFile(input_file)) => report_single_file(&input_file, &options),
        Some(InputSource::Directory(directory_path)) => {
            report_directory(&directory_path, &options, cli.threads)
        }
        None => {
            eprintln!("Error: no input given; pass a CSV file or --directory <DIR>");
            2
        }
    }
}

/// Main entry point: parses arguments, sets up logging, runs, and exits
/// with a non-zero status if anything failed.
pub fn spore_analyzer_main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    process::exit(run(&cli));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_single_file_with_defaults() {
        let cli = Cli::try_parse_from(["spore-dims", "spores.csv"]).unwrap();

        assert_eq!(
            cli.input_source(),
            Some(InputSource::SingleFile(PathBuf::from("spores.csv")))
        );
        assert_eq!(cli.column, "Length");
        assert_eq!(cli.threads, WORKER_THREADS);
        assert!(cli.analysis_options().write_report);
        assert!(cli.analysis_options().output_directory.is_none());
    }

    #[test]
    fn parses_directory_mode_options() {
        let cli = Cli::try_parse_from([
            "spore-dims",
            "--directory",
            "exports",
            "-o",
            "reports",
            "--column",
            "Size",
            "--threads",
            "2",
            "--no-report",
        ])
        .unwrap();

        assert_eq!(
            cli.input_source(),
            Some(InputSource::Directory(PathBuf::from("exports")))
        );
        let options = cli.analysis_options();
        assert_eq!(options.column, "Size");
        assert_eq!(options.output_directory, Some(PathBuf::from("reports")));
        assert!(!options.write_report);
        assert_eq!(cli.threads, 2);
    }

    #[test]
    fn requires_an_input() {
        assert!(Cli::try_parse_from(["spore-dims"]).is_err());
        assert!(Cli::try_parse_from(["spore-dims", "a.csv", "--directory", "d"]).is_err());
    }

    #[test]
    fn exit_codes_follow_outcome() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.csv");
        let bad = dir.path().join("bad.csv");
        fs::write(&good, "Length\n\"8.0,3.0\"\n\"10.0,4.0\"\n").unwrap();
        fs::write(&bad, "Length\n\"8.0\"\n").unwrap();

        let run_with = |args: &[&str]| {
            let mut argv = vec!["spore-dims"];
            argv.extend_from_slice(args);
            run(&Cli::try_parse_from(argv).unwrap())
        };

        assert_eq!(run_with(&[good.to_str().unwrap()]), 0);
        assert!(dir.path().join("good_analysis.log").exists());
        assert_eq!(run_with(&[bad.to_str().unwrap()]), 1);
        assert_eq!(run_with(&[dir.path().join("missing.csv").to_str().unwrap()]), 1);
        assert_eq!(run_with(&["--directory", dir.path().to_str().unwrap(), "--no-report"]), 1);
    }
}
