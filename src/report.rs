//! Console and log-file rendering of an [`AnalysisResult`].
//!
//! Lengths and widths are printed with one decimal place, the derived
//! mycology parameters with two. The analyzer hands over full-precision
//! values; rounding happens only here.

use crate::dimension_analyzer::AnalysisResult;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Appended to the input file stem to name the report
pub const REPORT_SUFFIX: &str = "_analysis.log";

/// Width of the ruled lines framing each report section
const RULE_WIDTH: usize = 60;

/// Timestamp layout used in the report header
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The canonical one-line description, e.g.
/// `8.0-10.0 (9.0) µm x 3.0-4.0 (3.5) µm; Q=2.58; σ=0.08; C=88.89%; Me=9.00 x 3.50; Qe=2.57`
pub fn formatted_summary(results: &AnalysisResult) -> String {
    let (me_length, me_width) = results.mean_of_extremes();
    format!(
        "{:.1}-{:.1} ({:.1}) µm x {:.1}-{:.1} ({:.1}) µm; Q={:.2}; σ={:.2}; C={:.2}%; Me={:.2} x {:.2}; Qe={:.2}",
        results.height_min(),
        results.height_max(),
        results.height_mean(),
        results.width_min(),
        results.width_max(),
        results.width_mean(),
        results.q_mean(),
        results.q_stddev(),
        results.coefficient_of_variation(),
        me_length,
        me_width,
        results.q_at_extremes(),
    )
}

/// The formatted summary followed by the spore count, as printed on the console
pub fn console_summary(results: &AnalysisResult) -> String {
    format!("{}; N={}", formatted_summary(results), results.sample_count())
}

/// Writes the full text report to `report_file`.
///
/// # Arguments
///
/// * `report_file` - Destination of the report text
/// * `input_file_path` - The analyzed CSV file, echoed in the header
/// * `results` - Statistics to report
/// * `timestamp` - Analysis date, already formatted (see [`TIMESTAMP_FORMAT`])
pub fn write_report_contents<W: Write>(
    report_file: &mut W,
    input_file_path: &Path,
    results: &AnalysisResult,
    timestamp: &str,
) -> io::Result<()> {
    let heavy_rule = "=".repeat(RULE_WIDTH);
    let light_rule = "-".repeat(RULE_WIDTH);
    let (me_length, me_width) = results.mean_of_extremes();

    writeln!(report_file, "{}", heavy_rule)?;
    writeln!(report_file, "SPORE DIMENSION ANALYSIS REPORT")?;
    writeln!(report_file, "{}\n", heavy_rule)?;
    writeln!(report_file, "Analysis Date: {}", timestamp)?;
    writeln!(report_file, "Input File: {}", input_file_path.display())?;
    writeln!(
        report_file,
        "Number of Spores Measured: {}\n",
        results.sample_count()
    )?;

    writeln!(report_file, "{}", light_rule)?;
    writeln!(report_file, "DIMENSION STATISTICS")?;
    writeln!(report_file, "{}", light_rule)?;
    writeln!(
        report_file,
        "Length (L):  {:.1}-{:.1} µm (mean: {:.1} µm)",
        results.height_min(),
        results.height_max(),
        results.height_mean()
    )?;
    writeln!(
        report_file,
        "Width (W):   {:.1}-{:.1} µm (mean: {:.1} µm)\n",
        results.width_min(),
        results.width_max(),
        results.width_mean()
    )?;

    writeln!(report_file, "{}", light_rule)?;
    writeln!(report_file, "MYCOLOGY PARAMETERS")?;
    writeln!(report_file, "{}", light_rule)?;
    writeln!(
        report_file,
        "Q (L/W ratio):           {:.2} (σ = {:.2})",
        results.q_mean(),
        results.q_stddev()
    )?;
    writeln!(
        report_file,
        "C (Coefficient of Var):  {:.2}%",
        results.coefficient_of_variation()
    )?;
    writeln!(
        report_file,
        "Me (Mean of extremes):   {:.2} x {:.2} µm",
        me_length,
        me_width
    )?;
    writeln!(
        report_file,
        "Qe (Mean L/W ratio):     {:.2}\n",
        results.q_at_extremes()
    )?;

    writeln!(report_file, "{}", light_rule)?;
    writeln!(report_file, "FORMATTED OUTPUT")?;
    writeln!(report_file, "{}", light_rule)?;
    writeln!(report_file, "{}", formatted_summary(results))?;
    writeln!(report_file, "{}", heavy_rule)?;

    Ok(())
}

/// Location of the report for `input_file_path`.
///
/// `spores.csv` becomes `spores_analysis.log`, placed next to the input
/// unless `output_directory` is given. Any other extension is kept, so
/// `spores.CSV` becomes `spores.CSV_analysis.log`.
pub fn report_path_for(input_file_path: &Path, output_directory: Option<&Path>) -> PathBuf {
    let file_name = input_file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "measurements".to_string());

    // Only an exact lowercase `.csv` is stripped, so `a.csv` and `a.CSV` never share a report
    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name.as_str());

    let directory = output_directory
        .map(Path::to_path_buf)
        .or_else(|| input_file_path.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    directory.join(format!("{}{}", stem, REPORT_SUFFIX))
}

/// Writes the text report for one analyzed file.
///
/// # Arguments
///
/// * `input_file_path` - The analyzed CSV file
/// * `output_directory` - Where to put the report; defaults to the input's directory
/// * `results` - Statistics to report
///
/// # Returns
///
/// * `Result<PathBuf>` - Path of the written report
pub fn write_report(
    input_file_path: &Path,
    output_directory: Option<&Path>,
    results: &AnalysisResult,
) -> Result<PathBuf> {
    if let Some(directory) = output_directory {
        fs::create_dir_all(directory)?;
    }

    let report_path = report_path_for(input_file_path, output_directory);
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

    let mut report_file = BufWriter::new(File::create(&report_path)?);
    write_report_contents(&mut report_file, input_file_path, results, &timestamp)?;
    report_file.flush()?;
    info!("Wrote report {}", report_path.display());

    Ok(report_path)
}
