//! # Spore Dimension Analyzer
//!
//! Turns the measurement column of an AmScope export into (height, width)
//! samples and computes the size statistics and mycology parameters used in
//! species descriptions:
//!
//! - length and width ranges and means
//! - Q, the mean of the per-spore length/width ratios, with its standard deviation
//! - C, reported as `100 - (σ / mean × 100)` of the length
//! - Me, the mean of the extremes for length and width
//! - Qe, mean length over mean width
//!
//! Everything here is a pure function of its input. Reading files and
//! printing results belongs to [`crate::csv_table`] and [`crate::report`].

use crate::csv_table::CsvTable;
use crate::error::{AnalyzerError, Result};
use tracing::debug;

/// Header of the column holding `height,width` pairs in AmScope exports
pub const MEASUREMENT_COLUMN: &str = "Length";

/// One measured spore, in micrometers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub height: f64,
    pub width: f64,
}

impl Sample {
    pub fn new(height: f64, width: f64) -> Self {
        Self { height, width }
    }

    /// Length/width ratio of this spore
    pub fn q(&self) -> f64 {
        self.height / self.width
    }
}

/// Every parsed sample of one input, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        pairs.iter().map(|&(h, w)| Sample::new(h, w)).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn heights(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.height).collect()
    }

    pub fn widths(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.width).collect()
    }

    /// Per-spore Q values, one per sample
    pub fn q_ratios(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::q).collect()
    }
}

impl FromIterator<Sample> for SampleSet {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Parses the measurement column of a table into a [`SampleSet`].
///
/// Each cell must hold exactly two comma-separated decimal numbers,
/// `height,width`, optionally padded with whitespace. The parse is all or
/// nothing: the first bad row aborts it.
///
/// # Arguments
///
/// * `table` - Header row and records read from the CSV export
/// * `column` - Header of the measurement column, normally [`MEASUREMENT_COLUMN`]
///
/// # Returns
///
/// * `Result<SampleSet>` - One sample per record, or a `Schema` error when
///   the column is absent, or a `Parse` error naming the first malformed row
pub fn parse_samples(table: &CsvTable, column: &str) -> Result<SampleSet> {
    let column_index = table
        .column_index(column)
        .ok_or_else(|| AnalyzerError::Schema {
            column: column.to_string(),
            available: table.headers.join(", "),
        })?;

    let samples = table
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let row = index + 1;
            match record.get(column_index) {
                Some(cell) => parse_measurement(row, cell),
                None => Err(AnalyzerError::Parse {
                    row,
                    value: String::new(),
                    reason: "missing value".to_string(),
                }),
            }
        })
        .collect::<Result<SampleSet>>()?;

    debug!("Parsed {} samples from column '{}'", samples.len(), column);
    Ok(samples)
}

/// Parses a single `height,width` cell
pub fn parse_measurement(row: usize, cell: &str) -> Result<Sample> {
    let parse_error = |reason: String| AnalyzerError::Parse {
        row,
        value: cell.to_string(),
        reason,
    };

    if cell.trim().is_empty() {
        return Err(parse_error("missing value".to_string()));
    }

    let tokens: Vec<&str> = cell.split(',').map(str::trim).collect();
    let [height, width] = tokens.as_slice() else {
        return Err(parse_error(format!(
            "expected 'height,width', found {} value(s)",
            tokens.len()
        )));
    };

    let parse_number = |name: &str, token: &str| {
        token
            .parse::<f64>()
            .map_err(|e| parse_error(format!("{} '{}' is not a number: {}", name, token, e)))
    };

    Ok(Sample::new(
        parse_number("height", *height)?,
        parse_number("width", *width)?,
    ))
}

/// Minimum, maximum and arithmetic mean of one series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl DimensionSummary {
    /// Summarizes a non-empty series.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(AnalyzerError::InsufficientData {
                statistic: "mean",
                required: 1,
                actual: 0,
            });
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        Ok(Self { min, max, mean })
    }

    /// Average of the smallest and largest value
    pub fn mean_of_extremes(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Sample standard deviation (divisor n - 1).
///
/// Needs at least two values; a single measurement has no spread to estimate.
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    let n = values.len();
    if n < 2 {
        return Err(AnalyzerError::InsufficientData {
            statistic: "standard deviation",
            required: 2,
            actual: n,
        });
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|&x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;

    Ok(variance.sqrt())
}

/// Statistics for one input, computed once by [`analyze`] and read-only afterwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisResult {
    height: DimensionSummary,
    height_stddev: f64,
    width: DimensionSummary,
    q_mean: f64,
    q_stddev: f64,
    coefficient_of_variation: f64,
    mean_of_extremes: (f64, f64),
    q_at_extremes: f64,
    sample_count: usize,
}

impl AnalysisResult {
    pub fn height_min(&self) -> f64 {
        self.height.min
    }

    pub fn height_max(&self) -> f64 {
        self.height.max
    }

    pub fn height_mean(&self) -> f64 {
        self.height.mean
    }

    pub fn height_stddev(&self) -> f64 {
        self.height_stddev
    }

    pub fn width_min(&self) -> f64 {
        self.width.min
    }

    pub fn width_max(&self) -> f64 {
        self.width.max
    }

    pub fn width_mean(&self) -> f64 {
        self.width.mean
    }

    /// Mean of the per-spore Q values
    pub fn q_mean(&self) -> f64 {
        self.q_mean
    }

    pub fn q_stddev(&self) -> f64 {
        self.q_stddev
    }

    /// `100 - (height σ / height mean × 100)`, or 100 when the mean length is zero
    pub fn coefficient_of_variation(&self) -> f64 {
        self.coefficient_of_variation
    }

    /// `(length, width)` means of the extremes
    pub fn mean_of_extremes(&self) -> (f64, f64) {
        self.mean_of_extremes
    }

    /// Mean length over mean width, or 0 when the mean width is zero.
    /// Not the same quantity as [`Self::q_mean`].
    pub fn q_at_extremes(&self) -> f64 {
        self.q_at_extremes
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    fn ensure_finite(self) -> Result<Self> {
        let (me_height, me_width) = self.mean_of_extremes;
        let fields = [
            ("height_min", self.height.min),
            ("height_max", self.height.max),
            ("height_mean", self.height.mean),
            ("height_stddev", self.height_stddev),
            ("width_min", self.width.min),
            ("width_max", self.width.max),
            ("width_mean", self.width.mean),
            ("q_mean", self.q_mean),
            ("q_stddev", self.q_stddev),
            ("coefficient_of_variation", self.coefficient_of_variation),
            ("mean_of_extremes (length)", me_height),
            ("mean_of_extremes (width)", me_width),
            ("q_at_extremes", self.q_at_extremes),
        ];

        match fields.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((statistic, value)) => Err(AnalyzerError::Computation { statistic, value }),
            None => Ok(self),
        }
    }
}

/// Computes all spore statistics for a sample set.
///
/// Standard deviations are sample standard deviations, so at least two
/// samples are required; fewer yields `InsufficientData`. Two degenerate
/// inputs are answered by fixed values instead of a division by zero: a zero
/// mean length gives C = 100 and a zero mean width gives Qe = 0. Any other
/// NaN or infinity in the result (a zero width in one row, `nan` tokens in the
/// export) is reported as a `Computation` error.
///
/// # Arguments
///
/// * `samples` - The parsed measurements; consumed by the analysis
///
/// # Returns
///
/// * `Result<AnalysisResult>` - The finished statistics
pub fn analyze(samples: SampleSet) -> Result<AnalysisResult> {
    let heights = samples.heights();
    let widths = samples.widths();
    let q_ratios = samples.q_ratios();

    let height = DimensionSummary::from_values(&heights)?;
    let height_stddev = sample_std_dev(&heights)?;

    let width = DimensionSummary::from_values(&widths)?;
    // Width spread is not reported, but a set too small for it is rejected all the same
    sample_std_dev(&widths)?;

    let q = DimensionSummary::from_values(&q_ratios)?;
    let q_stddev = sample_std_dev(&q_ratios)?;

    let coefficient_of_variation = if height.mean != 0.0 {
        100.0 - (height_stddev / height.mean) * 100.0
    } else {
        100.0
    };

    let q_at_extremes = if width.mean != 0.0 {
        height.mean / width.mean
    } else {
        0.0
    };

    let result = AnalysisResult {
        height,
        height_stddev,
        width,
        q_mean: q.mean,
        q_stddev,
        coefficient_of_variation,
        mean_of_extremes: (height.mean_of_extremes(), width.mean_of_extremes()),
        q_at_extremes,
        sample_count: samples.len(),
    };

    debug!("Analyzed {} samples", result.sample_count);
    result.ensure_finite()
}
