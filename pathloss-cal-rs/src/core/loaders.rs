//! Loaders for instrument sweep CSV files and normalized curve files.
//!
//! This module provides parsers for:
//! - Raw sweep CSV exports (`Freq(Hz),S21(DB),S21(DEG)` header)
//! - Normalized `.txt` curves written by [`crate::core::writers`]

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;

/// Header line that precedes the sweep data in instrument exports.
pub const SWEEP_HEADER: &str = "Freq(Hz),S21(DB),S21(DEG)";

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid magnitude '{value}' on line {line} of '{path}'")]
    InvalidMagnitude {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("invalid number '{value}' in '{path}'")]
    InvalidNumber { path: PathBuf, value: String },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// A single sweep point.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSample {
    /// Frequency exactly as it appeared in the source.
    pub frequency: String,
    /// S21 magnitude in dB.
    pub magnitude_db: f64,
}

impl fmt::Display for SweepSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.magnitude_db.is_nan() {
            // `{:.2}` would print `NaN`; outputs use lowercase non-finite values.
            write!(f, "{},nan", self.frequency)
        } else {
            write!(f, "{},{:.2}", self.frequency, self.magnitude_db)
        }
    }
}

/// Load the samples of an instrument sweep CSV.
///
/// Data starts after the first line equal to [`SWEEP_HEADER`] (ignoring
/// surrounding whitespace). When no such line exists, every line of the file
/// is treated as data.
///
/// Blank lines and lines with fewer than two comma-separated fields are
/// skipped. The first field is kept verbatim; the second must parse as a
/// float.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any data line has a
/// non-numeric magnitude. No samples are returned in that case.
pub fn load_sweep<P: AsRef<Path>>(path: P) -> Result<Vec<SweepSample>> {
    let path = path.as_ref();
    let io_err = |source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(io_err)?;

    let start = lines
        .iter()
        .position(|line| line.trim() == SWEEP_HEADER)
        .map_or(0, |idx| idx + 1);

    let mut samples = Vec::with_capacity(lines.len() - start);

    for (idx, line) in lines.iter().enumerate().skip(start) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            continue;
        }

        let magnitude_db: f64 =
            fields[1]
                .trim()
                .parse()
                .map_err(|_| LoaderError::InvalidMagnitude {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    value: fields[1].to_string(),
                })?;

        samples.push(SweepSample {
            frequency: fields[0].to_string(),
            magnitude_db,
        });
    }

    Ok(samples)
}

/// Load a normalized curve as `(frequency_hz, magnitude_db)` points.
///
/// Records without exactly two fields are ignored.
pub fn load_curve<P: AsRef<Path>>(path: P) -> Result<Vec<(f64, f64)>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let parse = |value: &str| -> Result<f64> {
        value.trim().parse().map_err(|_| LoaderError::InvalidNumber {
            path: path.to_path_buf(),
            value: value.to_string(),
        })
    };

    let mut points = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        if record.len() != 2 {
            continue;
        }

        points.push((parse(&record[0])?, parse(&record[1])?));
    }

    Ok(points)
}
