//! Writers for normalized calibration curves.
//!
//! Output files are plain text: one `"{frequency},{magnitude:.2}"` line per
//! sample, newline-joined with no trailing newline and no header.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::loaders::SweepSample;
use super::naming::sg2_sibling;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Write samples to a single file, overwriting it.
fn write_lines(path: &Path, samples: &[SweepSample]) -> Result<()> {
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let write_err = |e| WriteError::WriteFile {
        path: path.display().to_string(),
        source: e,
    };

    for (i, sample) in samples.iter().enumerate() {
        if i > 0 {
            writer.write_all(b"\n").map_err(write_err)?;
        }
        write!(writer, "{}", sample).map_err(write_err)?;
    }

    writer.flush().map_err(write_err)
}

/// Write a normalized curve to `path`.
///
/// Parent directories are created as needed. When the file name starts with
/// `SG1_`, an identical `SG2_` twin is written to the same directory.
///
/// # Returns
///
/// Every path written, the requested one first.
///
/// # Example
///
/// ```no_run
/// use pathloss_cal::core::loaders::SweepSample;
/// use pathloss_cal::core::writers::write_curve;
/// use std::path::Path;
///
/// let samples = vec![SweepSample { frequency: "1000000".into(), magnitude_db: -3.456 }];
/// let written = write_curve(Path::new("SG1_RXA.txt"), &samples).unwrap();
/// assert_eq!(written.len(), 2);
/// ```
pub fn write_curve(path: &Path, samples: &[SweepSample]) -> Result<Vec<PathBuf>> {
    ensure_parent_dirs(path)?;
    write_lines(path, samples)?;

    let mut written = vec![path.to_path_buf()];

    let twin = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(sg2_sibling);

    if let Some(twin) = twin {
        let twin_path = path.with_file_name(twin);
        write_lines(&twin_path, samples)?;
        written.push(twin_path);
    }

    Ok(written)
}
