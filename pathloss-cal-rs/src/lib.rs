//! Path-loss calibration sweep post-processing.
//!
//! This crate provides tools for:
//! - Parsing instrument sweep CSV exports (spectrum analyzer, power meter)
//! - Renaming normalized sweeps according to the channel naming convention
//! - Grouping outputs by measurement category (RX, NF_SPEC, NF_OSC)
//! - Rendering one comparison PNG per category
//!
//! # Example
//!
//! ```no_run
//! use pathloss_cal::{logging::RunLogger, processors::run_calibration, PlotConfig};
//! use std::path::Path;
//!
//! let log = RunLogger::console(log::LevelFilter::Info);
//! let summary = run_calibration(Path::new("cal"), &PlotConfig::default(), &log).unwrap();
//! println!("{} outputs written", summary.written.len());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod processors;
pub mod visualization;

pub use config::{PipelineConfig, PlotConfig};
pub use crate::core::loaders::SweepSample;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
