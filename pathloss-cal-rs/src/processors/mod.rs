//! Data processing modules.

pub mod calibration;
pub mod grouping;

// Re-export key types for convenience
pub use calibration::{list_sources, run_calibration, CalibrationRun, RunPhase, RunSummary};
pub use grouping::{classify, Category, FileGroups, CATEGORY_RULES};
