//! Core data types and I/O operations.

pub mod loaders;
pub mod naming;
pub mod writers;

pub use loaders::{load_curve, load_sweep, LoaderError, SweepSample, SWEEP_HEADER};
pub use naming::{output_names, Channel, SourceKind};
pub use writers::{write_curve, WriteError};
