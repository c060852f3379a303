//! The training run: warm-start selection, the round loop,
//! per-round evaluation, the final report and persistence.

/// Per-round evaluation.
pub mod snapshot;

/// The end-of-run evaluation.
pub mod report;

/// Drives a whole run.
pub mod controller;


pub use snapshot::EvaluationSnapshot;
pub use report::FinalReport;
pub use controller::{TrainingController, TrainingOutcome};
