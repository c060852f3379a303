#![warn(missing_docs)]

//! 
//! A crate for multi-label learning with two parts.
//! 
//! - Training a collective multi-label CRF ([`Cmlcrf`]).
//!     A [`TrainingController`] builds or loads the model,
//!     drives an [`Optimizer`] (L-BFGS or gradient descent) for
//!     a fixed number of rounds, evaluates the model after every round,
//!     and optionally persists it.
//! 
//! 
//! - Inspecting multi-label boosting ensembles
//!     ([`MultiLabelBoosting`]).
//!     The [`inspector`] module ranks features by the cumulative split gain
//!     of a class's regression trees and counts
//!     how the rows of a sample spread over decision paths.
//! 
//! 
//! # Example
//! 
//! ```no_run
//! use minilabels::prelude::*;
//! 
//! let properties = Properties::from_file("experiment.properties").unwrap();
//! let config = TrainingConfig::from_properties(&properties).unwrap();
//! 
//! let train = SampleReader::new()
//!     .file(&config.train_data)
//!     .read()
//!     .unwrap();
//! let test = SampleReader::new()
//!     .file(&config.test_data)
//!     .n_classes(train.n_classes())
//!     .n_features(train.shape().1)
//!     .read()
//!     .unwrap();
//! 
//! let outcome = TrainingController::new(config)
//!     .on_snapshot(|snapshot| println!("{snapshot}"))
//!     .run(&train, &test)
//!     .unwrap();
//! println!("{}", outcome.report);
//! ```

pub mod common;
pub mod error;
pub mod sample;
pub mod metrics;
pub mod config;
pub mod optimization;
pub mod crf;
pub mod training;
pub mod boosting;
pub mod inspector;

pub mod prelude;


pub use error::{Error, Result};

pub use sample::{
    MultiLabel,
    MultiLabelSample,
    SampleReader,
    SparseRow,
};

pub use config::{Properties, TrainingConfig, WarmStart};

pub use optimization::{
    LossOracle,
    Optimizer,
    Lbfgs,
    GradientDescent,
    Terminator,
};

pub use crf::{Cmlcrf, CrfLoss};

pub use training::{
    EvaluationSnapshot,
    FinalReport,
    TrainingController,
    TrainingOutcome,
};

pub use boosting::{
    MultiLabelBoosting,
    WeakRegressor,
    RegressionTree,
    ConstantRegressor,
};
