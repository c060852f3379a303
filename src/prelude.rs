//! Exports the types needed for a training run or an inspection.
//! 
pub use crate::error::{Error, Result};


pub use crate::sample::{
    MultiLabel,
    MultiLabelSample,
    SampleReader,
    SparseRow,
};


pub use crate::config::{
    Properties,
    TrainingConfig,
    WarmStart,
};


pub use crate::optimization::{
    // Traits
    LossOracle,
    Optimizer,

    // Optimizers
    Lbfgs,
    GradientDescent,
};


pub use crate::crf::{Cmlcrf, CrfLoss};


pub use crate::training::{
    EvaluationSnapshot,
    FinalReport,
    TrainingController,
    TrainingOutcome,
};


pub use crate::boosting::{
    MultiLabelBoosting,
    WeakRegressor,
    RegressionTree,
    ConstantRegressor,
    Node,
    Splitter,
};


pub use crate::inspector::{
    FeatureImportance,
    PathKey,
    PathCounts,
    top_features,
    top_features_of_all,
    top_feature_indices,
    top_feature_indices_of_all,
    top_feature_names,
    top_feature_names_of_all,
    count_path_matches,
};


pub use crate::metrics::{accuracy, overlap, hamming_loss, f1};
