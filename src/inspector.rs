//! Inspection of trained [`MultiLabelBoosting`] models.
//! 
//! Two questions are answered for a single class:
//! 
//! - which features matter most, ranked by the total split gain
//!   they earn across the class's regression trees;
//! - how rows of a sample distribute over composite decision paths,
//!   one leaf per tree.
//! 
//! Only [`WeakRegressor::Tree`] members take part.
//! An out-of-range class yields an empty result.
//! 
//! [`MultiLabelBoosting`]: crate::boosting::MultiLabelBoosting
//! [`WeakRegressor::Tree`]: crate::boosting::WeakRegressor::Tree
mod feature_importance;
mod path_matches;


pub use feature_importance::{
    FeatureImportance,
    FeatureImportanceAccumulator,
    feature_importances,
    feature_importances_of_all,
    top_features,
    top_features_of_all,
    top_feature_indices,
    top_feature_indices_of_all,
    top_feature_names,
    top_feature_names_of_all,
};
pub use path_matches::{
    PathKey,
    PathCounts,
    count_path_matches,
};
