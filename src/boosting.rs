//! Multi-label gradient boosting ensembles.
//! 
//! A [`MultiLabelBoosting`] keeps one sequence of [`WeakRegressor`]s
//! per class. The score of a class is the sum of its regressors;
//! a class is predicted positive when its score is positive.
mod node;
mod regression_tree;
mod multi_label_boosting;


pub use node::{Node, Splitter, LR};
pub use regression_tree::{
    RegressionTree,
    ConstantRegressor,
    WeakRegressor,
};
pub use multi_label_boosting::MultiLabelBoosting;
