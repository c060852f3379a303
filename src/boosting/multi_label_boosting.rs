use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::common::persist;
use crate::error::Result;
use crate::sample::{MultiLabel, MultiLabelSample, SparseRow};
use super::regression_tree::{RegressionTree, WeakRegressor};

use std::path::Path;


/// A trained multi-label boosting model.
/// Holds one additive ensemble of weak regressors per class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLabelBoosting {
    n_classes: usize,
    regressors: Vec<Vec<WeakRegressor>>,
}


impl MultiLabelBoosting {
    /// Construct an empty ensemble for `n_classes` classes.
    pub fn new(n_classes: usize) -> Self {
        let regressors = vec![Vec::new(); n_classes];
        Self { n_classes, regressors }
    }


    /// Number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }


    /// Append `regressor` to the ensemble of `class`.
    /// 
    /// # Panics
    /// Panics if `class >= n_classes()`.
    pub fn push_regressor<R>(&mut self, class: usize, regressor: R)
        where R: Into<WeakRegressor>
    {
        assert!(
            class < self.n_classes,
            "class index {class} is out of range (n_classes = {})",
            self.n_classes,
        );
        self.regressors[class].push(regressor.into());
    }


    /// The ensemble of `class`, in insertion order.
    /// An out-of-range class has an empty ensemble.
    #[inline]
    pub fn regressors(&self, class: usize) -> &[WeakRegressor] {
        self.regressors.get(class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }


    /// The tree members of the ensemble of `class`, in insertion order.
    #[inline]
    pub fn trees(&self, class: usize)
        -> impl Iterator<Item = &RegressionTree> + '_
    {
        self.regressors(class)
            .iter()
            .filter_map(WeakRegressor::as_tree)
    }


    /// Score of `class` on `row`.
    #[inline]
    pub fn score(&self, row: &SparseRow, class: usize) -> f64 {
        self.regressors(class)
            .iter()
            .map(|h| h.predict(row))
            .sum()
    }


    /// Predicts the label set of a single row.
    pub fn predict_row(&self, row: &SparseRow) -> MultiLabel {
        (0..self.n_classes)
            .filter(|&k| self.score(row, k) > 0f64)
            .collect()
    }


    /// Predicts the label sets of every row of `sample`.
    pub fn predict(&self, sample: &MultiLabelSample) -> Vec<MultiLabel> {
        sample.rows()
            .par_iter()
            .map(|row| self.predict_row(row))
            .collect()
    }


    /// Write the model to `path` as JSON.
    pub fn serialize<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist::save_json(self, path)
    }


    /// Read a model written by [`MultiLabelBoosting::serialize`].
    pub fn deserialize<P: AsRef<Path>>(path: P) -> Result<Self> {
        persist::load_json(path)
    }
}
