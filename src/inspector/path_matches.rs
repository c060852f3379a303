use rayon::prelude::*;

use crate::boosting::{MultiLabelBoosting, RegressionTree};
use crate::sample::{MultiLabelSample, SparseRow};

use std::collections::HashMap;


/// The composite decision path of a row:
/// the matched leaf of every tree of a class, in tree order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(pub Vec<usize>);


impl PathKey {
    /// Composite path of `row` through `trees`.
    pub fn of(trees: &[&RegressionTree], row: &SparseRow) -> Self {
        let path = trees.iter()
            .map(|tree| tree.matched_leaf(row))
            .collect();
        Self(path)
    }


    /// Per-tree leaf identifiers.
    #[inline]
    pub fn leaves(&self) -> &[usize] {
        &self.0
    }
}


/// Number of rows per composite path.
pub type PathCounts = HashMap<PathKey, usize>;


/// Counts the rows of `sample` sharing each composite decision path
/// through the trees of `class`.
/// 
/// The counts sum to `sample.n_data_points()`
/// unless `class` has no tree, in which case the map is empty.
pub fn count_path_matches(
    model: &MultiLabelBoosting,
    sample: &MultiLabelSample,
    class: usize,
) -> PathCounts
{
    let trees = model.trees(class).collect::<Vec<_>>();
    if trees.is_empty() {
        return PathCounts::new();
    }

    sample.rows()
        .par_iter()
        .fold(PathCounts::new, |mut counts, row| {
            *counts.entry(PathKey::of(&trees, row)).or_insert(0) += 1;
            counts
        })
        .reduce(PathCounts::new, |mut lhs, rhs| {
            for (key, count) in rhs {
                *lhs.entry(key).or_insert(0) += count;
            }
            lhs
        })
}
