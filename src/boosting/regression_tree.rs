use serde::{Serialize, Deserialize};

use crate::sample::SparseRow;
use super::node::*;

use std::collections::BTreeMap;


/// Regression tree regressor.
/// This struct is just a wrapper of `Node`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    root: Node,
}


impl From<Node> for RegressionTree {
    #[inline]
    fn from(root: Node) -> Self {
        Self { root }
    }
}


impl RegressionTree {
    /// Prediction for `row`.
    #[inline]
    pub fn predict(&self, row: &SparseRow) -> f64 {
        self.root.predict(row)
    }


    /// Number of leaves.
    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.root.leaves()
    }


    /// Identifier of the leaf `row` reaches.
    /// Leaves are numbered `0..n_leaves()` from left to right,
    /// so two rows share an identifier iff they follow the same path.
    #[inline]
    pub fn matched_leaf(&self, row: &SparseRow) -> usize {
        self.root.matched_leaf(row, 0)
    }


    /// Per-feature importance of this tree:
    /// `feature index -> (feature name, sum of split gains)`.
    /// Features that are never split on are absent.
    pub fn feature_importance(&self) -> BTreeMap<usize, (String, f64)> {
        let mut importance = BTreeMap::new();
        self.root.accumulate_gain(&mut importance);
        importance
    }
}


/// A regressor that ignores its input.
/// Boosting typically starts from one of these (the prior score).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantRegressor {
    value: f64,
}


impl ConstantRegressor {
    /// Construct a regressor that always predicts `value`.
    #[inline]
    pub fn new(value: f64) -> Self {
        Self { value }
    }


    /// The predicted value.
    #[inline]
    pub fn predict(&self, _row: &SparseRow) -> f64 {
        self.value
    }
}


/// One member of a per-class ensemble.
/// Only [`WeakRegressor::Tree`] carries split-based importance
/// and path identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeakRegressor {
    /// A regression tree.
    Tree(RegressionTree),
    /// A constant.
    Constant(ConstantRegressor),
}


impl WeakRegressor {
    /// Prediction for `row`.
    #[inline]
    pub fn predict(&self, row: &SparseRow) -> f64 {
        match self {
            WeakRegressor::Tree(tree) => tree.predict(row),
            WeakRegressor::Constant(constant) => constant.predict(row),
        }
    }


    /// Returns the tree if this regressor is one.
    #[inline]
    pub fn as_tree(&self) -> Option<&RegressionTree> {
        match self {
            WeakRegressor::Tree(tree) => Some(tree),
            WeakRegressor::Constant(_) => None,
        }
    }
}


impl From<RegressionTree> for WeakRegressor {
    #[inline]
    fn from(tree: RegressionTree) -> Self {
        WeakRegressor::Tree(tree)
    }
}


impl From<ConstantRegressor> for WeakRegressor {
    #[inline]
    fn from(constant: ConstantRegressor) -> Self {
        WeakRegressor::Constant(constant)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    //          x0 < 1 ?  (gain 3)
    //         /        \
    //      x1 < 2 ?    leaf(+2)
    //    (gain 0.5)
    //     /     \
    // leaf(-1) leaf(0)
    fn tree() -> RegressionTree {
        let inner = Node::branch(
            Splitter::new(1, "b", 2.0),
            Node::leaf(-1.0),
            Node::leaf(0.0),
            0.5,
        );
        let root = Node::branch(
            Splitter::new(0, "a", 1.0),
            inner,
            Node::leaf(2.0),
            3.0,
        );
        RegressionTree::from(root)
    }

    #[test]
    fn test_predict_and_leaves() {
        let tree = tree();
        assert_eq!(tree.n_leaves(), 3);

        let rows = [
            SparseRow::new(vec![]),
            SparseRow::new(vec![(1, 5.0)]),
            SparseRow::new(vec![(0, 1.0)]),
        ];
        let exp = vec![(-1.0, 0), (0.0, 1), (2.0, 2)];
        let res = rows.iter()
            .map(|row| (tree.predict(row), tree.matched_leaf(row)))
            .collect::<Vec<_>>();
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }

    #[test]
    fn test_feature_importance_sums_gains() {
        let leaf = Node::branch(
            Splitter::new(0, "a", 5.0),
            Node::leaf(1.0),
            Node::leaf(3.0),
            0.25,
        );
        let root = Node::branch(
            Splitter::new(0, "a", 1.0),
            Node::leaf(0.0),
            leaf,
            1.0,
        );
        let tree = RegressionTree::from(root);
        let importance = tree.feature_importance();
        assert_eq!(importance.len(), 1);
        assert_eq!(importance[&0], ("a".to_string(), 1.25));

        let importance = super::tests::tree().feature_importance();
        let scores = importance.values().map(|(_, s)| *s).sum::<f64>();
        assert_eq!(scores, 3.5);
    }

    #[test]
    fn test_constant_has_no_tree() {
        let weak = WeakRegressor::from(ConstantRegressor::new(0.7));
        assert!(weak.as_tree().is_none());
        assert_eq!(weak.predict(&SparseRow::new(vec![(3, 1.0)])), 0.7);
    }
}
