//! Defines the inner representation 
//! of the regression tree.
use serde::{Serialize, Deserialize};

use crate::sample::SparseRow;

use std::collections::BTreeMap;


/// The output of [`Splitter::split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LR {
    /// `value < threshold`
    Left,
    /// `value >= threshold`
    Right,
}


/// A splitting rule `x[feature] < threshold`.
/// Absent entries of a sparse row read as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Splitter {
    pub(super) feature: usize,
    pub(super) feature_name: String,
    pub(super) threshold: f64,
}


impl Splitter {
    /// Construct a rule on the `feature`-th column.
    #[inline]
    pub fn new<S: ToString>(feature: usize, name: S, threshold: f64) -> Self {
        Self {
            feature,
            feature_name: name.to_string(),
            threshold,
        }
    }


    /// Defines the splitting.
    #[inline]
    pub fn split(&self, row: &SparseRow) -> LR {
        if row.get(self.feature) < self.threshold {
            LR::Left
        } else {
            LR::Right
        }
    }


    /// Index of the tested feature.
    #[inline]
    pub fn feature(&self) -> usize {
        self.feature
    }


    /// Name of the tested feature.
    #[inline]
    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }
}


/// Enumeration of `BranchNode` and `LeafNode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A node that have two childrens.
    Branch(BranchNode),


    /// A node that have no child.
    Leaf(LeafNode),
}


/// Represents the branch nodes of regression tree.
/// Each `BranchNode` must have two childrens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchNode {
    pub(super) rule: Splitter,
    pub(super) left: Box<Node>,
    pub(super) right: Box<Node>,

    // Reduction of the squared loss gained by this split.
    pub(super) gain: f64,

    // Number of leaves below this node.
    pub(super) leaves: usize,
}


/// Represents the leaf nodes of regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    pub(super) confidence: f64,
}


impl Node {
    /// Construct a leaf that predicts `confidence`.
    #[inline]
    pub fn leaf(confidence: f64) -> Self {
        Node::Leaf(LeafNode { confidence })
    }


    /// Construct a branch node.
    /// `gain` is the loss reduction credited to the split feature.
    #[inline]
    pub fn branch(rule: Splitter, left: Node, right: Node, gain: f64) -> Self {
        let leaves = left.leaves() + right.leaves();
        let node = BranchNode {
            rule,
            left: Box::new(left),
            right: Box::new(right),
            gain,
            leaves,
        };
        Node::Branch(node)
    }


    /// Returns the number of leaves of this sub-tree.
    #[inline]
    pub fn leaves(&self) -> usize {
        match self {
            Node::Branch(ref node) => node.leaves,
            Node::Leaf(_) => 1_usize,
        }
    }


    /// Prediction value of the leaf `row` reaches.
    #[inline]
    pub(super) fn predict(&self, row: &SparseRow) -> f64 {
        match self {
            Node::Branch(ref node) => match node.rule.split(row) {
                LR::Left => node.left.predict(row),
                LR::Right => node.right.predict(row),
            },
            Node::Leaf(ref leaf) => leaf.confidence,
        }
    }


    /// Left-to-right ordinal of the leaf `row` reaches,
    /// counted from `offset`.
    pub(super) fn matched_leaf(&self, row: &SparseRow, offset: usize) -> usize {
        match self {
            Node::Branch(ref node) => match node.rule.split(row) {
                LR::Left => node.left.matched_leaf(row, offset),
                LR::Right => {
                    let offset = offset + node.left.leaves();
                    node.right.matched_leaf(row, offset)
                },
            },
            Node::Leaf(_) => offset,
        }
    }


    /// Adds the gain of every split in this sub-tree
    /// to the entry of its feature.
    pub(super) fn accumulate_gain(
        &self,
        importance: &mut BTreeMap<usize, (String, f64)>,
    )
    {
        if let Node::Branch(ref node) = self {
            let entry = importance.entry(node.rule.feature)
                .or_insert_with(|| (node.rule.feature_name.clone(), 0f64));
            entry.1 += node.gain;

            node.left.accumulate_gain(importance);
            node.right.accumulate_gain(importance);
        }
    }
}
