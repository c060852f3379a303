use fixedbitset::FixedBitSet;
use serde::{Serialize, Deserialize};

use std::fmt;
use std::hash::{Hash, Hasher};


/// A set of class indices assigned to one example.
/// 
/// The set is backed by a bit set that grows on demand,
/// so two label sets are equal iff they contain the same classes,
/// regardless of the capacity each one was created with.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct MultiLabel {
    labels: FixedBitSet,
}


impl MultiLabel {
    /// Construct an empty label set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Construct an empty label set
    /// that can hold `n_classes` classes without growing.
    #[inline]
    pub fn with_capacity(n_classes: usize) -> Self {
        Self { labels: FixedBitSet::with_capacity(n_classes), }
    }


    /// Add the class `label` to this set.
    #[inline]
    pub fn add_label(&mut self, label: usize) {
        if label >= self.labels.len() {
            self.labels.grow(label + 1);
        }
        self.labels.insert(label);
    }


    /// Returns `true` if the class `label` is in this set.
    #[inline]
    pub fn matches(&self, label: usize) -> bool {
        self.labels.contains(label)
    }


    /// Iterates over the classes in ascending order.
    #[inline]
    pub fn labels(&self) -> impl Iterator<Item = usize> + '_ {
        self.labels.ones()
    }


    /// Returns the number of classes in this set.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.count_ones(..)
    }


    /// Returns `true` if no class is assigned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Returns `|self ∩ other|`.
    #[inline]
    pub fn intersection_len(&self, other: &Self) -> usize {
        self.labels.intersection(&other.labels).count()
    }


    /// Returns `|self ∪ other|`.
    #[inline]
    pub fn union_len(&self, other: &Self) -> usize {
        self.labels.union(&other.labels).count()
    }


    /// Returns `|self Δ other|`.
    #[inline]
    pub fn symmetric_difference_len(&self, other: &Self) -> usize {
        self.labels.symmetric_difference(&other.labels).count()
    }
}


impl PartialEq for MultiLabel {
    fn eq(&self, other: &Self) -> bool {
        self.labels.ones().eq(other.labels.ones())
    }
}

impl Eq for MultiLabel {}


impl Hash for MultiLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.labels.ones().for_each(|label| label.hash(state));
        self.len().hash(state);
    }
}


impl FromIterator<usize> for MultiLabel {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut multi_label = Self::new();
        iter.into_iter().for_each(|label| multi_label.add_label(label));
        multi_label
    }
}


impl From<Vec<usize>> for MultiLabel {
    #[inline]
    fn from(labels: Vec<usize>) -> Self {
        labels.into_iter().collect()
    }
}


impl From<MultiLabel> for Vec<usize> {
    #[inline]
    fn from(multi_label: MultiLabel) -> Self {
        multi_label.labels().collect()
    }
}


impl fmt::Debug for MultiLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.labels()).finish()
    }
}


impl fmt::Display for MultiLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.labels()
            .map(|label| label.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{line}]")
    }
}
