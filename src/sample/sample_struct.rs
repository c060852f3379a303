use std::path::Path;

use crate::error::Result;
use super::multi_label::MultiLabel;
use super::sample_reader::SampleReader;


/// A sparse feature vector.
/// Entries are kept sorted by feature index without duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    indices: Vec<usize>,
    values: Vec<f64>,
}


impl SparseRow {
    /// Construct a row from `(feature index, value)` pairs.
    /// The pairs need not be sorted;
    /// when an index appears twice, the last value wins.
    pub fn new<I>(pairs: I) -> Self
        where I: IntoIterator<Item = (usize, f64)>
    {
        let mut pairs = pairs.into_iter().collect::<Vec<_>>();
        // Stable sort keeps the input order among equal indices.
        pairs.sort_by_key(|&(i, _)| i);

        let mut indices = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (i, x) in pairs {
            if indices.last() == Some(&i) {
                *values.last_mut().unwrap() = x;
            } else {
                indices.push(i);
                values.push(x);
            }
        }
        Self { indices, values }
    }


    /// Returns the value at feature `index` (`0.0` if absent).
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(k) => self.values[k],
            Err(_) => 0f64,
        }
    }


    /// Iterates over the non-zero entries in ascending index order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }


    /// Returns the number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }


    /// Returns the largest stored feature index, if any.
    #[inline]
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }


    /// Returns `Σ weights[i] * x_i`.
    /// Entries whose index exceeds `weights` are ignored.
    #[inline]
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(i, x)| weights.get(i).map(|w| w * x))
            .sum::<f64>()
    }
}


/// Struct `MultiLabelSample` holds sparse rows and their label sets.
#[derive(Debug, Clone)]
pub struct MultiLabelSample {
    pub(super) rows: Vec<SparseRow>,
    pub(super) labels: Vec<MultiLabel>,
    pub(super) feature_names: Vec<String>,
    pub(super) n_classes: usize,
}


impl MultiLabelSample {
    /// Construct a sample from rows and label sets.
    /// The number of features is the largest index plus one
    /// (at least `n_features`), the number of classes is
    /// the largest label plus one (at least `n_classes`).
    /// 
    /// This method panics if `rows` and `labels` differ in length.
    pub fn from_rows(
        rows: Vec<SparseRow>,
        labels: Vec<MultiLabel>,
        n_features: usize,
        n_classes: usize,
    ) -> Self
    {
        assert_eq!(
            rows.len(), labels.len(),
            "the number of rows and label sets differ"
        );

        let n_features = rows.iter()
            .filter_map(SparseRow::max_index)
            .map(|i| i + 1)
            .fold(n_features, usize::max);
        let n_classes = labels.iter()
            .filter_map(|y| y.labels().last())
            .map(|k| k + 1)
            .fold(n_classes, usize::max);

        let feature_names = (1..=n_features)
            .map(|k| format!("Feat. [{k}]"))
            .collect::<Vec<_>>();

        Self { rows, labels, feature_names, n_classes, }
    }


    /// Read a multi-label SVMLight format file.
    /// See [`SampleReader`] for the format.
    pub fn from_svmlight<P: AsRef<Path>>(file: P) -> Result<Self> {
        SampleReader::new()
            .file(file)
            .read()
    }


    /// Returns the pair of the number of examples and
    /// the number of features.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.feature_names.len())
    }


    /// Returns the number of examples.
    #[inline]
    pub fn n_data_points(&self) -> usize {
        self.rows.len()
    }


    /// Returns the number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }


    /// Returns the `row`-th feature vector.
    #[inline]
    pub fn row(&self, row: usize) -> &SparseRow {
        &self.rows[row]
    }


    /// Returns all feature vectors.
    #[inline]
    pub fn rows(&self) -> &[SparseRow] {
        &self.rows[..]
    }


    /// Returns the gold label sets.
    #[inline]
    pub fn labels(&self) -> &[MultiLabel] {
        &self.labels[..]
    }


    /// Returns the feature names.
    #[inline]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names[..]
    }


    /// Set the feature names and return the old ones.
    /// This method panics when the length of given feature names is
    /// not equal to the number of features.
    pub fn replace_names<S, T>(&mut self, names: T) -> Vec<String>
        where S: ToString,
              T: AsRef<[S]>,
    {
        let names = names.as_ref();
        let n_features = self.shape().1;
        assert_eq!(
            n_features, names.len(),
            "The number of names is not equal to the number of features"
        );

        let names = names.iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        std::mem::replace(&mut self.feature_names, names)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_row_sorted_and_deduplicated() {
        let row = SparseRow::new([(3, 1.0), (0, 2.0), (3, 5.0)]);
        let entries = row.iter().collect::<Vec<_>>();
        assert_eq!(entries, vec![(0, 2.0), (3, 5.0)]);
        assert_eq!(row.get(3), 5.0);
        assert_eq!(row.get(1), 0.0);
        assert_eq!(row.dot(&[1.0, 1.0]), 2.0);
    }

    #[test]
    fn test_shape_grows_to_data() {
        let rows = vec![SparseRow::new([(4, 1.0)])];
        let labels = vec![MultiLabel::from(vec![2])];
        let sample = MultiLabelSample::from_rows(rows, labels, 2, 1);
        assert_eq!(sample.shape(), (1, 5));
        assert_eq!(sample.n_classes(), 3);
        assert_eq!(sample.feature_names()[0], "Feat. [1]");
    }
}
