use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::{MultiLabel, MultiLabelSample, SparseRow};
use crate::common::{checker, persist};
use crate::error::Result;
use super::bmm::BernoulliMixture;

use std::fmt;
use std::path::Path;


/// A label set the model can output,
/// together with its input-independent features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Combination {
    pub(crate) labels: MultiLabel,
    // Parameter indices of the label-pair states of this set.
    pub(crate) pair_features: Vec<usize>,
    // `log p_bmm(labels)`.
    pub(crate) log_bmm: f64,
}


/// Collective multi-label CRF.
/// 
/// The candidate outputs are the distinct label sets
/// of the training sample. The score of a label set `y` on `x` is
/// ```txt
/// Σ_k y_k (w_k∙x + b_k)
///   + Σ_{j<k} v_{jk}(y_j, y_k)     (if `consider_pair`)
///   + u log p_bmm(y)               (if `consider_bmm`)
/// ```
/// and [`Cmlcrf::predict`] returns the best-scoring candidate.
/// 
/// Parameters are laid out in one vector:
/// `C (D + 1)` class weights (feature weights then bias, per class),
/// `4 C (C - 1) / 2` pair weights, and the BMM weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cmlcrf {
    n_classes: usize,
    n_features: usize,
    weights: Vec<f64>,
    combinations: Vec<Combination>,
    bmm: BernoulliMixture,
    consider_bmm: bool,
    consider_pair: bool,
}


impl Cmlcrf {
    /// Construct a model with zero weights from the training sample.
    /// The label prior is a Bernoulli mixture of `n_clusters` components.
    /// 
    /// Fails with [`Error::EmptySample`] when `sample` has
    /// no example or no class.
    /// 
    /// [`Error::EmptySample`]: crate::Error::EmptySample
    pub fn new(sample: &MultiLabelSample, n_clusters: usize) -> Result<Self> {
        checker::check_sample(sample)?;

        let (_, n_features) = sample.shape();
        let n_classes = sample.n_classes();

        let mut distinct = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for y in sample.labels() {
            if seen.insert(y) { distinct.push(y.clone()); }
        }

        let bmm = BernoulliMixture::fit(sample.labels(), n_classes, n_clusters);

        let mut model = Self {
            n_classes,
            n_features,
            weights: Vec::new(),
            combinations: Vec::new(),
            bmm,
            consider_bmm: true,
            consider_pair: true,
        };
        model.weights = vec![0f64; model.n_parameters()];
        model.combinations = distinct.into_iter()
            .map(|labels| model.combination(labels))
            .collect();

        debug!(
            n_classes,
            n_features,
            n_combinations = model.combinations.len(),
            n_parameters = model.weights.len(),
            "CRF constructed"
        );
        Ok(model)
    }


    fn combination(&self, labels: MultiLabel) -> Combination {
        let pair_features = (0..self.n_classes)
            .flat_map(|j| ((j + 1)..self.n_classes).map(move |k| (j, k)))
            .map(|(j, k)| {
                let state = 2 * labels.matches(j) as usize + labels.matches(k) as usize;
                self.pair_index(j, k) + state
            })
            .collect();
        let log_bmm = self.bmm.log_probability(&labels);
        Combination { labels, pair_features, log_bmm }
    }


    /// Whether the BMM prior feature is used.
    pub fn set_consider_bmm(&mut self, flag: bool) {
        self.consider_bmm = flag;
    }


    /// Whether the label-pair features are used.
    pub fn set_consider_pair(&mut self, flag: bool) {
        self.consider_pair = flag;
    }


    /// Returns `true` if the BMM prior feature is used.
    pub fn consider_bmm(&self) -> bool {
        self.consider_bmm
    }


    /// Returns `true` if the label-pair features are used.
    pub fn consider_pair(&self) -> bool {
        self.consider_pair
    }


    /// Returns the number of classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }


    /// Returns the number of features.
    pub fn n_features(&self) -> usize {
        self.n_features
    }


    /// Returns the candidate label sets.
    pub fn support_combinations(&self) -> impl Iterator<Item = &MultiLabel> + '_ {
        self.combinations.iter().map(|c| &c.labels)
    }


    pub(crate) fn combinations(&self) -> &[Combination] {
        &self.combinations[..]
    }


    /// Returns the Bernoulli mixture prior.
    pub fn bmm(&self) -> &BernoulliMixture {
        &self.bmm
    }


    /// Returns the parameter vector.
    pub fn weights(&self) -> &[f64] {
        &self.weights[..]
    }


    /// Overwrite the parameter vector.
    pub fn set_weights(&mut self, weights: &[f64]) {
        checker::check_parameter_length(weights, self.weights.len());
        self.weights.copy_from_slice(weights);
    }


    /// Returns the total number of parameters.
    pub fn n_parameters(&self) -> usize {
        self.bmm_index() + 1
    }


    // ------------------------------------------------------------
    // Parameter layout

    #[inline(always)]
    pub(crate) fn class_offset(&self, k: usize) -> usize {
        k * (self.n_features + 1)
    }


    #[inline(always)]
    pub(crate) fn bias_index(&self, k: usize) -> usize {
        self.class_offset(k) + self.n_features
    }


    #[inline(always)]
    fn pair_offset(&self) -> usize {
        self.class_offset(self.n_classes)
    }


    /// First of the four parameters of the class pair `j < k`.
    #[inline(always)]
    fn pair_index(&self, j: usize, k: usize) -> usize {
        let c = self.n_classes;
        let rank = j * c - j * (j + 1) / 2 + (k - j - 1);
        self.pair_offset() + 4 * rank
    }


    #[inline(always)]
    pub(crate) fn bmm_index(&self) -> usize {
        let c = self.n_classes;
        self.pair_offset() + 4 * (c * c.saturating_sub(1) / 2)
    }


    /// Returns `true` if parameter `index` is a feature weight
    /// (not a bias, pair weight or BMM weight).
    #[inline(always)]
    pub(crate) fn is_feature_weight(&self, index: usize) -> bool {
        index < self.pair_offset() && index % (self.n_features + 1) != self.n_features
    }


    // ------------------------------------------------------------
    // Scoring

    /// Returns `w_k∙x + b_k` for every class `k`.
    pub fn class_scores(&self, row: &SparseRow) -> Vec<f64> {
        (0..self.n_classes)
            .map(|k| {
                let offset = self.class_offset(k);
                let w = &self.weights[offset..offset + self.n_features];
                row.dot(w) + self.weights[self.bias_index(k)]
            })
            .collect()
    }


    /// Returns the part of each candidate's score
    /// that does not depend on the input.
    pub(crate) fn label_terms(&self) -> Vec<f64> {
        self.combinations.iter()
            .map(|c| {
                let mut term = 0f64;
                if self.consider_pair {
                    term += c.pair_features.iter()
                        .map(|&i| self.weights[i])
                        .sum::<f64>();
                }
                if self.consider_bmm {
                    term += self.weights[self.bmm_index()] * c.log_bmm;
                }
                term
            })
            .collect()
    }


    /// Returns the scores of every candidate on `row`,
    /// given the class scores and the label terms.
    pub(crate) fn combination_scores_with(
        &self,
        class_scores: &[f64],
        label_terms: &[f64],
    ) -> Vec<f64>
    {
        self.combinations.iter()
            .zip(label_terms)
            .map(|(c, term)| {
                c.labels.labels()
                    .filter_map(|k| class_scores.get(k))
                    .sum::<f64>()
                    + term
            })
            .collect()
    }


    /// Returns the scores of every candidate on `row`.
    pub fn combination_scores(&self, row: &SparseRow) -> Vec<f64> {
        let class_scores = self.class_scores(row);
        self.combination_scores_with(&class_scores, &self.label_terms())
    }


    fn predict_with(&self, row: &SparseRow, label_terms: &[f64]) -> MultiLabel {
        let class_scores = self.class_scores(row);
        let scores = self.combination_scores_with(&class_scores, label_terms);

        // The first best candidate wins ties.
        let best = scores.iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &s)| match best {
                Some((_, b)) if b >= s => best,
                _ => Some((i, s)),
            });
        match best {
            Some((i, _)) => self.combinations[i].labels.clone(),
            None => MultiLabel::new(),
        }
    }


    /// Predicts the label set of a single row.
    pub fn predict_row(&self, row: &SparseRow) -> MultiLabel {
        self.predict_with(row, &self.label_terms())
    }


    /// Predicts the label sets of every row of `sample`.
    pub fn predict(&self, sample: &MultiLabelSample) -> Vec<MultiLabel> {
        let label_terms = self.label_terms();
        sample.rows()
            .par_iter()
            .map(|row| self.predict_with(row, &label_terms))
            .collect()
    }


    // ------------------------------------------------------------
    // Persistence

    /// Write the model to `path` as JSON.
    pub fn serialize<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist::save_json(self, path)
    }


    /// Read a model written by [`Cmlcrf::serialize`].
    pub fn deserialize<P: AsRef<Path>>(path: P) -> Result<Self> {
        persist::load_json(path)
    }
}


impl fmt::Display for Cmlcrf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "\
            ----------\n\
            # Collective Multi-Label CRF\n\n\
            - # of classes: {}\n\
            - # of features: {}\n\
            - # of candidate label sets: {}\n\
            - # of BMM clusters: {}\n\
            - Consider BMM: {}\n\
            - Consider label pairs: {}\n\
            ----------\
            ",
            self.n_classes,
            self.n_features,
            self.combinations.len(),
            self.bmm.n_clusters(),
            self.consider_bmm,
            self.consider_pair,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn sample() -> MultiLabelSample {
        let rows = vec![
            SparseRow::new([(0, 1.0)]),
            SparseRow::new([(1, 1.0)]),
            SparseRow::new([(0, 1.0), (1, 1.0)]),
        ];
        let labels = vec![
            MultiLabel::from(vec![0]),
            MultiLabel::from(vec![1, 2]),
            MultiLabel::from(vec![0]),
        ];
        MultiLabelSample::from_rows(rows, labels, 0, 0)
    }

    #[test]
    fn test_layout() {
        let model = Cmlcrf::new(&sample(), 2).unwrap();
        // 3 classes * (2 features + bias) + 4 * 3 pairs + 1
        assert_eq!(model.n_parameters(), 9 + 12 + 1);
        assert_eq!(model.support_combinations().count(), 2);
        assert!(model.is_feature_weight(0));
        assert!(!model.is_feature_weight(model.bias_index(1)));
        assert!(!model.is_feature_weight(model.bmm_index()));
    }

    #[test]
    fn test_pair_indices_are_distinct_per_pair() {
        let model = Cmlcrf::new(&sample(), 1).unwrap();
        let c = &model.combinations()[0];
        assert_eq!(c.pair_features.len(), 3);
        let mut sorted = c.pair_features.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert!(sorted.iter().all(|&i| i >= 9 && i < model.bmm_index()));
    }

    #[test]
    fn test_predict_follows_weights() {
        let mut model = Cmlcrf::new(&sample(), 1).unwrap();
        model.set_consider_bmm(false);
        model.set_consider_pair(false);
        let mut w = model.weights().to_vec();
        // Class 1 fires on feature 1.
        w[model.class_offset(1) + 1] = 5.0;
        model.set_weights(&w);

        let prediction = model.predict_row(&SparseRow::new([(1, 1.0)]));
        assert_eq!(prediction, MultiLabel::from(vec![1, 2]));
        let prediction = model.predict_row(&SparseRow::new([(0, 1.0)]));
        assert_eq!(prediction, MultiLabel::from(vec![0]));
    }

    #[test]
    fn test_empty_sample_is_an_error() {
        let empty = MultiLabelSample::from_rows(vec![], vec![], 3, 2);
        let err = Cmlcrf::new(&empty, 1).unwrap_err();
        assert!(
            matches!(err, Error::EmptySample(_)),
            "unexpected error {err:?}"
        );

        let classless = MultiLabelSample::from_rows(
            vec![SparseRow::new([(0, 1.0)])],
            vec![MultiLabel::new()],
            0, 0,
        );
        let err = Cmlcrf::new(&classless, 1).unwrap_err();
        assert!(
            matches!(err, Error::EmptySample(_)),
            "unexpected error {err:?}"
        );
    }
}
