use rayon::prelude::*;
use tracing::warn;

use crate::{MultiLabel, MultiLabelSample};
use crate::common::{checker, utils};
use crate::optimization::LossOracle;
use super::cmlcrf::Cmlcrf;

use std::collections::HashMap;


/// Negative log-likelihood of a [`Cmlcrf`] on a training sample
/// with a Gaussian prior on the parameters:
/// ```txt
/// Σ_i [ log Σ_c exp s(x_i, c) - s(x_i, y_i) ] + Σ_r θ_r^2 / (2σ^2)
/// ```
/// where `c` ranges over the model's candidate label sets and
/// `r` over the regularized parameters.
/// 
/// `CrfLoss` owns the model; moving the oracle's parameters
/// moves the model's weights.
/// With parallelism on, the rows are split into partitions whose
/// losses and gradients are summed at the end.
pub struct CrfLoss<'a> {
    model: Cmlcrf,
    sample: &'a MultiLabelSample,
    gaussian_variance: f64,
    regularize_all: bool,
    parallelism: bool,

    // Candidate index of each row's gold label set.
    gold: Vec<Option<usize>>,
}


impl<'a> CrfLoss<'a> {
    /// Construct the loss of `model` on `sample`.
    /// By default, every parameter is regularized and
    /// the evaluation is sequential.
    pub fn new(model: Cmlcrf, sample: &'a MultiLabelSample, gaussian_variance: f64)
        -> Self
    {
        checker::check_gaussian_variance(gaussian_variance);

        let index = model.support_combinations()
            .enumerate()
            .map(|(i, labels)| (labels, i))
            .collect::<HashMap<&MultiLabel, usize>>();
        let gold = sample.labels()
            .iter()
            .map(|y| index.get(y).copied())
            .collect::<Vec<_>>();

        let skipped = gold.iter().filter(|g| g.is_none()).count();
        if skipped > 0 {
            warn!(
                skipped,
                "rows whose label set is not a candidate of the model are ignored"
            );
        }

        Self {
            model,
            sample,
            gaussian_variance,
            regularize_all: true,
            parallelism: false,
            gold,
        }
    }


    /// Evaluate the rows in parallel.
    pub fn parallelism(mut self, flag: bool) -> Self {
        self.parallelism = flag;
        self
    }


    /// Regularize every parameter (`true`) or
    /// only the feature weights (`false`).
    pub fn regularize_all(mut self, flag: bool) -> Self {
        self.regularize_all = flag;
        self
    }


    /// Returns the model at the current point.
    pub fn model(&self) -> &Cmlcrf {
        &self.model
    }


    /// Consumes the loss and returns the model.
    pub fn into_model(self) -> Cmlcrf {
        self.model
    }


    #[inline(always)]
    fn is_regularized(&self, index: usize) -> bool {
        self.regularize_all || self.model.is_feature_weight(index)
    }


    fn penalty(&self) -> f64 {
        let denom = 2f64 * self.gaussian_variance;
        self.model.weights()
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_regularized(*i))
            .map(|(_, w)| w * w / denom)
            .sum::<f64>()
    }


    /// Log-loss of one row, accumulating its gradient into `gradient`
    /// when given.
    fn row_loss(
        &self,
        row: usize,
        gold: usize,
        label_terms: &[f64],
        gradient: Option<&mut [f64]>,
    ) -> f64
    {
        let x = self.sample.row(row);
        let class_scores = self.model.class_scores(x);
        let scores = self.model.combination_scores_with(&class_scores, label_terms);
        let log_z = utils::log_sum_exp(&scores);
        let loss = log_z - scores[gold];

        let Some(gradient) = gradient else { return loss; };

        let combinations = self.model.combinations();
        let n_classes = self.model.n_classes();
        let probabilities = scores.iter()
            .map(|s| (s - log_z).exp())
            .collect::<Vec<_>>();

        // E[y_k] - y_k for every class.
        let mut coefficients = vec![0f64; n_classes];
        for (c, p) in combinations.iter().zip(&probabilities) {
            c.labels.labels()
                .filter(|&k| k < n_classes)
                .for_each(|k| { coefficients[k] += p; });
        }
        combinations[gold].labels.labels()
            .filter(|&k| k < n_classes)
            .for_each(|k| { coefficients[k] -= 1f64; });

        let n_features = self.model.n_features();
        for (k, a) in coefficients.into_iter().enumerate() {
            if a == 0f64 { continue; }
            let offset = self.model.class_offset(k);
            x.iter()
                .filter(|&(j, _)| j < n_features)
                .for_each(|(j, v)| { gradient[offset + j] += a * v; });
            gradient[self.model.bias_index(k)] += a;
        }

        if self.model.consider_pair() {
            for (c, p) in combinations.iter().zip(&probabilities) {
                c.pair_features.iter().for_each(|&i| { gradient[i] += p; });
            }
            combinations[gold].pair_features.iter()
                .for_each(|&i| { gradient[i] -= 1f64; });
        }

        if self.model.consider_bmm() {
            let expected = combinations.iter()
                .zip(&probabilities)
                .map(|(c, p)| p * c.log_bmm)
                .sum::<f64>();
            gradient[self.model.bmm_index()] += expected - combinations[gold].log_bmm;
        }

        loss
    }


    /// Rows that contribute to the loss, with their gold candidate.
    fn labeled_rows(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.gold.iter()
            .enumerate()
            .filter_map(|(i, g)| g.map(|g| (i, g)))
    }
}


impl LossOracle for CrfLoss<'_> {
    fn name(&self) -> &str {
        "CRF negative log-likelihood"
    }


    fn parameters(&self) -> &[f64] {
        self.model.weights()
    }


    fn set_parameters(&mut self, params: &[f64]) {
        self.model.set_weights(params);
    }


    fn objective_value(&self) -> f64 {
        let label_terms = self.model.label_terms();
        let rows = self.labeled_rows().collect::<Vec<_>>();

        let data_loss = if self.parallelism {
            rows.par_iter()
                .map(|&(i, g)| self.row_loss(i, g, &label_terms, None))
                .sum::<f64>()
        } else {
            rows.iter()
                .map(|&(i, g)| self.row_loss(i, g, &label_terms, None))
                .sum::<f64>()
        };

        data_loss + self.penalty()
    }


    fn gradient(&self) -> Vec<f64> {
        self.value_and_gradient().1
    }


    fn value_and_gradient(&self) -> (f64, Vec<f64>) {
        let n_parameters = self.model.n_parameters();
        let label_terms = self.model.label_terms();
        let rows = self.labeled_rows().collect::<Vec<_>>();

        let (data_loss, mut gradient) = if self.parallelism {
            rows.par_iter()
                .fold(
                    || (0f64, vec![0f64; n_parameters]),
                    |(loss, mut grad), &(i, g)| {
                        let l = self.row_loss(i, g, &label_terms, Some(&mut grad[..]));
                        (loss + l, grad)
                    },
                )
                .reduce(
                    || (0f64, vec![0f64; n_parameters]),
                    |(l1, mut g1), (l2, g2)| {
                        utils::add_assign(&mut g1, &g2);
                        (l1 + l2, g1)
                    },
                )
        } else {
            let mut grad = vec![0f64; n_parameters];
            let loss = rows.iter()
                .map(|&(i, g)| self.row_loss(i, g, &label_terms, Some(&mut grad[..])))
                .sum::<f64>();
            (loss, grad)
        };

        let variance = self.gaussian_variance;
        gradient.iter_mut()
            .zip(self.model.weights())
            .enumerate()
            .filter(|(i, _)| self.is_regularized(*i))
            .for_each(|(_, (g, w))| { *g += w / variance; });

        (data_loss + self.penalty(), gradient)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::SparseRow;

    fn sample() -> MultiLabelSample {
        let rows = vec![
            SparseRow::new([(0, 1.0), (2, 0.5)]),
            SparseRow::new([(1, 1.0)]),
            SparseRow::new([(0, 0.3), (1, 0.7)]),
            SparseRow::new([(2, 1.0)]),
        ];
        let labels = vec![
            MultiLabel::from(vec![0]),
            MultiLabel::from(vec![1, 2]),
            MultiLabel::from(vec![0, 1]),
            MultiLabel::from(vec![2]),
        ];
        MultiLabelSample::from_rows(rows, labels, 0, 0)
    }

    fn perturbed(model: &mut Cmlcrf) {
        let w = (0..model.n_parameters())
            .map(|i| ((i * 7 % 11) as f64 - 5.0) / 10.0)
            .collect::<Vec<_>>();
        model.set_weights(&w);
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let sample = sample();
        let mut model = Cmlcrf::new(&sample, 2).unwrap();
        perturbed(&mut model);
        let mut loss = CrfLoss::new(model, &sample, 2.0)
            .regularize_all(false);

        let (_, gradient) = loss.value_and_gradient();
        let origin = loss.parameters().to_vec();
        let h = 1e-6;
        for i in 0..origin.len() {
            let mut point = origin.clone();
            point[i] += h;
            loss.set_parameters(&point);
            let up = loss.objective_value();
            point[i] -= 2.0 * h;
            loss.set_parameters(&point);
            let down = loss.objective_value();
            let numeric = (up - down) / (2.0 * h);
            assert!(
                (numeric - gradient[i]).abs() < 1e-5,
                "parameter {i}: expected {numeric}, got {}.", gradient[i]
            );
        }
    }

    #[test]
    fn test_parallel_equals_sequential() {
        let sample = sample();
        let mut model = Cmlcrf::new(&sample, 2).unwrap();
        perturbed(&mut model);

        let sequential = CrfLoss::new(model.clone(), &sample, 1.0);
        let parallel = CrfLoss::new(model, &sample, 1.0).parallelism(true);

        let (v1, g1) = sequential.value_and_gradient();
        let (v2, g2) = parallel.value_and_gradient();
        assert!((v1 - v2).abs() < 1e-9, "expected {v1}, got {v2}.");
        g1.iter().zip(&g2).for_each(|(a, b)| {
            assert!((a - b).abs() < 1e-9, "expected {a}, got {b}.");
        });
    }

    #[test]
    fn test_zero_weights_loss_is_log_of_candidates() {
        let sample = sample();
        let model = Cmlcrf::new(&sample, 1).unwrap();
        let loss = CrfLoss::new(model, &sample, 1.0);
        let exp = 4.0 * 4f64.ln();
        let res = loss.objective_value();
        assert!((exp - res).abs() < 1e-9, "expected {exp}, got {res}.");
    }

    #[test]
    fn test_regularize_all_adds_penalty_on_biases() {
        let sample = sample();
        let mut model = Cmlcrf::new(&sample, 1).unwrap();
        let mut w = vec![0.0; model.n_parameters()];
        w[model.bias_index(0)] = 2.0;
        model.set_weights(&w);

        let all = CrfLoss::new(model.clone(), &sample, 1.0)
            .regularize_all(true)
            .objective_value();
        let features_only = CrfLoss::new(model, &sample, 1.0)
            .regularize_all(false)
            .objective_value();
        let diff = all - features_only;
        assert!((diff - 2.0).abs() < 1e-9, "expected 2.0, got {diff}.");
    }
}
