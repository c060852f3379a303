use rand::prelude::*;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::MultiLabel;
use crate::common::utils::log_sum_exp;

const SEED: u64 = 1234;
const EM_ITERATIONS: usize = 50;
const EM_TOLERANCE: f64 = 1e-6;


/// A mixture of `K` independent-Bernoulli distributions
/// over the label sets of `C` classes:
/// ```txt
/// p(y) = Σ_k π_k Π_j θ_kj^{y_j} (1 - θ_kj)^{1 - y_j}
/// ```
/// Fitted by EM; the initial `θ` are drawn from a fixed seed
/// so the same sample always yields the same mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BernoulliMixture {
    mixtures: Vec<f64>,
    probabilities: Vec<Vec<f64>>,
}


impl BernoulliMixture {
    /// Fit a mixture with `n_clusters` components on `labels`.
    pub fn fit(labels: &[MultiLabel], n_classes: usize, n_clusters: usize) -> Self {
        assert!(n_clusters > 0, "a Bernoulli mixture needs a component");

        let mut rng = StdRng::seed_from_u64(SEED);
        let probabilities = (0..n_clusters)
            .map(|_| {
                (0..n_classes)
                    .map(|_| rng.gen_range(0.25..0.75))
                    .collect::<Vec<f64>>()
            })
            .collect::<Vec<_>>();
        let mixtures = vec![1f64 / n_clusters as f64; n_clusters];

        let mut bmm = Self { mixtures, probabilities };
        if labels.is_empty() { return bmm; }

        let mut prev = f64::NEG_INFINITY;
        for _ in 0..EM_ITERATIONS {
            let log_likelihood = bmm.em_step(labels);
            if (log_likelihood - prev).abs() < EM_TOLERANCE { break; }
            prev = log_likelihood;
        }
        bmm
    }


    /// One EM step. Returns the log-likelihood before the update.
    fn em_step(&mut self, labels: &[MultiLabel]) -> f64 {
        let n_clusters = self.mixtures.len();
        let n_classes = self.probabilities[0].len();

        // E-step: responsibilities `r_ik`.
        let (responsibilities, log_likelihoods): (Vec<Vec<f64>>, Vec<f64>)
            = labels.par_iter()
            .map(|y| {
                let logs = self.component_log_probabilities(y);
                let total = log_sum_exp(&logs);
                let r = logs.into_iter()
                    .map(|l| (l - total).exp())
                    .collect::<Vec<_>>();
                (r, total)
            })
            .unzip();

        // M-step with Laplace smoothing so that `0 < θ < 1`.
        let n_sample = labels.len() as f64;
        for k in 0..n_clusters {
            let weight = responsibilities.iter()
                .map(|r| r[k])
                .sum::<f64>();
            self.mixtures[k] = (weight + 1f64) / (n_sample + n_clusters as f64);

            let mut counts = vec![0f64; n_classes];
            responsibilities.iter()
                .zip(labels)
                .for_each(|(r, y)| {
                    y.labels()
                        .filter(|&j| j < n_classes)
                        .for_each(|j| { counts[j] += r[k]; });
                });
            self.probabilities[k] = counts.into_iter()
                .map(|c| (c + 1f64) / (weight + 2f64))
                .collect();
        }

        log_likelihoods.into_iter().sum::<f64>()
    }


    fn component_log_probabilities(&self, y: &MultiLabel) -> Vec<f64> {
        self.mixtures.iter()
            .zip(&self.probabilities)
            .map(|(pi, theta)| {
                pi.ln() + theta.iter()
                    .enumerate()
                    .map(|(j, t)| if y.matches(j) { t.ln() } else { (1f64 - t).ln() })
                    .sum::<f64>()
            })
            .collect()
    }


    /// Returns `log p(y)`.
    pub fn log_probability(&self, y: &MultiLabel) -> f64 {
        log_sum_exp(&self.component_log_probabilities(y))
    }


    /// Returns the number of components.
    pub fn n_clusters(&self) -> usize {
        self.mixtures.len()
    }


    /// Returns the mixing weights `π`.
    pub fn mixtures(&self) -> &[f64] {
        &self.mixtures[..]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<MultiLabel> {
        let mut labels = vec![MultiLabel::from(vec![0, 1]); 8];
        labels.extend(vec![MultiLabel::from(vec![2]); 2]);
        labels
    }

    #[test]
    fn test_frequent_sets_are_more_likely() {
        let bmm = BernoulliMixture::fit(&labels(), 3, 2);
        let frequent = bmm.log_probability(&MultiLabel::from(vec![0, 1]));
        let rare = bmm.log_probability(&MultiLabel::from(vec![0, 2]));
        assert!(frequent > rare, "expected {frequent} > {rare}.");
    }

    #[test]
    fn test_mixture_weights_sum_to_one() {
        let bmm = BernoulliMixture::fit(&labels(), 3, 3);
        let sum = bmm.mixtures().iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1e-9, "expected 1.0, got {sum}.");
        assert_eq!(bmm.n_clusters(), 3);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let a = BernoulliMixture::fit(&labels(), 3, 2);
        let b = BernoulliMixture::fit(&labels(), 3, 2);
        assert_eq!(a, b);
    }
}
