//! The collective multi-label CRF and its training loss.

/// Bernoulli mixture over label sets.
pub mod bmm;

/// The multi-label CRF model.
pub mod cmlcrf;

/// Negative log-likelihood of the CRF.
pub mod crf_loss;


pub use bmm::BernoulliMixture;
pub use cmlcrf::Cmlcrf;
pub use crf_loss::CrfLoss;
