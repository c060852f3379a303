//! This file defines some functions that checks some pre-conditions
//! E.g., shape of data, the Gaussian prior.

use crate::MultiLabelSample;
use crate::error::{Error, Result};


/// Check whether the training sample is valid or not.
#[inline(always)]
pub(crate) fn check_sample(sample: &MultiLabelSample) -> Result<()>
{
    let (n_sample, _) = sample.shape();

    // A CRF cannot be built from an empty sample.
    if n_sample == 0 {
        return Err(Error::EmptySample("has no example"));
    }

    // At least one class must exist.
    if sample.n_classes() == 0 {
        return Err(Error::EmptySample("has no class"));
    }
    Ok(())
}


/// Check the variance of the Gaussian prior.
#[inline(always)]
pub(crate) fn check_gaussian_variance(variance: f64) {
    assert!(
        variance > 0f64 && variance.is_finite(),
        "the Gaussian variance must be positive, got {variance}"
    );
}


/// Check that a parameter vector has the expected length.
#[inline(always)]
pub(crate) fn check_parameter_length(params: &[f64], expected: usize) {
    assert_eq!(
        params.len(), expected,
        "parameter vector has length {}, expected {expected}",
        params.len(),
    );
}
