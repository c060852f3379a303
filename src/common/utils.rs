//! This file provides some numerical helpers
//! shared by the optimizers and the CRF loss.
use rayon::prelude::*;


/// Returns the inner product of the given slices.
/// 
/// Time complexity: `O(n)`.
#[inline(always)]
pub fn inner_product(v1: &[f64], v2: &[f64]) -> f64 {
    v1.iter()
        .zip(v2)
        .map(|(a, b)| a * b)
        .sum::<f64>()
}


/// Returns the Euclidean norm of `v`.
#[inline(always)]
pub fn l2_norm(v: &[f64]) -> f64 {
    inner_product(v, v).sqrt()
}


/// Returns `log Σ exp(x_i)` computed in a numerically stable way.
/// Returns `-∞` for an empty slice.
#[inline(always)]
pub fn log_sum_exp(xs: &[f64]) -> f64 {
    let max = xs.iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY { return max; }

    let sum = xs.iter()
        .map(|x| (x - max).exp())
        .sum::<f64>();
    max + sum.ln()
}


/// Computes `y ← y + a x`.
#[inline(always)]
pub fn axpy(a: f64, x: &[f64], y: &mut [f64]) {
    y.par_iter_mut()
        .zip(x)
        .for_each(|(yi, xi)| { *yi += a * xi; });
}


/// Adds `rhs` into `lhs` component-wise.
/// Used to merge partition-local gradients.
#[inline(always)]
pub(crate) fn add_assign(lhs: &mut [f64], rhs: &[f64]) {
    lhs.iter_mut()
        .zip(rhs)
        .for_each(|(l, r)| { *l += r; });
}
