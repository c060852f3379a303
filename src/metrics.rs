//! Evaluation measures for multi-label predictions.
//! Each function takes the gold label sets and the predicted ones,
//! in the same order.
use crate::MultiLabel;


/// Subset accuracy:
/// the fraction of examples whose predicted set equals the gold set.
/// Returns `0.0` for an empty sample.
pub fn accuracy(gold: &[MultiLabel], predictions: &[MultiLabel]) -> f64 {
    check_lengths(gold, predictions);
    mean(gold, predictions, |y, p| if y == p { 1f64 } else { 0f64 })
}


/// Mean Jaccard overlap `|y ∩ p| / |y ∪ p|`.
/// Two empty sets overlap perfectly.
pub fn overlap(gold: &[MultiLabel], predictions: &[MultiLabel]) -> f64 {
    check_lengths(gold, predictions);
    mean(gold, predictions, |y, p| {
        let union = y.union_len(p);
        if union == 0 { return 1f64; }
        y.intersection_len(p) as f64 / union as f64
    })
}


/// Hamming loss: the fraction of wrongly assigned
/// `(example, class)` pairs.
pub fn hamming_loss(
    gold: &[MultiLabel],
    predictions: &[MultiLabel],
    n_classes: usize,
) -> f64
{
    check_lengths(gold, predictions);
    if n_classes == 0 { return 0f64; }

    let n_classes = n_classes as f64;
    mean(gold, predictions, |y, p| {
        y.symmetric_difference_len(p) as f64 / n_classes
    })
}


/// Instance-averaged F1 `2|y ∩ p| / (|y| + |p|)`.
/// Two empty sets score `1.0`.
pub fn f1(gold: &[MultiLabel], predictions: &[MultiLabel]) -> f64 {
    check_lengths(gold, predictions);
    mean(gold, predictions, |y, p| {
        let denom = y.len() + p.len();
        if denom == 0 { return 1f64; }
        2f64 * y.intersection_len(p) as f64 / denom as f64
    })
}


#[inline(always)]
fn check_lengths(gold: &[MultiLabel], predictions: &[MultiLabel]) {
    assert_eq!(
        gold.len(), predictions.len(),
        "the number of gold label sets and predictions differ"
    );
}


#[inline(always)]
fn mean<F>(gold: &[MultiLabel], predictions: &[MultiLabel], score: F) -> f64
    where F: Fn(&MultiLabel, &MultiLabel) -> f64
{
    if gold.is_empty() { return 0f64; }

    let n_sample = gold.len() as f64;
    gold.iter()
        .zip(predictions)
        .map(|(y, p)| score(y, p))
        .sum::<f64>()
        / n_sample
}
