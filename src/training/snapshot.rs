use crate::crf::Cmlcrf;
use crate::metrics::{accuracy, overlap};
use crate::sample::MultiLabelSample;

use std::fmt;


/// Evaluation of the model after one optimizer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationSnapshot {
    /// 0-based round.
    pub iteration: usize,
    /// Objective value after the step.
    /// Only L-BFGS tracks it.
    pub objective: Option<f64>,
    /// Subset accuracy on the training sample.
    pub train_accuracy: f64,
    /// Overlap on the training sample.
    pub train_overlap: f64,
    /// Subset accuracy on the test sample.
    pub test_accuracy: f64,
    /// Overlap on the test sample.
    pub test_overlap: f64,
}


impl EvaluationSnapshot {
    /// Predict both samples with `model` and measure the result.
    pub fn evaluate(
        iteration: usize,
        objective: Option<f64>,
        model: &Cmlcrf,
        train: &MultiLabelSample,
        test: &MultiLabelSample,
    ) -> Self
    {
        let pred_train = model.predict(train);
        let pred_test = model.predict(test);

        Self {
            iteration,
            objective,
            train_accuracy: accuracy(train.labels(), &pred_train),
            train_overlap: overlap(train.labels(), &pred_train),
            test_accuracy: accuracy(test.labels(), &pred_test),
            test_overlap: overlap(test.labels(), &pred_test),
        }
    }
}


impl fmt::Display for EvaluationSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "iter: {:04}", self.iteration)?;
        if let Some(objective) = self.objective {
            write!(f, "\tobjective: {objective:.4}")?;
        }
        write!(
            f,
            "\tTrain acc: {:.4}\tTrain overlap {:.4}\
             \tTest acc: {:.4}\tTest overlap {:.4}",
            self.train_accuracy,
            self.train_overlap,
            self.test_accuracy,
            self.test_overlap,
        )
    }
}
