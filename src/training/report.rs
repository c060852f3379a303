use crate::crf::Cmlcrf;
use crate::metrics::{accuracy, overlap, hamming_loss, f1};
use crate::sample::MultiLabelSample;

use std::fmt;


/// Evaluation of the final model.
/// Hamming loss and F1 are measured on the test sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalReport {
    /// Subset accuracy on the training sample.
    pub train_accuracy: f64,
    /// Overlap on the training sample.
    pub train_overlap: f64,
    /// Subset accuracy on the test sample.
    pub test_accuracy: f64,
    /// Overlap on the test sample.
    pub test_overlap: f64,
    /// Hamming loss on the test sample.
    pub hamming_loss: f64,
    /// Instance-averaged F1 on the test sample.
    pub f1: f64,
}


impl FinalReport {
    /// Predict both samples with `model` and measure the result.
    pub fn evaluate(
        model: &Cmlcrf,
        train: &MultiLabelSample,
        test: &MultiLabelSample,
    ) -> Self
    {
        let pred_train = model.predict(train);
        let pred_test = model.predict(test);
        let gold_test = test.labels();

        Self {
            train_accuracy: accuracy(train.labels(), &pred_train),
            train_overlap: overlap(train.labels(), &pred_train),
            test_accuracy: accuracy(gold_test, &pred_test),
            test_overlap: overlap(gold_test, &pred_test),
            hamming_loss: hamming_loss(gold_test, &pred_test, test.n_classes()),
            f1: f1(gold_test, &pred_test),
        }
    }
}


const RESULTS_HEADER: &str =
    "--------------------------------Results-----------------------------";


impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RESULTS_HEADER}\n")?;
        writeln!(
            f,
            "Train acc: {:.4}\tTrain overlap {:.4}\
             \tTest acc: {:.4}\tTest overlap {:.4}",
            self.train_accuracy,
            self.train_overlap,
            self.test_accuracy,
            self.test_overlap,
        )?;
        writeln!(f, "hamming loss: {:.4}", self.hamming_loss)?;
        write!(f, "F1: {:.4}", self.f1)
    }
}
