use tracing::{debug, info};

use crate::config::{TrainingConfig, WarmStart};
use crate::crf::{Cmlcrf, CrfLoss};
use crate::error::{Error, Result};
use crate::optimization::{GradientDescent, Lbfgs, Optimizer};
use crate::sample::MultiLabelSample;
use super::{EvaluationSnapshot, FinalReport};

use std::fs;


/// The absolute tolerance of the L-BFGS terminator.
const LBFGS_ABSOLUTE_EPSILON: f64 = 0.1;


/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// The final model.
    pub model: Cmlcrf,
    /// One snapshot per round, in order.
    pub snapshots: Vec<EvaluationSnapshot>,
    /// Evaluation of the final model.
    pub report: FinalReport,
}


/// Runs one training job described by a [`TrainingConfig`].
/// 
/// ```no_run
/// use minilabels::prelude::*;
/// 
/// let config = TrainingConfig::new("output", "model")
///     .warm_start(WarmStart::Off)
///     .n_rounds(10);
/// let train = MultiLabelSample::from_svmlight("train.svm").unwrap();
/// let test = MultiLabelSample::from_svmlight("test.svm").unwrap();
/// 
/// let outcome = TrainingController::new(config)
///     .on_snapshot(|snapshot| println!("{snapshot}"))
///     .run(&train, &test)
///     .unwrap();
/// println!("{}", outcome.report);
/// ```
pub struct TrainingController<'a> {
    config: TrainingConfig,
    on_snapshot: Option<Box<dyn FnMut(&EvaluationSnapshot) + 'a>>,
}


impl<'a> TrainingController<'a> {
    /// Construct a controller for `config`.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config, on_snapshot: None, }
    }


    /// Register a callback that receives every snapshot
    /// as soon as its round completes.
    pub fn on_snapshot<F>(mut self, callback: F) -> Self
        where F: FnMut(&EvaluationSnapshot) + 'a
    {
        self.on_snapshot = Some(Box::new(callback));
        self
    }


    /// Returns the configuration of this run.
    #[inline]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }


    /// Run the whole job.
    /// 
    /// - [`WarmStart::Off`] builds a new model from `train` and trains it.
    /// - [`WarmStart::Retrain`] loads the persisted model and trains it.
    /// - [`WarmStart::Resume`] loads the persisted model and
    ///   goes straight to the final evaluation.
    /// 
    /// Training always runs exactly `n_rounds` steps.
    /// The model is saved at the end when `save_model` is set.
    pub fn run(
        &mut self,
        train: &MultiLabelSample,
        test: &MultiLabelSample,
    ) -> Result<TrainingOutcome>
    {
        let (model, snapshots) = match self.config.warm_start {
            WarmStart::Resume => {
                let model = self.load_model()?;
                info!("loading model:\n{model}");
                (model, Vec::new())
            },
            WarmStart::Retrain => {
                let model = self.load_model()?;
                info!("retrain model:\n{model}");
                self.train(model, train, test)
            },
            WarmStart::Off => {
                let mut model = Cmlcrf::new(train, self.config.n_clusters)?;
                model.set_consider_bmm(self.config.consider_bmm);
                model.set_consider_pair(self.config.consider_pair);
                info!("new model:\n{model}");
                self.train(model, train, test)
            },
        };

        let report = FinalReport::evaluate(&model, train, test);

        if self.config.save_model {
            self.save_model(&model)?;
        }

        Ok(TrainingOutcome { model, snapshots, report })
    }


    fn load_model(&self) -> Result<Cmlcrf> {
        let path = self.config.model_path();
        info!(path = %path.display(), "loading the persisted model");
        Cmlcrf::deserialize(path)
    }


    fn save_model(&self, model: &Cmlcrf) -> Result<()> {
        let path = self.config.model_path();
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| Error::ModelSave {
                path: path.clone(),
                source: e.into(),
            })?;
        model.serialize(&path)?;
        info!(path = %path.display(), "the model is saved");
        Ok(())
    }


    fn train(
        &mut self,
        model: Cmlcrf,
        train: &MultiLabelSample,
        test: &MultiLabelSample,
    ) -> (Cmlcrf, Vec<EvaluationSnapshot>)
    {
        let loss = CrfLoss::new(model, train, self.config.gaussian_variance)
            .parallelism(true)
            .regularize_all(self.config.regularize_all);

        if self.config.use_lbfgs {
            let mut optimizer = Lbfgs::new(loss);
            optimizer.terminator_mut()
                .set_absolute_epsilon(LBFGS_ABSOLUTE_EPSILON);
            self.rounds(optimizer, train, test)
        } else {
            self.rounds(GradientDescent::new(loss), train, test)
        }
    }


    // The loop never stops early:
    // convergence of the optimizer is only reported.
    fn rounds<'s, O>(
        &mut self,
        mut optimizer: O,
        train: &MultiLabelSample,
        test: &MultiLabelSample,
    ) -> (Cmlcrf, Vec<EvaluationSnapshot>)
        where O: Optimizer<Oracle = CrfLoss<'s>>,
    {
        let n_rounds = self.config.n_rounds;
        info!(optimizer = optimizer.name(), n_rounds, "start training");

        let mut snapshots = Vec::with_capacity(n_rounds);
        let mut converged = false;
        for iteration in 0..n_rounds {
            optimizer.iterate();

            let snapshot = EvaluationSnapshot::evaluate(
                iteration,
                optimizer.last_objective(),
                optimizer.oracle().model(),
                train,
                test,
            );
            debug!(
                iteration,
                objective = ?snapshot.objective,
                train_accuracy = snapshot.train_accuracy,
                test_accuracy = snapshot.test_accuracy,
                "round finished"
            );

            if !converged && optimizer.is_converged() {
                converged = true;
                info!(iteration, "the optimizer has converged");
            }

            if let Some(callback) = self.on_snapshot.as_mut() {
                callback(&snapshot);
            }
            snapshots.push(snapshot);
        }

        (optimizer.into_oracle().into_model(), snapshots)
    }
}
