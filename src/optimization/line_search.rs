use super::LossOracle;
use crate::common::utils::inner_product;

const DEFAULT_INITIAL_STEP: f64 = 1.0;
const DEFAULT_SHRINK: f64 = 0.5;
const DEFAULT_SUFFICIENT_DECREASE: f64 = 1e-4;
const DEFAULT_MAX_TRIALS: usize = 50;


/// The outcome of a line search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSearchResult {
    /// Accepted step size; `0.0` if no step was accepted.
    pub step_size: f64,
    /// Objective value at the accepted point.
    pub value: f64,
}


/// Backtracking line search with the Armijo condition
/// ```txt
/// f(x + λd) ≤ f(x) + c λ ∇f(x)∙d
/// ```
/// Starting from `λ = initial_step`, `λ` shrinks geometrically
/// until the condition holds.
#[derive(Debug, Clone)]
pub struct BacktrackingLineSearch {
    initial_step: f64,
    shrink: f64,
    sufficient_decrease: f64,
    max_trials: usize,
}


impl BacktrackingLineSearch {
    /// Construct a new instance with the default constants.
    pub fn new() -> Self {
        Self {
            initial_step: DEFAULT_INITIAL_STEP,
            shrink: DEFAULT_SHRINK,
            sufficient_decrease: DEFAULT_SUFFICIENT_DECREASE,
            max_trials: DEFAULT_MAX_TRIALS,
        }
    }


    /// Set the first step size tried.
    pub fn initial_step(mut self, step: f64) -> Self {
        assert!(step > 0f64, "the initial step must be positive");
        self.initial_step = step;
        self
    }


    /// Set the maximal number of trials.
    pub fn max_trials(mut self, trials: usize) -> Self {
        self.max_trials = trials;
        self
    }


    /// Search along `direction` from the oracle's current point,
    /// whose value and gradient are `value` and `gradient`.
    /// 
    /// On success the oracle is left at the accepted point.
    /// If `direction` is not a descent direction or
    /// no trial satisfies the Armijo condition,
    /// the oracle is left where it started and
    /// the returned step size is `0.0`.
    pub fn search<O>(
        &self,
        oracle: &mut O,
        value: f64,
        gradient: &[f64],
        direction: &[f64],
    ) -> LineSearchResult
        where O: LossOracle,
    {
        let origin = oracle.parameters().to_vec();
        let slope = inner_product(gradient, direction);

        let stay = LineSearchResult { step_size: 0f64, value, };
        if !(slope < 0f64) { return stay; }

        let mut step = self.initial_step;
        let mut point = origin.clone();
        for _ in 0..self.max_trials {
            point.iter_mut()
                .zip(origin.iter().zip(direction))
                .for_each(|(p, (x, d))| { *p = x + step * d; });
            oracle.set_parameters(&point);

            let trial = oracle.objective_value();
            if trial <= value + self.sufficient_decrease * step * slope {
                return LineSearchResult { step_size: step, value: trial, };
            }
            step *= self.shrink;
        }

        oracle.set_parameters(&origin);
        stay
    }
}


impl Default for BacktrackingLineSearch {
    fn default() -> Self {
        Self::new()
    }
}
