use std::fmt;

const DEFAULT_ABSOLUTE_EPSILON: f64 = 1e-4;
const DEFAULT_RELATIVE_EPSILON: f64 = 1e-4;
const DEFAULT_MAX_ITERATION: usize = 10_000;


/// Tracks the objective values seen by an optimizer and
/// decides whether the optimization has converged.
/// 
/// Converged means one of
/// - `|f_{t-1} - f_t| ≤ absolute_epsilon`,
/// - `|f_{t-1} - f_t| ≤ relative_epsilon * |f_{t-1}|`,
/// - at least `max_iteration` values were recorded.
#[derive(Debug, Clone)]
pub struct Terminator {
    history: Vec<f64>,
    absolute_epsilon: f64,
    relative_epsilon: f64,
    max_iteration: usize,
}


impl Terminator {
    /// Construct a new instance of `Terminator`
    /// with the default tolerances.
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            absolute_epsilon: DEFAULT_ABSOLUTE_EPSILON,
            relative_epsilon: DEFAULT_RELATIVE_EPSILON,
            max_iteration: DEFAULT_MAX_ITERATION,
        }
    }


    /// Set the absolute tolerance.
    pub fn set_absolute_epsilon(&mut self, epsilon: f64) -> &mut Self {
        self.absolute_epsilon = epsilon;
        self
    }


    /// Set the relative tolerance.
    pub fn set_relative_epsilon(&mut self, epsilon: f64) -> &mut Self {
        self.relative_epsilon = epsilon;
        self
    }


    /// Set the maximum number of recorded values.
    pub fn set_max_iteration(&mut self, max_iteration: usize) -> &mut Self {
        self.max_iteration = max_iteration;
        self
    }


    /// Returns the absolute tolerance.
    pub fn absolute_epsilon(&self) -> f64 {
        self.absolute_epsilon
    }


    /// Record a new objective value.
    pub fn add(&mut self, value: f64) {
        self.history.push(value);
    }


    /// Returns the last recorded objective value.
    pub fn last_value(&self) -> Option<f64> {
        self.history.last().copied()
    }


    /// Returns every recorded objective value in order.
    pub fn history(&self) -> &[f64] {
        &self.history[..]
    }


    /// Returns `true` if the convergence criterion is met.
    pub fn should_terminate(&self) -> bool {
        if self.history.len() >= self.max_iteration { return true; }

        let n = self.history.len();
        if n < 2 { return false; }

        let prev = self.history[n - 2];
        let last = self.history[n - 1];
        let diff = (prev - last).abs();

        diff <= self.absolute_epsilon
            || diff <= self.relative_epsilon * prev.abs()
    }
}


impl Default for Terminator {
    fn default() -> Self {
        Self::new()
    }
}


impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Terminator(abs. eps = {}, rel. eps = {}, max iter = {}, {} values)",
            self.absolute_epsilon,
            self.relative_epsilon,
            self.max_iteration,
            self.history.len(),
        )
    }
}
