use super::LossOracle;


/// The trait [`Optimizer`] defines one step of an iterative
/// minimization method over a [`LossOracle`].
/// 
/// Callers drive the optimization by calling
/// [`Optimizer::iterate`] as many times as they like;
/// an optimizer never decides on its own to stop.
pub trait Optimizer {
    /// The loss being minimized.
    type Oracle: LossOracle;

    /// Returns the name of the optimizer.
    fn name(&self) -> &str;

    /// Performs one step and moves the oracle's parameters.
    fn iterate(&mut self);

    /// Returns the oracle (and so the current parameters).
    fn oracle(&self) -> &Self::Oracle;

    /// Consumes the optimizer and returns the oracle.
    fn into_oracle(self) -> Self::Oracle
        where Self: Sized;

    /// The objective value after the last step,
    /// for optimizers that track it.
    fn last_objective(&self) -> Option<f64> {
        None
    }

    /// Whether the optimizer's own convergence criterion is met.
    /// This is bookkeeping only: [`Optimizer::iterate`] keeps working.
    fn is_converged(&self) -> bool {
        false
    }
}
