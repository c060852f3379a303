use tracing::trace;

use super::{
    LossOracle,
    Optimizer,
    BacktrackingLineSearch,
};


/// Steepest descent with a backtracking line search.
/// Each [`Optimizer::iterate`] moves along `-∇f` once.
pub struct GradientDescent<O> {
    oracle: O,
    line_search: BacktrackingLineSearch,
}


impl<O> GradientDescent<O>
    where O: LossOracle,
{
    /// Construct a new instance of `GradientDescent`.
    pub fn new(oracle: O) -> Self {
        Self { oracle, line_search: BacktrackingLineSearch::new(), }
    }


    /// Replace the line search.
    pub fn line_search(mut self, line_search: BacktrackingLineSearch) -> Self {
        self.line_search = line_search;
        self
    }
}


impl<O> Optimizer for GradientDescent<O>
    where O: LossOracle,
{
    type Oracle = O;


    fn name(&self) -> &str {
        "Gradient Descent"
    }


    fn iterate(&mut self) {
        let (value, gradient) = self.oracle.value_and_gradient();
        let direction = gradient.iter()
            .map(|g| -g)
            .collect::<Vec<_>>();

        let result = self.line_search.search(
            &mut self.oracle, value, &gradient, &direction,
        );
        trace!(step = result.step_size, value = result.value, "gradient step");
    }


    fn oracle(&self) -> &O {
        &self.oracle
    }


    fn into_oracle(self) -> O {
        self.oracle
    }
}
