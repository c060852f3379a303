/// This trait defines the loss functions an [`Optimizer`] minimizes.
/// 
/// The oracle owns the current point.
/// [`LossOracle::set_parameters`] moves it,
/// and the value/gradient methods evaluate the loss at that point.
/// 
/// [`Optimizer`]: crate::optimization::Optimizer
pub trait LossOracle {
    /// The name of the loss function.
    fn name(&self) -> &str;

    /// The current point.
    fn parameters(&self) -> &[f64];

    /// Moves the current point to `params`.
    /// `params` has the same length as [`LossOracle::parameters`].
    fn set_parameters(&mut self, params: &[f64]);

    /// Loss value at the current point.
    fn objective_value(&self) -> f64;

    /// Gradient vector at the current point.
    fn gradient(&self) -> Vec<f64>;

    /// Loss value and gradient at the current point.
    /// Override this when both share most of the work.
    fn value_and_gradient(&self) -> (f64, Vec<f64>) {
        (self.objective_value(), self.gradient())
    }

    /// Returns the number of parameters.
    fn n_parameters(&self) -> usize {
        self.parameters().len()
    }
}
