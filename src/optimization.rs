//! Iterative optimizers over a [`LossOracle`].
//! 
//! An optimizer owns its oracle, and the oracle owns the parameters
//! being optimized. Each call of [`Optimizer::iterate`] performs
//! exactly one step and leaves the new parameters in the oracle.

/// Defines the `LossOracle` trait.
pub mod loss_oracle;

/// Defines the `Optimizer` trait.
pub mod optimizer;

/// Convergence bookkeeping.
pub mod terminator;

/// Backtracking line search.
pub mod line_search;

/// Limited-memory BFGS.
pub mod lbfgs;

/// Steepest descent.
pub mod gradient_descent;


pub use loss_oracle::LossOracle;
pub use optimizer::Optimizer;
pub use terminator::Terminator;
pub use line_search::{BacktrackingLineSearch, LineSearchResult};
pub use lbfgs::Lbfgs;
pub use gradient_descent::GradientDescent;
