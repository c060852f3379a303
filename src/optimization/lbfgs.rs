use tracing::{debug, trace};

use super::{
    LossOracle,
    Optimizer,
    Terminator,
    BacktrackingLineSearch,
};
use crate::common::utils::{axpy, inner_product, l2_norm};

use std::collections::VecDeque;

const DEFAULT_HISTORY: usize = 5;
const CURVATURE_TOLERANCE: f64 = 1e-10;


/// Limited-memory BFGS
/// (Nocedal, 1980 - Updating Quasi-Newton Matrices with Limited Storage).
/// 
/// The inverse Hessian is approximated from the last `m` pairs
/// `s = x_{t+1} - x_t`, `y = ∇f_{t+1} - ∇f_t`
/// by the two-loop recursion.
/// The objective after each step is recorded by a [`Terminator`].
pub struct Lbfgs<O> {
    oracle: O,
    line_search: BacktrackingLineSearch,
    terminator: Terminator,

    // Correction pairs, oldest first.
    s_history: VecDeque<Vec<f64>>,
    y_history: VecDeque<Vec<f64>>,
    m: usize,

    // Value and gradient at the oracle's current point.
    current: Option<(f64, Vec<f64>)>,
}


impl<O> Lbfgs<O>
    where O: LossOracle,
{
    /// Construct a new instance of `Lbfgs`.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            line_search: BacktrackingLineSearch::new(),
            terminator: Terminator::new(),
            s_history: VecDeque::with_capacity(DEFAULT_HISTORY),
            y_history: VecDeque::with_capacity(DEFAULT_HISTORY),
            m: DEFAULT_HISTORY,
            current: None,
        }
    }


    /// Set the number of correction pairs kept.
    pub fn history_size(mut self, m: usize) -> Self {
        assert!(m > 0, "L-BFGS needs at least one correction pair");
        self.m = m;
        self
    }


    /// Returns the terminator.
    pub fn terminator(&self) -> &Terminator {
        &self.terminator
    }


    /// Returns the terminator to tune its tolerances.
    pub fn terminator_mut(&mut self) -> &mut Terminator {
        &mut self.terminator
    }


    /// Computes `-H∇f` by the two-loop recursion.
    fn direction(&self, gradient: &[f64]) -> Vec<f64> {
        let mut q = gradient.to_vec();

        let rhos = self.s_history.iter()
            .zip(&self.y_history)
            .map(|(s, y)| 1f64 / inner_product(s, y))
            .collect::<Vec<_>>();
        let mut alphas = vec![0f64; rhos.len()];

        for k in (0..rhos.len()).rev() {
            let s = &self.s_history[k];
            let y = &self.y_history[k];
            alphas[k] = rhos[k] * inner_product(s, &q);
            axpy(-alphas[k], y, &mut q);
        }

        // Initial inverse Hessian `γI`.
        let gamma = match (self.s_history.back(), self.y_history.back()) {
            (Some(s), Some(y)) => inner_product(s, y) / inner_product(y, y),
            _ => {
                let norm = l2_norm(gradient);
                if norm > 0f64 { 1f64 / norm } else { 1f64 }
            },
        };
        q.iter_mut().for_each(|qi| { *qi *= gamma; });

        for k in 0..rhos.len() {
            let s = &self.s_history[k];
            let y = &self.y_history[k];
            let beta = rhos[k] * inner_product(y, &q);
            axpy(alphas[k] - beta, s, &mut q);
        }

        q.iter_mut().for_each(|qi| { *qi = -*qi; });
        q
    }


    fn push_correction(&mut self, s: Vec<f64>, y: Vec<f64>) {
        if inner_product(&s, &y) <= CURVATURE_TOLERANCE {
            trace!("curvature condition failed, the pair is dropped");
            return;
        }
        if self.s_history.len() == self.m {
            self.s_history.pop_front();
            self.y_history.pop_front();
        }
        self.s_history.push_back(s);
        self.y_history.push_back(y);
    }
}


impl<O> Optimizer for Lbfgs<O>
    where O: LossOracle,
{
    type Oracle = O;


    fn name(&self) -> &str {
        "L-BFGS"
    }


    fn iterate(&mut self) {
        let (value, gradient) = match self.current.take() {
            Some(current) => current,
            None => self.oracle.value_and_gradient(),
        };
        let origin = self.oracle.parameters().to_vec();

        let direction = self.direction(&gradient);
        let mut result = self.line_search.search(
            &mut self.oracle, value, &gradient, &direction,
        );

        // The quasi-Newton direction failed; restart from steepest descent.
        if result.step_size == 0f64 && !self.s_history.is_empty() {
            debug!("L-BFGS direction rejected, the history is cleared");
            self.s_history.clear();
            self.y_history.clear();
            let direction = self.direction(&gradient);
            result = self.line_search.search(
                &mut self.oracle, value, &gradient, &direction,
            );
        }

        let (new_value, new_gradient) = self.oracle.value_and_gradient();

        if result.step_size > 0f64 {
            let s = self.oracle.parameters()
                .iter()
                .zip(&origin)
                .map(|(x1, x0)| x1 - x0)
                .collect::<Vec<_>>();
            let y = new_gradient.iter()
                .zip(&gradient)
                .map(|(g1, g0)| g1 - g0)
                .collect::<Vec<_>>();
            self.push_correction(s, y);
        }

        trace!(step = result.step_size, value = new_value, "L-BFGS step");
        self.terminator.add(new_value);
        self.current = Some((new_value, new_gradient));
    }


    fn oracle(&self) -> &O {
        &self.oracle
    }


    fn into_oracle(self) -> O {
        self.oracle
    }


    fn last_objective(&self) -> Option<f64> {
        self.terminator.last_value()
    }


    fn is_converged(&self) -> bool {
        self.terminator.should_terminate()
    }
}
