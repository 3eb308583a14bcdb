//! Optimal policies for finite discounted MDPs.
//!
//! Both solvers maximise expected discounted reward. The optimal values are
//! the solution of the linear program
//!
//! ```text
//!   minimise   Σ_s V(s)
//!   subject to V(s) >= R(s,a) + γ Σ_s' P(s'|s,a) V(s')   for every pair (s,a)
//! ```
//!
//! whose dual variables are the discounted state-action occupation measure
//! of the optimal policy started with unit weight in every state. A Bellman
//! constraint is active exactly when its dual is positive.

use tracing::{debug, info};

use crate::error::MdpError;
use crate::linalg::DenseMatrix;
use crate::model::{FiniteMdp, StateAction};

/// Duals above this value mark an active Bellman constraint.
pub const ACTIVE_DUAL_THRESHOLD: f64 = 1e-6;

/// A method for computing an optimal stationary policy.
pub trait MdpSolver {
    /// Solves `mdp`.
    ///
    /// # Errors
    ///
    /// Implementations return [`MdpError::SingularSystem`] or
    /// [`MdpError::NoConvergence`] when they cannot produce a solution.
    fn solve(&self, mdp: &FiniteMdp) -> Result<MdpSolution, MdpError>;
}

/// Optimal values, policy and Bellman duals of a solved MDP.
#[derive(Clone, Debug)]
pub struct MdpSolution {
    values: Vec<f64>,
    policy: Vec<usize>,
    duals: Vec<f64>,
    pairs: Vec<StateAction>,
    iterations: usize,
}

impl MdpSolution {
    /// Optimal value of each state.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Chosen pair index for each state.
    pub fn policy(&self) -> &[usize] {
        &self.policy
    }

    /// Chosen pair for `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` is out of range.
    pub fn decision(&self, state: usize) -> StateAction {
        self.pairs[self.policy[state]]
    }

    /// Dual value of every pair, in pair-index order.
    pub fn duals(&self) -> &[f64] {
        &self.duals
    }

    /// Pairs whose Bellman constraint is active, with their duals.
    pub fn active_constraints(&self) -> impl Iterator<Item = (StateAction, f64)> + '_ {
        self.pairs
            .iter()
            .zip(&self.duals)
            .filter(|(_, d)| d.abs() > ACTIVE_DUAL_THRESHOLD)
            .map(|(p, d)| (*p, *d))
    }

    /// Iterations the solver needed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// Exact values of a fixed policy: solves `(I − γ P_π) V = R_π`.
fn evaluate_policy(mdp: &FiniteMdp, policy: &[usize]) -> Result<Vec<f64>, MdpError> {
    let n = mdp.n_states();
    let mut a = DenseMatrix::identity(n);
    let mut b = Vec::with_capacity(n);
    for (s, &idx) in policy.iter().enumerate() {
        for (next, p) in mdp.transition_row(idx).iter().enumerate() {
            a.add(s, next, -mdp.discount() * p);
        }
        b.push(mdp.reward(idx));
    }
    a.solve(b)
}

/// Discounted occupation measure of `policy` from unit weight on every
/// state: solves `(I − γ P_πᵀ) x = 1`, then spreads `x` onto chosen pairs.
fn occupation_duals(mdp: &FiniteMdp, policy: &[usize]) -> Result<Vec<f64>, MdpError> {
    let n = mdp.n_states();
    let mut a = DenseMatrix::identity(n);
    for (s, &idx) in policy.iter().enumerate() {
        for (next, p) in mdp.transition_row(idx).iter().enumerate() {
            a.add(next, s, -mdp.discount() * p);
        }
    }
    let x = a.solve(vec![1.0; n])?;
    let mut duals = vec![0.0; mdp.pairs().len()];
    for (s, &idx) in policy.iter().enumerate() {
        duals[idx] = x[s];
    }
    Ok(duals)
}

/// Greedy pair per state; ties go to the lowest pair index.
fn greedy_policy(mdp: &FiniteMdp, values: &[f64]) -> Vec<usize> {
    (0..mdp.n_states())
        .map(|s| {
            let mut best = mdp.actions(s)[0];
            let mut best_q = mdp.q_value(best, values);
            for &idx in &mdp.actions(s)[1..] {
                let q = mdp.q_value(idx, values);
                if improves(q, best_q) {
                    best = idx;
                    best_q = q;
                }
            }
            best
        })
        .collect()
}

/// `true` if `q` beats `incumbent` by more than rounding noise.
fn improves(q: f64, incumbent: f64) -> bool {
    q > incumbent + 1e-10 * incumbent.abs().max(1.0)
}

fn finish(
    mdp: &FiniteMdp,
    values: Vec<f64>,
    policy: Vec<usize>,
    iterations: usize,
) -> Result<MdpSolution, MdpError> {
    let duals = occupation_duals(mdp, &policy)?;
    Ok(MdpSolution {
        values,
        policy,
        duals,
        pairs: mdp.pairs().to_vec(),
        iterations,
    })
}

/// Howard's policy iteration.
///
/// Starts from the first admissible action of every state, evaluates the
/// policy exactly and switches a state's action only on strict improvement,
/// so it terminates in finitely many steps.
#[derive(Clone, Debug)]
pub struct PolicyIteration {
    max_iterations: usize,
}

impl PolicyIteration {
    /// Creates the solver with an iteration limit of 1 000.
    pub fn new() -> Self {
        Self {
            max_iterations: 1_000,
        }
    }

    /// Sets the iteration limit.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for PolicyIteration {
    fn default() -> Self {
        Self::new()
    }
}

impl MdpSolver for PolicyIteration {
    #[tracing::instrument(name = "policy_iteration", skip_all, fields(n_states = mdp.n_states()))]
    fn solve(&self, mdp: &FiniteMdp) -> Result<MdpSolution, MdpError> {
        let mut policy: Vec<usize> = (0..mdp.n_states()).map(|s| mdp.actions(s)[0]).collect();

        for iteration in 1..=self.max_iterations {
            let values = evaluate_policy(mdp, &policy)?;
            let mut changed = 0;
            for (s, current) in policy.iter_mut().enumerate() {
                let mut best_q = mdp.q_value(*current, &values);
                for &idx in mdp.actions(s) {
                    let q = mdp.q_value(idx, &values);
                    if improves(q, best_q) {
                        *current = idx;
                        best_q = q;
                        changed += 1;
                    }
                }
            }
            debug!(iteration, changed, "policy improvement step");
            if changed == 0 {
                info!(iterations = iteration, "policy iteration converged");
                return finish(mdp, values, policy, iteration);
            }
        }
        Err(MdpError::NoConvergence {
            solver: "policy iteration",
            iterations: self.max_iterations,
        })
    }
}

/// Value iteration with the sup-norm stopping rule.
///
/// Stops once successive value vectors differ by less than
/// `tolerance · (1 − γ) / (2γ)`, which bounds the distance to the optimal
/// values by `tolerance / 2`, then extracts the greedy policy.
#[derive(Clone, Debug)]
pub struct ValueIteration {
    tolerance: f64,
    max_iterations: usize,
}

impl ValueIteration {
    /// Creates the solver with tolerance `1e-6` and limit 100 000.
    pub fn new() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100_000,
        }
    }

    /// Sets the value tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration limit.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for ValueIteration {
    fn default() -> Self {
        Self::new()
    }
}

impl MdpSolver for ValueIteration {
    #[tracing::instrument(name = "value_iteration", skip_all, fields(n_states = mdp.n_states()))]
    fn solve(&self, mdp: &FiniteMdp) -> Result<MdpSolution, MdpError> {
        let gamma = mdp.discount();
        let threshold = if gamma > 0.0 {
            self.tolerance * (1.0 - gamma) / (2.0 * gamma)
        } else {
            f64::INFINITY
        };

        let mut values = vec![0.0; mdp.n_states()];
        for iteration in 1..=self.max_iterations {
            let next: Vec<f64> = (0..mdp.n_states())
                .map(|s| {
                    mdp.actions(s)
                        .iter()
                        .map(|&idx| mdp.q_value(idx, &values))
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .collect();
            let delta = next
                .iter()
                .zip(&values)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            values = next;
            if delta < threshold {
                info!(iterations = iteration, delta, "value iteration converged");
                let policy = greedy_policy(mdp, &values);
                return finish(mdp, values, policy, iteration);
            }
        }
        Err(MdpError::NoConvergence {
            solver: "value iteration",
            iterations: self.max_iterations,
        })
    }
}
