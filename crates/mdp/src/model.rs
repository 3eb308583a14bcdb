//! Finite discounted MDPs stored as dense, pair-indexed tables.

use std::fmt;

use tracing::debug;

use crate::error::MdpError;

/// Row sums must be within this distance of one.
pub const ROW_TOLERANCE: f64 = 1e-9;

/// An admissible (state, action) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateAction {
    /// State index.
    pub state: usize,
    /// Action label, meaningful to the model that created it.
    pub action: usize,
}

impl StateAction {
    /// Creates a pair.
    pub fn new(state: usize, action: usize) -> Self {
        Self { state, action }
    }
}

impl fmt::Display for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.state, self.action)
    }
}

/// A finite MDP over states `0..n` with a discount factor.
///
/// Each admissible pair has a dense index, assigned in the order pairs were
/// first added; transition rows and rewards are stored by that index.
#[derive(Debug, Clone)]
pub struct FiniteMdp {
    n_states: usize,
    discount: f64,
    pairs: Vec<StateAction>,
    transitions: Vec<f64>,
    rewards: Vec<f64>,
    by_state: Vec<Vec<usize>>,
}

impl FiniteMdp {
    /// Number of states.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Discount factor.
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Admissible pairs in index order.
    pub fn pairs(&self) -> &[StateAction] {
        &self.pairs
    }

    /// Dense index of `pair`, if admissible.
    pub fn pair_index(&self, pair: StateAction) -> Option<usize> {
        self.by_state
            .get(pair.state)?
            .iter()
            .copied()
            .find(|&i| self.pairs[i] == pair)
    }

    /// Pair indices admissible in `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` is out of range.
    pub fn actions(&self, state: usize) -> &[usize] {
        &self.by_state[state]
    }

    /// Transition probabilities of pair `idx` over next states.
    pub fn transition_row(&self, idx: usize) -> &[f64] {
        &self.transitions[idx * self.n_states..(idx + 1) * self.n_states]
    }

    /// Expected one-step reward of pair `idx`.
    pub fn reward(&self, idx: usize) -> f64 {
        self.rewards[idx]
    }

    /// `R(s,a) + γ Σ P(s'|s,a) V(s')` for pair `idx`.
    pub fn q_value(&self, idx: usize, values: &[f64]) -> f64 {
        let future: f64 = self
            .transition_row(idx)
            .iter()
            .zip(values)
            .map(|(p, v)| p * v)
            .sum();
        self.rewards[idx] + self.discount * future
    }
}

/// Accumulates transitions and rewards for a [`FiniteMdp`].
///
/// Probabilities added for the same `(pair, next)` combination are summed,
/// so a model can enumerate its random outcomes one by one.
#[derive(Debug, Clone)]
pub struct MdpBuilder {
    n_states: usize,
    discount: f64,
    pairs: Vec<StateAction>,
    transitions: Vec<f64>,
    rewards: Vec<f64>,
}

impl MdpBuilder {
    /// Starts an MDP over states `0..n_states`.
    ///
    /// # Errors
    ///
    /// Returns [`MdpError::InvalidDiscount`] unless `0 <= discount < 1`.
    pub fn new(n_states: usize, discount: f64) -> Result<Self, MdpError> {
        if !(0.0..1.0).contains(&discount) {
            return Err(MdpError::InvalidDiscount { value: discount });
        }
        Ok(Self {
            n_states,
            discount,
            pairs: Vec::new(),
            transitions: Vec::new(),
            rewards: Vec::new(),
        })
    }

    fn check_state(&self, state: usize) -> Result<(), MdpError> {
        if state < self.n_states {
            Ok(())
        } else {
            Err(MdpError::StateOutOfRange {
                state,
                n: self.n_states,
            })
        }
    }

    /// Returns the dense index of `pair`, registering it if new.
    ///
    /// # Errors
    ///
    /// Returns [`MdpError::StateOutOfRange`] if the pair's state is invalid.
    pub fn pair(&mut self, pair: StateAction) -> Result<usize, MdpError> {
        self.check_state(pair.state)?;
        if let Some(idx) = self.pairs.iter().position(|&p| p == pair) {
            return Ok(idx);
        }
        self.pairs.push(pair);
        self.transitions
            .extend(std::iter::repeat_n(0.0, self.n_states));
        self.rewards.push(0.0);
        Ok(self.pairs.len() - 1)
    }

    /// Adds probability `p` of moving to `next` under `pair`.
    ///
    /// # Errors
    ///
    /// Returns [`MdpError::StateOutOfRange`] for an invalid state and
    /// [`MdpError::InvalidProbability`] if `p` is outside `[0, 1]`.
    pub fn add_transition(
        &mut self,
        pair: StateAction,
        next: usize,
        p: f64,
    ) -> Result<&mut Self, MdpError> {
        self.check_state(next)?;
        if !(0.0..=1.0).contains(&p) {
            return Err(MdpError::InvalidProbability { value: p });
        }
        let idx = self.pair(pair)?;
        self.transitions[idx * self.n_states + next] += p;
        Ok(self)
    }

    /// Adds `r` to the expected reward of `pair`.
    ///
    /// # Errors
    ///
    /// Returns [`MdpError::StateOutOfRange`] if the pair's state is invalid.
    pub fn add_reward(&mut self, pair: StateAction, r: f64) -> Result<&mut Self, MdpError> {
        let idx = self.pair(pair)?;
        self.rewards[idx] += r;
        Ok(self)
    }

    /// Validates and freezes the model.
    ///
    /// # Errors
    ///
    /// Returns [`MdpError::RowNotStochastic`] for the first pair whose row
    /// does not sum to one and [`MdpError::NoActions`] for the first state
    /// without an admissible pair.
    #[tracing::instrument(skip_all, fields(n_states = self.n_states, n_pairs = self.pairs.len()))]
    pub fn build(self) -> Result<FiniteMdp, MdpError> {
        for (idx, pair) in self.pairs.iter().enumerate() {
            let row = &self.transitions[idx * self.n_states..(idx + 1) * self.n_states];
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_TOLERANCE {
                return Err(MdpError::RowNotStochastic {
                    state: pair.state,
                    action: pair.action,
                    sum,
                });
            }
        }

        let mut by_state = vec![Vec::new(); self.n_states];
        for (idx, pair) in self.pairs.iter().enumerate() {
            by_state[pair.state].push(idx);
        }
        if let Some(state) = by_state.iter().position(Vec::is_empty) {
            return Err(MdpError::NoActions { state });
        }

        debug!("MDP built");
        Ok(FiniteMdp {
            n_states: self.n_states,
            discount: self.discount,
            pairs: self.pairs,
            transitions: self.transitions,
            rewards: self.rewards,
            by_state,
        })
    }
}
