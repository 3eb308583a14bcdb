//! Steady-state probabilities and the performance measures derived from them.

/// Long-run occupancy of a finite queue.
///
/// Holds `π₀..π_K` and the arrival rate and server count needed to derive
/// the usual measures through Little's law. Customers arriving when the
/// system holds `K` are lost, so the effective arrival rate is
/// `λ(1 − π_K)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SteadyState {
    probabilities: Vec<f64>,
    arrival_rate: f64,
    servers: u32,
}

impl SteadyState {
    /// Normalises log weights `ln w₀..ln w_K` into probabilities.
    ///
    /// Weights are shifted by their maximum before exponentiating, so
    /// products of rate ratios far outside the `f64` range still normalise.
    pub(crate) fn from_log_weights(log_weights: &[f64], arrival_rate: f64, servers: u32) -> Self {
        let max = log_weights
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let scaled: Vec<f64> = log_weights.iter().map(|lw| (lw - max).exp()).collect();
        let total: f64 = scaled.iter().sum();
        let probabilities = scaled.into_iter().map(|w| w / total).collect();
        Self {
            probabilities,
            arrival_rate,
            servers,
        }
    }

    /// Returns `π₀..π_K`.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of `n` customers in the system; zero above capacity.
    pub fn prob(&self, n: usize) -> f64 {
        self.probabilities.get(n).copied().unwrap_or(0.0)
    }

    /// Probability that the system is empty.
    pub fn p0(&self) -> f64 {
        self.prob(0)
    }

    /// Maximum number of customers in the system.
    pub fn capacity(&self) -> usize {
        self.probabilities.len() - 1
    }

    /// Number of servers.
    pub fn servers(&self) -> u32 {
        self.servers
    }

    /// Probability that an arrival is turned away.
    pub fn blocking_probability(&self) -> f64 {
        self.prob(self.capacity())
    }

    /// Mean number of customers in the system, `L`.
    pub fn mean_in_system(&self) -> f64 {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(n, p)| n as f64 * p)
            .sum()
    }

    /// Mean number of customers waiting, `L_q`.
    pub fn mean_in_queue(&self) -> f64 {
        let s = self.servers as usize;
        self.probabilities
            .iter()
            .enumerate()
            .skip(s)
            .map(|(n, p)| (n - s) as f64 * p)
            .sum()
    }

    /// Arrival rate of customers that actually join, `λ(1 − π_K)`.
    pub fn effective_arrival_rate(&self) -> f64 {
        self.arrival_rate * (1.0 - self.blocking_probability())
    }

    /// Mean time in the system, `W = L / λ_eff`.
    pub fn mean_time_in_system(&self) -> f64 {
        self.mean_in_system() / self.effective_arrival_rate()
    }

    /// Mean time waiting, `W_q = L_q / λ_eff`.
    pub fn mean_wait_in_queue(&self) -> f64 {
        self.mean_in_queue() / self.effective_arrival_rate()
    }

    /// Fraction of server capacity in use, `Σ min(n, s) πₙ / s`.
    pub fn utilisation(&self) -> f64 {
        let s = self.servers as usize;
        let busy: f64 = self
            .probabilities
            .iter()
            .enumerate()
            .map(|(n, p)| n.min(s) as f64 * p)
            .sum();
        busy / s as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn from_weights(weights: &[f64], arrival_rate: f64, servers: u32) -> SteadyState {
        let logs: Vec<f64> = weights.iter().map(|w| w.ln()).collect();
        SteadyState::from_log_weights(&logs, arrival_rate, servers)
    }

    fn sample() -> SteadyState {
        from_weights(&[4.0, 2.0, 1.0, 1.0], 2.0, 1)
    }

    #[test]
    fn normalises_weights() {
        let ss = sample();
        for (p, want) in ss.probabilities().iter().zip([0.5, 0.25, 0.125, 0.125]) {
            assert_abs_diff_eq!(*p, want, epsilon = 1e-15);
        }
        assert_eq!(ss.capacity(), 3);
        assert_eq!(ss.prob(7), 0.0);
    }

    #[test]
    fn normalises_log_weights_beyond_f64_range() {
        let ss = SteadyState::from_log_weights(&[0.0, 800.0, 800.0 + 2f64.ln()], 1.0, 1);
        assert!(ss.probabilities().iter().all(|p| p.is_finite()));
        assert_abs_diff_eq!(ss.prob(1), 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.prob(2), 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(ss.p0(), 0.0);
    }

    #[test]
    fn zero_weight_states_get_zero_probability() {
        let ss = SteadyState::from_log_weights(&[0.0, f64::NEG_INFINITY], 1.0, 1);
        assert_eq!(ss.probabilities(), &[1.0, 0.0]);
    }

    #[test]
    fn measures() {
        let ss = sample();
        let l = 0.25 + 2.0 * 0.125 + 3.0 * 0.125;
        let lq = 0.125 + 2.0 * 0.125;
        assert_abs_diff_eq!(ss.mean_in_system(), l, epsilon = 1e-15);
        assert_abs_diff_eq!(ss.mean_in_queue(), lq, epsilon = 1e-15);
        assert_abs_diff_eq!(ss.effective_arrival_rate(), 2.0 * 0.875, epsilon = 1e-15);
        assert_abs_diff_eq!(ss.mean_time_in_system(), l / 1.75, epsilon = 1e-15);
        assert_abs_diff_eq!(ss.mean_wait_in_queue(), lq / 1.75, epsilon = 1e-15);
    }

    #[test]
    fn single_server_utilisation_is_one_minus_p0() {
        let ss = sample();
        assert_abs_diff_eq!(ss.utilisation(), 1.0 - ss.p0(), epsilon = 1e-15);
    }

    #[test]
    fn queue_length_counts_only_waiting_customers() {
        let ss = from_weights(&[1.0, 1.0, 1.0, 1.0], 1.0, 2);
        assert_abs_diff_eq!(ss.mean_in_queue(), 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(
            ss.utilisation(),
            (0.25 + 2.0 * 0.25 + 2.0 * 0.25) / 2.0,
            epsilon = 1e-15
        );
    }
}
