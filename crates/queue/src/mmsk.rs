//! The M/M/s/K queue.

use tracing::debug;

use crate::error::QueueError;
use crate::steady::SteadyState;

pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<(), QueueError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(QueueError::InvalidRate { name, value })
    }
}

/// Poisson arrivals, exponential service, `s` identical servers and room for
/// at most `K` customers in the system.
///
/// # Example
///
/// ```
/// use orkit_queue::MmsK;
///
/// let queue = MmsK::new(1.0 / 3.0, 4.0 / 3.0, 2, 4).unwrap();
/// let ss = queue.steady_state();
/// assert!((ss.probabilities().iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MmsK {
    lambda: f64,
    mu: f64,
    servers: u32,
    capacity: u32,
}

impl MmsK {
    /// Creates the queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidRate`] for a rate that is not finite and
    /// positive, [`QueueError::NoServers`] if `servers` is zero, and
    /// [`QueueError::CapacityBelowServers`] if `capacity < servers`.
    pub fn new(lambda: f64, mu: f64, servers: u32, capacity: u32) -> Result<Self, QueueError> {
        check_rate("lambda", lambda)?;
        check_rate("mu", mu)?;
        if servers == 0 {
            return Err(QueueError::NoServers);
        }
        if capacity < servers {
            return Err(QueueError::CapacityBelowServers { capacity, servers });
        }
        Ok(Self {
            lambda,
            mu,
            servers,
            capacity,
        })
    }

    /// Arrival rate.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Service rate per server.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Number of servers.
    pub fn servers(&self) -> u32 {
        self.servers
    }

    /// Maximum customers in the system.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Offered load per server pool, `r = λ / μ`.
    pub fn offered_load(&self) -> f64 {
        self.lambda / self.mu
    }

    /// Steady-state distribution over `0..=K` customers.
    ///
    /// The unnormalised weight of `n` customers is `rⁿ/n!` below `s` and
    /// `rⁿ/(s!·s^(n−s))` from `s` to `K`; each weight is the previous one
    /// times `r / min(n, s)`, which avoids evaluating factorials. The
    /// recurrence runs on logarithms so heavy loads do not overflow.
    #[tracing::instrument(skip_all, fields(servers = self.servers, capacity = self.capacity))]
    pub fn steady_state(&self) -> SteadyState {
        let ln_r = self.lambda.ln() - self.mu.ln();
        let mut log_weights = Vec::with_capacity(self.capacity as usize + 1);
        let mut lw = 0.0;
        log_weights.push(lw);
        for n in 1..=self.capacity {
            lw += ln_r - f64::from(n.min(self.servers)).ln();
            log_weights.push(lw);
        }
        let ss = SteadyState::from_log_weights(&log_weights, self.lambda, self.servers);
        debug!(p0 = ss.p0(), blocking = ss.blocking_probability(), "M/M/s/K solved");
        ss
    }
}
