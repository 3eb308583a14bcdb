//! Error types for the queueing crate.

/// Errors that can occur when defining a queue.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueueError {
    /// Returned when an arrival or service rate is not finite and positive.
    #[error("invalid rate {name}: {value} (must be finite and > 0)")]
    InvalidRate {
        /// Which rate was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when the number of servers is zero.
    #[error("a queue needs at least one server")]
    NoServers,

    /// Returned when the system capacity cannot hold every server busy.
    #[error("capacity {capacity} is below the number of servers {servers}")]
    CapacityBelowServers {
        /// Maximum customers in the system.
        capacity: u32,
        /// Number of servers.
        servers: u32,
    },

    /// Returned when a state-dependent queue has no service rates.
    #[error("state-dependent queue needs at least one service rate")]
    EmptyServiceRates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_rate() {
        let e = QueueError::InvalidRate {
            name: "mu",
            value: 0.0,
        };
        assert_eq!(e.to_string(), "invalid rate mu: 0 (must be finite and > 0)");
    }

    #[test]
    fn error_capacity_below_servers() {
        let e = QueueError::CapacityBelowServers {
            capacity: 1,
            servers: 2,
        };
        assert_eq!(
            e.to_string(),
            "capacity 1 is below the number of servers 2"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<QueueError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<QueueError>();
    }
}
