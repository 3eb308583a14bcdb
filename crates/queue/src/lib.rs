//! Steady-state analysis of finite-capacity birth-death queues.
//!
//! Two models are provided: the classic [`MmsK`] queue with `s` identical
//! exponential servers, and [`StateDependentQueue`], a single server whose
//! rate changes with the number of customers present. Both produce a
//! [`SteadyState`] from which `L`, `L_q`, `W`, `W_q` and utilisation follow.
//!
//! ```rust
//! use orkit_queue::StateDependentQueue;
//!
//! let q = StateDependentQueue::new(5.0, vec![60.0 / 9.0, 6.0, 6.0]).unwrap();
//! let ss = q.steady_state();
//! assert!(ss.mean_in_system() > 0.0);
//! ```

pub mod error;
pub mod mmsk;
pub mod state_dependent;
pub mod steady;

pub use error::QueueError;
pub use mmsk::MmsK;
pub use state_dependent::StateDependentQueue;
pub use steady::SteadyState;
