//! Finite discounted Markov decision processes.
//!
//! Models are assembled with [`MdpBuilder`] into a [`FiniteMdp`] whose
//! state-action pairs have dense indices, and solved through the
//! [`MdpSolver`] trait. [`PolicyIteration`] is exact; [`ValueIteration`]
//! converges to a tolerance. Every [`MdpSolution`] also carries the duals of
//! the Bellman linear program, so active constraints can be reported.
//!
//! ```rust
//! use orkit_mdp::{InventoryConfig, MdpSolver, PolicyIteration, build_inventory_mdp};
//!
//! let mdp = build_inventory_mdp(&InventoryConfig::default()).unwrap();
//! let solution = PolicyIteration::new().solve(&mdp).unwrap();
//! assert_eq!(solution.decision(0).action, 3);
//! ```

pub mod error;
pub mod inventory;
mod linalg;
pub mod model;
pub mod solve;

pub use error::MdpError;
pub use inventory::{InventoryConfig, build_inventory_mdp};
pub use model::{FiniteMdp, MdpBuilder, ROW_TOLERANCE, StateAction};
pub use solve::{
    ACTIVE_DUAL_THRESHOLD, MdpSolution, MdpSolver, PolicyIteration, ValueIteration,
};
