//! Discrete-time Markov chains over small, labelled state spaces.
//!
//! A model implements [`TransitionModel`] by listing its states and the
//! one-step outcomes of each state; [`build_chain`] turns it into a
//! row-stochastic [`TransitionMatrix`] and reports any row that is not a
//! probability distribution.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────────┐
//!  │    model      │────▶│  build_chain   │────▶│ stationary/simulate  │
//!  │  (outcomes)   │     │  (validate P)  │     │  (analyse P)         │
//!  └──────────────┘     └────────────────┘     └──────────────────────┘
//! ```
//!
//! Two models ship with the crate: [`CeilingRestockChain`], Poisson depletion
//! that restocks to the largest level, and [`AssemblyLine`], two
//! machines with bounded buffers feeding an assembly station.
//!
//! # Quick start
//!
//! ```rust
//! use orkit_markov::{AssemblyLine, ChainConfig, build_chain, stationary_distribution};
//!
//! let line = AssemblyLine::new(0.8, 0.7).unwrap();
//! let chain = build_chain(&line).unwrap();
//! assert!(chain.is_valid());
//!
//! let pi = stationary_distribution(chain.matrix(), &ChainConfig::default()).unwrap();
//! assert!((pi.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```

pub mod assembly;
pub mod ceiling;
pub mod config;
pub mod error;
pub mod model;
pub mod simulate;
pub mod state;
pub mod stationary;
pub mod transition;

pub use assembly::{AssemblyLine, Buffers, DEFAULT_CAPACITY};
pub use ceiling::CeilingRestockChain;
pub use config::ChainConfig;
pub use error::MarkovError;
pub use model::{MarkovChain, TransitionModel, build_chain, build_chain_with_tolerance};
pub use simulate::{occupancy, simulate_path, simulate_path_into};
pub use state::StateSpace;
pub use stationary::stationary_distribution;
pub use transition::{DEFAULT_TOLERANCE, RowViolation, TransitionMatrix};
