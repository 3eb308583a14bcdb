use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Orkit stochastic operations-research toolkit.
#[derive(Parser)]
#[command(
    name = "orkit",
    version,
    about = "Markov chains, finite queues and Markov decision processes"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Poisson depletion chain that restocks to its largest level.
    Ceiling(CeilingArgs),
    /// Two-machine assembly line with bounded buffers.
    Assembly(AssemblyArgs),
    /// Steady state of a finite queue.
    Queue(QueueArgs),
    /// Optimal inventory policy of the ordering MDP.
    Mdp(MdpArgs),
}

/// Analysis flags shared by the chain subcommands.
#[derive(clap::Args)]
pub struct ChainOutputArgs {
    /// Decimals used when printing the matrix.
    #[arg(short, long)]
    pub precision: Option<usize>,

    /// Also compute the stationary distribution.
    #[arg(long)]
    pub steady_state: bool,

    /// Simulate this many steps from the first state.
    #[arg(long, value_name = "STEPS")]
    pub simulate: Option<usize>,

    /// RNG seed for the simulation.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Write the results as JSON to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Arguments for the `ceiling` subcommand.
#[derive(clap::Args)]
pub struct CeilingArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the Poisson rate from config.
    #[arg(short, long)]
    pub lambda: Option<f64>,

    /// Override the state levels from config (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub states: Option<Vec<u32>>,

    #[command(flatten)]
    pub output: ChainOutputArgs,
}

/// Arguments for the `assembly` subcommand.
#[derive(clap::Args)]
pub struct AssemblyArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the yield of machine 1.
    #[arg(long = "yield-first", visible_alias = "a1")]
    pub yield_first: Option<f64>,

    /// Override the yield of machine 2.
    #[arg(long = "yield-second", visible_alias = "a2")]
    pub yield_second: Option<f64>,

    /// Override the buffer capacity.
    #[arg(long)]
    pub capacity: Option<u8>,

    #[command(flatten)]
    pub output: ChainOutputArgs,
}

/// Queue model selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum QueueModel {
    /// M/M/s/K with identical servers.
    Mmsk,
    /// Single server with a rate per number in system.
    StateDependent,
}

/// Arguments for the `queue` subcommand.
#[derive(clap::Args)]
pub struct QueueArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the model from config.
    #[arg(short, long, value_enum)]
    pub model: Option<QueueModel>,

    /// Write the results as JSON to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// MDP solver selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SolverKind {
    /// Exact policy iteration.
    Policy,
    /// Value iteration to a tolerance.
    Value,
}

/// Arguments for the `mdp` subcommand.
#[derive(clap::Args)]
pub struct MdpArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the solver from config.
    #[arg(long, value_enum)]
    pub solver: Option<SolverKind>,

    /// Write the results as JSON to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,
}
