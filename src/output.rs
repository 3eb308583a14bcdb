//! JSON output structures for command results.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Results of a chain subcommand.
#[derive(Debug, Serialize)]
pub struct ChainReport {
    pub model: String,
    pub states: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    pub valid: bool,
    pub invalid_rows: Vec<InvalidRowOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stationary: Option<Vec<StateProbability>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationOutput>,
}

/// A row that failed validation.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidRowOutput {
    pub row: usize,
    pub state: String,
    pub sum: f64,
    pub bad_entry: bool,
}

/// Probability attached to a labelled state.
#[derive(Debug, Clone, Serialize)]
pub struct StateProbability {
    pub state: String,
    pub probability: f64,
}

/// A simulated trajectory.
#[derive(Debug, Serialize)]
pub struct SimulationOutput {
    pub seed: Option<u64>,
    pub initial: String,
    pub path: Vec<String>,
    pub occupancy: Vec<StateProbability>,
}

/// Results of the `queue` subcommand.
#[derive(Debug, Serialize)]
pub struct QueueReport {
    pub model: String,
    pub servers: u32,
    pub capacity: usize,
    pub probabilities: Vec<f64>,
    pub mean_in_system: f64,
    pub mean_in_queue: f64,
    pub effective_arrival_rate: f64,
    pub mean_time_in_system: f64,
    pub mean_wait_in_queue: f64,
    pub utilisation: f64,
    pub blocking_probability: f64,
}

/// Results of the `mdp` subcommand.
#[derive(Debug, Serialize)]
pub struct MdpReport {
    pub solver: String,
    pub discount: f64,
    pub iterations: usize,
    pub pairs: Vec<PairOutput>,
    pub values: Vec<f64>,
    pub policy: Vec<DecisionOutput>,
}

/// One admissible state-action pair with its data and dual.
#[derive(Debug, Clone, Serialize)]
pub struct PairOutput {
    pub state: usize,
    pub action: usize,
    pub reward: f64,
    pub transitions: Vec<f64>,
    pub dual: f64,
    pub active: bool,
}

/// Optimal action of a state.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutput {
    pub state: usize,
    pub action: usize,
    pub value: f64,
}

/// Serialises a report to a pretty-printed JSON string.
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialise report to JSON")
}

/// Writes a report as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    let json = to_json(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write JSON output: {}", path.display()))
}
