use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "orkit.toml";

/// Top-level Orkit configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrkitConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Validation, analysis and printing settings for chains.
    #[serde(default)]
    pub chain: ChainToml,

    /// Poisson ceiling chain settings.
    #[serde(default)]
    pub ceiling: CeilingToml,

    /// Assembly line settings.
    #[serde(default)]
    pub assembly: AssemblyToml,

    /// Queue settings.
    #[serde(default)]
    pub queue: QueueToml,

    /// Inventory MDP settings.
    #[serde(default)]
    pub mdp: MdpToml,
}

impl OrkitConfig {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, `orkit.toml` in the working
    /// directory is used if present, otherwise all defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path: PathBuf = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let toml_str = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: OrkitConfig = toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainToml {
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default = "default_chain_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_chain_max_iterations")]
    pub max_iterations: usize,
}

impl Default for ChainToml {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            tolerance: default_chain_tolerance(),
            max_iterations: default_chain_max_iterations(),
        }
    }
}

fn default_precision() -> usize {
    3
}
fn default_chain_tolerance() -> f64 {
    1e-9
}
fn default_chain_max_iterations() -> usize {
    10_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CeilingToml {
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    #[serde(default = "default_levels")]
    pub states: Vec<u32>,
}

impl Default for CeilingToml {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
            states: default_levels(),
        }
    }
}

fn default_lambda() -> f64 {
    3.0
}
fn default_levels() -> Vec<u32> {
    vec![2, 3, 4, 5]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssemblyToml {
    #[serde(default = "default_yield_first")]
    pub yield_first: f64,
    #[serde(default = "default_yield_second")]
    pub yield_second: f64,
    #[serde(default = "default_buffer_capacity")]
    pub capacity: u8,
}

impl Default for AssemblyToml {
    fn default() -> Self {
        Self {
            yield_first: default_yield_first(),
            yield_second: default_yield_second(),
            capacity: default_buffer_capacity(),
        }
    }
}

fn default_yield_first() -> f64 {
    0.8
}
fn default_yield_second() -> f64 {
    0.7
}
fn default_buffer_capacity() -> u8 {
    orkit_markov::DEFAULT_CAPACITY
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueToml {
    #[serde(default = "default_queue_model")]
    pub model: String,
    #[serde(default)]
    pub mmsk: MmsKToml,
    #[serde(default)]
    pub state_dependent: StateDependentToml,
}

impl Default for QueueToml {
    fn default() -> Self {
        Self {
            model: default_queue_model(),
            mmsk: MmsKToml::default(),
            state_dependent: StateDependentToml::default(),
        }
    }
}

fn default_queue_model() -> String {
    "mmsk".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MmsKToml {
    #[serde(default = "default_mmsk_lambda")]
    pub lambda: f64,
    #[serde(default = "default_mmsk_mu")]
    pub mu: f64,
    #[serde(default = "default_servers")]
    pub servers: u32,
    #[serde(default = "default_queue_capacity")]
    pub capacity: u32,
}

impl Default for MmsKToml {
    fn default() -> Self {
        Self {
            lambda: default_mmsk_lambda(),
            mu: default_mmsk_mu(),
            servers: default_servers(),
            capacity: default_queue_capacity(),
        }
    }
}

fn default_mmsk_lambda() -> f64 {
    1.0 / 3.0
}
fn default_mmsk_mu() -> f64 {
    4.0 / 3.0
}
fn default_servers() -> u32 {
    2
}
fn default_queue_capacity() -> u32 {
    4
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDependentToml {
    #[serde(default = "default_sd_lambda")]
    pub lambda: f64,
    #[serde(default = "default_service_rates")]
    pub service_rates: Vec<f64>,
}

impl Default for StateDependentToml {
    fn default() -> Self {
        Self {
            lambda: default_sd_lambda(),
            service_rates: default_service_rates(),
        }
    }
}

fn default_sd_lambda() -> f64 {
    5.0
}
fn default_service_rates() -> Vec<f64> {
    vec![60.0 / 9.0, 60.0 / 10.0, 60.0 / 10.0, 60.0 / 13.0, 60.0 / 20.0]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MdpToml {
    #[serde(default = "default_solver")]
    pub solver: String,
    #[serde(default = "default_stock_capacity")]
    pub capacity: usize,
    #[serde(default = "default_demand")]
    pub demand: Vec<f64>,
    #[serde(default = "default_unit_revenue")]
    pub unit_revenue: f64,
    #[serde(default = "default_fixed_order_cost")]
    pub fixed_order_cost: f64,
    #[serde(default = "default_unit_cost")]
    pub unit_cost: f64,
    #[serde(default = "default_extra_unit_cost")]
    pub extra_unit_cost: f64,
    #[serde(default = "default_shortage_cost")]
    pub shortage_cost: f64,
    #[serde(default = "default_holding_cost")]
    pub holding_cost: f64,
    #[serde(default = "default_discount")]
    pub discount: f64,
    #[serde(default = "default_value_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_mdp_max_iterations")]
    pub max_iterations: usize,
}

impl Default for MdpToml {
    fn default() -> Self {
        Self {
            solver: default_solver(),
            capacity: default_stock_capacity(),
            demand: default_demand(),
            unit_revenue: default_unit_revenue(),
            fixed_order_cost: default_fixed_order_cost(),
            unit_cost: default_unit_cost(),
            extra_unit_cost: default_extra_unit_cost(),
            shortage_cost: default_shortage_cost(),
            holding_cost: default_holding_cost(),
            discount: default_discount(),
            tolerance: default_value_tolerance(),
            max_iterations: default_mdp_max_iterations(),
        }
    }
}

fn default_solver() -> String {
    "policy".to_string()
}
fn default_stock_capacity() -> usize {
    4
}
fn default_demand() -> Vec<f64> {
    vec![0.25; 4]
}
fn default_unit_revenue() -> f64 {
    300_000.0
}
fn default_fixed_order_cost() -> f64 {
    100_000.0
}
fn default_unit_cost() -> f64 {
    25_000.0
}
fn default_extra_unit_cost() -> f64 {
    75_000.0
}
fn default_shortage_cost() -> f64 {
    60_000.0
}
fn default_holding_cost() -> f64 {
    40_000.0
}
fn default_discount() -> f64 {
    0.9
}
fn default_value_tolerance() -> f64 {
    1e-6
}
fn default_mdp_max_iterations() -> usize {
    100_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: OrkitConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.ceiling.states, vec![2, 3, 4, 5]);
        assert_eq!(cfg.assembly.capacity, 2);
        assert_eq!(cfg.queue.model, "mmsk");
        assert_eq!(cfg.queue.mmsk.servers, 2);
        assert_eq!(cfg.queue.state_dependent.service_rates.len(), 5);
        assert_eq!(cfg.mdp.demand, vec![0.25; 4]);
        assert_eq!(cfg.chain.precision, 3);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: OrkitConfig = toml::from_str(
            r#"
            seed = 7

            [ceiling]
            lambda = 1.5

            [queue.mmsk]
            servers = 3
            capacity = 6
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.ceiling.lambda, 1.5);
        assert_eq!(cfg.ceiling.states, vec![2, 3, 4, 5]);
        assert_eq!(cfg.queue.mmsk.servers, 3);
        assert_eq!(cfg.queue.mmsk.mu, 4.0 / 3.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<OrkitConfig, _> = toml::from_str("[assembly]\nyield_third = 0.5\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = OrkitConfig::load(Some(Path::new("/nonexistent/orkit.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
