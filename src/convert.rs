//! Pure conversion functions: TOML config structs -> crate API types.

use anyhow::{Result, bail};

use crate::cli::{QueueModel, SolverKind};
use crate::config::*;

use orkit_markov::{AssemblyLine, CeilingRestockChain, ChainConfig};
use orkit_mdp::{InventoryConfig, MdpSolver, PolicyIteration, ValueIteration};
use orkit_queue::{MmsK, StateDependentQueue};

/// Parses a queue model name into the corresponding enum variant.
pub fn parse_queue_model(s: &str) -> Result<QueueModel> {
    match s.to_lowercase().replace('_', "-").as_str() {
        "mmsk" | "m/m/s/k" => Ok(QueueModel::Mmsk),
        "state-dependent" => Ok(QueueModel::StateDependent),
        other => bail!("unknown queue model: {other:?}"),
    }
}

/// Parses an MDP solver name into the corresponding enum variant.
pub fn parse_solver(s: &str) -> Result<SolverKind> {
    match s.to_lowercase().as_str() {
        "policy" | "policy-iteration" => Ok(SolverKind::Policy),
        "value" | "value-iteration" => Ok(SolverKind::Value),
        other => bail!("unknown MDP solver: {other:?}"),
    }
}

/// Builds a [`ChainConfig`] from the TOML chain configuration.
pub fn build_chain_config(chain: &ChainToml) -> Result<ChainConfig> {
    let cfg = ChainConfig::new()
        .with_tolerance(chain.tolerance)
        .with_max_iterations(chain.max_iterations);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`CeilingRestockChain`] from the TOML ceiling configuration.
pub fn build_ceiling_chain(ceiling: &CeilingToml) -> Result<CeilingRestockChain> {
    Ok(CeilingRestockChain::new(ceiling.states.clone(), ceiling.lambda)?)
}

/// Builds an [`AssemblyLine`] from the TOML assembly configuration.
pub fn build_assembly_line(assembly: &AssemblyToml) -> Result<AssemblyLine> {
    Ok(AssemblyLine::with_capacity(
        assembly.yield_first,
        assembly.yield_second,
        assembly.capacity,
    )?)
}

/// Builds an [`MmsK`] queue from the TOML configuration.
pub fn build_mmsk(mmsk: &MmsKToml) -> Result<MmsK> {
    Ok(MmsK::new(mmsk.lambda, mmsk.mu, mmsk.servers, mmsk.capacity)?)
}

/// Builds a [`StateDependentQueue`] from the TOML configuration.
pub fn build_state_dependent(sd: &StateDependentToml) -> Result<StateDependentQueue> {
    Ok(StateDependentQueue::new(sd.lambda, sd.service_rates.clone())?)
}

/// Builds an [`InventoryConfig`] from the TOML MDP configuration.
pub fn build_inventory_config(mdp: &MdpToml) -> Result<InventoryConfig> {
    let cfg = InventoryConfig::new()
        .with_capacity(mdp.capacity)
        .with_demand(mdp.demand.clone())
        .with_unit_revenue(mdp.unit_revenue)
        .with_fixed_order_cost(mdp.fixed_order_cost)
        .with_unit_cost(mdp.unit_cost)
        .with_extra_unit_cost(mdp.extra_unit_cost)
        .with_shortage_cost(mdp.shortage_cost)
        .with_holding_cost(mdp.holding_cost)
        .with_discount(mdp.discount);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the selected solver with the TOML iteration settings.
pub fn build_solver(kind: SolverKind, mdp: &MdpToml) -> Result<Box<dyn MdpSolver>> {
    if !mdp.tolerance.is_finite() || mdp.tolerance <= 0.0 {
        bail!("MDP tolerance must be finite and > 0, got {}", mdp.tolerance);
    }
    if mdp.max_iterations == 0 {
        bail!("MDP max_iterations must be at least 1");
    }
    let solver: Box<dyn MdpSolver> = match kind {
        SolverKind::Policy => {
            Box::new(PolicyIteration::new().with_max_iterations(mdp.max_iterations))
        }
        SolverKind::Value => Box::new(
            ValueIteration::new()
                .with_tolerance(mdp.tolerance)
                .with_max_iterations(mdp.max_iterations),
        ),
    };
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_queue_models() {
        assert_eq!(parse_queue_model("MMSK").unwrap(), QueueModel::Mmsk);
        assert_eq!(
            parse_queue_model("state_dependent").unwrap(),
            QueueModel::StateDependent
        );
        assert!(parse_queue_model("mm1").is_err());
    }

    #[test]
    fn parses_solvers() {
        assert_eq!(parse_solver("policy").unwrap(), SolverKind::Policy);
        assert_eq!(parse_solver("Value-Iteration").unwrap(), SolverKind::Value);
        assert!(parse_solver("simplex").is_err());
    }

    #[test]
    fn default_models_build() {
        let cfg = OrkitConfig::default();
        assert_eq!(build_ceiling_chain(&cfg.ceiling).unwrap().ceiling(), 5);
        assert_eq!(build_assembly_line(&cfg.assembly).unwrap().capacity(), 2);
        assert_eq!(build_mmsk(&cfg.queue.mmsk).unwrap().servers(), 2);
        assert_eq!(
            build_state_dependent(&cfg.queue.state_dependent)
                .unwrap()
                .capacity(),
            5
        );
        assert_eq!(build_inventory_config(&cfg.mdp).unwrap().capacity(), 4);
        assert!(build_chain_config(&cfg.chain).is_ok());
        assert!(build_solver(SolverKind::Value, &cfg.mdp).is_ok());
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut cfg = OrkitConfig::default();
        cfg.ceiling.lambda = -1.0;
        cfg.assembly.yield_first = 2.0;
        cfg.queue.mmsk.servers = 0;
        cfg.mdp.discount = 1.5;
        cfg.mdp.tolerance = 0.0;
        cfg.chain.max_iterations = 0;

        assert!(build_ceiling_chain(&cfg.ceiling).is_err());
        assert!(build_assembly_line(&cfg.assembly).is_err());
        assert!(build_mmsk(&cfg.queue.mmsk).is_err());
        assert!(build_inventory_config(&cfg.mdp).is_err());
        assert!(build_solver(SolverKind::Policy, &cfg.mdp).is_err());
        assert!(build_chain_config(&cfg.chain).is_err());
    }
}
