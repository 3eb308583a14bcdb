//! MDP command: solve the inventory ordering problem.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use orkit_mdp::{FiniteMdp, MdpSolution, build_inventory_mdp};

use crate::cli::{MdpArgs, SolverKind};
use crate::config::OrkitConfig;
use crate::convert;
use crate::output::{DecisionOutput, MdpReport, PairOutput, write_json};

/// Run the inventory MDP.
pub fn run(args: MdpArgs) -> Result<()> {
    let _cmd = info_span!("mdp").entered();
    let config = OrkitConfig::load(args.config.as_deref())?;
    let kind = match args.solver {
        Some(k) => k,
        None => convert::parse_solver(&config.mdp.solver)?,
    };

    let inventory = convert::build_inventory_config(&config.mdp)
        .context("invalid inventory parameters")?;
    let mdp = build_inventory_mdp(&inventory).context("failed to build inventory MDP")?;
    info!(
        n_states = mdp.n_states(),
        n_pairs = mdp.pairs().len(),
        "inventory MDP built"
    );

    let solver = convert::build_solver(kind, &config.mdp)?;
    let solution = solver.solve(&mdp).context("failed to solve inventory MDP")?;

    print_model(&mdp);
    print_solution(&mdp, &solution);

    if let Some(ref path) = args.json {
        write_json(path, &report(kind, &mdp, &solution))?;
        info!(path = %path.display(), "wrote JSON report");
    }
    Ok(())
}

fn print_model(mdp: &FiniteMdp) {
    println!("admissible actions:");
    println!("{:>6} | {:>6}", "state", "action");
    println!("{}", "-".repeat(15));
    for pair in mdp.pairs() {
        println!("{:>6} | {:>6}", pair.state, pair.action);
    }

    println!("\ntransition probabilities:");
    println!("{:>6} | {:>6} | {:>6} | {:>11}", "state", "action", "next", "probability");
    println!("{}", "-".repeat(38));
    for (idx, pair) in mdp.pairs().iter().enumerate() {
        for (next, &p) in mdp.transition_row(idx).iter().enumerate() {
            if p > 0.0 {
                println!(
                    "{:>6} | {:>6} | {:>6} | {:>11.4}",
                    pair.state, pair.action, next, p
                );
            }
        }
    }

    println!("\nexpected rewards:");
    println!("{:>6} | {:>6} | {:>14}", "state", "action", "reward");
    println!("{}", "-".repeat(32));
    for (idx, pair) in mdp.pairs().iter().enumerate() {
        println!(
            "{:>6} | {:>6} | {:>14.2}",
            pair.state,
            pair.action,
            mdp.reward(idx)
        );
    }
}

fn print_solution(mdp: &FiniteMdp, solution: &MdpSolution) {
    println!("\noptimal values:");
    for (s, v) in solution.values().iter().enumerate() {
        println!("  V({s}) = {v:.2}  (order {})", solution.decision(s).action);
    }

    println!("\nactive Bellman constraints:");
    println!("{:>6} | {:>6} | {:>12}", "state", "action", "dual");
    println!("{}", "-".repeat(30));
    for (pair, dual) in solution.active_constraints() {
        println!("{:>6} | {:>6} | {:>12.6}", pair.state, pair.action, dual);
    }
    info!(
        iterations = solution.iterations(),
        discount = mdp.discount(),
        "solution reported"
    );
}

fn report(kind: SolverKind, mdp: &FiniteMdp, solution: &MdpSolution) -> MdpReport {
    let pairs = mdp
        .pairs()
        .iter()
        .enumerate()
        .map(|(idx, pair)| {
            let dual = solution.duals()[idx];
            PairOutput {
                state: pair.state,
                action: pair.action,
                reward: mdp.reward(idx),
                transitions: mdp.transition_row(idx).to_vec(),
                dual,
                active: dual.abs() > orkit_mdp::ACTIVE_DUAL_THRESHOLD,
            }
        })
        .collect();
    let policy = (0..mdp.n_states())
        .map(|s| DecisionOutput {
            state: s,
            action: solution.decision(s).action,
            value: solution.values()[s],
        })
        .collect();
    MdpReport {
        solver: match kind {
            SolverKind::Policy => "policy iteration",
            SolverKind::Value => "value iteration",
        }
        .to_string(),
        discount: mdp.discount(),
        iterations: solution.iterations(),
        pairs,
        values: solution.values().to_vec(),
        policy,
    }
}
