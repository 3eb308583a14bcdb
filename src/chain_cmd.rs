//! Chain commands: build, validate and analyse a Markov chain model.

use std::fmt;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, info_span};

use orkit_markov::{
    MarkovChain, TransitionModel, build_chain_with_tolerance, occupancy, simulate_path,
    stationary_distribution,
};

use crate::cli::{AssemblyArgs, CeilingArgs, ChainOutputArgs};
use crate::config::OrkitConfig;
use crate::convert;
use crate::output::{
    ChainReport, InvalidRowOutput, SimulationOutput, StateProbability, write_json,
};

/// Run the Poisson ceiling chain.
pub fn run_ceiling(args: CeilingArgs) -> Result<()> {
    let _cmd = info_span!("ceiling").entered();
    let mut config = OrkitConfig::load(args.config.as_deref())?;
    if let Some(lambda) = args.lambda {
        config.ceiling.lambda = lambda;
    }
    if let Some(states) = args.states {
        config.ceiling.states = states;
    }

    let model = convert::build_ceiling_chain(&config.ceiling)
        .context("invalid ceiling chain parameters")?;
    info!(
        lambda = model.lambda(),
        floor = model.floor(),
        ceiling = model.ceiling(),
        "ceiling chain configured"
    );
    analyse("ceiling", &model, &config, &args.output)
}

/// Run the two-machine assembly line.
pub fn run_assembly(args: AssemblyArgs) -> Result<()> {
    let _cmd = info_span!("assembly").entered();
    let mut config = OrkitConfig::load(args.config.as_deref())?;
    if let Some(a1) = args.yield_first {
        config.assembly.yield_first = a1;
    }
    if let Some(a2) = args.yield_second {
        config.assembly.yield_second = a2;
    }
    if let Some(capacity) = args.capacity {
        config.assembly.capacity = capacity;
    }

    let line = convert::build_assembly_line(&config.assembly)
        .context("invalid assembly line parameters")?;
    info!(
        yield_first = line.yield_first(),
        yield_second = line.yield_second(),
        capacity = line.capacity(),
        "assembly line configured"
    );
    analyse("assembly", &line, &config, &args.output)
}

fn analyse<M>(name: &str, model: &M, config: &OrkitConfig, args: &ChainOutputArgs) -> Result<()>
where
    M: TransitionModel,
    M::State: fmt::Display,
{
    let chain_cfg = convert::build_chain_config(&config.chain)?;
    let precision = args.precision.unwrap_or(config.chain.precision);

    let chain = build_chain_with_tolerance(model, chain_cfg.tolerance())
        .context("failed to build transition matrix")?;
    let labels: Vec<String> = chain.states().iter().map(ToString::to_string).collect();

    println!("states: {}", labels.join(", "));
    println!("{:.*}", precision, chain.matrix());

    let invalid = report_validation(&chain, &labels);

    let stationary = if args.steady_state {
        let pi = stationary_distribution(chain.matrix(), &chain_cfg)
            .context("failed to compute stationary distribution")?;
        println!("\nstationary distribution:");
        for (label, p) in labels.iter().zip(&pi) {
            println!("  pi({label}) = {p:.precision$}");
        }
        Some(labelled(&labels, &pi))
    } else {
        None
    };

    let simulation = match args.simulate {
        Some(steps) => {
            let seed = args.seed.or(config.seed);
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_os_rng(),
            };
            let path = simulate_path(chain.matrix(), 0, steps, &mut rng)
                .context("simulation failed")?;
            let occ = occupancy(&path, labels.len())?;
            println!("\nsimulated {steps} steps from {}:", labels[0]);
            for (label, f) in labels.iter().zip(&occ) {
                println!("  {label}: {f:.precision$}");
            }
            Some(SimulationOutput {
                seed,
                initial: labels[0].clone(),
                path: path.iter().map(|&i| labels[i].clone()).collect(),
                occupancy: labelled(&labels, &occ),
            })
        }
        None => None,
    };

    if let Some(ref path) = args.json {
        let report = ChainReport {
            model: name.to_string(),
            states: labels.clone(),
            matrix: chain.matrix().rows().map(<[f64]>::to_vec).collect(),
            valid: invalid.is_empty(),
            invalid_rows: invalid,
            stationary,
            simulation,
        };
        write_json(path, &report)?;
        info!(path = %path.display(), "wrote JSON report");
    }
    Ok(())
}

/// Prints the validation verdict recorded on the chain and returns the failing rows.
fn report_validation<S>(chain: &MarkovChain<S>, labels: &[String]) -> Vec<InvalidRowOutput> {
    if chain.is_valid() {
        println!("\ntransition matrix is valid");
        return Vec::new();
    }
    println!();
    chain
        .violations()
        .iter()
        .map(|v| {
            let state = labels[v.row].clone();
            if v.bad_entry {
                println!(
                    "row {} (state {state}) has a negative or non-finite entry, sum = {:.6}",
                    v.row, v.sum
                );
            } else {
                println!("row {} (state {state}) sums to {:.6}, not 1", v.row, v.sum);
            }
            InvalidRowOutput {
                row: v.row,
                state,
                sum: v.sum,
                bad_entry: v.bad_entry,
            }
        })
        .collect()
}

fn labelled(labels: &[String], probs: &[f64]) -> Vec<StateProbability> {
    labels
        .iter()
        .zip(probs)
        .map(|(state, &probability)| StateProbability {
            state: state.clone(),
            probability,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orkit_markov::{AssemblyLine, StateSpace, build_chain};

    struct Leaky(StateSpace<u8>);

    impl TransitionModel for Leaky {
        type State = u8;

        fn states(&self) -> &StateSpace<u8> {
            &self.0
        }

        fn outcomes(&self, from: &u8) -> Vec<(u8, f64)> {
            if *from == 0 {
                vec![(0, 0.5), (1, 0.5 + 1e-6)]
            } else {
                vec![(1, 1.0)]
            }
        }
    }

    fn labels<S: fmt::Display>(chain: &MarkovChain<S>) -> Vec<String> {
        chain.states().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn valid_chain_reports_nothing() {
        let chain = build_chain(&AssemblyLine::new(0.8, 0.7).unwrap()).unwrap();
        assert!(report_validation(&chain, &labels(&chain)).is_empty());
    }

    #[test]
    fn verdict_follows_build_tolerance() {
        let model = Leaky(StateSpace::new(vec![0, 1]).unwrap());

        let strict = build_chain_with_tolerance(&model, 1e-9).unwrap();
        let rows = report_validation(&strict, &labels(&strict));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 0);
        assert_eq!(rows[0].state, "0");
        assert_eq!(rows.is_empty(), strict.is_valid());

        let loose = build_chain_with_tolerance(&model, 1e-3).unwrap();
        assert!(loose.is_valid());
        assert!(report_validation(&loose, &labels(&loose)).is_empty());
    }
}
