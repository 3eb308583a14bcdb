//! Queue command: steady state of a finite birth-death queue.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use orkit_queue::SteadyState;

use crate::cli::{QueueArgs, QueueModel};
use crate::config::OrkitConfig;
use crate::convert;
use crate::output::{QueueReport, write_json};

/// Run the queue analysis.
pub fn run(args: QueueArgs) -> Result<()> {
    let _cmd = info_span!("queue").entered();
    let config = OrkitConfig::load(args.config.as_deref())?;
    let model = match args.model {
        Some(m) => m,
        None => convert::parse_queue_model(&config.queue.model)?,
    };

    let (name, ss) = match model {
        QueueModel::Mmsk => {
            let q = convert::build_mmsk(&config.queue.mmsk).context("invalid M/M/s/K parameters")?;
            info!(
                lambda = q.lambda(),
                mu = q.mu(),
                servers = q.servers(),
                capacity = q.capacity(),
                "M/M/s/K queue configured"
            );
            ("mmsk", q.steady_state())
        }
        QueueModel::StateDependent => {
            let q = convert::build_state_dependent(&config.queue.state_dependent)
                .context("invalid state-dependent queue parameters")?;
            info!(
                lambda = q.lambda(),
                capacity = q.capacity(),
                "state-dependent queue configured"
            );
            ("state-dependent", q.steady_state())
        }
    };

    print_steady_state(&ss);

    if let Some(ref path) = args.json {
        write_json(path, &report(name, &ss))?;
        info!(path = %path.display(), "wrote JSON report");
    }
    Ok(())
}

fn print_steady_state(ss: &SteadyState) {
    for (n, p) in ss.probabilities().iter().enumerate() {
        println!("pi_{n}: {p}");
    }
    println!();
    println!("L   (mean in system)      = {:.6}", ss.mean_in_system());
    println!("Lq  (mean in queue)       = {:.6}", ss.mean_in_queue());
    println!("lambda_eff                = {:.6}", ss.effective_arrival_rate());
    println!("W   (mean time in system) = {:.6}", ss.mean_time_in_system());
    println!("Wq  (mean wait in queue)  = {:.6}", ss.mean_wait_in_queue());
    println!("utilisation               = {:.6}", ss.utilisation());
}

fn report(name: &str, ss: &SteadyState) -> QueueReport {
    QueueReport {
        model: name.to_string(),
        servers: ss.servers(),
        capacity: ss.capacity(),
        probabilities: ss.probabilities().to_vec(),
        mean_in_system: ss.mean_in_system(),
        mean_in_queue: ss.mean_in_queue(),
        effective_arrival_rate: ss.effective_arrival_rate(),
        mean_time_in_system: ss.mean_time_in_system(),
        mean_wait_in_queue: ss.mean_wait_in_queue(),
        utilisation: ss.utilisation(),
        blocking_probability: ss.blocking_probability(),
    }
}
