//! Social Dynamics Simulation
//!
//! Demo binary: runs a repeated experiment at one parameter point and
//! prints the aggregated report as JSON. All real work happens in the
//! library crates; this surface only wires arguments to the runner.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use experiments::{ExperimentConfig, ExperimentRunner};
use sim_core::config::{Params, Topology};

/// Command line arguments for the experiment harness
#[derive(Parser, Debug)]
#[command(name = "social_sim")]
#[command(about = "Agent-based social dynamics experiments")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Rounds per repetition
    #[arg(long, default_value_t = 100)]
    rounds: u64,

    /// Independent repetitions to aggregate
    #[arg(long, default_value_t = 10)]
    repetitions: usize,

    /// Population size
    #[arg(long, default_value_t = 100)]
    agents: usize,

    /// Network topology
    #[arg(long, value_enum, default_value_t = TopologyArg::SmallWorld)]
    topology: TopologyArg,

    /// Average connections per agent
    #[arg(long, default_value_t = 8)]
    avg_connections: usize,

    /// Optional TOML parameter file; flags above override its values
    #[arg(long)]
    params: Option<std::path::PathBuf>,

    /// Round at which to apply the boost intervention
    #[arg(long)]
    intervention_round: Option<u64>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TopologyArg {
    Random,
    SmallWorld,
    ScaleFree,
    Homophily,
    EchoChamber,
    Grid,
}

impl std::fmt::Display for TopologyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TopologyArg::Random => "random",
            TopologyArg::SmallWorld => "small-world",
            TopologyArg::ScaleFree => "scale-free",
            TopologyArg::Homophily => "homophily",
            TopologyArg::EchoChamber => "echo-chamber",
            TopologyArg::Grid => "grid",
        };
        write!(f, "{name}")
    }
}

impl From<TopologyArg> for Topology {
    fn from(arg: TopologyArg) -> Self {
        match arg {
            TopologyArg::Random => Topology::Random,
            TopologyArg::SmallWorld => Topology::SmallWorld,
            TopologyArg::ScaleFree => Topology::ScaleFree,
            TopologyArg::Homophily => Topology::Homophily,
            TopologyArg::EchoChamber => Topology::EchoChamber,
            TopologyArg::Grid => Topology::Grid,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut params = match &args.params {
        Some(path) => match Params::from_file(path) {
            Ok(params) => params,
            Err(err) => {
                eprintln!("could not load parameters: {err}");
                std::process::exit(1);
            }
        },
        None => Params::default(),
    };
    params.population.n_agents = args.agents;
    params.network.topology = args.topology.into();
    params.network.avg_connections = args.avg_connections;
    if args.intervention_round.is_some() {
        params.intervention.round = args.intervention_round;
    }

    let config = ExperimentConfig {
        name: args.topology.to_string(),
        params,
        rounds: args.rounds,
        repetitions: args.repetitions,
        base_seed: args.seed,
    };

    let runner = match ExperimentRunner::new(config) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    let report = runner.run();
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("could not serialize report: {err}");
            std::process::exit(1);
        }
    }
}
