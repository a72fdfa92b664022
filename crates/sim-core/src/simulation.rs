//! Simulation
//!
//! A single run: population, network, RNG, and the round loop. Each round
//! executes the phase pipeline in a strict order; the seeded RNG is the
//! only source of nondeterminism, so identical parameters and seed give
//! bit-identical metrics.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::components::{Agent, SocialNetwork};
use crate::config::Params;
use crate::error::{ConfigError, SimError};
use crate::interventions;
use crate::output::metrics::{record_round, RoundMetrics, RunSummary};
use crate::setup;
use crate::systems;

/// One independent simulation run.
pub struct Simulation {
    params: Params,
    pub agents: Vec<Agent>,
    pub network: SocialNetwork,
    rng: SmallRng,
    round: u64,
    metrics: Vec<RoundMetrics>,
}

impl Simulation {
    /// Build a simulation from validated parameters and a seed.
    pub fn new(params: Params, seed: u64) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut rng = SmallRng::seed_from_u64(seed);
        let agents = setup::init_population(&params, &mut rng);
        let network = setup::build_network(&params.network, &agents, &mut rng);

        info!(
            agents = agents.len(),
            edges = network.edge_count(),
            topology = ?params.network.topology,
            seed,
            "simulation initialized"
        );

        Ok(Self {
            params,
            agents,
            network,
            rng,
            round: 0,
            metrics: Vec::new(),
        })
    }

    /// Run one round of the phase pipeline.
    pub fn step(&mut self) -> Result<(), SimError> {
        for agent in self.agents.iter_mut() {
            agent.reset_round();
        }

        if self.params.intervention.round == Some(self.round) {
            self.apply_intervention();
        }

        let kind_acts = systems::kindness_phase(
            &mut self.agents,
            &self.network,
            &self.params.kindness,
            &mut self.rng,
        );
        systems::cooperation_phase(&mut self.agents, &self.params.cooperation, &mut self.rng);
        systems::opinion_phase(
            &mut self.agents,
            &self.network,
            &self.params.opinion,
            &mut self.rng,
        );
        systems::integration_phase(
            &mut self.agents,
            &self.params.kindness,
            &self.params.cooperation,
        );
        systems::maintenance_phase(&mut self.agents, &self.params.maintenance, self.round)?;

        let metrics = record_round(self.round, &self.agents, kind_acts);
        debug!(
            round = self.round,
            kind_acts,
            mean_wellbeing = metrics.mean_wellbeing,
            polarization = metrics.var_opinion,
            "round complete"
        );
        self.metrics.push(metrics);
        self.round += 1;
        Ok(())
    }

    fn apply_intervention(&mut self) {
        info!(round = self.round, "intervention round reached");
        let params = self.params.intervention.clone();
        if params.strength > 0.0 {
            interventions::apply_boost(&mut self.agents, &self.network, &params, &mut self.rng);
        }
        if params.n_bridges > 0 {
            interventions::apply_bridges(
                &self.agents,
                &mut self.network,
                params.n_bridges,
                &mut self.rng,
            );
        }
    }

    /// Run `rounds` rounds. Stopping early is just not calling this again.
    pub fn run(&mut self, rounds: u64) -> Result<(), SimError> {
        for _ in 0..rounds {
            self.step()?;
        }
        Ok(())
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn metrics(&self) -> &[RoundMetrics] {
        &self.metrics
    }

    /// Initial-vs-final summary; None before the first completed round.
    pub fn summary(&self) -> Option<RunSummary> {
        RunSummary::from_metrics(&self.metrics)
    }
}
