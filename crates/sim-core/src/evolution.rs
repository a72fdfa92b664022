//! Evolutionary Reproduction
//!
//! The pure game-theory variant: generations of shuffled pairwise play,
//! fitness-proportional selection, and strategy mutation. Each generation
//! discards the previous agent set entirely; strategy is the only
//! inherited trait.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::components::{Agent, AgentId, Strategy};
use crate::config::Params;
use crate::error::ConfigError;
use crate::output::metrics::strategy_counts;
use crate::systems::cooperation::play_game;

/// Statistics for one completed generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationStats {
    pub generation: u32,
    pub strategy_counts: BTreeMap<&'static str, usize>,
    pub strategy_mean_scores: BTreeMap<&'static str, f64>,
    /// Mean reputation, a proxy for the population cooperation rate.
    pub cooperation_rate: f64,
    pub mean_score: f64,
}

/// Evolutionary tournament over cooperation strategies.
pub struct EvolutionarySimulation {
    params: Params,
    pub agents: Vec<Agent>,
    rng: SmallRng,
    generation: u32,
    history: Vec<GenerationStats>,
}

impl EvolutionarySimulation {
    /// An equal mix over the classic strategy family.
    pub fn classic_mix() -> BTreeMap<Strategy, f32> {
        Strategy::CLASSIC.iter().map(|&s| (s, 1.0)).collect()
    }

    /// Build a tournament population from the strategy mix in `params`.
    pub fn new(params: Params, seed: u64) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut rng = SmallRng::seed_from_u64(seed);
        let agents = Self::build_population(&params, &mut rng);

        info!(
            agents = agents.len(),
            strategies = ?strategy_counts(&agents),
            seed,
            "evolutionary simulation initialized"
        );

        Ok(Self {
            params,
            agents,
            rng,
            generation: 0,
            history: Vec::new(),
        })
    }

    /// Allocate the population proportionally to the mix, filling any
    /// remainder with uniform draws over the mix entries.
    fn build_population(params: &Params, rng: &mut SmallRng) -> Vec<Agent> {
        let n = params.population.n_agents;
        let mix: Vec<(Strategy, f32)> = params
            .population
            .strategy_mix
            .iter()
            .filter(|(_, &w)| w > 0.0)
            .map(|(&s, &w)| (s, w))
            .collect();
        let total: f32 = mix.iter().map(|(_, w)| w).sum();

        let mut agents = Vec::with_capacity(n);
        for &(strategy, weight) in &mix {
            let count = ((weight / total) * n as f32) as usize;
            for _ in 0..count {
                agents.push(Agent::new(agents.len(), strategy));
            }
        }
        while agents.len() < n {
            let (strategy, _) = mix[rng.gen_range(0..mix.len())];
            agents.push(Agent::new(agents.len(), strategy));
        }
        agents.truncate(n);
        agents
    }

    /// Play one generation and reproduce.
    pub fn run_generation(&mut self) {
        for agent in self.agents.iter_mut() {
            agent.cooperation_score = 0.0;
        }

        let n = self.agents.len();
        for _ in 0..self.params.evolution.rounds_per_generation {
            let mut order: Vec<AgentId> = (0..n).collect();
            order.shuffle(&mut self.rng);
            for pair in order.chunks_exact(2) {
                play_game(
                    &mut self.agents,
                    pair[0],
                    pair[1],
                    &self.params.cooperation,
                    &mut self.rng,
                );
            }
        }

        let stats = self.record_generation();
        debug!(
            generation = stats.generation,
            cooperation_rate = stats.cooperation_rate,
            mean_score = stats.mean_score,
            "generation complete"
        );
        self.history.push(stats);

        self.reproduce();
        self.generation += 1;
    }

    fn record_generation(&self) -> GenerationStats {
        let counts = strategy_counts(&self.agents);

        let mut score_sums: BTreeMap<&'static str, f64> = BTreeMap::new();
        for agent in &self.agents {
            *score_sums.entry(agent.strategy.name()).or_insert(0.0) +=
                agent.cooperation_score as f64;
        }
        let strategy_mean_scores = score_sums
            .into_iter()
            .map(|(name, sum)| (name, sum / counts[name] as f64))
            .collect();

        let n = self.agents.len() as f64;
        GenerationStats {
            generation: self.generation,
            strategy_counts: counts,
            strategy_mean_scores,
            cooperation_rate: self.agents.iter().map(|a| a.reputation as f64).sum::<f64>() / n,
            mean_score: self
                .agents
                .iter()
                .map(|a| a.cooperation_score as f64)
                .sum::<f64>()
                / n,
        }
    }

    /// Fitness-proportional selection with mutation. Population size is
    /// invariant; interaction memory does not carry across generations.
    fn reproduce(&mut self) {
        let pressure = self.params.evolution.selection_pressure as f64;
        let fitness: Vec<f64> = self
            .agents
            .iter()
            .map(|a| (a.cooperation_score.max(0.0) as f64).powf(pressure))
            .collect();
        let total: f64 = fitness.iter().sum();

        let n = self.agents.len();
        let mut next = Vec::with_capacity(n);
        for id in 0..n {
            let parent = if total <= 0.0 {
                // Everyone scored zero: uniform sampling
                self.rng.gen_range(0..n)
            } else {
                let mut roll = self.rng.gen::<f64>() * total;
                let mut pick = n - 1;
                for (idx, &f) in fitness.iter().enumerate() {
                    roll -= f;
                    if roll <= 0.0 {
                        pick = idx;
                        break;
                    }
                }
                pick
            };

            let strategy = if self.rng.gen::<f32>() < self.params.evolution.mutation_rate {
                *Strategy::CLASSIC
                    .choose(&mut self.rng)
                    .expect("classic family is non-empty")
            } else {
                self.agents[parent].strategy
            };

            let mut child = Agent::new(id, strategy);
            child.generation = self.generation + 1;
            next.push(child);
        }

        self.agents = next;
    }

    /// Run `n_generations` generations.
    pub fn run(&mut self, n_generations: usize) {
        for _ in 0..n_generations {
            self.run_generation();
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Current strategy distribution.
    pub fn distribution(&self) -> BTreeMap<&'static str, usize> {
        strategy_counts(&self.agents)
    }
}
