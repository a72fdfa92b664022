//! Population Setup
//!
//! Creates the initial agent set from the configured distributions. All
//! randomness comes from the caller's RNG so repetitions stay independent.

use rand::rngs::SmallRng;
use rand::Rng;
use rand_distr::{Beta, Distribution, Normal};

use crate::components::{Agent, Strategy};
use crate::config::Params;

fn sample_beta(rng: &mut SmallRng, alpha: f32, beta: f32) -> f32 {
    let dist: Beta<f32> = Beta::new(alpha, beta).expect("valid beta shape");
    dist.sample(rng)
}

/// Weighted strategy draw. Falls back to the first entry if all weights
/// are zero (validation rejects that configuration up front).
fn pick_strategy(mix: &[(Strategy, f32)], rng: &mut SmallRng) -> Strategy {
    let total: f32 = mix.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return mix[0].0;
    }
    let mut roll = rng.gen::<f32>() * total;
    for &(strategy, weight) in mix {
        roll -= weight;
        if roll <= 0.0 {
            return strategy;
        }
    }
    mix[mix.len() - 1].0
}

/// Bimodal initial opinion: a normal mode on each side of zero.
fn sample_opinion(rng: &mut SmallRng, polarization: f32, spread: f32) -> f32 {
    let mode = if rng.gen::<f32>() < 0.5 {
        -polarization
    } else {
        polarization
    };
    let dist: Normal<f32> = Normal::new(mode, spread).expect("valid normal parameters");
    dist.sample(rng).clamp(-1.0, 1.0)
}

/// Create the agent set from the configured distributions.
///
/// Draw order per agent is fixed (capacity, wellbeing, strategy, opinion,
/// confidence, openness, influence) so runs reproduce bit-for-bit.
pub fn init_population(params: &Params, rng: &mut SmallRng) -> Vec<Agent> {
    let pop = &params.population;
    let mix: Vec<(Strategy, f32)> = pop
        .strategy_mix
        .iter()
        .map(|(&s, &w)| (s, w))
        .collect();

    (0..pop.n_agents)
        .map(|id| {
            let mut agent = Agent::new(id, Strategy::Reciprocal);
            agent.kindness_capacity = sample_beta(rng, 2.0, 2.0);
            agent.wellbeing = sample_beta(rng, 2.0, 2.0);
            agent.strategy = pick_strategy(&mix, rng);
            agent.opinion = sample_opinion(rng, pop.initial_polarization, pop.opinion_spread);
            agent.confidence = if rng.gen::<f32>() < pop.extremist_fraction {
                rng.gen_range(0.8f32..1.0)
            } else {
                sample_beta(rng, 2.0, 3.0)
            };
            agent.openness = sample_beta(rng, 3.0, 2.0);
            agent.influence = sample_beta(rng, 2.0, 5.0);
            agent.update_group(params.opinion.group_formation_threshold);
            agent
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_population_size_and_bounds() {
        let params = Params::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let agents = init_population(&params, &mut rng);

        assert_eq!(agents.len(), params.population.n_agents);
        for agent in &agents {
            assert!((0.0..=1.0).contains(&agent.kindness_capacity));
            assert!((0.0..=1.0).contains(&agent.wellbeing));
            assert!((0.0..=1.0).contains(&agent.confidence));
            assert!((0.0..=1.0).contains(&agent.openness));
            assert!((0.0..=1.0).contains(&agent.influence));
            assert!((-1.0..=1.0).contains(&agent.opinion));
            assert_eq!(agent.reputation, 0.5);
            assert!(agent.memory.is_empty());
        }
    }

    #[test]
    fn test_strategy_mix_respected() {
        let mut params = Params::default();
        params.population.strategy_mix.clear();
        params
            .population
            .strategy_mix
            .insert(Strategy::Defector, 1.0);

        let mut rng = SmallRng::seed_from_u64(11);
        let agents = init_population(&params, &mut rng);
        assert!(agents.iter().all(|a| a.strategy == Strategy::Defector));
    }

    #[test]
    fn test_group_identity_matches_opinion() {
        let params = Params::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let agents = init_population(&params, &mut rng);

        let threshold = params.opinion.group_formation_threshold;
        for agent in &agents {
            use crate::components::GroupIdentity;
            assert_eq!(
                agent.group,
                GroupIdentity::from_opinion(agent.opinion, threshold)
            );
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let params = Params::default();
        let mut rng1 = SmallRng::seed_from_u64(42);
        let mut rng2 = SmallRng::seed_from_u64(42);

        let a = init_population(&params, &mut rng1);
        let b = init_population(&params, &mut rng2);

        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.opinion, y.opinion);
            assert_eq!(x.wellbeing, y.wellbeing);
            assert_eq!(x.strategy, y.strategy);
        }
    }
}
