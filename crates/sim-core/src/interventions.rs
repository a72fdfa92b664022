//! Interventions
//!
//! One-time runtime modifications of a simulation: boosting a selected
//! subset of agents and adding bridging edges between opposing opinion
//! camps.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::components::{Agent, AgentId, SocialNetwork};
use crate::config::InterventionParams;
use crate::output::metrics::EXTREMITY_THRESHOLD;

/// How boost targets are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSelection {
    #[default]
    Random,
    /// Most-connected agents first.
    HighestDegree,
    /// Least-well agents first.
    LowestWellbeing,
}

/// Boost roughly 10% of the population (at least one agent). Returns the
/// boosted ids.
pub fn apply_boost(
    agents: &mut [Agent],
    network: &SocialNetwork,
    params: &InterventionParams,
    rng: &mut SmallRng,
) -> Vec<AgentId> {
    let n_targets = (agents.len() / 10).max(1).min(agents.len());

    let mut targets: Vec<AgentId> = match params.target {
        TargetSelection::Random => {
            let ids: Vec<AgentId> = (0..agents.len()).collect();
            ids.choose_multiple(rng, n_targets).copied().collect()
        }
        TargetSelection::HighestDegree => network.ids_by_degree_desc(),
        TargetSelection::LowestWellbeing => {
            let mut ids: Vec<AgentId> = (0..agents.len()).collect();
            ids.sort_by(|&a, &b| {
                agents[a]
                    .wellbeing
                    .partial_cmp(&agents[b].wellbeing)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            ids
        }
    };
    targets.truncate(n_targets);

    for &id in &targets {
        let agent = &mut agents[id];
        agent.kindness_capacity = (agent.kindness_capacity + params.strength).min(1.0);
        agent.wellbeing = (agent.wellbeing + params.strength * 0.5).min(1.0);
    }

    info!(
        targets = targets.len(),
        strategy = ?params.target,
        strength = params.strength,
        "applied boost intervention"
    );
    targets
}

/// Add random bridging edges between the positive and negative opinion
/// camps. Returns how many new edges were actually created; does nothing
/// when either camp is empty.
pub fn apply_bridges(
    agents: &[Agent],
    network: &mut SocialNetwork,
    n_bridges: usize,
    rng: &mut SmallRng,
) -> usize {
    let positive: Vec<AgentId> = agents
        .iter()
        .filter(|a| a.opinion > EXTREMITY_THRESHOLD)
        .map(|a| a.id)
        .collect();
    let negative: Vec<AgentId> = agents
        .iter()
        .filter(|a| a.opinion < -EXTREMITY_THRESHOLD)
        .map(|a| a.id)
        .collect();

    if positive.is_empty() || negative.is_empty() {
        return 0;
    }

    let mut added = 0;
    for _ in 0..n_bridges {
        let p = positive[rng.gen_range(0..positive.len())];
        let n = negative[rng.gen_range(0..negative.len())];
        if network.add_edge(p, n) {
            added += 1;
        }
    }

    info!(requested = n_bridges, added, "applied bridging intervention");
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Strategy;
    use rand::{Rng, SeedableRng};

    fn population(n: usize) -> Vec<Agent> {
        let mut rng = SmallRng::seed_from_u64(4);
        (0..n)
            .map(|id| {
                let mut a = Agent::new(id, Strategy::Reciprocal);
                a.wellbeing = rng.gen();
                a.kindness_capacity = rng.gen();
                a.opinion = rng.gen::<f32>() * 2.0 - 1.0;
                a
            })
            .collect()
    }

    #[test]
    fn test_boost_raises_targets_and_clamps() {
        let mut agents = population(30);
        let net = SocialNetwork::with_nodes(30);
        let before: Vec<f32> = agents.iter().map(|a| a.kindness_capacity).collect();
        let params = InterventionParams::default();
        let mut rng = SmallRng::seed_from_u64(1);

        let targets = apply_boost(&mut agents, &net, &params, &mut rng);
        assert_eq!(targets.len(), 3);

        for &id in &targets {
            let expected = (before[id] + params.strength).min(1.0);
            assert!((agents[id].kindness_capacity - expected).abs() < 1e-6);
            assert!(agents[id].kindness_capacity <= 1.0);
            assert!(agents[id].wellbeing <= 1.0);
        }
    }

    #[test]
    fn test_lowest_wellbeing_targets_least_well() {
        let mut agents = population(20);
        let net = SocialNetwork::with_nodes(20);
        let params = InterventionParams {
            target: TargetSelection::LowestWellbeing,
            ..InterventionParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let mut wellbeings: Vec<f32> = agents.iter().map(|a| a.wellbeing).collect();
        wellbeings.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let cutoff = wellbeings[1]; // two targets for n = 20

        let before: Vec<f32> = agents.iter().map(|a| a.wellbeing).collect();
        let targets = apply_boost(&mut agents, &net, &params, &mut rng);
        assert_eq!(targets.len(), 2);
        for &id in &targets {
            assert!(before[id] <= cutoff);
        }
    }

    #[test]
    fn test_highest_degree_targets_hubs() {
        let mut agents = population(20);
        let mut net = SocialNetwork::with_nodes(20);
        for j in 1..10 {
            net.add_edge(0, j);
        }
        net.add_edge(1, 2);

        let params = InterventionParams {
            target: TargetSelection::HighestDegree,
            ..InterventionParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);

        let targets = apply_boost(&mut agents, &net, &params, &mut rng);
        assert_eq!(targets, vec![0, 1]);
    }

    #[test]
    fn test_bridges_connect_opposing_camps() {
        let mut agents = population(40);
        for (i, agent) in agents.iter_mut().enumerate() {
            agent.opinion = if i % 2 == 0 { 0.8 } else { -0.8 };
        }
        let mut net = SocialNetwork::with_nodes(40);
        let mut rng = SmallRng::seed_from_u64(6);

        let added = apply_bridges(&agents, &mut net, 10, &mut rng);
        assert!(added > 0);

        for i in 0..net.len() {
            for &j in net.neighbors(i) {
                assert!(agents[i].opinion * agents[j].opinion < 0.0);
            }
        }
    }

    #[test]
    fn test_bridges_skip_one_sided_populations() {
        let mut agents = population(10);
        for agent in agents.iter_mut() {
            agent.opinion = 0.9;
        }
        let mut net = SocialNetwork::with_nodes(10);
        let mut rng = SmallRng::seed_from_u64(6);

        assert_eq!(apply_bridges(&agents, &mut net, 5, &mut rng), 0);
    }
}
