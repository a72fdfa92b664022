//! Kindness Exchange
//!
//! Agents with enough capacity direct kind acts at network neighbors,
//! preferring opinion-similar targets. Acts are staged into a pending
//! buffer and applied as one batch so outcomes never depend on agent
//! processing order.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::components::{Agent, AgentId, SocialNetwork};
use crate::config::KindnessParams;

/// A staged kind act, applied at phase end.
#[derive(Debug, Clone, Copy)]
pub struct KindAct {
    pub giver: AgentId,
    pub receiver: AgentId,
    pub amount: f32,
}

/// Run the kindness phase. Returns the number of kind acts performed.
pub fn kindness_phase(
    agents: &mut [Agent],
    network: &SocialNetwork,
    params: &KindnessParams,
    rng: &mut SmallRng,
) -> usize {
    let acts = stage_kind_acts(agents, network, params, rng);
    for act in &acts {
        agents[act.giver].kindness_given += act.amount;
        agents[act.receiver].kindness_received += act.amount;
    }
    acts.len()
}

/// Decide who acts, toward whom, and how much, against a consistent
/// start-of-phase snapshot.
fn stage_kind_acts(
    agents: &[Agent],
    network: &SocialNetwork,
    params: &KindnessParams,
    rng: &mut SmallRng,
) -> Vec<KindAct> {
    let noise: Normal<f32> =
        Normal::new(0.0, params.noise).expect("valid noise standard deviation");
    let mut acts = Vec::new();

    for agent in agents {
        if agent.kindness_capacity < params.depletion_threshold {
            continue; // too depleted to act
        }
        if rng.gen::<f32>() > agent.kindness_capacity {
            continue; // didn't act this round
        }
        let neighbors = network.neighbors(agent.id);
        if neighbors.is_empty() {
            continue;
        }

        let receiver = choose_target(agent, neighbors, agents, rng);

        // Amount discounts with opinion distance, floored so it never
        // vanishes entirely
        let distance = (agent.opinion - agents[receiver].opinion).abs();
        let similarity = (1.0 - distance * params.opinion_kindness_link).max(0.1);
        let amount =
            (agent.kindness_capacity * similarity * (1.0 + noise.sample(rng))).clamp(0.0, 1.0);

        acts.push(KindAct { giver: agent.id, receiver, amount });
    }

    acts
}

/// Softmax over exponential decay of opinion distance; falls back to a
/// uniform draw if the weight mass is zero.
fn choose_target(
    agent: &Agent,
    neighbors: &[AgentId],
    agents: &[Agent],
    rng: &mut SmallRng,
) -> AgentId {
    let weights: Vec<f32> = neighbors
        .iter()
        .map(|&id| {
            let distance = (agent.opinion - agents[id].opinion).abs();
            (-distance * 2.0).exp()
        })
        .collect();

    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return neighbors
            .choose(rng)
            .copied()
            .unwrap_or(neighbors[0]);
    }

    let mut roll = rng.gen::<f32>() * total;
    for (idx, &weight) in weights.iter().enumerate() {
        roll -= weight;
        if roll <= 0.0 {
            return neighbors[idx];
        }
    }
    neighbors[neighbors.len() - 1]
}
