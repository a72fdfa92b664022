//! Opinion Dynamics
//!
//! Bounded-confidence influence with a backfire term and constant media
//! drift. Deltas are accumulated against a start-of-phase snapshot and
//! applied as one batch, then group identities are recomputed.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::{Agent, SocialNetwork};
use crate::config::OpinionParams;

/// Run the opinion phase.
pub fn opinion_phase(
    agents: &mut [Agent],
    network: &SocialNetwork,
    params: &OpinionParams,
    rng: &mut SmallRng,
) {
    let deltas = stage_opinion_deltas(agents, network, params, rng);

    for (agent, delta) in agents.iter_mut().zip(deltas) {
        agent.opinion = (agent.opinion + delta).clamp(-1.0, 1.0);
        agent.update_group(params.group_formation_threshold);
    }
}

fn stage_opinion_deltas(
    agents: &[Agent],
    network: &SocialNetwork,
    params: &OpinionParams,
    rng: &mut SmallRng,
) -> Vec<f32> {
    agents
        .iter()
        .map(|agent| {
            let mut delta = 0.0f32;

            for &neighbor_id in network.neighbors(agent.id) {
                let neighbor = &agents[neighbor_id];
                let distance = (agent.opinion - neighbor.opinion).abs();

                if distance < params.confidence_threshold {
                    // Close enough to influence; certainty dampens movement
                    delta += agent.openness
                        * neighbor.influence
                        * (1.0 - agent.confidence * 0.5)
                        * params.influence_strength
                        * (neighbor.opinion - agent.opinion);
                } else if rng.gen::<f32>() < params.backfire_strength {
                    // Distant views can entrench the agent further
                    let away = if agent.opinion >= neighbor.opinion {
                        1.0
                    } else {
                        -1.0
                    };
                    delta += away * params.backfire_strength;
                }
            }

            // Media drift toward the extreme matching the current sign
            if agent.opinion > 0.0 {
                delta += params.media_influence;
            } else {
                delta -= params.media_influence;
            }

            // Kindness received this round leaves the agent more movable
            if agent.kindness_received > 0.5 {
                delta *= 1.2;
            }

            delta
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Strategy;
    use rand::SeedableRng;

    fn pair_with_opinions(o1: f32, o2: f32) -> (Vec<Agent>, SocialNetwork) {
        let mut agents: Vec<Agent> = (0..2)
            .map(|id| Agent::new(id, Strategy::Reciprocal))
            .collect();
        agents[0].opinion = o1;
        agents[1].opinion = o2;
        let mut net = SocialNetwork::with_nodes(2);
        net.add_edge(0, 1);
        (agents, net)
    }

    fn quiet_params() -> OpinionParams {
        OpinionParams {
            backfire_strength: 0.0,
            media_influence: 0.0,
            ..OpinionParams::default()
        }
    }

    #[test]
    fn test_close_opinions_converge() {
        let (mut agents, net) = pair_with_opinions(0.1, 0.3);
        let params = quiet_params();
        let mut rng = SmallRng::seed_from_u64(1);

        let before = (agents[0].opinion - agents[1].opinion).abs();
        opinion_phase(&mut agents, &net, &params, &mut rng);
        let after = (agents[0].opinion - agents[1].opinion).abs();

        assert!(after < before);
    }

    #[test]
    fn test_distant_opinions_do_not_converge_without_backfire() {
        let (mut agents, net) = pair_with_opinions(-0.6, 0.6);
        let params = quiet_params();
        let mut rng = SmallRng::seed_from_u64(1);

        opinion_phase(&mut agents, &net, &params, &mut rng);

        assert_eq!(agents[0].opinion, -0.6);
        assert_eq!(agents[1].opinion, 0.6);
    }

    #[test]
    fn test_backfire_pushes_apart() {
        let (mut agents, net) = pair_with_opinions(-0.5, 0.5);
        let mut params = quiet_params();
        params.backfire_strength = 1.0; // fire on every distant contact
        let mut rng = SmallRng::seed_from_u64(1);

        opinion_phase(&mut agents, &net, &params, &mut rng);

        assert!(agents[0].opinion < -0.5);
        assert!(agents[1].opinion > 0.5);
    }

    #[test]
    fn test_media_drift_pushes_toward_own_extreme() {
        let mut agents: Vec<Agent> = (0..2)
            .map(|id| Agent::new(id, Strategy::Reciprocal))
            .collect();
        agents[0].opinion = 0.2;
        agents[1].opinion = -0.2;
        let net = SocialNetwork::with_nodes(2); // isolated: drift still applies
        let mut params = quiet_params();
        params.media_influence = 0.05;
        let mut rng = SmallRng::seed_from_u64(1);

        opinion_phase(&mut agents, &net, &params, &mut rng);

        assert!((agents[0].opinion - 0.25).abs() < 1e-6);
        assert!((agents[1].opinion + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_opinion_clamped_to_range() {
        let (mut agents, net) = pair_with_opinions(0.99, -0.99);
        let mut params = quiet_params();
        params.backfire_strength = 1.0;
        params.media_influence = 0.5;
        let mut rng = SmallRng::seed_from_u64(1);

        for _ in 0..5 {
            opinion_phase(&mut agents, &net, &params, &mut rng);
        }

        assert!((-1.0..=1.0).contains(&agents[0].opinion));
        assert!((-1.0..=1.0).contains(&agents[1].opinion));
    }

    #[test]
    fn test_group_identity_recomputed_after_update() {
        let (mut agents, net) = pair_with_opinions(0.29, 0.29);
        let mut params = quiet_params();
        params.media_influence = 0.05;
        let mut rng = SmallRng::seed_from_u64(1);

        opinion_phase(&mut agents, &net, &params, &mut rng);

        use crate::components::GroupIdentity;
        assert_eq!(agents[0].group, GroupIdentity::Positive);
        assert_eq!(agents[1].group, GroupIdentity::Positive);
    }
}
