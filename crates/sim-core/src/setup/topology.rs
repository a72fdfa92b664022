//! Network Construction
//!
//! Builders for each topology model. Every builder returns a symmetric
//! network with no self-loops or duplicate edges; degree parameters larger
//! than the population clamp to n-1.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{Agent, AgentId, SocialNetwork};
use crate::config::{NetworkParams, Topology};

/// Build the social network for an initialized population.
pub fn build_network(
    params: &NetworkParams,
    agents: &[Agent],
    rng: &mut SmallRng,
) -> SocialNetwork {
    let n = agents.len();
    let k = params.avg_connections.min(n.saturating_sub(1));
    let mut net = SocialNetwork::with_nodes(n);
    if n < 2 || k == 0 {
        return net;
    }

    match params.topology {
        Topology::Random => build_random(&mut net, n, k, rng),
        Topology::SmallWorld => build_small_world(&mut net, n, k, params.rewire_prob, rng),
        Topology::ScaleFree => build_scale_free(&mut net, n, k, rng),
        Topology::Homophily => {
            build_homophily(&mut net, agents, k, params.homophily_strength, rng)
        }
        Topology::EchoChamber => build_echo_chamber(&mut net, agents, k, rng),
        Topology::Grid => build_grid(&mut net, n),
    }

    debug_assert!(net.is_symmetric());
    net
}

/// Erdős–Rényi: each unordered pair connected with probability k/(n-1).
fn build_random(net: &mut SocialNetwork, n: usize, k: usize, rng: &mut SmallRng) {
    let p = k as f32 / (n - 1) as f32;
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen::<f32>() < p {
                net.add_edge(i, j);
            }
        }
    }
}

/// Watts–Strogatz: ring lattice over k/2 forward neighbors, each candidate
/// edge rewired to a uniform target with probability `rewire_prob`.
fn build_small_world(
    net: &mut SocialNetwork,
    n: usize,
    k: usize,
    rewire_prob: f32,
    rng: &mut SmallRng,
) {
    let half = (k / 2).max(1);
    for i in 0..n {
        for j in 1..=half {
            let mut target = (i + j) % n;
            if rng.gen::<f32>() < rewire_prob {
                target = rng.gen_range(0..n);
            }
            net.add_edge(i, target);
        }
    }
}

/// Barabási–Albert: complete seed graph on m nodes, then preferential
/// attachment of m edges per new node.
fn build_scale_free(net: &mut SocialNetwork, n: usize, k: usize, rng: &mut SmallRng) {
    let m = (k / 2).max(1).min(n - 1);

    let seed = m.min(n);
    for i in 0..seed {
        for j in (i + 1)..seed {
            net.add_edge(i, j);
        }
    }

    for i in seed..n {
        let mut candidates: Vec<AgentId> = (0..i).collect();
        let mut chosen = Vec::with_capacity(m);

        for _ in 0..m.min(i) {
            let total: f32 = candidates.iter().map(|&c| net.degree(c) as f32).sum();
            let pick = if total <= 0.0 {
                rng.gen_range(0..candidates.len())
            } else {
                let mut roll = rng.gen::<f32>() * total;
                let mut pick = candidates.len() - 1;
                for (idx, &c) in candidates.iter().enumerate() {
                    roll -= net.degree(c) as f32;
                    if roll <= 0.0 {
                        pick = idx;
                        break;
                    }
                }
                pick
            };
            chosen.push(candidates.swap_remove(pick));
        }

        for target in chosen {
            net.add_edge(i, target);
        }
    }
}

/// Homophily: each agent ranks all others by opinion distance and connects
/// to the k nearest, substituting a random weak tie per slot with
/// probability 1 - homophily_strength.
fn build_homophily(
    net: &mut SocialNetwork,
    agents: &[Agent],
    k: usize,
    homophily_strength: f32,
    rng: &mut SmallRng,
) {
    let n = agents.len();
    for i in 0..n {
        let mut others: Vec<(AgentId, f32)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (j, (agents[i].opinion - agents[j].opinion).abs()))
            .collect();
        others.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        for slot in 0..k.min(others.len()) {
            if rng.gen::<f32>() < homophily_strength {
                net.add_edge(i, others[slot].0);
            } else {
                let (weak_tie, _) = others[rng.gen_range(0..others.len())];
                net.add_edge(i, weak_tie);
            }
        }
    }
}

/// Echo chamber: partition by opinion sign, connect only within camps.
fn build_echo_chamber(
    net: &mut SocialNetwork,
    agents: &[Agent],
    k: usize,
    rng: &mut SmallRng,
) {
    let positive: Vec<AgentId> = agents
        .iter()
        .filter(|a| a.opinion >= 0.0)
        .map(|a| a.id)
        .collect();
    let negative: Vec<AgentId> = agents
        .iter()
        .filter(|a| a.opinion < 0.0)
        .map(|a| a.id)
        .collect();

    for camp in [&positive, &negative] {
        for &i in camp.iter() {
            let others: Vec<AgentId> = camp.iter().copied().filter(|&j| j != i).collect();
            let wanted = k.min(others.len());
            let picks: Vec<AgentId> = others
                .choose_multiple(rng, wanted)
                .copied()
                .collect();
            for j in picks {
                net.add_edge(i, j);
            }
        }
    }
}

/// 2D lattice on a √n × √n grid, 4-neighborhood.
fn build_grid(net: &mut SocialNetwork, n: usize) {
    let side = (n as f64).sqrt() as usize;
    if side == 0 {
        return;
    }
    for i in 0..n {
        let (row, col) = (i / side, i % side);
        if col + 1 < side && i + 1 < n {
            net.add_edge(i, i + 1);
        }
        let below = (row + 1) * side + col;
        if below < n {
            net.add_edge(i, below);
        }
    }
}
