//! Cooperation Games
//!
//! Pairwise Prisoner's Dilemma play. Strategy dispatch is exhaustive over
//! both families: the coupled probabilistic strategies compute a
//! cooperation probability from partner reputation, own wellbeing, and
//! group identity; the classic strategies decide from per-opponent memory.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{Agent, AgentId, Move, MoveRecord, Strategy};
use crate::config::{CooperationParams, ReputationUpdate};

/// Payoffs for one game, (own, partner).
pub fn payoffs(own: Move, partner: Move, params: &CooperationParams) -> (f32, f32) {
    match (own, partner) {
        (Move::Cooperate, Move::Cooperate) => (params.reward, params.reward),
        (Move::Defect, Move::Defect) => (params.punishment, params.punishment),
        (Move::Defect, Move::Cooperate) => (params.temptation, params.sucker),
        (Move::Cooperate, Move::Defect) => (params.sucker, params.temptation),
    }
}

/// Cooperation probability for the coupled family; None for classic
/// strategies, which decide from memory instead.
pub fn cooperation_probability(
    agent: &Agent,
    partner: &Agent,
    params: &CooperationParams,
) -> Option<f32> {
    let base = match agent.strategy {
        Strategy::Unconditional => 0.9,
        Strategy::Reciprocal => partner.reputation,
        Strategy::Selective => {
            let distance = (agent.opinion - partner.opinion).abs();
            if distance < 0.5 {
                1.0 - distance
            } else {
                0.1
            }
        }
        Strategy::Defector => 0.1,
        _ => return None,
    };

    let wellbeing_mod = (agent.wellbeing - 0.5) * params.wellbeing_cooperation_link;

    let group_mod = if agent.group.is_aligned() && partner.group.is_aligned() {
        if agent.group == partner.group {
            0.1
        } else {
            -params.polarization_cooperation_link
        }
    } else {
        0.0
    };

    Some((base + wellbeing_mod + group_mod).clamp(0.0, 1.0))
}

/// Decide one side of a game. Both sides of an interaction are decided
/// against pre-interaction state before anything is committed.
pub fn decide(
    agent: &Agent,
    partner: &Agent,
    params: &CooperationParams,
    rng: &mut SmallRng,
) -> Move {
    if let Some(prob) = cooperation_probability(agent, partner, params) {
        return if rng.gen::<f32>() < prob {
            Move::Cooperate
        } else {
            Move::Defect
        };
    }

    let history = agent.history_with(partner.id);
    match agent.strategy {
        Strategy::AlwaysCooperate => Move::Cooperate,
        Strategy::AlwaysDefect => Move::Defect,
        Strategy::TitForTat => history
            .last()
            .map(|r| r.opponent)
            .unwrap_or(Move::Cooperate),
        Strategy::GenerousTitForTat => match history.last() {
            None => Move::Cooperate,
            Some(last) if last.opponent == Move::Defect => {
                // Forgive 10% of defections
                if rng.gen::<f32>() < 0.1 {
                    Move::Cooperate
                } else {
                    Move::Defect
                }
            }
            Some(last) => last.opponent,
        },
        Strategy::Grudger => {
            if history.iter().any(|r| r.opponent == Move::Defect) {
                Move::Defect
            } else {
                Move::Cooperate
            }
        }
        Strategy::Random => {
            if rng.gen::<f32>() < 0.5 {
                Move::Cooperate
            } else {
                Move::Defect
            }
        }
        Strategy::Pavlov => match history.last() {
            None => Move::Cooperate,
            Some(last) => {
                if last.opponent.is_cooperate() {
                    last.own
                } else {
                    last.own.flipped()
                }
            }
        },
        // Coupled strategies were handled above
        Strategy::Unconditional
        | Strategy::Reciprocal
        | Strategy::Selective
        | Strategy::Defector => Move::Cooperate,
    }
}

/// Adjust reputation after a move, per the configured update rule.
pub fn update_reputation(agent: &mut Agent, own_move: Move, rule: ReputationUpdate) {
    let cooperated = own_move.is_cooperate();
    agent.reputation = match rule {
        ReputationUpdate::Ema => {
            0.9 * agent.reputation + 0.1 * if cooperated { 1.0 } else { 0.0 }
        }
        ReputationUpdate::Flat => agent.reputation + if cooperated { 0.05 } else { -0.05 },
    }
    .clamp(0.0, 1.0);
}

/// Play one game between two agents and commit payoffs, memory, and
/// reputation for both sides.
pub fn play_game(
    agents: &mut [Agent],
    first: AgentId,
    second: AgentId,
    params: &CooperationParams,
    rng: &mut SmallRng,
) -> (Move, Move) {
    let (move1, move2) = {
        let a = &agents[first];
        let b = &agents[second];
        (decide(a, b, params, rng), decide(b, a, params, rng))
    };

    let (payoff1, payoff2) = payoffs(move1, move2, params);
    agents[first].cooperation_score += payoff1;
    agents[second].cooperation_score += payoff2;

    agents[first].record_interaction(second, MoveRecord { own: move1, opponent: move2 });
    agents[second].record_interaction(first, MoveRecord { own: move2, opponent: move1 });

    update_reputation(&mut agents[first], move1, params.reputation_update);
    update_reputation(&mut agents[second], move2, params.reputation_update);

    (move1, move2)
}

/// One simulation round of cooperation: `rounds_per_step` sub-rounds of
/// shuffled pairwise play across the whole population. An odd agent out
/// simply sits out the sub-round.
pub fn cooperation_phase(agents: &mut [Agent], params: &CooperationParams, rng: &mut SmallRng) {
    let n = agents.len();
    for _ in 0..params.rounds_per_step {
        let mut order: Vec<AgentId> = (0..n).collect();
        order.shuffle(rng);
        for pair in order.chunks_exact(2) {
            play_game(agents, pair[0], pair[1], params, rng);
        }
    }
}
