//! Metrics Output
//!
//! Read-only population statistics. Recording runs strictly after every
//! agent has finished its round and never mutates agent state.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::components::Agent;

/// Opinion magnitude beyond which an agent counts as extreme.
pub const EXTREMITY_THRESHOLD: f32 = 0.3;

/// Population mean and variance (population variance, not sample).
fn mean_var(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var)
}

/// Per-round population statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundMetrics {
    pub round: u64,
    pub mean_wellbeing: f64,
    pub var_wellbeing: f64,
    pub mean_kindness: f64,
    pub var_kindness: f64,
    pub mean_opinion: f64,
    pub var_opinion: f64,
    pub mean_reputation: f64,
    pub var_reputation: f64,
    pub mean_cooperation_score: f64,
    pub var_cooperation_score: f64,
    /// Fraction of agents beyond the extremity threshold.
    pub polarization_index: f64,
    pub group_negative: usize,
    pub group_neutral: usize,
    pub group_positive: usize,
    pub kind_acts: usize,
    pub total_kindness_given: f64,
}

/// Record one round of metrics from the finished agent state.
pub fn record_round(round: u64, agents: &[Agent], kind_acts: usize) -> RoundMetrics {
    let (mean_wellbeing, var_wellbeing) = mean_var(agents.iter().map(|a| a.wellbeing as f64));
    let (mean_kindness, var_kindness) =
        mean_var(agents.iter().map(|a| a.kindness_capacity as f64));
    let (mean_opinion, var_opinion) = mean_var(agents.iter().map(|a| a.opinion as f64));
    let (mean_reputation, var_reputation) =
        mean_var(agents.iter().map(|a| a.reputation as f64));
    let (mean_cooperation_score, var_cooperation_score) =
        mean_var(agents.iter().map(|a| a.cooperation_score as f64));

    let extreme = agents
        .iter()
        .filter(|a| a.opinion.abs() > EXTREMITY_THRESHOLD)
        .count();
    let polarization_index = if agents.is_empty() {
        0.0
    } else {
        extreme as f64 / agents.len() as f64
    };

    use crate::components::GroupIdentity;
    let group_count = |g: GroupIdentity| agents.iter().filter(|a| a.group == g).count();

    RoundMetrics {
        round,
        mean_wellbeing,
        var_wellbeing,
        mean_kindness,
        var_kindness,
        mean_opinion,
        var_opinion,
        mean_reputation,
        var_reputation,
        mean_cooperation_score,
        var_cooperation_score,
        polarization_index,
        group_negative: group_count(GroupIdentity::Negative),
        group_neutral: group_count(GroupIdentity::Neutral),
        group_positive: group_count(GroupIdentity::Positive),
        kind_acts,
        total_kindness_given: agents.iter().map(|a| a.kindness_given as f64).sum(),
    }
}

/// Strategy distribution, keyed by stable strategy names.
pub fn strategy_counts(agents: &[Agent]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for agent in agents {
        *counts.entry(agent.strategy.name()).or_insert(0) += 1;
    }
    counts
}

/// Initial-vs-final deltas for one completed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub rounds: usize,
    pub initial_wellbeing: f64,
    pub final_wellbeing: f64,
    pub wellbeing_change: f64,
    pub initial_kindness: f64,
    pub final_kindness: f64,
    pub kindness_change: f64,
    /// Opinion variance, the continuous polarization measure.
    pub initial_polarization: f64,
    pub final_polarization: f64,
    pub polarization_change: f64,
    pub final_polarization_index: f64,
    pub final_reputation: f64,
}

impl RunSummary {
    /// None when no rounds have been recorded.
    pub fn from_metrics(history: &[RoundMetrics]) -> Option<Self> {
        let initial = history.first()?;
        let last = history.last()?;
        Some(Self {
            rounds: history.len(),
            initial_wellbeing: initial.mean_wellbeing,
            final_wellbeing: last.mean_wellbeing,
            wellbeing_change: last.mean_wellbeing - initial.mean_wellbeing,
            initial_kindness: initial.mean_kindness,
            final_kindness: last.mean_kindness,
            kindness_change: last.mean_kindness - initial.mean_kindness,
            initial_polarization: initial.var_opinion,
            final_polarization: last.var_opinion,
            polarization_change: last.var_opinion - initial.var_opinion,
            final_polarization_index: last.polarization_index,
            final_reputation: last.mean_reputation,
        })
    }
}
