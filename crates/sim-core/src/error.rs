//! Error Types
//!
//! Configuration problems fail fast before any round executes; invariant
//! violations indicate an engine defect and abort the run rather than being
//! silently re-clamped.

use thiserror::Error;

use crate::components::AgentId;

/// A parameter set that can never produce a valid simulation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error(
        "invalid payoffs: require T > R > P > S and 2R > T + S, \
         got T={temptation}, R={reward}, P={punishment}, S={sucker}"
    )]
    InvalidPayoffs {
        temptation: f32,
        reward: f32,
        punishment: f32,
        sucker: f32,
    },

    #[error("population size must be positive")]
    EmptyPopulation,

    #[error("average degree must be positive")]
    ZeroDegree,

    #[error("strategy mix must contain at least one positive weight")]
    EmptyStrategyMix,

    #[error("cooperation surplus scale must be positive, got {0}")]
    NonPositiveSurplusScale(f32),

    #[error("could not read parameter file: {0}")]
    Io(String),

    #[error("could not parse parameter file: {0}")]
    Parse(String),
}

/// Errors surfaced by a running simulation.
#[derive(Debug, Clone, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A bounded scalar escaped its declared range after the clamp step
    /// (including NaN). Always an engine defect, never user error.
    #[error("invariant violation at round {round}: agent {agent} {field} = {value}")]
    InvariantViolation {
        round: u64,
        agent: AgentId,
        field: &'static str,
        value: f32,
    },
}
