//! Social Dynamics Simulation Engine
//!
//! A network-structured population whose kindness, cooperation, and opinion
//! state evolve round-by-round through coupled stochastic update rules,
//! with optional evolutionary reproduction and targeted interventions.
//!
//! The engine consumes numeric parameters plus a seed and produces numeric
//! per-round metrics; persisting or rendering results is a caller concern.

pub mod components;
pub mod config;
pub mod error;
pub mod evolution;
pub mod interventions;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::{Agent, AgentId, GroupIdentity, Move, MoveRecord, SocialNetwork, Strategy};
pub use config::{Params, ReputationUpdate, Topology};
pub use error::{ConfigError, SimError};
pub use evolution::{EvolutionarySimulation, GenerationStats};
pub use interventions::TargetSelection;
pub use output::{RoundMetrics, RunSummary};
pub use simulation::Simulation;
