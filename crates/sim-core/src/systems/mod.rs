//! Phase Systems
//!
//! The per-round update pipeline. `Simulation::step` runs these in a strict
//! order: kindness → cooperation → opinion → integration → maintenance.

pub mod cooperation;
pub mod integration;
pub mod kindness;
pub mod maintenance;
pub mod opinion;

pub use cooperation::{
    cooperation_phase, cooperation_probability, decide, payoffs, play_game, update_reputation,
};
pub use integration::integration_phase;
pub use kindness::{kindness_phase, KindAct};
pub use maintenance::maintenance_phase;
pub use opinion::opinion_phase;
