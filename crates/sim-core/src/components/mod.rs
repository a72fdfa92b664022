//! Core Components
//!
//! Agent state records and the social network they are embedded in.

pub mod agent;
pub mod network;

pub use agent::{Agent, AgentId, GroupIdentity, Move, MoveRecord, Strategy};
pub use network::SocialNetwork;
