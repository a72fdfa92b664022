//! Simulation Setup
//!
//! Population initialization and network construction.

pub mod population;
pub mod topology;

pub use population::init_population;
pub use topology::build_network;
