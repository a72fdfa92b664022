//! Configuration System
//!
//! Numeric tuning parameters for every subsystem, loadable from a TOML
//! string or file and fully constructible in code. Defaults are tuned so
//! the coupled model settles into an interior equilibrium.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::components::Strategy;
use crate::error::ConfigError;
use crate::interventions::TargetSelection;

/// Network topology models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Erdős–Rényi: independent edge probability k/(n-1).
    Random,
    /// Watts–Strogatz: ring lattice with probabilistic rewiring.
    SmallWorld,
    /// Barabási–Albert preferential attachment.
    ScaleFree,
    /// Connect to opinion-similar agents, with occasional weak ties.
    Homophily,
    /// Two camps split by opinion sign, no cross-camp edges.
    EchoChamber,
    /// 2D lattice with 4-neighborhoods.
    Grid,
}

/// How reputation reacts to a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationUpdate {
    /// Exponential moving average: 0.9·old + 0.1·move.
    Ema,
    /// Flat ±0.05 per interaction, clamped.
    Flat,
}

/// Population size and initial state distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParams {
    pub n_agents: usize,
    /// Center of the bimodal initial opinion distribution.
    pub initial_polarization: f32,
    /// Standard deviation around each opinion mode.
    pub opinion_spread: f32,
    /// Fraction of agents drawn with very high confidence.
    pub extremist_fraction: f32,
    /// Relative weights for initial strategy assignment.
    pub strategy_mix: BTreeMap<Strategy, f32>,
}

impl Default for PopulationParams {
    fn default() -> Self {
        let mut strategy_mix = BTreeMap::new();
        strategy_mix.insert(Strategy::Unconditional, 0.2);
        strategy_mix.insert(Strategy::Reciprocal, 0.5);
        strategy_mix.insert(Strategy::Selective, 0.2);
        strategy_mix.insert(Strategy::Defector, 0.1);
        Self {
            n_agents: 100,
            initial_polarization: 0.3,
            opinion_spread: 0.2,
            extremist_fraction: 0.1,
            strategy_mix,
        }
    }
}

/// Topology choice and its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    pub topology: Topology,
    pub avg_connections: usize,
    /// Small-world rewiring probability.
    pub rewire_prob: f32,
    /// Probability of connecting to a nearest-opinion candidate rather
    /// than a random weak tie.
    pub homophily_strength: f32,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            topology: Topology::SmallWorld,
            avg_connections: 8,
            rewire_prob: 0.1,
            homophily_strength: 0.8,
        }
    }
}

/// Kindness exchange parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KindnessParams {
    /// Below this capacity an agent is too depleted to act.
    pub depletion_threshold: f32,
    /// How strongly opinion distance discounts the kindness amount.
    pub opinion_kindness_link: f32,
    /// Multiplicative noise (standard deviation) on kindness amounts.
    pub noise: f32,
    /// Wellbeing gained per unit of kindness received.
    pub kindness_to_wellbeing: f32,
    /// Rate at which capacity drifts toward current wellbeing.
    pub wellbeing_to_kindness: f32,
    /// Wellbeing gained per unit of kindness given.
    pub giving_boost: f32,
}

impl Default for KindnessParams {
    fn default() -> Self {
        Self {
            depletion_threshold: 0.2,
            opinion_kindness_link: 0.4,
            noise: 0.1,
            kindness_to_wellbeing: 0.1,
            wellbeing_to_kindness: 0.1,
            giving_boost: 0.04,
        }
    }
}

/// Cooperation game parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CooperationParams {
    /// Payoff for defecting against a cooperator (T).
    pub temptation: f32,
    /// Payoff for mutual cooperation (R).
    pub reward: f32,
    /// Payoff for mutual defection (P).
    pub punishment: f32,
    /// Payoff for cooperating with a defector (S).
    pub sucker: f32,
    /// Pairwise game sub-rounds per simulation round.
    pub rounds_per_step: usize,
    pub reputation_update: ReputationUpdate,
    /// How much wellbeing shifts the cooperation probability.
    pub wellbeing_cooperation_link: f32,
    /// Cross-group cooperation penalty.
    pub polarization_cooperation_link: f32,
    /// How much the normalized score surplus feeds back into wellbeing.
    pub cooperation_wellbeing_link: f32,
    /// Expected per-game score subtracted before normalization.
    pub surplus_baseline: f32,
    /// Normalization denominator per game.
    pub surplus_scale: f32,
}

impl Default for CooperationParams {
    fn default() -> Self {
        Self {
            temptation: 5.0,
            reward: 3.0,
            punishment: 1.0,
            sucker: 0.0,
            rounds_per_step: 3,
            reputation_update: ReputationUpdate::Ema,
            wellbeing_cooperation_link: 0.3,
            polarization_cooperation_link: 0.3,
            cooperation_wellbeing_link: 0.08,
            surplus_baseline: 2.0,
            surplus_scale: 3.0,
        }
    }
}

/// Opinion dynamics parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpinionParams {
    /// Maximum opinion distance at which influence still occurs.
    pub confidence_threshold: f32,
    /// Scale of per-interaction opinion movement.
    pub influence_strength: f32,
    /// Probability and magnitude of pushing away from distant opinions.
    pub backfire_strength: f32,
    /// Constant drift toward the extreme matching the current sign.
    pub media_influence: f32,
    /// Opinion distance from zero at which group identity forms.
    pub group_formation_threshold: f32,
}

impl Default for OpinionParams {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.4,
            influence_strength: 0.1,
            backfire_strength: 0.02,
            media_influence: 0.01,
            group_formation_threshold: 0.3,
        }
    }
}

/// Per-round decay applied during maintenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceParams {
    /// Rate of wellbeing decay toward the 0.5 baseline.
    pub wellbeing_decay: f32,
    /// Capacity lost in a round with no kindness given.
    pub capacity_decay: f32,
}

impl Default for MaintenanceParams {
    fn default() -> Self {
        Self {
            wellbeing_decay: 0.3,
            capacity_decay: 0.02,
        }
    }
}

/// Evolutionary reproduction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    pub mutation_rate: f32,
    /// Exponent applied to scores before fitness-proportional sampling.
    pub selection_pressure: f32,
    pub rounds_per_generation: usize,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            mutation_rate: 0.05,
            selection_pressure: 2.0,
            rounds_per_generation: 50,
        }
    }
}

/// One-time intervention applied inside the round loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterventionParams {
    /// Round at which to intervene; None disables the intervention.
    pub round: Option<u64>,
    pub target: TargetSelection,
    /// Additive kindness-capacity boost (wellbeing gets half of it).
    pub strength: f32,
    /// Bridging edges added between opposing opinion camps.
    pub n_bridges: usize,
}

impl Default for InterventionParams {
    fn default() -> Self {
        Self {
            round: None,
            target: TargetSelection::Random,
            strength: 0.3,
            n_bridges: 0,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub population: PopulationParams,
    pub network: NetworkParams,
    pub kindness: KindnessParams,
    pub cooperation: CooperationParams,
    pub opinion: OpinionParams,
    pub maintenance: MaintenanceParams,
    pub evolution: EvolutionParams,
    pub intervention: InterventionParams,
}

impl Params {
    /// Parse parameters from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load parameters from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Fail fast on parameter sets that can never run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population.n_agents == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.network.avg_connections == 0 {
            return Err(ConfigError::ZeroDegree);
        }
        let c = &self.cooperation;
        let ordered = c.temptation > c.reward && c.reward > c.punishment && c.punishment > c.sucker;
        let iterated = 2.0 * c.reward > c.temptation + c.sucker;
        if !ordered || !iterated {
            return Err(ConfigError::InvalidPayoffs {
                temptation: c.temptation,
                reward: c.reward,
                punishment: c.punishment,
                sucker: c.sucker,
            });
        }
        if c.surplus_scale <= 0.0 {
            return Err(ConfigError::NonPositiveSurplusScale(c.surplus_scale));
        }
        if !self.population.strategy_mix.values().any(|&w| w > 0.0) {
            return Err(ConfigError::EmptyStrategyMix);
        }
        Ok(())
    }

    /// Degree parameter clamped to the population size (k ≤ n-1).
    pub fn effective_degree(&self) -> usize {
        self.network
            .avg_connections
            .min(self.population.n_agents.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = Params::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.population.n_agents, 100);
        assert_eq!(params.cooperation.rounds_per_step, 3);
    }

    #[test]
    fn test_invalid_payoffs_rejected() {
        let mut params = Params::default();
        params.cooperation.temptation = 2.0; // T < R
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidPayoffs { .. })
        ));

        // T > R > P > S but 2R <= T + S
        let mut params = Params::default();
        params.cooperation.temptation = 7.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidPayoffs { .. })
        ));
    }

    #[test]
    fn test_empty_population_rejected() {
        let mut params = Params::default();
        params.population.n_agents = 0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_zero_degree_rejected() {
        let mut params = Params::default();
        params.network.avg_connections = 0;
        assert!(matches!(params.validate(), Err(ConfigError::ZeroDegree)));
    }

    #[test]
    fn test_effective_degree_clamps_to_population() {
        let mut params = Params::default();
        params.population.n_agents = 5;
        params.network.avg_connections = 10;
        assert_eq!(params.effective_degree(), 4);
    }

    #[test]
    fn test_toml_sections_override_defaults() {
        let toml = r#"
            [population]
            n_agents = 50

            [network]
            topology = "echo_chamber"
            avg_connections = 6

            [opinion]
            confidence_threshold = 0.6
        "#;
        let params = Params::from_toml(toml).unwrap();
        assert_eq!(params.population.n_agents, 50);
        assert_eq!(params.network.topology, Topology::EchoChamber);
        assert_eq!(params.network.avg_connections, 6);
        assert!((params.opinion.confidence_threshold - 0.6).abs() < 1e-6);
        // Untouched sections keep their defaults
        assert!((params.cooperation.temptation - 5.0).abs() < 1e-6);
    }
}
