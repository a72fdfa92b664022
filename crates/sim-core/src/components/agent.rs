//! Agent Components
//!
//! The mutable per-agent state record shared by every simulation variant:
//! kindness, cooperation, and opinion state plus per-opponent interaction
//! memory and history rows for offline analysis.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense index into the population vector.
pub type AgentId = usize;

/// A single move in a cooperation game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    pub fn is_cooperate(self) -> bool {
        matches!(self, Move::Cooperate)
    }

    /// The opposite move (used by win-stay/lose-shift).
    pub fn flipped(self) -> Self {
        match self {
            Move::Cooperate => Move::Defect,
            Move::Defect => Move::Cooperate,
        }
    }
}

/// How an agent decides to cooperate.
///
/// Two families share one dispatch: the coupled probabilistic strategies
/// used when cooperation interacts with wellbeing and opinion, and the
/// classic memory-driven strategies used in evolutionary tournaments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Cooperate almost always, regardless of partner.
    Unconditional,
    /// Cooperate with probability equal to the partner's reputation.
    Reciprocal,
    /// Cooperate with opinion-similar partners, stonewall distant ones.
    Selective,
    /// Rarely cooperate.
    Defector,
    AlwaysCooperate,
    AlwaysDefect,
    /// Cooperate first, then repeat the opponent's previous move.
    TitForTat,
    /// Tit-for-tat that forgives a defection 10% of the time.
    #[serde(rename = "generous_tft")]
    GenerousTitForTat,
    /// Cooperate until the opponent's first defection, then defect forever.
    Grudger,
    Random,
    /// Win-stay/lose-shift: repeat own last move if the outcome was
    /// favorable, otherwise switch.
    Pavlov,
}

impl Strategy {
    /// The coupled probabilistic family.
    pub const COUPLED: [Strategy; 4] = [
        Strategy::Unconditional,
        Strategy::Reciprocal,
        Strategy::Selective,
        Strategy::Defector,
    ];

    /// The classic memory-driven family.
    pub const CLASSIC: [Strategy; 7] = [
        Strategy::AlwaysCooperate,
        Strategy::AlwaysDefect,
        Strategy::TitForTat,
        Strategy::GenerousTitForTat,
        Strategy::Grudger,
        Strategy::Random,
        Strategy::Pavlov,
    ];

    /// Whether this strategy decides from per-opponent memory rather than a
    /// cooperation probability.
    pub fn is_classic(self) -> bool {
        Self::CLASSIC.contains(&self)
    }

    /// Stable name used as a metrics key.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Unconditional => "unconditional",
            Strategy::Reciprocal => "reciprocal",
            Strategy::Selective => "selective",
            Strategy::Defector => "defector",
            Strategy::AlwaysCooperate => "always_cooperate",
            Strategy::AlwaysDefect => "always_defect",
            Strategy::TitForTat => "tit_for_tat",
            Strategy::GenerousTitForTat => "generous_tft",
            Strategy::Grudger => "grudger",
            Strategy::Random => "random",
            Strategy::Pavlov => "pavlov",
        }
    }
}

/// Opinion-derived group membership.
///
/// Recomputed from the current opinion every round; never mutated directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupIdentity {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl GroupIdentity {
    /// Classify an opinion against the group-formation threshold.
    pub fn from_opinion(opinion: f32, threshold: f32) -> Self {
        if opinion < -threshold {
            GroupIdentity::Negative
        } else if opinion > threshold {
            GroupIdentity::Positive
        } else {
            GroupIdentity::Neutral
        }
    }

    /// Whether the agent identifies with either camp.
    pub fn is_aligned(self) -> bool {
        !matches!(self, GroupIdentity::Neutral)
    }
}

/// One completed game against a specific opponent, as the agent saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub own: Move,
    pub opponent: Move,
}

/// An individual in the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,

    // Kindness state
    pub kindness_capacity: f32,
    pub wellbeing: f32,

    // Cooperation state
    pub strategy: Strategy,
    pub reputation: f32,

    // Opinion state
    pub opinion: f32,
    pub confidence: f32,
    pub openness: f32,
    pub influence: f32,
    pub group: GroupIdentity,

    /// Generation index; only advances under evolutionary reproduction.
    pub generation: u32,

    // Round-local transients, reset at the top of every round
    pub kindness_given: f32,
    pub kindness_received: f32,
    pub cooperation_score: f32,

    /// Per-opponent append-only game log, owned by this agent alone.
    pub memory: HashMap<AgentId, Vec<MoveRecord>>,

    // History rows for offline analysis
    pub wellbeing_history: Vec<f32>,
    pub kindness_history: Vec<f32>,
    pub opinion_history: Vec<f32>,
    pub cooperation_history: Vec<f32>,
}

impl Agent {
    /// Create an agent with neutral state. Initial distributions are the
    /// population initializer's concern.
    pub fn new(id: AgentId, strategy: Strategy) -> Self {
        Self {
            id,
            kindness_capacity: 0.5,
            wellbeing: 0.5,
            strategy,
            reputation: 0.5,
            opinion: 0.0,
            confidence: 0.5,
            openness: 0.5,
            influence: 0.5,
            group: GroupIdentity::Neutral,
            generation: 0,
            kindness_given: 0.0,
            kindness_received: 0.0,
            cooperation_score: 0.0,
            memory: HashMap::new(),
            wellbeing_history: Vec::new(),
            kindness_history: Vec::new(),
            opinion_history: Vec::new(),
            cooperation_history: Vec::new(),
        }
    }

    /// Clear round-local counters.
    pub fn reset_round(&mut self) {
        self.kindness_given = 0.0;
        self.kindness_received = 0.0;
        self.cooperation_score = 0.0;
    }

    /// Append a completed game to the log for this opponent.
    pub fn record_interaction(&mut self, opponent: AgentId, record: MoveRecord) {
        self.memory.entry(opponent).or_default().push(record);
    }

    /// The game log against a specific opponent, oldest first.
    pub fn history_with(&self, opponent: AgentId) -> &[MoveRecord] {
        self.memory.get(&opponent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Recompute group identity from the current opinion.
    pub fn update_group(&mut self, threshold: f32) {
        self.group = GroupIdentity::from_opinion(self.opinion, threshold);
    }
}
