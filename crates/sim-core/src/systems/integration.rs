//! Cross-System Integration
//!
//! The coupling step that makes this one model rather than three: kindness
//! flows into wellbeing, cooperation surplus feeds wellbeing, and wellbeing
//! sets the target for kindness capacity.

use crate::components::Agent;
use crate::config::{CooperationParams, KindnessParams};

/// Apply cross-system effects. Purely local per agent.
pub fn integration_phase(
    agents: &mut [Agent],
    kindness: &KindnessParams,
    cooperation: &CooperationParams,
) {
    let games = cooperation.rounds_per_step as f32;

    for agent in agents.iter_mut() {
        agent.wellbeing += agent.kindness_received * kindness.kindness_to_wellbeing;
        agent.wellbeing += agent.kindness_given * kindness.giving_boost;

        if games > 0.0 {
            // Normalized score surplus relative to the expected per-game take
            let surplus = (agent.cooperation_score - cooperation.surplus_baseline * games)
                / (cooperation.surplus_scale * games);
            agent.wellbeing += surplus * cooperation.cooperation_wellbeing_link;
        }
        agent.wellbeing = agent.wellbeing.clamp(0.0, 1.0);

        // Wellbeing sets the capacity target
        agent.kindness_capacity +=
            (agent.wellbeing - agent.kindness_capacity) * kindness.wellbeing_to_kindness;
        agent.kindness_capacity = agent.kindness_capacity.clamp(0.0, 1.0);
    }
}
