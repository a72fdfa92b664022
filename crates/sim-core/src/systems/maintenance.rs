//! Maintenance
//!
//! End-of-round upkeep: decay toward baseline, clamping, invariant
//! verification, and history recording. A value found outside its range
//! after the clamp step aborts the run instead of being silently fixed.

use crate::components::Agent;
use crate::config::MaintenanceParams;
use crate::error::SimError;

/// Run the maintenance phase.
pub fn maintenance_phase(
    agents: &mut [Agent],
    params: &MaintenanceParams,
    round: u64,
) -> Result<(), SimError> {
    for agent in agents.iter_mut() {
        // Wellbeing decays toward the neutral baseline
        agent.wellbeing += (0.5 - agent.wellbeing) * params.wellbeing_decay;

        // Capacity atrophies in rounds without practice
        if params.capacity_decay > 0.0 && agent.kindness_given == 0.0 {
            agent.kindness_capacity -= params.capacity_decay;
        }

        agent.wellbeing = agent.wellbeing.clamp(0.0, 1.0);
        agent.kindness_capacity = agent.kindness_capacity.clamp(0.0, 1.0);
        agent.reputation = agent.reputation.clamp(0.0, 1.0);
        agent.opinion = agent.opinion.clamp(-1.0, 1.0);

        check_bounds(agent, round)?;

        agent.wellbeing_history.push(agent.wellbeing);
        agent.kindness_history.push(agent.kindness_capacity);
        agent.opinion_history.push(agent.opinion);
        agent.cooperation_history.push(agent.cooperation_score);
    }
    Ok(())
}

/// Verify every bounded scalar post-clamp. Catches NaN as well, since NaN
/// survives `clamp` and fails every range check.
fn check_bounds(agent: &Agent, round: u64) -> Result<(), SimError> {
    let unit_fields = [
        ("wellbeing", agent.wellbeing),
        ("kindness_capacity", agent.kindness_capacity),
        ("reputation", agent.reputation),
        ("confidence", agent.confidence),
        ("openness", agent.openness),
        ("influence", agent.influence),
    ];
    for (field, value) in unit_fields {
        if !(0.0..=1.0).contains(&value) {
            return Err(SimError::InvariantViolation {
                round,
                agent: agent.id,
                field,
                value,
            });
        }
    }
    if !(-1.0..=1.0).contains(&agent.opinion) {
        return Err(SimError::InvariantViolation {
            round,
            agent: agent.id,
            field: "opinion",
            value: agent.opinion,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Strategy;

    #[test]
    fn test_wellbeing_decays_toward_baseline() {
        let mut agents = vec![Agent::new(0, Strategy::Reciprocal)];
        agents[0].wellbeing = 1.0;
        agents[0].kindness_given = 0.1;

        let params = MaintenanceParams::default();
        maintenance_phase(&mut agents, &params, 0).unwrap();
        assert!(agents[0].wellbeing < 1.0);

        agents[0].wellbeing = 0.0;
        maintenance_phase(&mut agents, &params, 1).unwrap();
        assert!(agents[0].wellbeing > 0.0);
    }

    #[test]
    fn test_capacity_decays_without_practice() {
        let mut agents = vec![Agent::new(0, Strategy::Reciprocal)];
        agents[0].kindness_capacity = 0.8;

        let params = MaintenanceParams {
            capacity_decay: 0.03,
            ..MaintenanceParams::default()
        };
        maintenance_phase(&mut agents, &params, 0).unwrap();
        assert!((agents[0].kindness_capacity - 0.77).abs() < 1e-6);

        // Practicing agents keep their capacity
        agents[0].kindness_capacity = 0.8;
        agents[0].kindness_given = 0.5;
        maintenance_phase(&mut agents, &params, 1).unwrap();
        assert!((agents[0].kindness_capacity - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_history_appended_each_round() {
        let mut agents = vec![Agent::new(0, Strategy::Reciprocal)];
        let params = MaintenanceParams::default();

        for round in 0..5 {
            maintenance_phase(&mut agents, &params, round).unwrap();
        }
        assert_eq!(agents[0].wellbeing_history.len(), 5);
        assert_eq!(agents[0].opinion_history.len(), 5);
        assert_eq!(agents[0].cooperation_history.len(), 5);
    }

    #[test]
    fn test_nan_raises_invariant_violation() {
        let mut agents = vec![Agent::new(0, Strategy::Reciprocal)];
        agents[0].wellbeing = f32::NAN;

        let params = MaintenanceParams::default();
        let err = maintenance_phase(&mut agents, &params, 7).unwrap_err();
        match err {
            SimError::InvariantViolation { round, field, .. } => {
                assert_eq!(round, 7);
                assert_eq!(field, "wellbeing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_untouched_field_raises() {
        let mut agents = vec![Agent::new(0, Strategy::Reciprocal)];
        // Confidence is not clamped by maintenance (nothing updates it);
        // an out-of-range value means an upstream defect.
        agents[0].confidence = 1.5;

        let params = MaintenanceParams::default();
        assert!(maintenance_phase(&mut agents, &params, 0).is_err());
    }
}
