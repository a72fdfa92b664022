//! Experiment Harness
//!
//! Repeats a full simulation across independent seeds and aggregates
//! initial-vs-final summaries into cross-run mean/std statistics.
//! Repetitions share no mutable state, so they run in parallel; a failing
//! repetition is isolated and excluded from the aggregate.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use sim_core::config::Params;
use sim_core::error::SimError;
use sim_core::output::RunSummary;
use sim_core::Simulation;

/// One experiment: a parameter point repeated across seeds.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub name: String,
    pub params: Params,
    pub rounds: u64,
    pub repetitions: usize,
    pub base_seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: "baseline".to_string(),
            params: Params::default(),
            rounds: 100,
            repetitions: 10,
            base_seed: 42,
        }
    }
}

/// Mean and standard deviation across repetitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stat {
    pub mean: f64,
    pub std: f64,
}

impl Stat {
    /// Population statistics; zero for an empty slice.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self { mean: 0.0, std: 0.0 };
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        Self { mean, std: var.sqrt() }
    }
}

/// Cross-run aggregate of one experiment.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub name: String,
    pub repetitions: usize,
    pub completed: usize,
    pub failed: usize,
    pub rounds: u64,
    pub initial_wellbeing: Stat,
    pub final_wellbeing: Stat,
    pub wellbeing_change: Stat,
    pub initial_kindness: Stat,
    pub final_kindness: Stat,
    pub kindness_change: Stat,
    pub initial_polarization: Stat,
    pub final_polarization: Stat,
    pub polarization_change: Stat,
    pub final_polarization_index: Stat,
    pub final_reputation: Stat,
}

/// Derive a per-repetition seed from the base seed. SplitMix-style odd
/// multiplier keeps the streams well separated.
pub fn repetition_seed(base_seed: u64, repetition: usize) -> u64 {
    base_seed ^ (repetition as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Runs one experiment configuration end to end.
pub struct ExperimentRunner {
    config: ExperimentConfig,
}

impl ExperimentRunner {
    /// Validates the parameter point up front so the whole experiment
    /// fails fast rather than per repetition.
    pub fn new(config: ExperimentConfig) -> Result<Self, SimError> {
        config.params.validate()?;
        Ok(Self { config })
    }

    /// Run all repetitions (in parallel) and aggregate summaries.
    pub fn run(&self) -> ExperimentReport {
        let config = &self.config;
        info!(
            name = %config.name,
            repetitions = config.repetitions,
            rounds = config.rounds,
            "starting experiment"
        );

        let results: Vec<Result<RunSummary, SimError>> = (0..config.repetitions)
            .into_par_iter()
            .map(|rep| self.run_repetition(rep))
            .collect();

        let mut summaries = Vec::with_capacity(results.len());
        let mut failed = 0;
        for (rep, result) in results.into_iter().enumerate() {
            match result {
                Ok(summary) => summaries.push(summary),
                Err(err) => {
                    failed += 1;
                    warn!(repetition = rep, error = %err, "repetition failed; excluded");
                }
            }
        }

        self.aggregate(&summaries, failed)
    }

    fn run_repetition(&self, repetition: usize) -> Result<RunSummary, SimError> {
        let seed = repetition_seed(self.config.base_seed, repetition);
        let mut sim = Simulation::new(self.config.params.clone(), seed)?;
        sim.run(self.config.rounds)?;
        // Zero-round experiments legitimately have no summary
        Ok(sim.summary().unwrap_or_default())
    }

    fn aggregate(&self, summaries: &[RunSummary], failed: usize) -> ExperimentReport {
        let stat = |f: fn(&RunSummary) -> f64| {
            Stat::from_values(&summaries.iter().map(f).collect::<Vec<f64>>())
        };

        ExperimentReport {
            name: self.config.name.clone(),
            repetitions: self.config.repetitions,
            completed: summaries.len(),
            failed,
            rounds: self.config.rounds,
            initial_wellbeing: stat(|s| s.initial_wellbeing),
            final_wellbeing: stat(|s| s.final_wellbeing),
            wellbeing_change: stat(|s| s.wellbeing_change),
            initial_kindness: stat(|s| s.initial_kindness),
            final_kindness: stat(|s| s.final_kindness),
            kindness_change: stat(|s| s.kindness_change),
            initial_polarization: stat(|s| s.initial_polarization),
            final_polarization: stat(|s| s.final_polarization),
            polarization_change: stat(|s| s.polarization_change),
            final_polarization_index: stat(|s| s.final_polarization_index),
            final_reputation: stat(|s| s.final_reputation),
        }
    }
}
