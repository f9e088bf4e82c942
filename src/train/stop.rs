use crate::error::{FannError, Result};
use crate::train::step_stats::StepStats;

/// Decides when `train_loop` is done. Consulted after every completed step.
pub trait StopCondition {
    fn should_stop(&mut self, stats: &StepStats) -> bool;

    /// Rejects conditions that could never fire.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Any `FnMut(&StepStats) -> bool` closure is a stopping rule.
impl<F> StopCondition for F
where
    F: FnMut(&StepStats) -> bool,
{
    fn should_stop(&mut self, stats: &StepStats) -> bool {
        self(stats)
    }
}

/// Iteration budget and/or loss plateau; stops as soon as either trips.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StopRule {
    pub max_steps: Option<usize>,
    /// Stop once a step improves the loss by less than this.
    pub min_improvement: Option<f64>,
}

impl StopRule {
    pub fn after(max_steps: usize) -> Self {
        StopRule {
            max_steps: Some(max_steps),
            min_improvement: None,
        }
    }

    pub fn with_min_improvement(mut self, min_improvement: f64) -> Self {
        self.min_improvement = Some(min_improvement);
        self
    }
}

impl StopCondition for StopRule {
    fn should_stop(&mut self, stats: &StepStats) -> bool {
        let budget_spent = self.max_steps.map_or(false, |max| stats.step >= max);
        let plateaued = match (self.min_improvement, stats.improvement) {
            (Some(min), Some(improvement)) => improvement < min,
            _ => false,
        };
        budget_spent || plateaued
    }

    fn validate(&self) -> Result<()> {
        if self.max_steps.is_none() && self.min_improvement.is_none() {
            return Err(FannError::InvalidConfig(
                "stop rule needs a step budget or an improvement threshold",
            ));
        }
        if self.max_steps == Some(0) {
            return Err(FannError::InvalidConfig(
                "step budget must allow at least one step",
            ));
        }
        Ok(())
    }
}
