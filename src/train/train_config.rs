use std::sync::mpsc;

use crate::train::step_stats::StepStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `learning_rate` — step size of every gradient-descent update
/// - `progress_tx`   — optional channel sender; one `StepStats` is sent per
///                     completed step. If the receiver is dropped the loop
///                     stops after that step.
pub struct TrainConfig {
    pub learning_rate: f64,
    pub progress_tx: Option<mpsc::Sender<StepStats>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with no progress channel.
    pub fn new(learning_rate: f64) -> Self {
        TrainConfig {
            learning_rate,
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<StepStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }
}
