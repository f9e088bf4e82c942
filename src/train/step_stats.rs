use serde::{Deserialize, Serialize};

/// What one training step observed.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, `train_loop`
/// sends one `StepStats` per completed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    /// 1-based step number.
    pub step: usize,
    /// Loss of the weights this step started from.
    pub loss: f64,
    /// Previous step's loss minus this one; `None` on the first step.
    pub improvement: Option<f64>,
    /// Wall-clock duration of the step in milliseconds.
    pub elapsed_ms: u64,
}
