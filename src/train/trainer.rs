use std::time::Instant;

use log::{debug, warn};

use crate::error::{FannError, Result};
use crate::loss::nll::{nll, true_label_probabilities};
use crate::math::matrix::Matrix;
use crate::network::forward::forward;
use crate::network::network::Network;
use crate::optim::gradient_descent::GradientDescent;
use crate::train::backprop::backward;
use crate::train::step_stats::StepStats;

/// Full-batch gradient-descent training, one `step()` at a time.
///
/// Holds the only mutable borrow of the network for as long as it lives.
/// It never decides when to stop; callers either drive it with `train_loop`
/// or simply stop calling `step()`.
pub struct Trainer<'a> {
    network: &'a mut Network,
    batch: &'a Matrix,
    labels: &'a [usize],
    optimizer: GradientDescent,
    steps: usize,
    loss: Option<f64>,
}

impl<'a> Trainer<'a> {
    /// Checks the batch and labels against `network` before any training.
    pub fn new(
        network: &'a mut Network,
        batch: &'a Matrix,
        labels: &'a [usize],
        optimizer: GradientDescent,
    ) -> Result<Trainer<'a>> {
        network.check_batch(batch)?;
        if labels.len() != batch.rows {
            return Err(FannError::ShapeMismatch {
                what: "labels",
                got: labels.len(),
                expected: batch.rows,
            });
        }
        let categories = network.output_width();
        if let Some(&label) = labels.iter().find(|&&label| label >= categories) {
            return Err(FannError::IndexOutOfRange {
                what: "category",
                index: label,
                len: categories,
            });
        }

        Ok(Trainer {
            network,
            batch,
            labels,
            optimizer,
            steps: 0,
            loss: None,
        })
    }

    /// Completed steps so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Loss seen by the most recent step, `None` before the first one.
    pub fn loss(&self) -> Option<f64> {
        self.loss
    }

    pub fn network(&self) -> &Network {
        &*self.network
    }

    /// Loss of the current weights, without updating them.
    pub fn evaluate(&self) -> Result<f64> {
        let p_hat = self.network.forward(self.batch)?;
        let p_y = true_label_probabilities(&p_hat, self.labels)?;
        Ok(nll(&p_y))
    }

    /// Forward pass, loss, backward pass, weight update.
    ///
    /// A NaN loss or an update that would leave non-finite weights is a
    /// `Divergence`; a zero probability on a true label is a
    /// `DegenerateProbability`. Either way the network keeps the weights it
    /// had before the step.
    pub fn step(&mut self) -> Result<StepStats> {
        let t_start = Instant::now();
        let step = self.steps + 1;

        let (p_hat, cache) = forward(&*self.network, self.batch)?;
        let p_y = true_label_probabilities(&p_hat, self.labels)?;
        let loss = nll(&p_y);

        if loss.is_nan() {
            warn!("loss is NaN at step {step}");
            return Err(FannError::Divergence { step, loss });
        }
        if loss.is_infinite() {
            let err = match p_y.iter().position(|&p| p == 0.0) {
                Some(observation) => FannError::DegenerateProbability { step, observation },
                None => FannError::Divergence { step, loss },
            };
            warn!("rejecting step {step}: {err}");
            return Err(err);
        }

        let gradients = backward(&*self.network, self.batch, &cache, &p_hat, self.labels)?;
        let mut updated = self.network.clone();
        self.optimizer.apply(&mut updated, &gradients)?;
        if !updated.is_finite() {
            warn!("update at step {step} produced non-finite weights");
            return Err(FannError::Divergence { step, loss });
        }
        *self.network = updated;

        let improvement = self.loss.map(|previous| previous - loss);
        self.steps = step;
        self.loss = Some(loss);
        debug!("step {step}: loss = {loss:.6}");

        Ok(StepStats {
            step,
            loss,
            improvement,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        })
    }
}
