use log::info;

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::gradient_descent::GradientDescent;
use crate::train::stop::StopCondition;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::Trainer;

/// Outcome of a completed `train_loop` run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub steps: usize,
    /// Loss of the weights the run started from.
    pub initial_loss: f64,
    /// Loss of the weights the run left behind.
    pub final_loss: f64,
}

/// Trains `network` on `batch`/`labels` until `stop` says so and returns a
/// summary of the run.
///
/// # Early termination
/// Besides `stop`, the loop ends when the `progress_tx` receiver has been
/// dropped.
///
/// # Errors
/// Shape errors before the first step; `Divergence` or
/// `DegenerateProbability` from whichever step hit them, with the network
/// left at the last good weights.
pub fn train_loop<S: StopCondition>(
    network: &mut Network,
    batch: &Matrix,
    labels: &[usize],
    config: &TrainConfig,
    stop: &mut S,
) -> Result<TrainReport> {
    stop.validate()?;
    let optimizer = GradientDescent::new(config.learning_rate)?;
    let mut trainer = Trainer::new(network, batch, labels, optimizer)?;

    info!(
        "training {:?} network on {} observations (learning rate {})",
        trainer.network().layer_widths(),
        batch.rows,
        config.learning_rate
    );

    let mut initial_loss = None;
    loop {
        let stats = trainer.step()?;
        initial_loss.get_or_insert(stats.loss);

        let done = stop.should_stop(&stats);

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }

        if done {
            break;
        }
    }

    let final_loss = trainer.evaluate()?;
    let steps = trainer.steps();
    info!("stopped after {steps} steps, loss = {final_loss:.6}");

    Ok(TrainReport {
        steps,
        initial_loss: initial_loss.unwrap_or(final_loss),
        final_loss,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FannError;
    use crate::network::config::NetworkConfig;
    use crate::train::step_stats::StepStats;
    use crate::train::stop::StopRule;
    use std::sync::mpsc;

    fn toy() -> (Network, Matrix, Vec<usize>) {
        let config = NetworkConfig::new(2, vec![3, 2]).with_seed(1337);
        let net = Network::initialize(&config).unwrap();
        let batch = Matrix::from_rows(vec![
            vec![1.0, 0.8],
            vec![0.9, 1.2],
            vec![-1.1, -0.7],
            vec![-0.8, -1.3],
        ])
        .unwrap();
        (net, batch, vec![1, 1, 0, 0])
    }

    #[test]
    fn step_budget_is_honoured() {
        let (mut net, batch, y) = toy();
        let report =
            train_loop(&mut net, &batch, &y, &TrainConfig::new(0.5), &mut StopRule::after(25))
                .unwrap();
        assert_eq!(report.steps, 25);
        assert!(report.final_loss < report.initial_loss);
    }

    #[test]
    fn closure_can_stop_on_loss() {
        let (mut net, batch, y) = toy();
        let mut calls = 0;
        let mut stop = |s: &StepStats| {
            calls += 1;
            s.step == 3
        };
        let report = train_loop(&mut net, &batch, &y, &TrainConfig::new(0.1), &mut stop).unwrap();
        assert_eq!(report.steps, 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn progress_is_streamed_per_step() {
        let (mut net, batch, y) = toy();
        let (tx, rx) = mpsc::channel();
        let config = TrainConfig::new(0.5).with_progress(tx);
        train_loop(&mut net, &batch, &y, &config, &mut StopRule::after(4)).unwrap();
        drop(config);

        let steps: Vec<usize> = rx.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
    }

    #[test]
    fn dropped_receiver_stops_the_loop() {
        let (mut net, batch, y) = toy();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let config = TrainConfig::new(0.5).with_progress(tx);
        let report = train_loop(&mut net, &batch, &y, &config, &mut StopRule::after(100)).unwrap();
        assert_eq!(report.steps, 1);
    }

    #[test]
    fn bad_configuration_fails_before_training() {
        let (mut net, batch, y) = toy();
        let before = net.clone();
        assert!(matches!(
            train_loop(&mut net, &batch, &y, &TrainConfig::new(0.5), &mut StopRule::default()),
            Err(FannError::InvalidConfig(_))
        ));
        assert!(matches!(
            train_loop(&mut net, &batch, &y, &TrainConfig::new(-1.0), &mut StopRule::after(1)),
            Err(FannError::InvalidConfig(_))
        ));
        assert_eq!(net, before);
    }

    #[test]
    fn zero_step_budget_leaves_the_network_untouched() {
        let (mut net, batch, y) = toy();
        let before = net.clone();
        assert!(matches!(
            train_loop(&mut net, &batch, &y, &TrainConfig::new(0.5), &mut StopRule::after(0)),
            Err(FannError::InvalidConfig(_))
        ));
        assert_eq!(net, before);
    }
}
