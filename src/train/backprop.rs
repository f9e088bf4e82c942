use crate::activation::logistic::Logistic;
use crate::error::{FannError, Result};
use crate::loss::nll::NllLoss;
use crate::math::matrix::Matrix;
use crate::network::forward::ActivationCache;
use crate::network::network::Network;

/// Loss gradient for one layer, shaped like the layer itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    /// neurons x incoming, same as `Layer::weights`.
    pub weights: Matrix,
    pub biases: Vec<f64>,
}

/// Loss gradient for every layer of a network, index-aligned with its layers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gradients {
    pub layers: Vec<LayerGradients>,
}

impl Gradients {
    pub fn is_finite(&self) -> bool {
        self.layers
            .iter()
            .all(|g| g.weights.is_finite() && g.biases.iter().all(|b| b.is_finite()))
    }
}

/// Reverse pass: gradient of the summed negative log likelihood with respect
/// to every bias and weight in `network`.
///
/// `cache` and `p_hat` must come from a forward pass of the same `network`
/// over the same `batch`.
///
/// The error signal of a layer is `dL/dz` (one row per observation). It
/// starts at the output as `(p_hat - onehot(y)) * f'(z)` and moves one layer
/// back through that layer's weights, times the previous layer's `f'(z)`.
/// A weight's gradient is the error signal times the value it multiplies,
/// summed over observations; the bias multiplies 1.
pub fn backward(
    network: &Network,
    batch: &Matrix,
    cache: &ActivationCache,
    p_hat: &Matrix,
    y: &[usize],
) -> Result<Gradients> {
    if cache.layers.len() != network.depth() {
        return Err(FannError::ShapeMismatch {
            what: "activation cache layers",
            got: cache.layers.len(),
            expected: network.depth(),
        });
    }

    network.check_batch(batch)?;
    for (layer, acts) in network.layers().iter().zip(&cache.layers) {
        for m in [&acts.pre, &acts.post] {
            if m.rows != batch.rows || m.cols != layer.width() {
                return Err(FannError::ShapeMismatch {
                    what: "activation cache entries",
                    got: m.rows * m.cols,
                    expected: batch.rows * layer.width(),
                });
            }
        }
    }
    if p_hat.rows != batch.rows || p_hat.cols != network.output_width() {
        return Err(FannError::ShapeMismatch {
            what: "output probabilities",
            got: p_hat.rows * p_hat.cols,
            expected: batch.rows * network.output_width(),
        });
    }

    let activation = Logistic;
    let derivative = |post: &Matrix| post.map(|a| activation.derivative_from_output(a));

    let output = &cache.layers[network.depth() - 1].post;
    let mut delta = NllLoss::derivative(p_hat, y)?.hadamard(&derivative(output));

    let mut layers = Vec::with_capacity(network.depth());
    for (i, layer) in network.layers().iter().enumerate().rev() {
        let input = if i == 0 {
            batch
        } else {
            &cache.layers[i - 1].post
        };

        layers.push(LayerGradients {
            weights: &delta.transpose() * input,
            biases: delta.column_sums(),
        });

        if i > 0 {
            delta = (&delta * layer.weights()).hadamard(&derivative(input));
        }
    }
    layers.reverse();

    Ok(Gradients { layers })
}
