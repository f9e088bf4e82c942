use crate::activation::logistic::{squash_rows, Logistic};
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Pre- and post-activation values of one layer for a whole batch
/// (observations x neurons).
#[derive(Debug, Clone, PartialEq)]
pub struct LayerActivations {
    pub pre: Matrix,
    pub post: Matrix,
}

/// Everything a forward pass computed on the way to the output, one entry
/// per layer. Lives only as long as the backward pass that consumes it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivationCache {
    pub layers: Vec<LayerActivations>,
}

impl ActivationCache {
    /// The output layer's logistic activations before squashing.
    pub fn scores(&self) -> Option<&Matrix> {
        self.layers.last().map(|l| &l.post)
    }
}

/// Runs `batch` through every layer of `network`.
///
/// Returns the squashed output (observations x categories, each row a
/// probability distribution) together with the per-layer activations.
pub fn forward(network: &Network, batch: &Matrix) -> Result<(Matrix, ActivationCache)> {
    network.check_batch(batch)?;

    let activation = Logistic;
    let mut cache = ActivationCache {
        layers: Vec::with_capacity(network.depth()),
    };

    for layer in network.layers() {
        let input = cache.layers.last().map_or(batch, |prev| &prev.post);
        let pre = layer.pre_activation(input);
        let post = activation.apply(&pre);
        cache.layers.push(LayerActivations { pre, post });
    }

    let output = match cache.scores() {
        Some(scores) => squash_rows(scores),
        None => Matrix::zeros(batch.rows, 0),
    };

    Ok((output, cache))
}

impl Network {
    /// Output probabilities for `batch`, discarding the activation cache.
    pub fn forward(&self, batch: &Matrix) -> Result<Matrix> {
        forward(self, batch).map(|(output, _)| output)
    }
}
