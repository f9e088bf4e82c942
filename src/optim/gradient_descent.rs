use crate::error::{FannError, Result};
use crate::layers::layer::Layer;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::train::backprop::Gradients;

/// Plain full-batch gradient descent: `w <- w - learning_rate * dL/dw`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    pub fn new(learning_rate: f64) -> Result<GradientDescent> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(FannError::InvalidConfig(
                "learning rate must be positive and finite",
            ));
        }
        Ok(GradientDescent { learning_rate })
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Applies one update to a single layer given its pre-computed gradients.
    pub fn step(
        &self,
        layer: &mut Layer,
        weights_grad: &Matrix,
        biases_grad: &[f64],
    ) -> Result<()> {
        layer.apply_gradients(weights_grad, biases_grad, self.learning_rate)
    }

    /// Applies one update to every layer of `network`.
    pub fn apply(&self, network: &mut Network, gradients: &Gradients) -> Result<()> {
        if gradients.layers.len() != network.depth() {
            return Err(FannError::ShapeMismatch {
                what: "gradient layers",
                got: gradients.layers.len(),
                expected: network.depth(),
            });
        }

        // all layers are checked before any is touched
        for (layer, grad) in network.layers().iter().zip(&gradients.layers) {
            layer.check_gradients(&grad.weights, &grad.biases)?;
        }
        for (layer, grad) in network.layers_mut().iter_mut().zip(&gradients.layers) {
            self.step(layer, &grad.weights, &grad.biases)?;
        }
        Ok(())
    }
}
