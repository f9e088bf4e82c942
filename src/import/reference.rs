use log::info;
use serde::{Deserialize, Serialize};

use crate::activation::logistic::{squash, Logistic};
use crate::error::{FannError, Result};
use crate::layers::layer::Layer;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::predict::predictor::argmax;

/// Weights of an externally trained multi-layer perceptron with logistic
/// activations, laid out the way scikit-learn's `MLPClassifier` exposes
/// them: `coefs[l]` is `inputs x neurons`, `intercepts[l]` holds one bias
/// per neuron.
///
/// Only used to cross-check this engine; nothing here trains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceModel {
    pub coefs: Vec<Vec<Vec<f64>>>,
    pub intercepts: Vec<Vec<f64>>,
}

impl ReferenceModel {
    /// Reads a `{ "coefs": [...], "intercepts": [...] }` JSON dump.
    pub fn load_json(path: &str) -> Result<ReferenceModel> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn depth(&self) -> usize {
        self.coefs.len()
    }

    pub fn input_width(&self) -> usize {
        self.coefs.first().map_or(0, Vec::len)
    }

    /// Reference layer `l` in this engine's layout (rows = neurons).
    pub fn layer(&self, l: usize) -> Result<Layer> {
        let coefs = self.coefs.get(l).ok_or(FannError::IndexOutOfRange {
            what: "reference layer",
            index: l,
            len: self.coefs.len(),
        })?;
        let intercepts = self.intercepts.get(l).ok_or(FannError::ShapeMismatch {
            what: "reference intercept layers",
            got: self.intercepts.len(),
            expected: self.coefs.len(),
        })?;

        let weights = Matrix::from_rows(coefs.clone())?.transpose();
        Layer::new(weights, intercepts.clone())
    }

    /// Copies every layer as is. Suits references whose output layer already
    /// has one neuron per category.
    pub fn import_multinomial(&self) -> Result<Network> {
        let layers = self.layers()?;
        let network = Network::from_layers(self.input_width(), layers)?;
        info!("imported reference model {:?}", network.layer_widths());
        Ok(network)
    }

    /// Copies the hidden layers and turns the reference's single-neuron
    /// output into a two-category output via `complement_pairs`.
    ///
    /// Before squashing, output neuron 1 then reproduces the reference's
    /// probability of category 1 and neuron 0 its complement.
    pub fn import_binary(&self) -> Result<Network> {
        let mut layers = self.layers()?;
        let output = match layers.pop() {
            Some(output) => output,
            None => return Err(FannError::InvalidConfig("reference model has no layers")),
        };
        if output.width() != 1 {
            return Err(FannError::ShapeMismatch {
                what: "binary reference output neurons",
                got: output.width(),
                expected: 1,
            });
        }

        layers.push(complement_pairs(&output)?);
        let network = Network::from_layers(self.input_width(), layers)?;
        info!("imported binary reference model {:?}", network.layer_widths());
        Ok(network)
    }

    /// The reference's own class probabilities: logistic hidden layers, then
    /// a logistic output for a single output neuron (as `[1 - p, p]`) or a
    /// squash of the output pre-activations otherwise.
    pub fn predict_proba(&self, batch: &Matrix) -> Result<Matrix> {
        let layers = self.layers()?;
        if batch.cols != self.input_width() {
            return Err(FannError::ShapeMismatch {
                what: "batch features",
                got: batch.cols,
                expected: self.input_width(),
            });
        }

        let activation = Logistic;
        let (output, hidden) = match layers.split_last() {
            Some(split) => split,
            None => return Err(FannError::InvalidConfig("reference model has no layers")),
        };
        let mut a = batch.clone();
        for layer in hidden {
            a = activation.apply(&layer.pre_activation(&a));
        }
        let z = output.pre_activation(&a);

        let rows = if output.width() == 1 {
            z.data
                .iter()
                .map(|row| {
                    let p = activation.function(row[0]);
                    vec![1.0 - p, p]
                })
                .collect()
        } else {
            z.data.iter().map(|row| squash(row)).collect()
        };
        Matrix::from_rows(rows)
    }

    pub fn predict(&self, batch: &Matrix) -> Result<Vec<usize>> {
        let p = self.predict_proba(batch)?;
        Ok(p.data.iter().map(|row| argmax(row)).collect())
    }

    fn layers(&self) -> Result<Vec<Layer>> {
        if self.coefs.len() != self.intercepts.len() {
            return Err(FannError::ShapeMismatch {
                what: "reference intercept layers",
                got: self.intercepts.len(),
                expected: self.coefs.len(),
            });
        }
        let layers = (0..self.depth())
            .map(|l| self.layer(l))
            .collect::<Result<Vec<_>>>()?;

        for pair in layers.windows(2) {
            if pair[1].input_width() != pair[0].width() {
                return Err(FannError::ShapeMismatch {
                    what: "reference layer input width",
                    got: pair[1].input_width(),
                    expected: pair[0].width(),
                });
            }
        }
        Ok(layers)
    }
}

/// Expands every neuron of `layer` into a (negated, original) pair, so
/// neuron `2r` gets `-(b + w'a)` and neuron `2r + 1` gets `b + w'a`.
///
/// Since `f(-x) = 1 - f(x)` for the logistic, each pair's activations are
/// complementary probabilities. A one-neuron layer becomes the usual
/// two-category output.
pub fn complement_pairs(layer: &Layer) -> Result<Layer> {
    let negated = layer.negated();
    let rows = (0..layer.width())
        .flat_map(|r| [negated.table_row(r), layer.table_row(r)])
        .collect::<Result<Vec<_>>>()?;
    Layer::from_table(rows)
}
