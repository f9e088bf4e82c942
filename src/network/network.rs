use rand::{rngs::StdRng, SeedableRng};

use crate::error::{FannError, Result};
use crate::layers::layer::Layer;
use crate::math::matrix::Matrix;
use crate::network::config::NetworkConfig;

/// The weight store: an ordered list of layers, first hidden layer at index 0
/// and output layer last.
///
/// Layer `i` always weighs exactly as many inputs as layer `i - 1` has
/// neurons (or `input_width` for layer 0); every constructor and mutator
/// enforces this.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    input_width: usize,
    layers: Vec<Layer>,
}

impl Network {
    /// Creates a network shaped by `config`, drawing weights with its
    /// `WeightInit`.
    pub fn initialize(config: &NetworkConfig) -> Result<Network> {
        let init = config.init;
        match config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                Network::build(config, |fan_in| init.sample(&mut rng, fan_in))
            }
            None => {
                let mut rng = rand::thread_rng();
                Network::build(config, |fan_in| init.sample(&mut rng, fan_in))
            }
        }
    }

    /// Creates a network shaped by `config`, asking `f(layer, neuron, column)`
    /// for every weight. Column 0 is the bias, column `i + 1` the weight on
    /// incoming neuron `i`. `config.init` and `config.seed` are ignored.
    pub fn initialize_with<F>(config: &NetworkConfig, mut f: F) -> Result<Network>
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        config.validate()?;
        let layers = Network::chained_widths(config)
            .enumerate()
            .map(|(l, (width, input_width))| {
                Layer::from_fn(width, input_width, |n, c| f(l, n, c))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Network {
            input_width: config.input_width,
            layers,
        })
    }

    /// Assembles a network from ready-made layers, checking that their widths
    /// chain up starting from `input_width`.
    pub fn from_layers(input_width: usize, layers: Vec<Layer>) -> Result<Network> {
        if input_width == 0 {
            return Err(FannError::InvalidConfig("input width must be positive"));
        }
        if layers.is_empty() {
            return Err(FannError::InvalidConfig("a network needs at least one layer"));
        }

        let mut expected = input_width;
        for layer in &layers {
            if layer.input_width() != expected {
                return Err(FannError::ShapeMismatch {
                    what: "layer input width",
                    got: layer.input_width(),
                    expected,
                });
            }
            expected = layer.width();
        }

        Ok(Network {
            input_width,
            layers,
        })
    }

    /// Number of layers (hidden plus output).
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Neuron count of the output layer, i.e. the number of categories.
    pub fn output_width(&self) -> usize {
        self.layers.last().map_or(0, Layer::width)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn get_layer(&self, i: usize) -> Result<&Layer> {
        self.layers.get(i).ok_or(FannError::IndexOutOfRange {
            what: "layer",
            index: i,
            len: self.layers.len(),
        })
    }

    /// Replaces layer `i`. The replacement must keep both the input width
    /// and the neuron count, so neighbouring layers stay consistent.
    pub fn set_layer(&mut self, i: usize, layer: Layer) -> Result<()> {
        let current = self.get_layer(i)?;
        if layer.input_width() != current.input_width() {
            return Err(FannError::ShapeMismatch {
                what: "layer input width",
                got: layer.input_width(),
                expected: current.input_width(),
            });
        }
        if layer.width() != current.width() {
            return Err(FannError::ShapeMismatch {
                what: "layer width",
                got: layer.width(),
                expected: current.width(),
            });
        }

        self.layers[i] = layer;
        Ok(())
    }

    /// Neuron widths of every layer, in order.
    pub fn layer_widths(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::width).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.layers.iter().all(Layer::is_finite)
    }

    /// Fails fast unless `batch` has one column per input feature.
    pub(crate) fn check_batch(&self, batch: &Matrix) -> Result<()> {
        if batch.rows == 0 {
            return Err(FannError::InvalidConfig("batch has no observations"));
        }
        if batch.cols != self.input_width {
            return Err(FannError::ShapeMismatch {
                what: "batch features",
                got: batch.cols,
                expected: self.input_width,
            });
        }
        if !batch.is_finite() {
            return Err(FannError::InvalidConfig("batch has non-finite features"));
        }
        Ok(())
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    fn build<F>(config: &NetworkConfig, mut draw: F) -> Result<Network>
    where
        F: FnMut(usize) -> f64,
    {
        let fan_ins: Vec<usize> = Network::chained_widths(config).map(|(_, i)| i).collect();
        Network::initialize_with(config, |l, _, _| draw(fan_ins[l]))
    }

    /// `(width, input_width)` for each configured layer.
    fn chained_widths(config: &NetworkConfig) -> impl Iterator<Item = (usize, usize)> + '_ {
        let inputs = std::iter::once(config.input_width).chain(config.layer_widths.iter().copied());
        config.layer_widths.iter().copied().zip(inputs)
    }
}
