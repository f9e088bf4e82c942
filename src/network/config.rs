use serde::{Deserialize, Serialize};

use crate::error::{FannError, Result};
use crate::network::init::WeightInit;

/// Shape and initialization of a network.
///
/// `layer_widths` lists every layer after the input, hidden layers first; the
/// last entry is the output layer and therefore the number of categories.
///
/// Stored as JSON so the same architecture can be reused across runs:
///
/// ```json
/// { "input_width": 2, "layer_widths": [4, 3, 2], "init": { "type": "xavier" }, "seed": 1337 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_width: usize,
    pub layer_widths: Vec<usize>,
    #[serde(default)]
    pub init: WeightInit,
    /// Fixes the random initializer; `None` draws from the thread RNG.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkConfig {
    pub fn new(input_width: usize, layer_widths: Vec<usize>) -> Self {
        NetworkConfig {
            input_width,
            layer_widths,
            init: WeightInit::default(),
            seed: None,
        }
    }

    pub fn with_init(mut self, init: WeightInit) -> Self {
        self.init = init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of output categories.
    pub fn output_width(&self) -> Option<usize> {
        self.layer_widths.last().copied()
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_width == 0 {
            return Err(FannError::InvalidConfig("input width must be positive"));
        }
        if self.layer_widths.is_empty() {
            return Err(FannError::InvalidConfig("a network needs at least one layer"));
        }
        if self.layer_widths.contains(&0) {
            return Err(FannError::InvalidConfig("layer widths must be positive"));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates a config written by `save_json`.
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: NetworkConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
