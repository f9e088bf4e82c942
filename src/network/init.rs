use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// How fresh weights are drawn when a `Network` is initialized.
///
/// Every variant fills biases and incoming weights alike. For anything not
/// covered here use `Network::initialize_with`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeightInit {
    /// All zeros. Degenerate (neurons stay symmetric) but handy in tests.
    Zeros,
    Constant { value: f64 },
    /// Uniform on `[-scale, scale]`.
    Uniform { scale: f64 },
    /// Xavier (Glorot): N(0, sqrt(1 / fan_in)). Suits logistic layers.
    #[default]
    Xavier,
}

impl WeightInit {
    /// Draws one weight for a layer whose neurons each see `fan_in` inputs.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, fan_in: usize) -> f64 {
        match *self {
            WeightInit::Zeros => 0.0,
            WeightInit::Constant { value } => value,
            WeightInit::Uniform { scale } => (rng.gen::<f64>() * 2.0 - 1.0) * scale,
            WeightInit::Xavier => {
                let std_dev = (1.0 / fan_in.max(1) as f64).sqrt();
                sample_standard_normal(rng) * std_dev
            }
        }
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Both uniforms on (0, 1] to avoid log(0).
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
