pub mod layer;

pub use layer::{Layer, BIAS_INDEX};
