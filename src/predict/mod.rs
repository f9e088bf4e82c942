pub mod predictor;

pub use predictor::{accuracy, argmax, predict};
