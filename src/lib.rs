pub mod activation;
pub mod error;
pub mod import;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod predict;
pub mod train;

// Convenience re-exports
pub use activation::logistic::Logistic;
pub use error::{FannError, Result};
pub use import::reference::ReferenceModel;
pub use layers::layer::{Layer, BIAS_INDEX};
pub use loss::nll::loss;
pub use math::matrix::Matrix;
pub use network::{forward, ActivationCache, Network, NetworkConfig, WeightInit};
pub use optim::gradient_descent::GradientDescent;
pub use predict::predictor::{accuracy, predict};
pub use train::{
    train_loop, StepStats, StopCondition, StopRule, TrainConfig, TrainReport, Trainer,
};
