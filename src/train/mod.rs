pub mod backprop;
pub mod loop_fn;
pub mod step_stats;
pub mod stop;
pub mod train_config;
pub mod trainer;

pub use backprop::{backward, Gradients, LayerGradients};
pub use loop_fn::{train_loop, TrainReport};
pub use step_stats::StepStats;
pub use stop::{StopCondition, StopRule};
pub use train_config::TrainConfig;
pub use trainer::Trainer;
