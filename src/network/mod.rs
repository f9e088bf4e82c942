pub mod config;
pub mod forward;
pub mod init;
pub mod network;

pub use config::NetworkConfig;
pub use forward::{forward, ActivationCache, LayerActivations};
pub use init::WeightInit;
pub use network::Network;
