pub mod logistic;

pub use logistic::{squash, squash_rows, Logistic};
