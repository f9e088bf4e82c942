pub mod nll;

pub use nll::{log_likelihood, loss, nll, true_label_probabilities, NllLoss};
