use crate::error::{FannError, Result};
use crate::math::matrix::Matrix;

/// Joint log likelihood of independent outcomes with probabilities `p`.
///
/// A zero entry gives `-inf`; that is a model confidently wrong, and it is
/// reported as such rather than clamped.
pub fn log_likelihood(p: &[f64]) -> f64 {
    p.iter().map(|x| x.ln()).sum()
}

/// Negative log likelihood of the probability mass each observation put on
/// its true label.
pub fn nll(p_y: &[f64]) -> f64 {
    -log_likelihood(p_y)
}

/// Picks, for every observation, the probability assigned to its true label.
pub fn true_label_probabilities(p_hat: &Matrix, y: &[usize]) -> Result<Vec<f64>> {
    check_labels(p_hat, y)?;
    Ok(y
        .iter()
        .enumerate()
        .map(|(n, &label)| p_hat.get(n, label))
        .collect())
}

/// Negative log likelihood loss of labels `y` under the predicted
/// distributions `p_hat` (observations x categories).
///
/// Lower is better; `0` only when every true label got probability 1.
pub fn loss(p_hat: &Matrix, y: &[usize]) -> Result<f64> {
    true_label_probabilities(p_hat, y).map(|p_y| nll(&p_y))
}

/// Gradients of the loss with respect to the output layer.
pub struct NllLoss;

impl NllLoss {
    /// Derivative of the loss with respect to the pre-squash output scores.
    ///
    /// For a squash followed by negative log likelihood this collapses to
    /// `p_hat - onehot(y)`, one row per observation.
    pub fn derivative(p_hat: &Matrix, y: &[usize]) -> Result<Matrix> {
        check_labels(p_hat, y)?;
        let mut delta = p_hat.clone();
        for (n, &label) in y.iter().enumerate() {
            delta.data[n][label] -= 1.0;
        }
        Ok(delta)
    }
}

fn check_labels(p_hat: &Matrix, y: &[usize]) -> Result<()> {
    if y.len() != p_hat.rows {
        return Err(FannError::ShapeMismatch {
            what: "labels",
            got: y.len(),
            expected: p_hat.rows,
        });
    }
    if let Some(&label) = y.iter().find(|&&label| label >= p_hat.cols) {
        return Err(FannError::IndexOutOfRange {
            what: "category",
            index: label,
            len: p_hat.cols,
        });
    }
    Ok(())
}
