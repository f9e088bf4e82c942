use crate::error::{FannError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Most likely category for every observation in `batch`.
pub fn predict(network: &Network, batch: &Matrix) -> Result<Vec<usize>> {
    let p_hat = network.forward(batch)?;
    Ok(p_hat.data.iter().map(|row| argmax(row)).collect())
}

/// Index of the largest entry; the lowest index wins a tie.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map_or(0, |(i, _)| i)
}

/// Fraction of predictions equal to their label.
pub fn accuracy(predicted: &[usize], y: &[usize]) -> Result<f64> {
    if predicted.len() != y.len() {
        return Err(FannError::ShapeMismatch {
            what: "labels",
            got: y.len(),
            expected: predicted.len(),
        });
    }
    if y.is_empty() {
        return Err(FannError::InvalidConfig("cannot score an empty label vector"));
    }

    let correct = predicted.iter().zip(y).filter(|(a, b)| a == b).count();
    Ok(correct as f64 / y.len() as f64)
}
