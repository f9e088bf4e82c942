use crate::math::matrix::Matrix;

/// The logistic (sigmoid) nonlinearity, applied at every layer boundary.
///
/// Its output lies in `(0, 1)`, so a neuron's activation reads as that
/// neuron's confidence. The derivative can be written in terms of the output
/// alone, which is what the backward pass relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Logistic;

impl Logistic {
    /// `f(x) = 1 / (1 + e^-x)`
    pub fn function(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// `f'(x)` expressed through the post-activation value `a = f(x)`.
    pub fn derivative_from_output(&self, a: f64) -> f64 {
        a * (1.0 - a)
    }

    /// `f'(x)` from the pre-activation value.
    pub fn derivative(&self, x: f64) -> f64 {
        self.derivative_from_output(self.function(x))
    }

    pub fn apply(&self, z: &Matrix) -> Matrix {
        z.map(|x| self.function(x))
    }
}

/// Exponentiates then normalizes one row of scores into a probability mass
/// function.
///
/// The row maximum is subtracted first; this leaves the result unchanged and
/// keeps `exp` from overflowing.
pub fn squash(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Applies `squash` to every row.
pub fn squash_rows(scores: &Matrix) -> Matrix {
    Matrix {
        rows: scores.rows,
        cols: scores.cols,
        data: scores.data.iter().map(|row| squash(row)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn logistic_is_symmetric_about_one_half() {
        let f = Logistic;
        for &x in &[-30.0, -4.2, -1.0, -0.1, 0.0, 0.3, 2.5, 17.0] {
            assert_abs_diff_eq!(f.function(x) + f.function(-x), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn logistic_at_zero_is_one_half() {
        assert_eq!(Logistic.function(0.0), 0.5);
        assert_eq!(Logistic.derivative(0.0), 0.25);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let f = Logistic;
        let h = 1e-6;
        for &x in &[-2.0, -0.5, 0.0, 0.7, 3.0] {
            let numeric = (f.function(x + h) - f.function(x - h)) / (2.0 * h);
            assert_relative_eq!(f.derivative(x), numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn squash_yields_a_distribution() {
        let p = squash(&[-0.5, 0.5]);
        assert_abs_diff_eq!(p[0], 0.268_941_421, epsilon = 1e-6);
        assert_abs_diff_eq!(p[1], 0.731_058_579, epsilon = 1e-6);
        assert_abs_diff_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn squash_survives_large_scores() {
        let p = squash(&[1000.0, 1000.0, 999.0]);
        assert!(p.iter().all(|x| x.is_finite() && *x >= 0.0));
        assert_abs_diff_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[0], p[1]);
    }
}
