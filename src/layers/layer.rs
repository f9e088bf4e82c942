use crate::error::{FannError, Result};
use crate::math::matrix::Matrix;

/// Column of the bias weight in a layer's table view (`Layer::table_row`).
///
/// Incoming-neuron `i` lives at column `i + 1`.
pub const BIAS_INDEX: usize = 0;

/// One layer of neurons: a `neurons x inputs` weight matrix plus one bias
/// per neuron.
///
/// Every neuron carries a full set of incoming weights, so the shape is fixed
/// at construction and cannot go ragged.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    weights: Matrix,
    biases: Vec<f64>,
}

impl Layer {
    /// Builds a layer from its weight matrix (rows = neurons) and bias vector.
    pub fn new(weights: Matrix, biases: Vec<f64>) -> Result<Layer> {
        if weights.rows == 0 {
            return Err(FannError::InvalidConfig("a layer needs at least one neuron"));
        }
        if weights.cols == 0 {
            return Err(FannError::InvalidConfig("a layer needs at least one input"));
        }
        if biases.len() != weights.rows {
            return Err(FannError::ShapeMismatch {
                what: "layer biases",
                got: biases.len(),
                expected: weights.rows,
            });
        }

        Ok(Layer { weights, biases })
    }

    /// Builds a layer from table rows laid out as `[bias, w_0, .., w_n]`.
    pub fn from_table(rows: Vec<Vec<f64>>) -> Result<Layer> {
        let table = Matrix::from_rows(rows)?;
        if table.cols < 2 {
            return Err(FannError::InvalidConfig(
                "a table row needs a bias and at least one weight",
            ));
        }

        let biases = table.data.iter().map(|row| row[BIAS_INDEX]).collect();
        let weights = Matrix::from_rows(
            table
                .data
                .into_iter()
                .map(|row| row[BIAS_INDEX + 1..].to_vec())
                .collect(),
        )?;

        Layer::new(weights, biases)
    }

    /// Builds a layer by asking `f(neuron, column)` for every entry of the
    /// table view; column `BIAS_INDEX` is the bias.
    pub fn from_fn<F>(width: usize, input_width: usize, mut f: F) -> Result<Layer>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let biases = (0..width).map(|n| f(n, BIAS_INDEX)).collect();
        let weights = Matrix::from_fn(width, input_width, |n, i| f(n, i + 1));
        Layer::new(weights, biases)
    }

    /// Number of neurons.
    pub fn width(&self) -> usize {
        self.weights.rows
    }

    /// Number of incoming values each neuron weighs.
    pub fn input_width(&self) -> usize {
        self.weights.cols
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn bias(&self, neuron: usize) -> Result<f64> {
        self.check_neuron(neuron)?;
        Ok(self.biases[neuron])
    }

    pub fn weight(&self, neuron: usize, input: usize) -> Result<f64> {
        self.check_neuron(neuron)?;
        if input >= self.input_width() {
            return Err(FannError::IndexOutOfRange {
                what: "incoming neuron",
                index: input,
                len: self.input_width(),
            });
        }
        Ok(self.weights.get(neuron, input))
    }

    /// The neuron's row in table form: `[bias, w_0, .., w_n]`.
    pub fn table_row(&self, neuron: usize) -> Result<Vec<f64>> {
        self.check_neuron(neuron)?;
        let mut row = Vec::with_capacity(self.input_width() + 1);
        row.push(self.biases[neuron]);
        row.extend_from_slice(self.weights.row(neuron));
        Ok(row)
    }

    /// Pre-activations for a whole batch: `z = x * W^T + b`.
    ///
    /// `input` must have `input_width()` columns; callers validate this.
    pub fn pre_activation(&self, input: &Matrix) -> Matrix {
        let mut z = input * &self.weights.transpose();
        for row in &mut z.data {
            for (v, b) in row.iter_mut().zip(&self.biases) {
                *v += b;
            }
        }
        z
    }

    /// Copy of this layer with every bias and weight negated.
    pub fn negated(&self) -> Layer {
        Layer {
            weights: self.weights.map(|w| -w),
            biases: self.biases.iter().map(|b| -b).collect(),
        }
    }

    /// Applies pre-computed gradients scaled by `lr`. Nothing changes unless
    /// both gradients are shaped like this layer.
    pub fn apply_gradients(
        &mut self,
        weights_grad: &Matrix,
        biases_grad: &[f64],
        lr: f64,
    ) -> Result<()> {
        self.check_gradients(weights_grad, biases_grad)?;
        self.weights.scaled_sub(lr, weights_grad);
        for (b, g) in self.biases.iter_mut().zip(biases_grad) {
            *b -= lr * g;
        }
        Ok(())
    }

    /// Fails unless `weights_grad` is `width x input_width` and
    /// `biases_grad` has one entry per neuron.
    pub fn check_gradients(&self, weights_grad: &Matrix, biases_grad: &[f64]) -> Result<()> {
        if weights_grad.rows != self.width() {
            return Err(FannError::ShapeMismatch {
                what: "weight gradient rows",
                got: weights_grad.rows,
                expected: self.width(),
            });
        }
        if weights_grad.cols != self.input_width() {
            return Err(FannError::ShapeMismatch {
                what: "weight gradient columns",
                got: weights_grad.cols,
                expected: self.input_width(),
            });
        }
        if biases_grad.len() != self.width() {
            return Err(FannError::ShapeMismatch {
                what: "bias gradient",
                got: biases_grad.len(),
                expected: self.width(),
            });
        }
        Ok(())
    }

    pub fn is_finite(&self) -> bool {
        self.weights.is_finite() && self.biases.iter().all(|b| b.is_finite())
    }

    fn check_neuron(&self, neuron: usize) -> Result<()> {
        if neuron >= self.width() {
            return Err(FannError::IndexOutOfRange {
                what: "neuron",
                index: neuron,
                len: self.width(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_split_into_bias_and_weights() {
        let layer = Layer::from_table(vec![vec![0.5, 1.0, -1.0], vec![-0.5, 2.0, 3.0]]).unwrap();
        assert_eq!(layer.width(), 2);
        assert_eq!(layer.input_width(), 2);
        assert_eq!(layer.biases(), &[0.5, -0.5]);
        assert_eq!(layer.weight(1, 1).unwrap(), 3.0);
        assert_eq!(layer.table_row(0).unwrap(), vec![0.5, 1.0, -1.0]);
    }

    #[test]
    fn mismatched_bias_count_is_rejected() {
        let err = Layer::new(Matrix::zeros(3, 2), vec![0.0; 2]).unwrap_err();
        assert!(matches!(
            err,
            FannError::ShapeMismatch {
                got: 2,
                expected: 3,
                ..
            }
        ));
    }

    #[test]
    fn bias_only_rows_are_rejected() {
        assert!(matches!(
            Layer::from_table(vec![vec![1.0]]),
            Err(FannError::InvalidConfig(_))
        ));
    }

    #[test]
    fn out_of_range_neuron() {
        let layer = Layer::from_fn(2, 3, |_, _| 0.0).unwrap();
        assert!(matches!(
            layer.bias(2),
            Err(FannError::IndexOutOfRange { index: 2, len: 2, .. })
        ));
        assert!(matches!(
            layer.weight(0, 3),
            Err(FannError::IndexOutOfRange { index: 3, len: 3, .. })
        ));
    }

    #[test]
    fn pre_activation_adds_bias_to_weighted_sum() {
        let layer = Layer::from_table(vec![vec![1.0, 2.0, -1.0]]).unwrap();
        let x = Matrix::from_rows(vec![vec![3.0, 4.0], vec![0.0, 0.0]]).unwrap();
        let z = layer.pre_activation(&x);
        assert_eq!(z.data, vec![vec![3.0], vec![1.0]]);
    }

    #[test]
    fn negation_flips_every_entry() {
        let layer = Layer::from_table(vec![vec![0.25, 1.0, -2.0]]).unwrap();
        assert_eq!(
            layer.negated().table_row(0).unwrap(),
            vec![-0.25, -1.0, 2.0]
        );
    }

    #[test]
    fn gradients_move_weights_downhill() {
        let mut layer = Layer::from_table(vec![vec![1.0, 1.0]]).unwrap();
        let grad = Matrix::from_rows(vec![vec![2.0]]).unwrap();
        layer.apply_gradients(&grad, &[4.0], 0.5).unwrap();
        assert_eq!(layer.table_row(0).unwrap(), vec![-1.0, 0.0]);
    }

    #[test]
    fn misshapen_gradients_leave_the_layer_alone() {
        let mut layer = Layer::from_fn(2, 2, |_, _| 1.0).unwrap();
        let before = layer.clone();

        let small = Matrix::zeros(1, 1);
        assert!(matches!(
            layer.apply_gradients(&small, &[0.0, 0.0], 0.1),
            Err(FannError::ShapeMismatch {
                what: "weight gradient rows",
                ..
            })
        ));
        let narrow = Matrix::zeros(2, 1);
        assert!(matches!(
            layer.apply_gradients(&narrow, &[0.0, 0.0], 0.1),
            Err(FannError::ShapeMismatch {
                what: "weight gradient columns",
                ..
            })
        ));
        let right = Matrix::zeros(2, 2);
        assert!(matches!(
            layer.apply_gradients(&right, &[1.0], 0.1),
            Err(FannError::ShapeMismatch {
                what: "bias gradient",
                got: 1,
                expected: 2,
            })
        ));
        assert_eq!(layer, before);
    }
}
