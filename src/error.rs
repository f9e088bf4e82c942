use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used across the engine.
pub type Result<T> = std::result::Result<T, FannError>;

/// Everything the engine can report back to its caller.
#[derive(Debug)]
pub enum FannError {
    /// A batch, layer or label vector disagrees with the network's structure.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A layer or category index outside the valid range.
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// The loss went NaN, or an update left non-finite weights behind.
    Divergence { step: usize, loss: f64 },
    /// A true label was assigned probability exactly 0, so the loss is infinite.
    DegenerateProbability { step: usize, observation: usize },
    /// Structurally invalid configuration (zero widths, bad learning rate, ...).
    InvalidConfig(&'static str),
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for FannError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FannError::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch for {what}: got {got}, expected {expected}"),
            FannError::IndexOutOfRange { what, index, len } => {
                write!(f, "{what} index {index} out of range for length {len}")
            }
            FannError::Divergence { step, loss } => {
                write!(f, "training diverged at step {step} (loss = {loss})")
            }
            FannError::DegenerateProbability { step, observation } => write!(
                f,
                "observation {observation} got zero probability on its true label at step {step}"
            ),
            FannError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            FannError::Io(e) => write!(f, "io error: {e}"),
            FannError::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for FannError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FannError::Io(e) => Some(e),
            FannError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FannError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for FannError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
