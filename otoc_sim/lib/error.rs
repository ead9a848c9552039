//! Errors raised when validating circuits, parameters, and experiment setups.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OtocError {
    #[error("qubit index {qubit} out of range for a {n}-qubit register")]
    QubitOutOfRange { qubit: usize, n: usize },

    #[error("two-qubit gate must act on distinct qubits (got {0} twice)")]
    SameQubit(usize),

    #[error("invalid probability {0}: must lie in [0, 1]")]
    InvalidProbability(f64),

    #[error("invalid time {0}: must be finite and non-negative")]
    InvalidTime(f64),

    #[error("invalid Trotter step {0}: must be finite and positive")]
    InvalidStep(f64),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("amplitude vector of length {0} is not a nonzero power of two")]
    NotPowerOfTwo(usize),

    #[error("state vector has zero norm")]
    ZeroNorm,

    #[error("{0} must be nonzero")]
    Empty(&'static str),

    #[error("{n} qubits exceeds the limit of {max} for this simulation")]
    SystemTooLarge { n: usize, max: usize },
}

pub type OtocResult<T> = Result<T, OtocError>;

pub(crate) fn check_qubit(qubit: usize, n: usize) -> OtocResult<()> {
    if qubit < n {
        Ok(())
    } else {
        Err(OtocError::QubitOutOfRange { qubit, n })
    }
}

pub(crate) fn check_prob(p: f64) -> OtocResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(OtocError::InvalidProbability(p))
    }
}

pub(crate) fn check_nonzero(count: usize, what: &'static str)
    -> OtocResult<()>
{
    if count > 0 { Ok(()) } else { Err(OtocError::Empty(what)) }
}
