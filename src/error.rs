//! Errors reported by the decomposition engine.

use std::fmt;

use crate::truth_table::TruthTable;

/// Error type for [`Decomposer::run`][crate::decompose::Decomposer::run].
///
/// Every variant except [`UnsupportedPrimeResidual`][DecompositionError::UnsupportedPrimeResidual]
/// is a contract violation: something handed the engine inconsistent data.
/// Any error aborts the whole decomposition; signals created before it are not a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecompositionError {
    /// The caller supplied a wrong number of input signals.
    InputCountMismatch { expected: usize, actual: usize },
    /// A residual depends on a variable that is no longer in the support.
    StrayVariable { var: u32, residual: TruthTable },
    /// The recursion went deeper than the number of variables allows.
    DepthExceeded { limit: usize },
    /// No synthesis strategy is available for this prime residual.
    UnsupportedPrimeResidual { support_size: usize, reason: &'static str },
}

impl DecompositionError {
    /// Whether this error signals broken invariants rather than a missing strategy.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, DecompositionError::UnsupportedPrimeResidual { .. })
    }
}

impl fmt::Display for DecompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompositionError::InputCountMismatch { expected, actual } => {
                write!(f, "expected {} input signals, got {}", expected, actual)
            }
            DecompositionError::StrayVariable { var, residual } => {
                write!(f, "residual {} depends on x{} outside the support", residual, var)
            }
            DecompositionError::DepthExceeded { limit } => {
                write!(f, "recursion depth exceeded the limit of {}", limit)
            }
            DecompositionError::UnsupportedPrimeResidual { support_size, reason } => {
                write!(f, "unsupported prime residual on {} variables: {}", support_size, reason)
            }
        }
    }
}

impl std::error::Error for DecompositionError {}
