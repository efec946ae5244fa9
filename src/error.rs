//! Error types for point-state access.

use thiserror::Error;

/// Errors raised by point-state construction and accessors.
///
/// All variants are contract violations by the calling solver stage.
/// None of them is recoverable by retrying the same call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Index outside `[0, len)`.
    #[error("{what} index {index} out of range (len = {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Bulk input whose length does not match the state's sizing.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Unsupported sizing parameter at construction.
    #[error("Invalid {what}: {value}")]
    InvalidSize { what: &'static str, value: usize },

    /// Numerical parameter outside its admissible range.
    #[error("Invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: f64 },

    /// Access to a point slot that was never filled.
    #[error("Point state used before initialization")]
    Uninitialized,

    /// Time-level shift on a state built without dual time stepping.
    #[error("Time history requested but dual time stepping is disabled")]
    TimeHistoryDisabled,
}

impl StateError {
    /// Create an index-out-of-range error.
    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { what, index, len }
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, StateError>;

/// Return `index` if it lies in `[0, len)`.
#[inline]
pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> Result<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(StateError::out_of_range(what, index, len))
    }
}
