//! Error types for the soft and fatal failure paths.

use thiserror::Error;

/// Rejected bucket count for a [`ChainedMap`](crate::ChainedMap).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    #[error("map capacity must be a positive power of two, got {capacity}")]
    NotPowerOfTwo { capacity: usize },
}

impl CapacityError {
    /// Validates `capacity` as a bucket count.
    pub(crate) fn check(capacity: usize) -> Result<usize, CapacityError> {
        if capacity.is_power_of_two() {
            Ok(capacity)
        } else {
            Err(CapacityError::NotPowerOfTwo { capacity })
        }
    }
}

/// Positional access outside the occupied range of a [`Vector`](crate::Vector).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },
}
