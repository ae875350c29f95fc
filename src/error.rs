//! Error types for fixsimd operations.
//!
//! Almost every constraint of a fixed-size vector (its width, its element
//! type, its mask storage) is checked at compile time. The errors below cover
//! the few runtime inputs: slices handed to the `try_*` constructors and lane
//! indices handed to the checked accessors.

use thiserror::Error;

/// Errors that can occur during fixsimd operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedSizeError {
    /// A slice did not hold the number of lanes required.
    #[error("Length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// The number of lanes that had to be filled.
        expected: usize,
        /// The length of the slice that was provided.
        actual: usize,
    },
    /// A lane index was not below the vector width.
    #[error("Lane index out of range: {index} (width: {width})")]
    LaneOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The logical width of the vector or mask.
        width: usize,
    },
}

/// Result type alias for fixsimd operations.
pub type Result<T> = std::result::Result<T, FixedSizeError>;

/// Creates a length mismatch error.
pub fn length_mismatch(expected: usize, actual: usize) -> FixedSizeError {
    FixedSizeError::LengthMismatch { expected, actual }
}

/// Creates a lane out of range error.
pub fn lane_out_of_range(index: usize, width: usize) -> FixedSizeError {
    FixedSizeError::LaneOutOfRange { index, width }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let error = length_mismatch(13, 7);
        let display = format!("{}", error);
        assert!(display.contains("Length mismatch"));
        assert!(display.contains("expected 13 elements"));
        assert!(display.contains("got 7"));
    }

    #[test]
    fn test_lane_out_of_range_display() {
        let error = lane_out_of_range(5, 5);
        let display = format!("{}", error);
        assert!(display.contains("Lane index out of range: 5"));
        assert!(display.contains("width: 5"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = length_mismatch(8, 4);
        let error2 = length_mismatch(8, 4);
        let error3 = lane_out_of_range(8, 4);

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = lane_out_of_range(64, 13);

        // Should implement Error trait
        let _: &dyn std::error::Error = &error;

        assert!(std::error::Error::source(&error).is_none());
    }
}
