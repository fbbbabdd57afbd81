//! Error types for the GA engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the GA engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The run configuration cannot be executed.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// A tour is not a permutation of `0..expected_len`.
    ///
    /// Raised inside the evolution loop, where it means a crossover or
    /// mutation operator produced a broken tour.
    #[error("invalid tour of length {len} (expected a permutation of 0..{expected_len})")]
    InvalidTour {
        /// Number of entries in the offending tour.
        len: usize,
        /// Number of points the tour should visit.
        expected_len: usize,
    },

    /// The problem has fewer points than a tour needs.
    #[error("at least 2 points are required, found {found}")]
    TooFewPoints {
        /// Number of points supplied.
        found: usize,
    },

    /// A distance matrix violates the square/symmetric/non-negative contract.
    #[error("invalid distance matrix: {reason}")]
    InvalidDistanceMatrix {
        /// What is wrong with the matrix.
        reason: String,
    },

    /// A latitude or longitude is outside its valid range or not finite.
    #[error("invalid coordinate: {value}")]
    InvalidCoordinate {
        /// The offending value, in degrees.
        value: f64,
    },
}

impl Error {
    /// Creates an [`Error::InvalidConfiguration`] from any displayable reason.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::invalid_config("population_size must be at least 2");
        assert_eq!(
            err.to_string(),
            "invalid configuration: population_size must be at least 2"
        );

        let err = Error::InvalidTour {
            len: 3,
            expected_len: 4,
        };
        assert!(err.to_string().contains("0..4"));
    }
}
