//! Error types for the ipftools-sample crate.

use ipftools_points::PointsError;

/// Error type for all fallible operations in the ipftools-sample crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SampleError {
    /// Returned when configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the output dataset cannot be assembled.
    #[error("point dataset error: {reason}")]
    Points {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when the summary cannot be serialised.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the problem.
        reason: String,
    },
}

impl From<PointsError> for SampleError {
    fn from(e: PointsError) -> Self {
        SampleError::Points {
            reason: e.to_string(),
        }
    }
}
