//! Error types for the ipftools-join crate.

use ipftools_points::PointsError;

/// Error type for all fallible operations in the ipftools-join crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JoinError {
    /// Returned when configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a join type name is not recognised.
    #[error("unknown join type '{name}', expected inner, left, right, full or natural")]
    UnknownJoinType {
        /// The rejected name.
        name: String,
    },

    /// Returned when a key column does not exist in a dataset.
    #[error("{side} key column {column} out of range for {n_columns} columns")]
    UnknownColumn {
        /// `"left"` or `"right"`.
        side: &'static str,
        /// 1-based column index.
        column: usize,
        /// Number of columns in the dataset.
        n_columns: usize,
    },

    /// Returned when the joined result cannot be assembled.
    #[error("point dataset error: {reason}")]
    Points {
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<PointsError> for JoinError {
    fn from(e: PointsError) -> Self {
        JoinError::Points {
            reason: e.to_string(),
        }
    }
}
