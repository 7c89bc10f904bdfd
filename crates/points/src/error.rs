//! Error types for ipftools-points.

use std::path::PathBuf;

/// Error type for all fallible operations in the ipftools-points crate.
#[derive(Debug, thiserror::Error)]
pub enum PointsError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an underlying I/O failure.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a point or time-series file is malformed.
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when a point's value count differs from the column count.
    #[error("point has {got} values, expected {expected}")]
    ColumnCount {
        /// Number of dataset columns.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// Returned when a column name occurs twice in a dataset.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn {
        /// The repeated column name.
        name: String,
    },

    /// Returned when a column index or name does not exist.
    #[error("column '{column}' not found")]
    UnknownColumn {
        /// The requested column (name or index).
        column: String,
    },

    /// Returned when time-series timestamps decrease.
    #[error("timestamps not ascending at index {index}")]
    NonAscendingTimestamps {
        /// Index of the first out-of-order timestamp.
        index: usize,
    },

    /// Returned when a value column length differs from the timestamp count.
    #[error("column '{column}' has {got} values, expected {expected}")]
    LengthMismatch {
        /// Name of the offending column.
        column: String,
        /// Number of timestamps.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },
}

impl PointsError {
    pub(crate) fn io(path: &std::path::Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            PointsError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PointsError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }

    pub(crate) fn parse(path: &std::path::Path, line: usize, reason: impl Into<String>) -> Self {
        PointsError::Parse {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse() {
        let err = PointsError::parse(std::path::Path::new("wells.ipf"), 7, "expected 4 values");
        assert_eq!(err.to_string(), "wells.ipf:7: expected 4 values");
    }

    #[test]
    fn display_column_count() {
        let err = PointsError::ColumnCount {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "point has 2 values, expected 3");
    }

    #[test]
    fn display_length_mismatch() {
        let err = PointsError::LengthMismatch {
            column: "head".to_string(),
            expected: 10,
            got: 9,
        };
        assert_eq!(err.to_string(), "column 'head' has 9 values, expected 10");
    }

    #[test]
    fn display_non_ascending() {
        let err = PointsError::NonAscendingTimestamps { index: 4 };
        assert_eq!(err.to_string(), "timestamps not ascending at index 4");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<PointsError>();
    }
}
