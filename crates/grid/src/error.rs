//! Error types for ipftools-grid.

use std::path::PathBuf;

/// Error type for all fallible operations in the ipftools-grid crate.
///
/// Sampling never fails: out-of-extent and NoData lookups both return the
/// grid's NoData value. Only construction and file reading report errors.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Returned when a required grid file does not exist on disk.
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

    /// Returned when the file extension does not name a known grid format.
    #[error("unsupported grid format: {}", path.display())]
    UnsupportedFormat {
        /// Path with the unrecognised extension.
        path: PathBuf,
    },

    /// Returned for valid files using a grid variant this crate cannot represent.
    #[error("unsupported grid: {reason}")]
    Unsupported {
        /// What is not supported.
        reason: String,
    },

    /// Returned when a binary grid ends before all declared data is read.
    #[error("truncated grid file: expected {expected} bytes, got {got}")]
    Truncated {
        /// Number of bytes required by the header.
        expected: usize,
        /// Number of bytes present.
        got: usize,
    },

    /// Returned when a text grid header or value cannot be parsed.
    #[error("parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number of the offending input.
        line: usize,
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when grid dimensions or geometry are invalid.
    #[error("invalid grid: {reason}")]
    InvalidGrid {
        /// Description of the inconsistency.
        reason: String,
    },
}

impl GridError {
    pub(crate) fn io(path: &std::path::Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            GridError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            GridError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }
}
