//! Error types for ipftools-stats.

use std::path::PathBuf;

/// Errors from residual statistics and report writing.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Measured and modeled series differ in length.
    #[error("measured has {measured} values but modeled has {modeled}")]
    LengthMismatch { measured: usize, modeled: usize },

    /// A requested percentile is outside [0, 100] or not finite.
    #[error("invalid p-value {value}: must be within [0, 100]")]
    InvalidPValue { value: f64 },

    /// The report file could not be opened or inspected.
    #[error("i/o error on {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    /// Writing a report row failed.
    #[error("csv error on {}: {reason}", path.display())]
    Csv { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let err = StatsError::LengthMismatch {
            measured: 3,
            modeled: 2,
        };
        assert_eq!(err.to_string(), "measured has 3 values but modeled has 2");
    }

    #[test]
    fn test_invalid_pvalue_display() {
        let err = StatsError::InvalidPValue { value: 120.0 };
        assert!(err.to_string().contains("invalid p-value 120"));
    }

    #[test]
    fn test_csv_display() {
        let err = StatsError::Csv {
            path: PathBuf::from("report.csv"),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "csv error on report.csv: disk full");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_traits<T: Send + Sync + std::error::Error>() {}
        assert_traits::<StatsError>();
    }
}
