//! Join types and join configuration.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::JoinError;

/// Which unmatched records a join keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Only records present on both sides.
    Inner,
    /// All left records; right values where available.
    LeftOuter,
    /// All right records; left values where available.
    RightOuter,
    /// All records from both sides.
    #[default]
    FullOuter,
    /// Records sharing a key; behaves like [`JoinType::Inner`].
    Natural,
}

impl JoinType {
    /// Keeps left records without a right match.
    pub fn keeps_left(self) -> bool {
        matches!(self, JoinType::LeftOuter | JoinType::FullOuter)
    }

    /// Keeps right records without a left match.
    pub fn keeps_right(self) -> bool {
        matches!(self, JoinType::RightOuter | JoinType::FullOuter)
    }
}

impl FromStr for JoinType {
    type Err = JoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinType::Inner),
            "left" | "leftouter" => Ok(JoinType::LeftOuter),
            "right" | "rightouter" => Ok(JoinType::RightOuter),
            "full" | "fullouter" => Ok(JoinType::FullOuter),
            "natural" => Ok(JoinType::Natural),
            _ => Err(JoinError::UnknownJoinType {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinType::Inner => "inner",
            JoinType::LeftOuter => "left",
            JoinType::RightOuter => "right",
            JoinType::FullOuter => "full",
            JoinType::Natural => "natural",
        };
        f.write_str(name)
    }
}

/// Configuration for joining two time series on their timestamps.
///
/// # Example
///
/// ```
/// use ipftools_join::{JoinConfig, JoinType};
///
/// let config = JoinConfig::new()
///     .with_join_type(JoinType::LeftOuter)
///     .with_interpolate_ts2(true)
///     .with_max_interpolation_distance_days(Some(14.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JoinConfig {
    join_type: JoinType,
    period_start: Option<NaiveDateTime>,
    period_end: Option<NaiveDateTime>,
    max_interpolation_distance_days: Option<f64>,
    interpolate_ts2: bool,
}

impl JoinConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: full outer join, unbounded period, no interpolation and
    /// no interpolation distance limit.
    pub fn new() -> Self {
        Self {
            join_type: JoinType::FullOuter,
            period_start: None,
            period_end: None,
            max_interpolation_distance_days: None,
            interpolate_ts2: false,
        }
    }

    pub fn with_join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }

    /// Sets the first timestamp (inclusive) taken into account.
    pub fn with_period_start(mut self, start: Option<NaiveDateTime>) -> Self {
        self.period_start = start;
        self
    }

    /// Sets the last timestamp (inclusive) taken into account.
    pub fn with_period_end(mut self, end: Option<NaiveDateTime>) -> Self {
        self.period_end = end;
        self
    }

    /// Sets the largest gap between the surrounding second-series records
    /// that is still interpolated.
    pub fn with_max_interpolation_distance_days(mut self, days: Option<f64>) -> Self {
        self.max_interpolation_distance_days = days;
        self
    }

    /// Interpolate second-series values at first-series timestamps that fall
    /// between two second-series records.
    pub fn with_interpolate_ts2(mut self, interpolate: bool) -> Self {
        self.interpolate_ts2 = interpolate;
        self
    }

    // --- Accessors ---

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn period_start(&self) -> Option<NaiveDateTime> {
        self.period_start
    }

    pub fn period_end(&self) -> Option<NaiveDateTime> {
        self.period_end
    }

    pub fn max_interpolation_distance_days(&self) -> Option<f64> {
        self.max_interpolation_distance_days
    }

    pub fn interpolate_ts2(&self) -> bool {
        self.interpolate_ts2
    }

    /// Returns `true` if `t` lies within the configured period.
    pub fn in_period(&self, t: NaiveDateTime) -> bool {
        self.period_start.is_none_or(|s| t >= s) && self.period_end.is_none_or(|e| t <= e)
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), JoinError> {
        if let (Some(start), Some(end)) = (self.period_start, self.period_end)
            && start > end
        {
            return Err(JoinError::InvalidConfig {
                reason: format!("period start {start} is after period end {end}"),
            });
        }
        if let Some(d) = self.max_interpolation_distance_days
            && (!d.is_finite() || d < 0.0)
        {
            return Err(JoinError::InvalidConfig {
                reason: format!(
                    "max_interpolation_distance_days must be finite and >= 0, got {d}"
                ),
            });
        }
        Ok(())
    }
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for joining two point datasets on a key column.
#[derive(Debug, Clone, PartialEq)]
pub struct PointJoinConfig {
    key_column_left: usize,
    key_column_right: usize,
    join_type: JoinType,
    timeseries: JoinConfig,
}

impl PointJoinConfig {
    /// Creates a configuration joining on the given 0-based key columns.
    ///
    /// The point join type defaults to the time-series join type.
    pub fn new(key_column_left: usize, key_column_right: usize) -> Self {
        let timeseries = JoinConfig::new();
        Self {
            key_column_left,
            key_column_right,
            join_type: timeseries.join_type(),
            timeseries,
        }
    }

    pub fn with_join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }

    /// Sets how the time series of matched points are joined.
    pub fn with_timeseries(mut self, timeseries: JoinConfig) -> Self {
        self.timeseries = timeseries;
        self
    }

    pub fn key_column_left(&self) -> usize {
        self.key_column_left
    }

    pub fn key_column_right(&self) -> usize {
        self.key_column_right
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn timeseries(&self) -> &JoinConfig {
        &self.timeseries
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), JoinError> {
        self.timeseries.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn parse_join_types() {
        assert_eq!("inner".parse::<JoinType>().unwrap(), JoinType::Inner);
        assert_eq!("Left".parse::<JoinType>().unwrap(), JoinType::LeftOuter);
        assert_eq!("leftouter".parse::<JoinType>().unwrap(), JoinType::LeftOuter);
        assert_eq!("RIGHT".parse::<JoinType>().unwrap(), JoinType::RightOuter);
        assert_eq!("fullouter".parse::<JoinType>().unwrap(), JoinType::FullOuter);
        assert_eq!(" natural ".parse::<JoinType>().unwrap(), JoinType::Natural);
        assert!(matches!(
            "cross".parse::<JoinType>(),
            Err(JoinError::UnknownJoinType { .. })
        ));
    }

    #[test]
    fn display_parses_back() {
        for jt in [
            JoinType::Inner,
            JoinType::LeftOuter,
            JoinType::RightOuter,
            JoinType::FullOuter,
            JoinType::Natural,
        ] {
            assert_eq!(jt.to_string().parse::<JoinType>().unwrap(), jt);
        }
    }

    #[test]
    fn keeps_flags() {
        assert!(JoinType::FullOuter.keeps_left() && JoinType::FullOuter.keeps_right());
        assert!(JoinType::LeftOuter.keeps_left() && !JoinType::LeftOuter.keeps_right());
        assert!(!JoinType::Natural.keeps_left() && !JoinType::Natural.keeps_right());
    }

    #[test]
    fn defaults() {
        let cfg = JoinConfig::new();
        assert_eq!(cfg.join_type(), JoinType::FullOuter);
        assert_eq!(cfg.period_start(), None);
        assert_eq!(cfg.max_interpolation_distance_days(), None);
        assert!(!cfg.interpolate_ts2());
        assert!(cfg.in_period(day(1)));
    }

    #[test]
    fn period_bounds_inclusive() {
        let cfg = JoinConfig::new()
            .with_period_start(Some(day(2)))
            .with_period_end(Some(day(4)));
        assert!(!cfg.in_period(day(1)));
        assert!(cfg.in_period(day(2)));
        assert!(cfg.in_period(day(4)));
        assert!(!cfg.in_period(day(5)));
    }

    #[test]
    fn rejects_inverted_period() {
        let err = JoinConfig::new()
            .with_period_start(Some(day(5)))
            .with_period_end(Some(day(4)))
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("is after period end"));
    }

    #[test]
    fn rejects_negative_distance() {
        for d in [-1.0, f64::INFINITY, f64::NAN] {
            assert!(
                JoinConfig::new()
                    .with_max_interpolation_distance_days(Some(d))
                    .validate()
                    .is_err()
            );
        }
    }

    #[test]
    fn point_join_defaults_follow_timeseries() {
        let cfg = PointJoinConfig::new(2, 3);
        assert_eq!(cfg.key_column_left(), 2);
        assert_eq!(cfg.key_column_right(), 3);
        assert_eq!(cfg.join_type(), JoinType::FullOuter);
        assert!(cfg.validate().is_ok());
    }
}
