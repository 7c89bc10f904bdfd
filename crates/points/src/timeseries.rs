//! Per-point time series: ascending timestamps with aligned value columns.

use chrono::NaiveDateTime;

use crate::error::PointsError;

/// One named value column of a [`TimeSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValueColumn {
    pub name: String,
    pub no_data: f64,
    pub values: Vec<f64>,
}

impl ValueColumn {
    pub fn new(name: impl Into<String>, no_data: f64, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            no_data,
            values,
        }
    }

    /// Returns `true` if `value` is this column's NoData sentinel.
    ///
    /// Uses the same absolute tolerance as grid sampling (1e-4); NaN counts
    /// as NoData.
    pub fn is_no_data(&self, value: f64) -> bool {
        value.is_nan() || (value - self.no_data).abs() < NO_DATA_TOLERANCE
    }
}

const NO_DATA_TOLERANCE: f64 = 0.0001;

/// A time series with weakly ascending timestamps.
///
/// Every value column holds exactly one value per timestamp.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    timestamps: Vec<NaiveDateTime>,
    columns: Vec<ValueColumn>,
}

impl TimeSeries {
    /// Creates a time series.
    ///
    /// # Errors
    ///
    /// Returns [`PointsError::NonAscendingTimestamps`] if a timestamp is
    /// earlier than its predecessor, or [`PointsError::LengthMismatch`] if a
    /// column length differs from the timestamp count.
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        columns: Vec<ValueColumn>,
    ) -> Result<Self, PointsError> {
        if let Some(i) = timestamps.windows(2).position(|w| w[1] < w[0]) {
            return Err(PointsError::NonAscendingTimestamps { index: i + 1 });
        }
        for c in &columns {
            if c.values.len() != timestamps.len() {
                return Err(PointsError::LengthMismatch {
                    column: c.name.clone(),
                    expected: timestamps.len(),
                    got: c.values.len(),
                });
            }
        }
        Ok(Self {
            timestamps,
            columns,
        })
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn columns(&self) -> &[ValueColumn] {
        &self.columns
    }

    /// Number of records (timestamps).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Column by name, case-insensitive.
    pub fn column(&self, name: &str) -> Option<&ValueColumn> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// All column values at record `row`, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<f64>> {
        (row < self.len()).then(|| self.columns.iter().map(|c| c.values[row]).collect())
    }
}
