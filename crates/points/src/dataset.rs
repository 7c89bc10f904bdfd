//! Point records and the column-aligned dataset that owns them.

use crate::error::PointsError;
use crate::timeseries::TimeSeries;

/// A single point with its column values and optional time series.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub column_values: Vec<String>,
    pub timeseries: Option<TimeSeries>,
}

impl Point {
    pub fn new(x: f64, y: f64, column_values: Vec<String>) -> Self {
        Self {
            x,
            y,
            column_values,
            timeseries: None,
        }
    }

    /// Attaches a time series.
    pub fn with_timeseries(mut self, ts: TimeSeries) -> Self {
        self.timeseries = Some(ts);
        self
    }

    /// Value of column `idx`, if present.
    pub fn value(&self, idx: usize) -> Option<&str> {
        self.column_values.get(idx).map(String::as_str)
    }
}

/// An ordered collection of points sharing one column layout.
///
/// Column names are unique (case-insensitive) and every point holds exactly
/// one value per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointDataset {
    column_names: Vec<String>,
    points: Vec<Point>,
    timeseries_column: Option<usize>,
    timeseries_extension: String,
}

impl PointDataset {
    /// Creates an empty dataset with the given columns.
    ///
    /// # Errors
    ///
    /// Returns [`PointsError::DuplicateColumn`] if a name repeats.
    pub fn new(column_names: Vec<String>) -> Result<Self, PointsError> {
        for (i, name) in column_names.iter().enumerate() {
            if column_names[..i]
                .iter()
                .any(|n| n.eq_ignore_ascii_case(name))
            {
                return Err(PointsError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(Self {
            column_names,
            points: Vec::new(),
            timeseries_column: None,
            timeseries_extension: "txt".to_string(),
        })
    }

    /// Sets the column that names each point's companion time-series file.
    ///
    /// # Errors
    ///
    /// Returns [`PointsError::UnknownColumn`] if `column` is out of range.
    pub fn with_timeseries_column(
        mut self,
        column: Option<usize>,
        extension: impl Into<String>,
    ) -> Result<Self, PointsError> {
        if let Some(c) = column
            && c >= self.column_names.len()
        {
            return Err(PointsError::UnknownColumn {
                column: (c + 1).to_string(),
            });
        }
        self.timeseries_column = column;
        self.timeseries_extension = extension.into();
        Ok(self)
    }

    /// Appends a point.
    ///
    /// # Errors
    ///
    /// Returns [`PointsError::ColumnCount`] if the point's value count
    /// differs from the column count.
    pub fn push(&mut self, point: Point) -> Result<(), PointsError> {
        if point.column_values.len() != self.column_names.len() {
            return Err(PointsError::ColumnCount {
                expected: self.column_names.len(),
                got: point.column_values.len(),
            });
        }
        self.points.push(point);
        Ok(())
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Mutable access to the points; the column layout stays fixed.
    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the column naming companion time-series files, if any.
    pub fn timeseries_column(&self) -> Option<usize> {
        self.timeseries_column
    }

    /// Extension of companion time-series files (without the dot).
    pub fn timeseries_extension(&self) -> &str {
        &self.timeseries_extension
    }

    /// Index of the column called `name` (case-insensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name.trim()))
    }

    /// Resolve a column given by name or by 1-based position.
    ///
    /// A name match wins over a numeric interpretation.
    ///
    /// # Errors
    ///
    /// Returns [`PointsError::UnknownColumn`] if neither form matches.
    pub fn resolve_column(&self, column: &str) -> Result<usize, PointsError> {
        if let Some(i) = self.column_index(column) {
            return Ok(i);
        }
        match column.trim().parse::<usize>() {
            Ok(n) if (1..=self.column_names.len()).contains(&n) => Ok(n - 1),
            _ => Err(PointsError::UnknownColumn {
                column: column.to_string(),
            }),
        }
    }

    /// Returns `name`, with `"2"` appended until it matches no existing column.
    pub fn unique_column_name(&self, name: &str) -> String {
        unique_name(name, &self.column_names)
    }
}

/// Returns `name`, with `"2"` appended until it matches none of `taken`
/// (case-insensitive).
pub fn unique_name(name: &str, taken: &[String]) -> String {
    let mut candidate = name.to_string();
    while taken.iter().any(|t| t.eq_ignore_ascii_case(&candidate)) {
        candidate.push('2');
    }
    candidate
}
