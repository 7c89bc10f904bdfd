//! Regular raster grid with a lower-left origin.

use crate::error::GridError;

/// Absolute tolerance used when comparing a value against a NoData sentinel.
pub const ACCEPTED_ERROR: f64 = 0.0001;

/// Returns `true` if `value` equals `no_data` within [`ACCEPTED_ERROR`].
///
/// NaN is always treated as NoData.
pub fn is_no_data(value: f64, no_data: f64) -> bool {
    value.is_nan() || (value - no_data).abs() < ACCEPTED_ERROR
}

/// Axis-aligned rectangle in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    /// Creates an extent, rejecting inverted or non-finite bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidGrid`] if `xmin > xmax`, `ymin > ymax`
    /// or any bound is not finite.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self, GridError> {
        if ![xmin, ymin, xmax, ymax].iter().all(|v| v.is_finite()) {
            return Err(GridError::InvalidGrid {
                reason: "extent bounds must be finite".to_string(),
            });
        }
        if xmin > xmax || ymin > ymax {
            return Err(GridError::InvalidGrid {
                reason: format!("inverted extent ({xmin}, {ymin}) - ({xmax}, {ymax})"),
            });
        }
        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    /// Half-open containment: `xmin <= x < xmax` and `ymin <= y < ymax`.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x < self.xmax && y >= self.ymin && y < self.ymax
    }
}

/// A regular raster of `f64` values.
///
/// Values are stored row-major in a single buffer. Row 0 is the northernmost
/// (highest-Y) row, so lookups invert the Y axis relative to the lower-left
/// origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    n_cols: usize,
    n_rows: usize,
    origin_x: f64,
    origin_y: f64,
    cellsize_x: f64,
    cellsize_y: f64,
    no_data: f64,
    values: Vec<f64>,
}

impl Grid {
    /// Creates a grid from its geometry and row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidGrid`] if a dimension is zero, the value
    /// count is not `n_rows * n_cols`, a cellsize is not positive and finite,
    /// or the origin is not finite.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n_cols: usize,
        n_rows: usize,
        origin_x: f64,
        origin_y: f64,
        cellsize_x: f64,
        cellsize_y: f64,
        no_data: f64,
        values: Vec<f64>,
    ) -> Result<Self, GridError> {
        if n_cols == 0 || n_rows == 0 {
            return Err(GridError::InvalidGrid {
                reason: format!("grid must have at least one cell, got {n_cols}x{n_rows}"),
            });
        }
        if n_cols.checked_mul(n_rows) != Some(values.len()) {
            return Err(GridError::InvalidGrid {
                reason: format!(
                    "expected {n_cols}x{n_rows} values, got {}",
                    values.len()
                ),
            });
        }
        for (axis, cs) in [("x", cellsize_x), ("y", cellsize_y)] {
            if !cs.is_finite() || cs <= 0.0 {
                return Err(GridError::InvalidGrid {
                    reason: format!("cellsize {axis} must be finite and positive, got {cs}"),
                });
            }
        }
        if !origin_x.is_finite() || !origin_y.is_finite() {
            return Err(GridError::InvalidGrid {
                reason: "origin must be finite".to_string(),
            });
        }
        Ok(Self {
            n_cols,
            n_rows,
            origin_x,
            origin_y,
            cellsize_x,
            cellsize_y,
            no_data,
            values,
        })
    }

    /// Creates a grid from rows listed north to south.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidGrid`] if rows have unequal lengths or the
    /// geometry is invalid (see [`Grid::new`]).
    pub fn from_rows(
        rows: &[Vec<f64>],
        origin_x: f64,
        origin_y: f64,
        cellsize: f64,
        no_data: f64,
    ) -> Result<Self, GridError> {
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
            return Err(GridError::InvalidGrid {
                reason: format!("row {i} has {} values, expected {n_cols}", row.len()),
            });
        }
        let values = rows.iter().flatten().copied().collect();
        Self::new(
            n_cols, rows.len(), origin_x, origin_y, cellsize, cellsize, no_data, values,
        )
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Lower-left X coordinate.
    pub fn origin_x(&self) -> f64 {
        self.origin_x
    }

    /// Lower-left Y coordinate.
    pub fn origin_y(&self) -> f64 {
        self.origin_y
    }

    pub fn cellsize_x(&self) -> f64 {
        self.cellsize_x
    }

    pub fn cellsize_y(&self) -> f64 {
        self.cellsize_y
    }

    pub fn no_data(&self) -> f64 {
        self.no_data
    }

    /// Row-major values, northernmost row first.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.n_rows && col < self.n_cols {
            Some(self.values[row * self.n_cols + col])
        } else {
            None
        }
    }

    /// Returns the covered extent.
    pub fn extent(&self) -> Extent {
        Extent {
            xmin: self.origin_x,
            ymin: self.origin_y,
            xmax: self.origin_x + self.n_cols as f64 * self.cellsize_x,
            ymax: self.origin_y + self.n_rows as f64 * self.cellsize_y,
        }
    }

    /// Returns `true` if `value` is this grid's NoData within tolerance.
    pub fn is_no_data(&self, value: f64) -> bool {
        is_no_data(value, self.no_data)
    }

    /// Minimum and maximum of all data cells, or `None` if every cell is NoData.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|&v| !self.is_no_data(v))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x3() -> Grid {
        Grid::from_rows(
            &[vec![1.0, 2.0, 3.0], vec![4.0, -9999.0, 6.0]],
            0.0,
            0.0,
            10.0,
            -9999.0,
        )
        .unwrap()
    }

    #[test]
    fn from_rows_dimensions() {
        let g = grid_2x3();
        assert_eq!(g.n_cols(), 3);
        assert_eq!(g.n_rows(), 2);
        assert_eq!(g.values().len(), 6);
    }

    #[test]
    fn from_rows_ragged_rejected() {
        let err = Grid::from_rows(&[vec![1.0, 2.0], vec![3.0]], 0.0, 0.0, 1.0, -1.0);
        assert!(matches!(err, Err(GridError::InvalidGrid { .. })));
    }

    #[test]
    fn new_wrong_value_count() {
        let err = Grid::new(2, 2, 0.0, 0.0, 1.0, 1.0, -1.0, vec![0.0; 3]);
        assert!(matches!(err, Err(GridError::InvalidGrid { .. })));
    }

    #[test]
    fn new_zero_cellsize() {
        let err = Grid::new(1, 1, 0.0, 0.0, 0.0, 1.0, -1.0, vec![0.0]);
        assert!(err.unwrap_err().to_string().contains("cellsize x"));
    }

    #[test]
    fn new_empty_rejected() {
        assert!(Grid::new(0, 0, 0.0, 0.0, 1.0, 1.0, -1.0, vec![]).is_err());
    }

    #[test]
    fn extent_from_geometry() {
        let e = grid_2x3().extent();
        assert_eq!(e, Extent::new(0.0, 0.0, 30.0, 20.0).unwrap());
    }

    #[test]
    fn extent_half_open() {
        let e = grid_2x3().extent();
        assert!(e.contains(0.0, 0.0));
        assert!(e.contains(29.999, 19.999));
        assert!(!e.contains(30.0, 10.0));
        assert!(!e.contains(10.0, 20.0));
    }

    #[test]
    fn extent_inverted_rejected() {
        assert!(Extent::new(10.0, 0.0, 0.0, 5.0).is_err());
    }

    #[test]
    fn cell_access() {
        let g = grid_2x3();
        assert_eq!(g.cell(0, 2), Some(3.0));
        assert_eq!(g.cell(1, 0), Some(4.0));
        assert_eq!(g.cell(2, 0), None);
    }

    #[test]
    fn no_data_tolerance() {
        assert!(is_no_data(-9999.00005, -9999.0));
        assert!(!is_no_data(-9998.999, -9999.0));
        assert!(is_no_data(f64::NAN, -9999.0));
    }

    #[test]
    fn min_max_skips_no_data() {
        assert_eq!(grid_2x3().min_max(), Some((1.0, 6.0)));
    }
}
