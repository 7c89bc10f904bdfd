//! Coordinate-to-cell lookups: nearest cell and bilinear interpolation.
//!
//! Lookups never fail. A coordinate outside the grid and a NoData cell both
//! yield the grid's NoData value; callers that need to tell the two apart
//! check [`Grid::extent`] separately.

use tracing::trace;

use crate::grid::Grid;

impl Grid {
    /// Converts an inverted (south-to-north) row index into a storage row.
    fn row_from_inverted(&self, inv_row: i64) -> Option<usize> {
        let n_rows = self.n_rows() as i64;
        if (0..n_rows).contains(&inv_row) {
            Some((n_rows - 1 - inv_row) as usize)
        } else {
            None
        }
    }

    fn col_from_index(&self, col: i64) -> Option<usize> {
        if (0..self.n_cols() as i64).contains(&col) {
            Some(col as usize)
        } else {
            None
        }
    }

    /// Row and column of the cell containing `(x, y)`, or `None` outside.
    pub fn cell_index(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let inv_row = ((y - self.origin_y()) / self.cellsize_y()).floor() as i64;
        let col = ((x - self.origin_x()) / self.cellsize_x()).floor() as i64;
        Some((self.row_from_inverted(inv_row)?, self.col_from_index(col)?))
    }

    /// Nearest-cell value at `(x, y)`; NoData outside the grid.
    pub fn value(&self, x: f64, y: f64) -> f64 {
        self.cell_index(x, y)
            .and_then(|(row, col)| self.cell(row, col))
            .unwrap_or(self.no_data())
    }

    /// Bilinearly interpolated value at `(x, y)`.
    ///
    /// Interpolates between the centres of the four cells surrounding the
    /// position. Falls back to [`Grid::value`] when any of the four cells is
    /// outside the grid or NoData, or when the weighted sum is not finite, so
    /// interpolation itself never produces NaN.
    pub fn interpolated_value(&self, x: f64, y: f64) -> f64 {
        match self.bilinear(x, y) {
            Some(v) => v,
            None => self.value(x, y),
        }
    }

    fn bilinear(&self, x: f64, y: f64) -> Option<f64> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let fx = (x - self.origin_x()) / self.cellsize_x() - 0.5;
        let fy = (y - self.origin_y()) / self.cellsize_y() - 0.5;
        let c0 = fx.floor();
        let r0 = fy.floor();
        let tx = fx - c0;
        let ty = fy - r0;
        let (c0, r0) = (c0 as i64, r0 as i64);

        let lower = self.row_from_inverted(r0)?;
        let upper = self.row_from_inverted(r0 + 1)?;
        let left = self.col_from_index(c0)?;
        let right = self.col_from_index(c0 + 1)?;

        let corners = [
            self.cell(lower, left)?,
            self.cell(lower, right)?,
            self.cell(upper, left)?,
            self.cell(upper, right)?,
        ];
        if corners.iter().any(|&v| self.is_no_data(v)) {
            trace!(x, y, "bilinear neighbour is NoData, using nearest cell");
            return None;
        }
        let [v00, v10, v01, v11] = corners;
        let v = v00 * (1.0 - tx) * (1.0 - ty)
            + v10 * tx * (1.0 - ty)
            + v01 * (1.0 - tx) * ty
            + v11 * tx * ty;
        v.is_finite().then_some(v)
    }
}
