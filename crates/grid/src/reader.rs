//! Format dispatch for grid files.

use std::path::Path;

use tracing::info;

use crate::asc::read_asc;
use crate::error::GridError;
use crate::grid::Grid;
use crate::idf::read_idf;

/// Supported raster file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFormat {
    /// Binary iMOD IDF.
    Idf,
    /// ESRI ASCII grid.
    Asc,
}

impl GridFormat {
    /// Determine the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "idf" => Some(Self::Idf),
            "asc" => Some(Self::Asc),
            _ => None,
        }
    }
}

/// Read a grid, choosing the reader from the file extension.
///
/// # Errors
///
/// Returns [`GridError::UnsupportedFormat`] for unknown extensions,
/// otherwise whatever the format reader reports.
pub fn read_grid(path: &Path) -> Result<Grid, GridError> {
    let format = GridFormat::from_path(path).ok_or_else(|| GridError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let grid = match format {
        GridFormat::Idf => read_idf(path)?,
        GridFormat::Asc => read_asc(path)?,
    };
    info!(
        path = %path.display(),
        n_cols = grid.n_cols(),
        n_rows = grid.n_rows(),
        cellsize = grid.cellsize_x(),
        "grid loaded"
    );
    Ok(grid)
}
