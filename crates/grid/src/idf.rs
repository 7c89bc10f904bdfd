//! Binary IDF raster reader and writer.
//!
//! Layout (little-endian, one word per field; 4-byte words for single
//! precision, 8-byte words for double precision):
//!
//! ```text
//! id (1271 | 2295), ncol, nrow,
//! xmin, xmax, ymin, ymax, dmin, dmax, nodata,
//! [ieq: u8, itb: u8, ivf: u8, pad: u8] (+ padding to the word size),
//! dx, dy                 (ieq == 0),
//! top, bot               (itb != 0),
//! nrow * ncol values, northernmost row first
//! ```

use std::path::Path;

use tracing::debug;

use crate::error::GridError;
use crate::grid::Grid;

const SINGLE_PRECISION_ID: i32 = 1271;
const DOUBLE_PRECISION_ID: i32 = 2295;

/// Sequential little-endian word reader.
struct Words<'a> {
    bytes: &'a [u8],
    pos: usize,
    word: usize,
}

impl<'a> Words<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], GridError> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            return Err(GridError::Truncated {
                expected: end,
                got: self.bytes.len(),
            });
        }
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn int(&mut self) -> Result<i64, GridError> {
        let b = self.take(self.word)?;
        Ok(match self.word {
            4 => i64::from(i32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            _ => i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
        })
    }

    fn real(&mut self) -> Result<f64, GridError> {
        let b = self.take(self.word)?;
        Ok(match self.word {
            4 => f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            _ => f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
        })
    }
}

/// Read an IDF grid from disk.
///
/// # Errors
///
/// Returns [`GridError`] if the file cannot be read or is not a valid
/// equidistant IDF.
pub fn read_idf(path: &Path) -> Result<Grid, GridError> {
    let bytes = std::fs::read(path).map_err(|e| GridError::io(path, e))?;
    let grid = parse_idf(&bytes)?;
    debug!(
        path = %path.display(),
        n_cols = grid.n_cols(),
        n_rows = grid.n_rows(),
        "read IDF"
    );
    Ok(grid)
}

/// Parse an IDF grid from an in-memory buffer.
///
/// # Errors
///
/// Returns [`GridError::Truncated`] for short buffers,
/// [`GridError::Unsupported`] for unknown record ids and non-equidistant
/// grids, and [`GridError::InvalidGrid`] for inconsistent geometry.
pub fn parse_idf(bytes: &[u8]) -> Result<Grid, GridError> {
    if bytes.len() < 4 {
        return Err(GridError::Truncated {
            expected: 4,
            got: bytes.len(),
        });
    }
    let id = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let word = match id {
        SINGLE_PRECISION_ID => 4,
        DOUBLE_PRECISION_ID => 8,
        other => {
            return Err(GridError::Unsupported {
                reason: format!("unknown IDF record id {other}"),
            });
        }
    };
    let mut r = Words {
        bytes,
        pos: 0,
        word,
    };
    r.int()?;

    let n_cols = r.int()?;
    let n_rows = r.int()?;
    if n_cols <= 0 || n_rows <= 0 {
        return Err(GridError::InvalidGrid {
            reason: format!("non-positive dimensions {n_cols}x{n_rows}"),
        });
    }
    let (n_cols, n_rows) = (n_cols as usize, n_rows as usize);

    let xmin = r.real()?;
    let xmax = r.real()?;
    let ymin = r.real()?;
    let _ymax = r.real()?;
    let _dmin = r.real()?;
    let _dmax = r.real()?;
    let no_data = r.real()?;

    let flags = r.take(word)?;
    let (ieq, itb) = (flags[0], flags[1]);
    if ieq != 0 {
        return Err(GridError::Unsupported {
            reason: "non-equidistant IDF grids are not supported".to_string(),
        });
    }
    let dx = r.real()?;
    let dy = r.real()?;
    if itb != 0 {
        let _top = r.real()?;
        let _bot = r.real()?;
    }

    let expected = (xmax - xmin) / dx;
    if (expected - n_cols as f64).abs() > 1e-3 {
        debug!(n_cols, expected, "IDF xmax/xmin disagree with ncol * dx");
    }

    let too_large = || GridError::InvalidGrid {
        reason: format!("grid dimensions {n_cols}x{n_rows} are too large"),
    };
    let n = n_cols.checked_mul(n_rows).ok_or_else(too_large)?;
    let needed = n
        .checked_mul(word)
        .and_then(|b| b.checked_add(r.pos))
        .ok_or_else(too_large)?;
    if needed > bytes.len() {
        return Err(GridError::Truncated {
            expected: needed,
            got: bytes.len(),
        });
    }
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        values.push(r.real()?);
    }
    Grid::new(n_cols, n_rows, xmin, ymin, dx, dy, no_data, values)
}

/// Serialise a grid as a single-precision equidistant IDF.
pub fn encode_idf(grid: &Grid) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 * (15 + grid.values().len()));
    let int = |out: &mut Vec<u8>, v: i32| out.extend_from_slice(&v.to_le_bytes());
    int(&mut out, SINGLE_PRECISION_ID);
    int(&mut out, grid.n_cols() as i32);
    int(&mut out, grid.n_rows() as i32);

    let real = |out: &mut Vec<u8>, v: f64| out.extend_from_slice(&(v as f32).to_le_bytes());
    let extent = grid.extent();
    let (dmin, dmax) = grid.min_max().unwrap_or((grid.no_data(), grid.no_data()));
    for v in [
        extent.xmin,
        extent.xmax,
        extent.ymin,
        extent.ymax,
        dmin,
        dmax,
        grid.no_data(),
    ] {
        real(&mut out, v);
    }
    out.extend_from_slice(&[0, 0, 0, 0]);
    real(&mut out, grid.cellsize_x());
    real(&mut out, grid.cellsize_y());
    for &v in grid.values() {
        real(&mut out, v);
    }
    out
}

/// Write a grid as a single-precision IDF file.
///
/// # Errors
///
/// Returns [`GridError::Io`] if the file cannot be written.
pub fn write_idf(path: &Path, grid: &Grid) -> Result<(), GridError> {
    std::fs::write(path, encode_idf(grid)).map_err(|e| GridError::io(path, e))
}
