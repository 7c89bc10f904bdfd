//! ESRI ASCII (ASC) raster reader and writer.

use std::fmt::Write as _;
use std::path::Path;

use tracing::debug;

use crate::error::GridError;
use crate::grid::Grid;

const DEFAULT_NO_DATA: f64 = -9999.0;

#[derive(Debug, Default)]
struct Header {
    n_cols: Option<usize>,
    n_rows: Option<usize>,
    x: Option<(f64, bool)>,
    y: Option<(f64, bool)>,
    cellsize: Option<f64>,
    no_data: Option<f64>,
}

/// Read an ASC grid from disk.
///
/// # Errors
///
/// Returns [`GridError`] if the file cannot be read or parsed.
pub fn read_asc(path: &Path) -> Result<Grid, GridError> {
    let text = std::fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
    let grid = parse_asc(&text)?;
    debug!(
        path = %path.display(),
        n_cols = grid.n_cols(),
        n_rows = grid.n_rows(),
        "read ASC"
    );
    Ok(grid)
}

/// Parse an ASC grid from text.
///
/// Header keys are case-insensitive. `XLLCENTER`/`YLLCENTER` origins are
/// shifted by half a cell to the lower-left corner. When a header value
/// uses a comma and no dot, commas are treated as decimal separators for
/// the whole file; otherwise commas act as value delimiters.
///
/// # Errors
///
/// Returns [`GridError::Parse`] for missing or malformed header entries,
/// bad value tokens and wrong value counts.
pub fn parse_asc(text: &str) -> Result<Grid, GridError> {
    let mut header = Header::default();
    let mut raw_header_values = Vec::new();
    let mut lines = text.lines().enumerate().peekable();

    while let Some(&(idx, line)) = lines.peek() {
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            lines.next();
            continue;
        };
        if !key.starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }
        let value = tokens.next().ok_or_else(|| GridError::Parse {
            line: idx + 1,
            reason: format!("header key {key} has no value"),
        })?;
        raw_header_values.push((idx + 1, key.to_ascii_uppercase(), value.to_string()));
        lines.next();
    }

    let comma_decimal = raw_header_values
        .iter()
        .any(|(_, _, v)| v.contains(',') && !v.contains('.'));

    for (line, key, value) in &raw_header_values {
        let number = parse_token(value, comma_decimal).ok_or_else(|| GridError::Parse {
            line: *line,
            reason: format!("invalid value {value:?} for {key}"),
        })?;
        let count = || -> Result<usize, GridError> {
            if number >= 1.0 && number.fract() == 0.0 {
                Ok(number as usize)
            } else {
                Err(GridError::Parse {
                    line: *line,
                    reason: format!("{key} must be a positive integer, got {value}"),
                })
            }
        };
        match key.as_str() {
            "NCOLS" => header.n_cols = Some(count()?),
            "NROWS" => header.n_rows = Some(count()?),
            "XLLCORNER" => header.x = Some((number, false)),
            "XLLCENTER" => header.x = Some((number, true)),
            "YLLCORNER" => header.y = Some((number, false)),
            "YLLCENTER" => header.y = Some((number, true)),
            "CELLSIZE" => header.cellsize = Some(number),
            "NODATA_VALUE" => header.no_data = Some(number),
            other => {
                return Err(GridError::Parse {
                    line: *line,
                    reason: format!("unknown header key {other}"),
                });
            }
        }
    }

    let header_end = raw_header_values.last().map_or(0, |(l, _, _)| *l);
    let missing = |name: &str| GridError::Parse {
        line: header_end,
        reason: format!("missing {name}"),
    };
    let n_cols = header.n_cols.ok_or_else(|| missing("NCOLS"))?;
    let n_rows = header.n_rows.ok_or_else(|| missing("NROWS"))?;
    let (x, x_centre) = header.x.ok_or_else(|| missing("XLLCORNER"))?;
    let (y, y_centre) = header.y.ok_or_else(|| missing("YLLCORNER"))?;
    let cellsize = header.cellsize.ok_or_else(|| missing("CELLSIZE"))?;
    let no_data = header.no_data.unwrap_or(DEFAULT_NO_DATA);
    let origin_x = if x_centre { x - cellsize / 2.0 } else { x };
    let origin_y = if y_centre { y - cellsize / 2.0 } else { y };

    let n_cells = n_cols.checked_mul(n_rows).ok_or_else(|| GridError::Parse {
        line: header_end,
        reason: format!("grid dimensions {n_cols}x{n_rows} are too large"),
    })?;
    let mut values = Vec::new();
    for (idx, line) in lines {
        let tokens = line
            .split(|c: char| c.is_whitespace() || (!comma_decimal && c == ','))
            .filter(|t| !t.is_empty());
        for token in tokens {
            let v = parse_token(token, comma_decimal).ok_or_else(|| GridError::Parse {
                line: idx + 1,
                reason: format!("invalid value {token:?}"),
            })?;
            values.push(v);
        }
    }

    if values.len() != n_cells {
        return Err(GridError::Parse {
            line: text.lines().count(),
            reason: format!(
                "expected {n_cells} values for {n_cols}x{n_rows}, got {}",
                values.len()
            ),
        });
    }

    Grid::new(
        n_cols, n_rows, origin_x, origin_y, cellsize, cellsize, no_data, values,
    )
}

fn parse_token(token: &str, comma_decimal: bool) -> Option<f64> {
    if comma_decimal {
        token.replace(',', ".").parse().ok()
    } else {
        token.parse().ok()
    }
}

/// Render a grid as ASC text with `decimals` fraction digits.
///
/// Only square cells can be represented; see [`write_asc`].
pub fn format_asc(grid: &Grid, decimals: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "NCOLS {}", grid.n_cols());
    let _ = writeln!(out, "NROWS {}", grid.n_rows());
    let _ = writeln!(out, "XLLCORNER {}", grid.origin_x());
    let _ = writeln!(out, "YLLCORNER {}", grid.origin_y());
    let _ = writeln!(out, "CELLSIZE {}", grid.cellsize_x());
    let _ = writeln!(out, "NODATA_VALUE {}", grid.no_data());
    for row in grid.values().chunks(grid.n_cols()) {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.decimals$}")).collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
    out
}

/// Write a grid as an ASC file.
///
/// # Errors
///
/// Returns [`GridError::Unsupported`] when the grid's cells are not square,
/// or [`GridError::Io`] on write failure.
pub fn write_asc(path: &Path, grid: &Grid, decimals: usize) -> Result<(), GridError> {
    if (grid.cellsize_x() - grid.cellsize_y()).abs() > f64::EPSILON * grid.cellsize_x() {
        return Err(GridError::Unsupported {
            reason: "ASC grids require square cells".to_string(),
        });
    }
    std::fs::write(path, format_asc(grid, decimals)).map_err(|e| GridError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = "\
NCOLS 3
NROWS 2
XLLCORNER 100.0
YLLCORNER 200.0
CELLSIZE 10.0
NODATA_VALUE -9999
1.0 2.0 3.0
4.0 -9999 6.5
";

    #[test]
    fn parse_basic() {
        let g = parse_asc(BASIC).unwrap();
        assert_eq!(g.n_cols(), 3);
        assert_eq!(g.n_rows(), 2);
        assert_eq!(g.origin_x(), 100.0);
        assert_eq!(g.no_data(), -9999.0);
        assert_eq!(g.values(), &[1.0, 2.0, 3.0, 4.0, -9999.0, 6.5]);
    }

    #[test]
    fn parse_lowercase_keys_and_centre_origin() {
        let text = "ncols 1\nnrows 1\nxllcenter 5\nyllcenter 5\ncellsize 10\nnodata_value -1\n42\n";
        let g = parse_asc(text).unwrap();
        assert_eq!(g.origin_x(), 0.0);
        assert_eq!(g.origin_y(), 0.0);
        assert_eq!(g.values(), &[42.0]);
    }

    #[test]
    fn parse_comma_delimited_values() {
        let text = "NCOLS 2\nNROWS 1\nXLLCORNER 0\nYLLCORNER 0\nCELLSIZE 1.5\nNODATA_VALUE -9999\n1.5,2.5\n";
        assert_eq!(parse_asc(text).unwrap().values(), &[1.5, 2.5]);
    }

    #[test]
    fn parse_comma_decimal_separator() {
        let text = "NCOLS 2\nNROWS 1\nXLLCORNER 0\nYLLCORNER 0\nCELLSIZE 2,5\nNODATA_VALUE -9999\n1,25 3,75\n";
        let g = parse_asc(text).unwrap();
        assert_eq!(g.cellsize_x(), 2.5);
        assert_eq!(g.values(), &[1.25, 3.75]);
    }

    #[test]
    fn missing_nodata_uses_default() {
        let text = "NCOLS 1\nNROWS 1\nXLLCORNER 0\nYLLCORNER 0\nCELLSIZE 1\n7\n";
        assert_eq!(parse_asc(text).unwrap().no_data(), DEFAULT_NO_DATA);
    }

    #[test]
    fn missing_cellsize() {
        let text = "NCOLS 1\nNROWS 1\nXLLCORNER 0\nYLLCORNER 0\n7\n";
        let err = parse_asc(text).unwrap_err();
        assert!(err.to_string().contains("missing CELLSIZE"));
    }

    #[test]
    fn wrong_value_count() {
        let text = BASIC.replace("6.5\n", "");
        let err = parse_asc(&text).unwrap_err();
        assert!(err.to_string().contains("expected 6 values"));
    }

    #[test]
    fn bad_token_reports_line() {
        let text = BASIC.replace("6.5", "abc");
        let err = parse_asc(&text).unwrap_err();
        assert!(matches!(err, GridError::Parse { line: 8, .. }));
    }

    #[test]
    fn fractional_ncols_rejected() {
        let text = BASIC.replace("NCOLS 3", "NCOLS 2.5");
        assert!(parse_asc(&text).is_err());
    }

    #[test]
    fn overflowing_dimensions_rejected() {
        let text = "NCOLS 10000000000\nNROWS 10000000000\nXLLCORNER 0\nYLLCORNER 0\nCELLSIZE 1\n1\n";
        let err = parse_asc(text).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn format_then_parse() {
        let g = parse_asc(BASIC).unwrap();
        let again = parse_asc(&format_asc(&g, 2)).unwrap();
        assert_eq!(again.values(), g.values());
        assert_eq!(again.extent(), g.extent());
    }
}
