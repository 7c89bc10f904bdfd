//! IPF point files.
//!
//! ```text
//! 2                  number of points
//! 4                  number of columns
//! X
//! Y
//! ID
//! HEAD
//! 3,txt              1-based column naming companion files (0 = none), extension
//! 155000.0,463000.0,B31,1.25
//! 155100.0,463050.0,B32,-0.40
//! ```
//!
//! Columns 1 and 2 are the X and Y coordinates. Companion references are
//! resolved relative to the IPF's directory as `<value>.<extension>`.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::dataset::{Point, PointDataset};
use crate::error::PointsError;
use crate::number::parse_number;
use crate::record::{quote_value, split_record};
use crate::txt::{format_timeseries, read_timeseries_counted};

/// Result of reading an IPF file.
#[derive(Debug, Clone)]
pub struct IpfRead {
    pub dataset: PointDataset,
    /// Recovered problems, e.g. missing companion files.
    pub warnings: Vec<String>,
}

/// Read an IPF file and its companion time-series files.
///
/// A missing or unreadable companion file is recorded as a warning and the
/// point is kept without a time series. Companion values that cannot be
/// parsed are counted in a warning per file.
///
/// # Errors
///
/// Returns [`PointsError`] if the IPF itself is missing or malformed.
pub fn read_ipf(path: &Path) -> Result<IpfRead, PointsError> {
    let text = std::fs::read_to_string(path).map_err(|e| PointsError::io(path, e))?;
    let mut dataset = parse_ipf(&text, path)?;
    let mut warnings = Vec::new();

    if let Some(ts_col) = dataset.timeseries_column() {
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let ext = dataset.timeseries_extension().to_string();
        for point in dataset.points_mut() {
            let label = point.value(ts_col).unwrap_or_default().trim().to_string();
            if label.is_empty() {
                continue;
            }
            let ts_path = companion_path(&base, &label, &ext);
            match read_timeseries_counted(&ts_path) {
                Ok((ts, n_invalid)) => {
                    if n_invalid > 0 {
                        warnings.push(format!(
                            "timeseries for '{label}': {n_invalid} unparsable value(s) set to NoData"
                        ));
                    }
                    point.timeseries = Some(ts);
                }
                Err(e) => {
                    warn!(path = %ts_path.display(), error = %e, "timeseries not loaded");
                    warnings.push(format!("timeseries for '{label}' not loaded: {e}"));
                }
            }
        }
    }

    info!(
        path = %path.display(),
        n_points = dataset.len(),
        n_columns = dataset.column_names().len(),
        "point file loaded"
    );
    Ok(IpfRead { dataset, warnings })
}

fn companion_path(base: &Path, label: &str, ext: &str) -> PathBuf {
    let rel = label.replace('\\', "/");
    base.join(format!("{rel}.{ext}"))
}

/// Parse IPF text without loading companion files.
///
/// # Errors
///
/// Returns [`PointsError::Parse`] for malformed headers, records with the
/// wrong value count, unparsable coordinates or missing records.
pub fn parse_ipf(text: &str, path: &Path) -> Result<PointDataset, PointsError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let mut header = |what: &str| {
        lines
            .next()
            .ok_or_else(|| PointsError::parse(path, 0, format!("missing {what}")))
    };

    let (line_no, line) = header("point count")?;
    let n_points = first_usize(line)
        .ok_or_else(|| PointsError::parse(path, line_no, "invalid point count"))?;
    let (line_no, line) = header("column count")?;
    let n_columns = first_usize(line)
        .ok_or_else(|| PointsError::parse(path, line_no, "invalid column count"))?;
    if n_columns < 2 {
        return Err(PointsError::parse(
            path,
            line_no,
            format!("need at least X and Y columns, got {n_columns}"),
        ));
    }

    let mut names = Vec::new();
    for _ in 0..n_columns {
        let (line_no, line) = header("column name")?;
        let name = split_record(line)
            .into_iter()
            .next()
            .ok_or_else(|| PointsError::parse(path, line_no, "empty column name"))?;
        names.push(name);
    }

    let (line_no, line) = header("timeseries column definition")?;
    let tokens = split_record(line);
    let ts_index = tokens
        .first()
        .and_then(|t| t.trim().parse::<usize>().ok())
        .ok_or_else(|| PointsError::parse(path, line_no, "invalid timeseries column index"))?;
    if ts_index > n_columns {
        return Err(PointsError::parse(
            path,
            line_no,
            format!("timeseries column {ts_index} exceeds column count {n_columns}"),
        ));
    }
    let ext = tokens
        .get(1)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "txt".to_string());

    let mut dataset = PointDataset::new(names)
        .map_err(|e| PointsError::parse(path, line_no, e.to_string()))?
        .with_timeseries_column(ts_index.checked_sub(1), ext)?;

    for _ in 0..n_points {
        let (line_no, line) = lines.next().ok_or_else(|| {
            PointsError::parse(
                path,
                0,
                format!("expected {n_points} points, got {}", dataset.len()),
            )
        })?;
        let values = split_record(line);
        if values.len() != n_columns {
            return Err(PointsError::parse(
                path,
                line_no,
                format!("expected {n_columns} values, got {}", values.len()),
            ));
        }
        let coord = |i: usize| {
            parse_number(&values[i]).ok_or_else(|| {
                PointsError::parse(path, line_no, format!("invalid coordinate {:?}", values[i]))
            })
        };
        let (x, y) = (coord(0)?, coord(1)?);
        dataset.push(Point::new(x, y, values))?;
    }

    if lines.next().is_some() {
        debug!(path = %path.display(), "ignoring lines after declared point count");
    }
    Ok(dataset)
}

fn first_usize(line: &str) -> Option<usize> {
    split_record(line).first()?.trim().parse().ok()
}

/// Render a dataset as IPF text.
pub fn format_ipf(dataset: &PointDataset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", dataset.len());
    let _ = writeln!(out, "{}", dataset.column_names().len());
    for name in dataset.column_names() {
        let _ = writeln!(out, "{}", quote_value(name));
    }
    let _ = writeln!(
        out,
        "{},{}",
        dataset.timeseries_column().map_or(0, |c| c + 1),
        dataset.timeseries_extension()
    );
    for point in dataset.points() {
        let line: Vec<String> = point.column_values.iter().map(|v| quote_value(v)).collect();
        let _ = writeln!(out, "{}", line.join(","));
    }
    out
}

/// Write a dataset as an IPF file, with companion files for every point
/// that carries a time series.
///
/// Each file is written to a temporary file in its target directory and
/// moved into place only once complete. Companion files are written before
/// the IPF that references them.
///
/// # Errors
///
/// Returns [`PointsError::Io`] if any file cannot be written.
pub fn write_ipf(path: &Path, dataset: &PointDataset) -> Result<(), PointsError> {
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut n_companions = 0;
    if let Some(ts_col) = dataset.timeseries_column() {
        for point in dataset.points() {
            let (Some(ts), Some(label)) = (&point.timeseries, point.value(ts_col)) else {
                continue;
            };
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            let ts_path = companion_path(&base, label, dataset.timeseries_extension());
            if let Some(parent) = ts_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| PointsError::io(parent, e))?;
            }
            write_atomic(&ts_path, format_timeseries(ts).as_bytes())?;
            n_companions += 1;
        }
    }
    write_atomic(path, format_ipf(dataset).as_bytes())?;
    info!(
        path = %path.display(),
        n_points = dataset.len(),
        n_companions,
        "point file written"
    );
    Ok(())
}

/// Write `contents` to `path` through a temporary file in the same
/// directory, replacing `path` only after a complete write.
///
/// # Errors
///
/// Returns [`PointsError::Io`] on any write or rename failure; `path` is
/// left untouched in that case.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PointsError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| PointsError::io(path, e))?;
    tmp.write_all(contents)
        .and_then(|()| tmp.flush())
        .map_err(|e| PointsError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| PointsError::io(path, e.error))?;
    Ok(())
}
