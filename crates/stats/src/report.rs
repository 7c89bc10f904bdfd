//! Appendable CSV report of residual statistics, one row per sampled grid.

use std::fs::OpenOptions;
use std::path::Path;

use tracing::info;

use crate::error::StatsError;
use crate::residual::ResidualStatistics;

/// Report header for the given p-values.
pub fn report_header(p_values: &[f64]) -> Vec<String> {
    let mut header: Vec<String> = ["filename", "avgRes", "sdRes", "avgAbsRes", "sdAbsRes", "RMSE"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for p in p_values {
        header.push(format!("P{p}Res"));
        header.push(format!("P{p}AbsRes"));
    }
    header.push("N".to_string());
    header
}

fn report_row(label: &str, stats: &ResidualStatistics) -> Vec<String> {
    let res = stats.residual();
    let abs = stats.abs_residual();
    let mut row = vec![
        label.to_string(),
        res.mean.to_string(),
        res.sample_sd.to_string(),
        abs.mean.to_string(),
        abs.sample_sd.to_string(),
        stats.rmse().to_string(),
    ];
    // Both series carry the same p-values in the same order.
    for (&(_, r), &(_, a)) in res.percentiles.iter().zip(&abs.percentiles) {
        row.push(r.to_string());
        row.push(a.to_string());
    }
    row.push(stats.count().to_string());
    row
}

/// Append one row for `stats` to the CSV report at `path`.
///
/// The header is written first when the file is new or empty. The row is
/// flushed before returning.
///
/// # Errors
///
/// Returns [`StatsError::Io`] if the file cannot be opened and
/// [`StatsError::Csv`] if writing fails.
pub fn append_report(
    path: &Path,
    label: &str,
    stats: &ResidualStatistics,
) -> Result<(), StatsError> {
    let io_err = |e: std::io::Error| StatsError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let csv_err = |e: csv::Error| StatsError::Csv {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    let is_empty = file.metadata().map_err(io_err)?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_empty {
        writer
            .write_record(report_header(stats.p_values()))
            .map_err(csv_err)?;
    }
    writer
        .write_record(report_row(label, stats))
        .map_err(csv_err)?;
    writer.flush().map_err(io_err)?;

    info!(path = %path.display(), label, n = stats.count(), "report row appended");
    Ok(())
}
