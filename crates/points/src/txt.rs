//! Companion time-series text files.
//!
//! ```text
//! 3                      number of records
//! 2,1                    number of columns (incl. date), itype 1 = time series
//! Date,-999              date column
//! Head,-999.99           value columns: name, NoData
//! 20200101,1.25
//! 20200102,1.31
//! 20200102120000,1.40
//! ```

use std::fmt::Write as _;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, warn};

use crate::error::PointsError;
use crate::number::parse_number;
use crate::record::{quote_value, split_record};
use crate::timeseries::{TimeSeries, ValueColumn};

/// Parse a timestamp written as `yyyymmdd`, `yyyymmddhhmmss` or ISO-like
/// `yyyy-mm-dd[ hh:mm:ss]`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');
    let digits = s.chars().all(|c| c.is_ascii_digit());
    if digits && s.len() == 8 {
        return NaiveDate::parse_from_str(s, "%Y%m%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    if digits && s.len() == 14 {
        return NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%S").ok();
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Format a timestamp as `yyyymmdd` at midnight, otherwise `yyyymmddhhmmss`.
pub fn format_timestamp(t: &NaiveDateTime) -> String {
    if t.num_seconds_from_midnight() == 0 {
        t.format("%Y%m%d").to_string()
    } else {
        t.format("%Y%m%d%H%M%S").to_string()
    }
}

/// Read a companion time-series file.
///
/// # Errors
///
/// Returns [`PointsError`] if the file is missing or malformed.
pub fn read_timeseries(path: &Path) -> Result<TimeSeries, PointsError> {
    read_timeseries_counted(path).map(|(ts, _)| ts)
}

/// Like [`read_timeseries`], also returning the number of values that could
/// not be parsed.
pub(crate) fn read_timeseries_counted(path: &Path) -> Result<(TimeSeries, usize), PointsError> {
    let text = std::fs::read_to_string(path).map_err(|e| PointsError::io(path, e))?;
    parse_counted(&text, path)
}

/// Parse companion time-series text; `path` is used for error messages.
///
/// Value tokens that are missing or cannot be parsed become the column's
/// NoData and are logged.
///
/// # Errors
///
/// Returns [`PointsError::Parse`] for malformed headers, dates or record
/// counts, and [`PointsError::NonAscendingTimestamps`] for unsorted dates.
pub fn parse_timeseries(text: &str, path: &Path) -> Result<TimeSeries, PointsError> {
    parse_counted(text, path).map(|(ts, _)| ts)
}

fn parse_counted(text: &str, path: &Path) -> Result<(TimeSeries, usize), PointsError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let mut next_header = |what: &str| {
        lines
            .next()
            .ok_or_else(|| PointsError::parse(path, 0, format!("missing {what}")))
    };

    let (line_no, line) = next_header("record count")?;
    let n_records = header_count(&split_record(line), path, line_no, "record count")?;

    let (line_no, line) = next_header("column count")?;
    let n_columns = header_count(&split_record(line), path, line_no, "column count")?;
    if n_columns < 1 {
        return Err(PointsError::parse(path, line_no, "no date column"));
    }

    let mut columns = Vec::new();
    let (date_line, _) = next_header("date column")?;
    debug!(line = date_line, "skipping date column definition");
    for _ in 1..n_columns {
        let (line_no, line) = next_header("column definition")?;
        let tokens = split_record(line);
        let name = tokens
            .first()
            .ok_or_else(|| PointsError::parse(path, line_no, "empty column definition"))?;
        let no_data = match tokens.get(1) {
            Some(t) => parse_number(t).ok_or_else(|| {
                PointsError::parse(path, line_no, format!("invalid NoData value {t:?}"))
            })?,
            None => -9999.0,
        };
        columns.push(ValueColumn::new(name.clone(), no_data, Vec::new()));
    }

    let mut timestamps = Vec::new();
    let mut n_invalid = 0;
    for _ in 0..n_records {
        let (line_no, line) = lines.next().ok_or_else(|| {
            PointsError::parse(
                path,
                0,
                format!("expected {n_records} records, got {}", timestamps.len()),
            )
        })?;
        let tokens = split_record(line);
        let date = tokens.first().and_then(|t| parse_timestamp(t)).ok_or_else(|| {
            PointsError::parse(path, line_no, format!("invalid date in {line:?}"))
        })?;
        timestamps.push(date);
        for (i, column) in columns.iter_mut().enumerate() {
            let token = tokens.get(i + 1);
            let v = match token.and_then(|t| parse_number(t)) {
                Some(v) => v,
                None => {
                    warn!(
                        path = %path.display(),
                        line = line_no,
                        column = %column.name,
                        value = ?token,
                        "unparsable timeseries value set to NoData"
                    );
                    n_invalid += 1;
                    column.no_data
                }
            };
            column.values.push(v);
        }
    }

    Ok((TimeSeries::new(timestamps, columns)?, n_invalid))
}

fn header_count(
    tokens: &[String],
    path: &Path,
    line: usize,
    what: &str,
) -> Result<usize, PointsError> {
    tokens
        .first()
        .and_then(|t| t.trim().parse::<usize>().ok())
        .ok_or_else(|| PointsError::parse(path, line, format!("invalid {what}")))
}

/// Render a time series in the companion text format.
pub fn format_timeseries(ts: &TimeSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ts.len());
    let _ = writeln!(out, "{},1", ts.columns().len() + 1);
    let _ = writeln!(out, "Date,-999");
    for c in ts.columns() {
        let _ = writeln!(out, "{},{}", quote_value(&c.name), c.no_data);
    }
    for (i, t) in ts.timestamps().iter().enumerate() {
        let _ = write!(out, "{}", format_timestamp(t));
        for c in ts.columns() {
            let _ = write!(out, ",{}", c.values[i]);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = "\
3
3,1
Date,-999
Head,-999.99
\"Flux m3/d\",-1
20200101,1.25,10
20200102,1,25,abc
20200102120000,1.40,12
";

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn parse_sample() {
        let ts = parse_timeseries(SAMPLE, &PathBuf::from("b1.txt")).unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.timestamps()[2], dt(2020, 1, 2, 12));
        assert_eq!(ts.columns()[0].name, "Head");
        assert_eq!(ts.columns()[0].no_data, -999.99);
        assert_eq!(ts.columns()[1].name, "Flux m3/d");
        // "1,25" is two tokens in a comma-delimited record.
        assert_eq!(ts.columns()[0].values, vec![1.25, 1.0, 1.40]);
        assert_eq!(ts.columns()[1].values, vec![10.0, 25.0, 12.0]);
    }

    #[test]
    fn unparsable_value_becomes_no_data() {
        let text = "1\n2\nDate,-999\nHead,-99\n20200101,abc\n";
        let ts = parse_timeseries(text, &PathBuf::from("a.txt")).unwrap();
        assert_eq!(ts.columns()[0].values, vec![-99.0]);
    }

    #[test]
    fn unparsable_and_missing_values_are_counted() {
        let text = "2\n3\nDate,-999\nHead,-99\nFlux,-1\n20200101,abc,1\n20200102,2\n";
        let (ts, n_invalid) = parse_counted(text, &PathBuf::from("a.txt")).unwrap();
        assert_eq!(n_invalid, 2);
        assert_eq!(ts.columns()[0].values, vec![-99.0, 2.0]);
        assert_eq!(ts.columns()[1].values, vec![1.0, -1.0]);
    }

    #[test]
    fn huge_record_count_is_an_error() {
        let text = "18446744073709551615\n2\nDate,-999\nHead,-99\n20200101,1\n";
        let err = parse_timeseries(text, &PathBuf::from("a.txt")).unwrap_err();
        assert!(err.to_string().contains("got 1"));
    }

    #[test]
    fn missing_records() {
        let text = "2\n2\nDate,-999\nHead,-99\n20200101,1\n";
        let err = parse_timeseries(text, &PathBuf::from("a.txt")).unwrap_err();
        assert!(err.to_string().contains("expected 2 records, got 1"));
    }

    #[test]
    fn invalid_date() {
        let text = "1\n2\nDate,-999\nHead,-99\n2020-13-45,1\n";
        let err = parse_timeseries(text, &PathBuf::from("a.txt")).unwrap_err();
        assert!(matches!(err, PointsError::Parse { line: 5, .. }));
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(parse_timestamp("20200315"), Some(dt(2020, 3, 15, 0)));
        assert_eq!(parse_timestamp("20200315060000"), Some(dt(2020, 3, 15, 6)));
        assert_eq!(parse_timestamp("2020-03-15"), Some(dt(2020, 3, 15, 0)));
        assert_eq!(parse_timestamp("2020-03-15 06:00:00"), Some(dt(2020, 3, 15, 6)));
        assert_eq!(parse_timestamp("15/03/2020"), None);
        assert_eq!(format_timestamp(&dt(2020, 3, 15, 0)), "20200315");
        assert_eq!(format_timestamp(&dt(2020, 3, 15, 6)), "20200315060000");
    }

    #[test]
    fn format_then_parse() {
        let ts = parse_timeseries(SAMPLE, &PathBuf::from("b1.txt")).unwrap();
        let again = parse_timeseries(&format_timeseries(&ts), &PathBuf::from("b1.txt")).unwrap();
        assert_eq!(again, ts);
    }
}
