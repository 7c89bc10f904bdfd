//! Integration tests for joining point datasets by key.

use chrono::{NaiveDate, NaiveDateTime};
use ipftools_join::{JoinConfig, JoinError, JoinType, PointJoinConfig, join_points};
use ipftools_points::{Point, PointDataset, TimeSeries, ValueColumn};

const ND: f64 = -999.0;

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 6, d)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

fn series(name: &str, points: &[(u32, f64)]) -> TimeSeries {
    TimeSeries::new(
        points.iter().map(|&(d, _)| day(d)).collect(),
        vec![ValueColumn::new(name, ND, points.iter().map(|&(_, v)| v).collect())],
    )
    .expect("ascending")
}

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn dataset(columns: &[&str], rows: Vec<(Vec<&str>, Option<TimeSeries>)>) -> PointDataset {
    let mut ds = PointDataset::new(names(columns))
        .expect("unique columns")
        .with_timeseries_column(Some(2), "txt")
        .expect("column in range");
    for (values, ts) in rows {
        let x = values[0].parse().expect("x");
        let y = values[1].parse().expect("y");
        let mut p = Point::new(x, y, names(&values));
        p.timeseries = ts;
        ds.push(p).expect("push");
    }
    ds
}

fn observed() -> PointDataset {
    dataset(
        &["X", "Y", "ID", "LAYER"],
        vec![
            (vec!["10", "20", "B31", "1"], Some(series("head", &[(1, 1.0), (3, 3.0)]))),
            (vec!["30", "40", "B32", "2"], Some(series("head", &[(2, 2.0)]))),
            (vec!["50", "60", "B33", "1"], None),
        ],
    )
}

fn modeled() -> PointDataset {
    dataset(
        &["X", "Y", "NAME", "LAYER", "REMARK"],
        vec![
            (vec!["11", "21", "b31", "1", "ok"], Some(series("head", &[(1, 1.5), (2, 2.5)]))),
            (vec!["31", "41", " B32 ", "2", "ok"], None),
            (vec!["71", "81", "B34", "3", "new"], Some(series("head", &[(5, 5.0)]))),
            (vec!["12", "22", "B31", "9", "dup"], None),
        ],
    )
}

fn ids(ds: &PointDataset) -> Vec<&str> {
    ds.points().iter().map(|p| p.value(2).unwrap_or_default()).collect()
}

#[test]
fn full_outer_join_keeps_everything() {
    let config = PointJoinConfig::new(2, 2);
    let result = join_points(&observed(), &modeled(), &config).expect("join");
    assert_eq!(ids(&result.dataset), vec!["B31", "B32", "B33", "B34"]);
    assert_eq!(result.n_matched, 2);
    assert_eq!(result.dataset.column_names(), observed().column_names());

    let b31 = &result.dataset.points()[0];
    let ts = b31.timeseries.as_ref().expect("joined series");
    assert_eq!(ts.columns()[0].name, "head");
    assert_eq!(ts.columns()[1].name, "head2");
    assert_eq!(ts.len(), 3);
    assert_eq!(ts.row(1), Some(vec![ND, 2.5]));

    // Only the left side has a series.
    assert_eq!(result.dataset.points()[1].timeseries, Some(series("head", &[(2, 2.0)])));

    // Right-only point mapped by column name.
    let b34 = &result.dataset.points()[3];
    assert_eq!(b34.x, 71.0);
    assert_eq!(b34.column_values, names(&["71", "81", "B34", "3"]));
    assert!(b34.timeseries.is_some());

    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("duplicate key 'b31'"));
}

#[test]
fn inner_join_keeps_matches_only() {
    let config = PointJoinConfig::new(2, 2).with_join_type(JoinType::Inner);
    let result = join_points(&observed(), &modeled(), &config).expect("join");
    assert_eq!(ids(&result.dataset), vec!["B31", "B32"]);
}

#[test]
fn left_and_right_outer() {
    let left = PointJoinConfig::new(2, 2).with_join_type(JoinType::LeftOuter);
    let result = join_points(&observed(), &modeled(), &left).expect("join");
    assert_eq!(ids(&result.dataset), vec!["B31", "B32", "B33"]);

    let right = PointJoinConfig::new(2, 2).with_join_type(JoinType::RightOuter);
    let result = join_points(&observed(), &modeled(), &right).expect("join");
    assert_eq!(ids(&result.dataset), vec!["B31", "B32", "B34"]);
}

#[test]
fn timeseries_join_uses_nested_config() {
    let ts_config = JoinConfig::new()
        .with_join_type(JoinType::LeftOuter)
        .with_interpolate_ts2(true);
    let config = PointJoinConfig::new(2, 2)
        .with_join_type(JoinType::Inner)
        .with_timeseries(ts_config);
    let result = join_points(&observed(), &modeled(), &config).expect("join");
    let ts = result.dataset.points()[0].timeseries.as_ref().expect("series");
    // Day 3 lies after the last modeled record: no interpolation.
    assert_eq!(ts.row(0), Some(vec![1.0, 1.5]));
    assert_eq!(ts.row(1), Some(vec![3.0, ND]));
}

#[test]
fn key_column_out_of_range() {
    let config = PointJoinConfig::new(2, 5);
    let err = join_points(&observed(), &modeled(), &config).unwrap_err();
    assert!(matches!(
        err,
        JoinError::UnknownColumn {
            side: "right",
            column: 6,
            n_columns: 5
        }
    ));
}
