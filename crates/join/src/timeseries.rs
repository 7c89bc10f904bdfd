//! Sorted-merge join of two time series on their timestamps.

use chrono::NaiveDateTime;
use ipftools_points::{TimeSeries, ValueColumn, unique_name};
use tracing::{debug, warn};

use crate::config::JoinConfig;
use crate::error::JoinError;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A joined time series with the problems recovered while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesJoin {
    pub timeseries: TimeSeries,
    pub warnings: Vec<String>,
}

/// Join `ts2` onto `ts1`; see [`join_timeseries_with_warnings`].
///
/// # Errors
///
/// Returns [`JoinError::InvalidConfig`] if `config` is invalid.
pub fn join_timeseries(
    ts1: &TimeSeries,
    ts2: &TimeSeries,
    config: &JoinConfig,
) -> Result<TimeSeries, JoinError> {
    join_timeseries_with_warnings(ts1, ts2, config).map(|j| j.timeseries)
}

/// Join two ascending time series on exact timestamps.
///
/// The result holds the columns of `ts1` followed by those of `ts2`, a `"2"`
/// suffix keeping names unique. Timestamps of `ts1` outside the configured
/// period are skipped; right-only rows are limited to the period as well.
/// An exact timestamp match always produces a combined row. For left and
/// full outer joins a `ts1` timestamp in a gap of `ts2` gets NoData for the
/// `ts2` columns, or linearly interpolated values when
/// [`JoinConfig::interpolate_ts2`] is set and the gap is within
/// [`JoinConfig::max_interpolation_distance_days`].
/// [`JoinType::Natural`](crate::JoinType::Natural) keeps shared timestamps
/// only.
///
/// # Errors
///
/// Returns [`JoinError::InvalidConfig`] if `config` is invalid.
pub fn join_timeseries_with_warnings(
    ts1: &TimeSeries,
    ts2: &TimeSeries,
    config: &JoinConfig,
) -> Result<TimeSeriesJoin, JoinError> {
    config.validate()?;
    let join_type = config.join_type();
    let (t1, t2) = (ts1.timestamps(), ts2.timestamps());
    let (left_cols, right_cols) = (ts1.columns(), ts2.columns());

    let mut names: Vec<String> = left_cols.iter().map(|c| c.name.clone()).collect();
    for c in right_cols {
        let name = unique_name(&c.name, &names);
        names.push(name);
    }

    let mut rows = Rows::new(left_cols.len() + right_cols.len());
    let mut warnings = Vec::new();
    let mut i2 = 0;

    for (i1, &date1) in t1.iter().enumerate() {
        if !config.in_period(date1) {
            continue;
        }
        while i2 < t2.len() && t2[i2] < date1 {
            if join_type.keeps_right() && config.in_period(t2[i2]) {
                rows.push_right_only(t2[i2], left_cols, right_cols, i2);
            }
            i2 += 1;
        }

        if i2 < t2.len() && t2[i2] == date1 {
            rows.push(date1, values_at(left_cols, i1), values_at(right_cols, i2));
            i2 += 1;
            continue;
        }

        if !join_type.keeps_left() {
            continue;
        }
        let right = if config.interpolate_ts2() {
            interpolate(ts2, i2, date1, config, &mut warnings)
        } else {
            no_data(right_cols)
        };
        rows.push(date1, values_at(left_cols, i1), right);
    }

    if join_type.keeps_right() {
        for (i, &date2) in t2.iter().enumerate().skip(i2) {
            if config.in_period(date2) {
                rows.push_right_only(date2, left_cols, right_cols, i);
            }
        }
    }

    let mut columns: Vec<ValueColumn> = left_cols
        .iter()
        .chain(right_cols)
        .zip(names)
        .map(|(c, name)| ValueColumn::new(name, c.no_data, Vec::with_capacity(rows.len())))
        .collect();
    for values in &rows.values {
        for (column, &v) in columns.iter_mut().zip(values) {
            column.values.push(v);
        }
    }
    debug!(
        join_type = %join_type,
        n_left = t1.len(),
        n_right = t2.len(),
        n_joined = rows.len(),
        "time series joined"
    );
    let timeseries = TimeSeries::new(rows.timestamps, columns)?;
    Ok(TimeSeriesJoin {
        timeseries,
        warnings,
    })
}

/// Output rows collected during the merge.
struct Rows {
    width: usize,
    timestamps: Vec<NaiveDateTime>,
    values: Vec<Vec<f64>>,
}

impl Rows {
    fn new(width: usize) -> Self {
        Self {
            width,
            timestamps: Vec::new(),
            values: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.timestamps.len()
    }

    fn push(&mut self, t: NaiveDateTime, left: Vec<f64>, right: Vec<f64>) {
        let mut row = Vec::with_capacity(self.width);
        row.extend(left);
        row.extend(right);
        self.timestamps.push(t);
        self.values.push(row);
    }

    fn push_right_only(
        &mut self,
        t: NaiveDateTime,
        left_cols: &[ValueColumn],
        right_cols: &[ValueColumn],
        i2: usize,
    ) {
        self.push(t, no_data(left_cols), values_at(right_cols, i2));
    }
}

fn values_at(cols: &[ValueColumn], i: usize) -> Vec<f64> {
    cols.iter().map(|c| c.values[i]).collect()
}

fn no_data(cols: &[ValueColumn]) -> Vec<f64> {
    cols.iter().map(|c| c.no_data).collect()
}

/// `ts2` values at `date`, interpolated between records `next - 1` and
/// `next`.
fn interpolate(
    ts2: &TimeSeries,
    next: usize,
    date: NaiveDateTime,
    config: &JoinConfig,
    warnings: &mut Vec<String>,
) -> Vec<f64> {
    let cols = ts2.columns();
    let t2 = ts2.timestamps();
    if next == 0 || next >= t2.len() {
        return no_data(cols);
    }
    let prev = next - 1;
    let span_ms = (t2[next] - t2[prev]).num_milliseconds() as f64;
    if let Some(max_days) = config.max_interpolation_distance_days()
        && span_ms / MILLIS_PER_DAY > max_days
    {
        debug!(
            date = %date,
            gap_days = span_ms / MILLIS_PER_DAY,
            max_days,
            "gap too wide to interpolate"
        );
        return no_data(cols);
    }
    let weight = if span_ms > 0.0 {
        (date - t2[prev]).num_milliseconds() as f64 / span_ms
    } else {
        0.0
    };

    cols.iter()
        .map(|c| {
            let (v0, v1) = (c.values[prev], c.values[next]);
            if c.is_no_data(v0) || c.is_no_data(v1) {
                return c.no_data;
            }
            let v = v0 + weight * (v1 - v0);
            if v.is_finite() {
                v
            } else {
                warn!(date = %date, column = %c.name, "interpolation not finite, copying previous value");
                warnings.push(format!(
                    "{}: interpolating '{}' failed, previous value {v0} copied",
                    date, c.name
                ));
                v0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JoinType;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    const ND: f64 = -999.0;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn series(name: &str, points: &[(u32, f64)]) -> TimeSeries {
        TimeSeries::new(
            points.iter().map(|&(d, _)| day(d)).collect(),
            vec![ValueColumn::new(name, ND, points.iter().map(|&(_, v)| v).collect())],
        )
        .unwrap()
    }

    fn rows(ts: &TimeSeries) -> Vec<(u32, Vec<f64>)> {
        use chrono::Datelike;
        (0..ts.len())
            .map(|i| (ts.timestamps()[i].day(), ts.row(i).unwrap()))
            .collect()
    }

    #[test]
    fn inner_keeps_shared_dates() {
        let a = series("head", &[(1, 1.0), (2, 2.0), (4, 4.0)]);
        let b = series("flux", &[(2, 20.0), (3, 30.0), (4, 40.0)]);
        let cfg = JoinConfig::new().with_join_type(JoinType::Inner);
        let j = join_timeseries(&a, &b, &cfg).unwrap();
        assert_eq!(rows(&j), vec![(2, vec![2.0, 20.0]), (4, vec![4.0, 40.0])]);
        assert_eq!(j.columns()[1].name, "flux");
    }

    #[test]
    fn natural_behaves_like_inner() {
        let a = series("head", &[(1, 1.0), (2, 2.0)]);
        let b = series("flux", &[(2, 20.0), (3, 30.0)]);
        let natural = JoinConfig::new().with_join_type(JoinType::Natural);
        let inner = JoinConfig::new().with_join_type(JoinType::Inner);
        assert_eq!(
            join_timeseries(&a, &b, &natural).unwrap(),
            join_timeseries(&a, &b, &inner).unwrap()
        );
    }

    #[test]
    fn full_outer_merges_in_order() {
        let a = series("head", &[(2, 2.0), (4, 4.0)]);
        let b = series("head", &[(1, 10.0), (2, 20.0), (3, 30.0), (6, 60.0)]);
        let j = join_timeseries(&a, &b, &JoinConfig::new()).unwrap();
        assert_eq!(
            rows(&j),
            vec![
                (1, vec![ND, 10.0]),
                (2, vec![2.0, 20.0]),
                (3, vec![ND, 30.0]),
                (4, vec![4.0, ND]),
                (6, vec![ND, 60.0]),
            ]
        );
        assert_eq!(j.columns()[1].name, "head2");
    }

    #[test]
    fn left_and_right_outer() {
        let a = series("a", &[(1, 1.0), (3, 3.0)]);
        let b = series("b", &[(2, 20.0), (3, 30.0)]);
        let left = JoinConfig::new().with_join_type(JoinType::LeftOuter);
        assert_eq!(
            rows(&join_timeseries(&a, &b, &left).unwrap()),
            vec![(1, vec![1.0, ND]), (3, vec![3.0, 30.0])]
        );
        let right = JoinConfig::new().with_join_type(JoinType::RightOuter);
        assert_eq!(
            rows(&join_timeseries(&a, &b, &right).unwrap()),
            vec![(2, vec![ND, 20.0]), (3, vec![3.0, 30.0])]
        );
    }

    #[test]
    fn exact_match_takes_precedence_over_interpolation() {
        let a = series("a", &[(3, 0.0)]);
        let b = series("b", &[(1, 10.0), (3, 99.0), (5, 50.0)]);
        let cfg = JoinConfig::new()
            .with_join_type(JoinType::LeftOuter)
            .with_interpolate_ts2(true);
        let j = join_timeseries(&a, &b, &cfg).unwrap();
        assert_eq!(rows(&j), vec![(3, vec![0.0, 99.0])]);
    }

    #[test]
    fn full_outer_exact_match_keeps_right_remainder() {
        let a = series("a", &[(1, 10.0)]);
        let b = series("b", &[(1, 20.0), (3, 30.0)]);
        let cfg = JoinConfig::new()
            .with_join_type(JoinType::FullOuter)
            .with_interpolate_ts2(true);
        let j = join_timeseries(&a, &b, &cfg).unwrap();
        assert_eq!(rows(&j), vec![(1, vec![10.0, 20.0]), (3, vec![ND, 30.0])]);
    }

    #[test]
    fn interpolates_within_gap() {
        let a = series("a", &[(2, 0.0), (4, 0.0)]);
        let b = series("b", &[(1, 10.0), (5, 50.0)]);
        let cfg = JoinConfig::new()
            .with_join_type(JoinType::LeftOuter)
            .with_interpolate_ts2(true);
        let j = join_timeseries(&a, &b, &cfg).unwrap();
        assert_relative_eq!(j.columns()[1].values[0], 20.0);
        assert_relative_eq!(j.columns()[1].values[1], 40.0);
    }

    #[test]
    fn interpolation_uses_sub_day_weights() {
        let a = TimeSeries::new(
            vec![NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(6, 0, 0).unwrap()],
            vec![ValueColumn::new("a", ND, vec![0.0])],
        )
        .unwrap();
        let b = series("b", &[(1, 0.0), (2, 4.0)]);
        let cfg = JoinConfig::new()
            .with_join_type(JoinType::LeftOuter)
            .with_interpolate_ts2(true);
        let j = join_timeseries(&a, &b, &cfg).unwrap();
        assert_relative_eq!(j.columns()[1].values[0], 1.0);
    }

    #[test]
    fn distance_cutoff() {
        let a = series("a", &[(5, 0.0)]);
        let b = series("b", &[(1, 10.0), (11, 110.0)]);
        let base = JoinConfig::new()
            .with_join_type(JoinType::LeftOuter)
            .with_interpolate_ts2(true);

        let within = base.clone().with_max_interpolation_distance_days(Some(10.0));
        assert_relative_eq!(
            join_timeseries(&a, &b, &within).unwrap().columns()[1].values[0],
            50.0
        );
        let beyond = base.with_max_interpolation_distance_days(Some(9.5));
        assert_eq!(
            join_timeseries(&a, &b, &beyond).unwrap().columns()[1].values[0],
            ND
        );
    }

    #[test]
    fn no_interpolation_without_both_neighbours() {
        let a = series("a", &[(1, 0.0), (9, 0.0)]);
        let b = series("b", &[(3, 30.0), (5, 50.0)]);
        let cfg = JoinConfig::new()
            .with_join_type(JoinType::LeftOuter)
            .with_interpolate_ts2(true);
        let j = join_timeseries(&a, &b, &cfg).unwrap();
        assert_eq!(j.columns()[1].values, vec![ND, ND]);
    }

    #[test]
    fn no_data_neighbour_blocks_interpolation() {
        let a = series("a", &[(2, 0.0)]);
        let b = TimeSeries::new(
            vec![day(1), day(3)],
            vec![
                ValueColumn::new("b", ND, vec![ND, 3.0]),
                ValueColumn::new("c", -1.0, vec![1.0, 3.0]),
            ],
        )
        .unwrap();
        let cfg = JoinConfig::new()
            .with_join_type(JoinType::LeftOuter)
            .with_interpolate_ts2(true);
        let j = join_timeseries(&a, &b, &cfg).unwrap();
        assert_eq!(j.row(0).unwrap(), vec![0.0, ND, 2.0]);
    }

    #[test]
    fn non_finite_interpolation_copies_previous() {
        let a = series("a", &[(2, 0.0)]);
        let b = series("b", &[(1, f64::INFINITY), (3, 1.0)]);
        let cfg = JoinConfig::new()
            .with_join_type(JoinType::LeftOuter)
            .with_interpolate_ts2(true);
        let j = join_timeseries_with_warnings(&a, &b, &cfg).unwrap();
        assert_eq!(j.timeseries.columns()[1].values[0], f64::INFINITY);
        assert_eq!(j.warnings.len(), 1);
    }

    #[test]
    fn period_window_limits_both_sides() {
        let a = series("a", &[(1, 1.0), (3, 3.0), (5, 5.0)]);
        let b = series("b", &[(2, 20.0), (4, 40.0), (6, 60.0)]);
        let cfg = JoinConfig::new()
            .with_period_start(Some(day(2)))
            .with_period_end(Some(day(4)));
        let j = join_timeseries(&a, &b, &cfg).unwrap();
        assert_eq!(
            rows(&j),
            vec![(2, vec![ND, 20.0]), (3, vec![3.0, ND]), (4, vec![ND, 40.0])]
        );
    }

    #[test]
    fn duplicate_left_date_after_match() {
        let a = series("a", &[(2, 1.0), (2, 2.0)]);
        let b = series("b", &[(1, 10.0), (2, 20.0), (3, 30.0)]);
        let cfg = JoinConfig::new()
            .with_join_type(JoinType::LeftOuter)
            .with_interpolate_ts2(true);
        let j = join_timeseries(&a, &b, &cfg).unwrap();
        // The match consumes the ts2 record; the repeat interpolates with
        // weight 0 from it.
        assert_eq!(rows(&j), vec![(2, vec![1.0, 20.0]), (2, vec![2.0, 20.0])]);
    }

    #[test]
    fn empty_inputs() {
        let a = series("a", &[]);
        let b = series("b", &[(1, 1.0)]);
        let j = join_timeseries(&a, &b, &JoinConfig::new()).unwrap();
        assert_eq!(rows(&j), vec![(1, vec![ND, 1.0])]);
        let inner = JoinConfig::new().with_join_type(JoinType::Inner);
        assert!(join_timeseries(&b, &a, &inner).unwrap().is_empty());
    }
}
