//! Join of two point datasets on a key column, joining the time series of
//! matched points.

use std::collections::HashMap;

use ipftools_points::{Point, PointDataset};
use tracing::{info, warn};

use crate::config::PointJoinConfig;
use crate::error::JoinError;
use crate::timeseries::join_timeseries_with_warnings;

/// Output of [`join_points`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointJoinResult {
    /// Joined points in the left dataset's column layout.
    pub dataset: PointDataset,
    pub n_matched: usize,
    /// Recovered problems, e.g. duplicate right keys.
    pub warnings: Vec<String>,
}

fn normalise_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Join `right` onto `left` by key column.
///
/// Keys are compared trimmed and case-insensitively. Matched points keep the
/// left point's values; when both carry a time series the two are joined
/// with [`PointJoinConfig::timeseries`], otherwise whichever exists is kept.
/// Unmatched right points are mapped onto the left layout by column name.
/// For duplicate right keys the first point wins.
///
/// # Errors
///
/// Returns [`JoinError::UnknownColumn`] for out-of-range key columns and
/// [`JoinError::InvalidConfig`] for an invalid time-series configuration.
pub fn join_points(
    left: &PointDataset,
    right: &PointDataset,
    config: &PointJoinConfig,
) -> Result<PointJoinResult, JoinError> {
    config.validate()?;
    let (key_l, key_r) = (config.key_column_left(), config.key_column_right());
    check_column("left", key_l, left)?;
    check_column("right", key_r, right)?;

    let mut warnings = Vec::new();
    // Right points already emitted, or ignored as duplicates.
    let mut used = vec![false; right.len()];
    let mut index: HashMap<String, usize> = HashMap::with_capacity(right.len());
    for (i, point) in right.points().iter().enumerate() {
        let key = normalise_key(point.value(key_r).unwrap_or_default());
        if index.contains_key(&key) {
            warn!(key = %key, "duplicate key in right dataset, keeping first");
            warnings.push(format!(
                "duplicate key '{key}' in right dataset, point {} ignored",
                i + 1
            ));
            used[i] = true;
            continue;
        }
        index.insert(key, i);
    }

    let join_type = config.join_type();
    let mut dataset = PointDataset::new(left.column_names().to_vec())?
        .with_timeseries_column(left.timeseries_column(), left.timeseries_extension())?;
    let mut n_matched = 0;

    for point in left.points() {
        let key = normalise_key(point.value(key_l).unwrap_or_default());
        let Some(&r) = index.get(&key) else {
            if join_type.keeps_left() {
                dataset.push(point.clone())?;
            }
            continue;
        };
        used[r] = true;
        n_matched += 1;
        let timeseries = match (&point.timeseries, &right.points()[r].timeseries) {
            (Some(a), Some(b)) => {
                let joined = join_timeseries_with_warnings(a, b, config.timeseries())?;
                warnings.extend(joined.warnings.into_iter().map(|w| format!("{key}: {w}")));
                Some(joined.timeseries)
            }
            (a, b) => a.clone().or_else(|| b.clone()),
        };
        let mut out = Point::new(point.x, point.y, point.column_values.clone());
        out.timeseries = timeseries;
        dataset.push(out)?;
    }

    if join_type.keeps_right() {
        for (point, _) in right.points().iter().zip(&used).filter(|(_, u)| !**u) {
            dataset.push(map_onto(point, right, left, key_r, key_l))?;
        }
    }

    info!(
        join_type = %join_type,
        n_left = left.len(),
        n_right = right.len(),
        n_matched,
        n_joined = dataset.len(),
        "point datasets joined"
    );
    Ok(PointJoinResult {
        dataset,
        n_matched,
        warnings,
    })
}

fn check_column(side: &'static str, column: usize, ds: &PointDataset) -> Result<(), JoinError> {
    let n_columns = ds.column_names().len();
    if column >= n_columns {
        return Err(JoinError::UnknownColumn {
            side,
            column: column + 1,
            n_columns,
        });
    }
    Ok(())
}

/// Copy of a right point laid out in the left dataset's columns.
///
/// Coordinates and the key are taken by position, other columns by name;
/// columns missing on the right are left empty.
fn map_onto(
    point: &Point,
    from: &PointDataset,
    to: &PointDataset,
    key_from: usize,
    key_to: usize,
) -> Point {
    let mut values: Vec<String> = to
        .column_names()
        .iter()
        .map(|name| {
            from.column_index(name)
                .and_then(|i| point.value(i))
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    for (to_idx, from_idx) in [(0, 0), (1, 1), (key_to, key_from)] {
        if let (Some(slot), Some(v)) = (values.get_mut(to_idx), point.value(from_idx)) {
            *slot = v.to_string();
        }
    }
    if let (Some(ts_to), Some(ts_from)) = (to.timeseries_column(), from.timeseries_column())
        && values[ts_to].trim().is_empty()
        && let Some(label) = point.value(ts_from)
    {
        values[ts_to] = label.to_string();
    }

    let mut out = Point::new(point.x, point.y, values);
    out.timeseries = point.timeseries.clone();
    out
}
