//! Per-point grid sampling and residual computation.

use ipftools_grid::{Grid, is_no_data};
use ipftools_points::{Point, PointDataset, format_number, parse_number, unique_name};
use tracing::{debug, info, warn};

use crate::config::SampleConfig;
use crate::error::SampleError;
use crate::output::{SampleResult, SampleSummary};

/// Sample `grid` at every point of `points`.
///
/// Each emitted point is a copy of its input point with the sampled value
/// appended, followed by the residual (`modeled - measured`) and absolute
/// residual when an observation column is configured. Points outside the
/// grid or on NoData cells are dropped only when the matching skip option
/// is set. Unparsable observations never abort: they are reported in
/// [`SampleResult::warnings`] and written with NoData residuals.
///
/// The inputs are not modified; calling this twice with the same inputs
/// yields equal results.
///
/// # Errors
///
/// Returns [`SampleError::InvalidConfig`] if the configuration is invalid or
/// the observation column does not exist in `points`.
pub fn sample(
    points: &PointDataset,
    grid: &Grid,
    config: &SampleConfig,
) -> Result<SampleResult, SampleError> {
    config.validate()?;
    let n_input_columns = points.column_names().len();
    if let Some(c) = config.observation_column()
        && c >= n_input_columns
    {
        return Err(SampleError::InvalidConfig {
            reason: format!(
                "observation column {} out of range for {n_input_columns} columns",
                c + 1
            ),
        });
    }

    let no_data = config.no_data().unwrap_or(grid.no_data());
    let decimals = config.decimals();
    let extent = grid.extent();

    let mut columns = points.column_names().to_vec();
    let value_name = points.unique_column_name(config.value_column());
    columns.push(value_name);
    if config.observation_column().is_some() {
        let residual_name = unique_name(config.residual_column(), &columns);
        columns.push(residual_name);
        let abs_name = unique_name(config.abs_residual_column(), &columns);
        columns.push(abs_name);
    }
    let mut dataset = PointDataset::new(columns)?
        .with_timeseries_column(points.timeseries_column(), points.timeseries_extension())?;

    let mut summary = SampleSummary {
        n_points: points.len(),
        ..SampleSummary::default()
    };
    let mut pairs = Vec::new();
    let mut warnings = Vec::new();

    for (i, point) in points.points().iter().enumerate() {
        if config.skip_outside_extent() && !extent.contains(point.x, point.y) {
            debug!(index = i, x = point.x, y = point.y, "outside grid extent, skipped");
            summary.n_outside_extent += 1;
            continue;
        }

        let raw = if config.interpolate() {
            grid.interpolated_value(point.x, point.y)
        } else {
            grid.value(point.x, point.y)
        };
        let modeled_is_no_data = grid.is_no_data(raw);
        if config.skip_no_data() && modeled_is_no_data {
            debug!(index = i, x = point.x, y = point.y, "NoData cell, skipped");
            summary.n_no_data += 1;
            continue;
        }
        let modeled = if modeled_is_no_data { no_data } else { raw };

        let mut values = point.column_values.clone();
        values.push(format_number(modeled, decimals));

        if let Some(obs_col) = config.observation_column() {
            let text = point.value(obs_col).unwrap_or_default();
            let (residual, abs_residual) = match parse_number(text) {
                None => {
                    warn!(index = i, value = text, "unparsable observation");
                    warnings.push(format!(
                        "point {} ({}, {}): observation {text:?} is not a number",
                        i + 1,
                        point.x,
                        point.y
                    ));
                    summary.n_invalid_observations += 1;
                    (no_data, no_data)
                }
                Some(measured)
                    if is_no_data(measured, no_data) || is_no_data(modeled, no_data) =>
                {
                    (no_data, no_data)
                }
                Some(measured) => {
                    pairs.push((measured, modeled));
                    let r = modeled - measured;
                    (r, r.abs())
                }
            };
            values.push(format_number(residual, decimals));
            values.push(format_number(abs_residual, decimals));
        }

        let mut out = Point::new(point.x, point.y, values);
        out.timeseries = point.timeseries.clone();
        dataset.push(out)?;
        summary.n_sampled += 1;
    }

    info!(
        n_points = summary.n_points,
        n_sampled = summary.n_sampled,
        n_outside_extent = summary.n_outside_extent,
        n_no_data = summary.n_no_data,
        n_invalid_observations = summary.n_invalid_observations,
        n_pairs = pairs.len(),
        "points sampled"
    );

    Ok(SampleResult {
        dataset,
        pairs,
        summary,
        warnings,
    })
}
