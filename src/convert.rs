//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;

use crate::config::{JoinToml, SampleToml};

use ipftools_join::{JoinConfig, JoinType};
use ipftools_points::parse_timestamp;
use ipftools_sample::SampleConfig;

/// Parses a join type name (`inner`, `left`, `right`, `full`, `natural`).
pub fn parse_join_type(s: &str) -> Result<JoinType> {
    s.parse::<JoinType>()
        .with_context(|| format!("invalid join type: {s:?}"))
}

/// Parses a date given as `yyyymmdd`, `yyyymmddhhmmss` or `yyyy-mm-dd`.
pub fn parse_date(s: &str) -> Result<NaiveDateTime> {
    match parse_timestamp(s) {
        Some(t) => Ok(t),
        None => bail!("invalid date: {s:?}, expected yyyymmdd"),
    }
}

/// Parses a comma-separated list of percentiles in `[0, 100]`.
pub fn parse_pvalues(s: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for token in s.split([',', ';', ' ']).filter(|t| !t.is_empty()) {
        let p: f64 = token
            .parse()
            .with_context(|| format!("invalid percentile: {token:?}"))?;
        if !(0.0..=100.0).contains(&p) {
            bail!("percentile must be within [0, 100], got {p}");
        }
        out.push(p);
    }
    Ok(out)
}

/// Builds a [`SampleConfig`] from the TOML sample section.
///
/// `observation_column` is the already resolved 0-based column index.
pub fn build_sample_config(
    toml: &SampleToml,
    observation_column: Option<usize>,
) -> Result<SampleConfig> {
    let cfg = SampleConfig::new()
        .with_interpolate(toml.interpolate)
        .with_skip_outside_extent(toml.skip_outside_extent)
        .with_skip_no_data(toml.skip_no_data)
        .with_observation_column(observation_column)
        .with_no_data(toml.no_data)
        .with_decimals(toml.decimals)
        .with_value_column(&toml.value_column)
        .with_residual_column(&toml.residual_column)
        .with_abs_residual_column(&toml.abs_residual_column);
    cfg.validate().context("invalid [sample] configuration")?;
    Ok(cfg)
}

/// Builds a [`JoinConfig`] from the TOML join section.
pub fn build_join_config(toml: &JoinToml) -> Result<JoinConfig> {
    let start = toml.period_start.as_deref().map(parse_date).transpose()?;
    let end = toml.period_end.as_deref().map(parse_date).transpose()?;
    let cfg = JoinConfig::new()
        .with_join_type(parse_join_type(&toml.join_type)?)
        .with_period_start(start)
        .with_period_end(end)
        .with_max_interpolation_distance_days(toml.max_interpolation_distance_days)
        .with_interpolate_ts2(toml.interpolate_ts2);
    cfg.validate().context("invalid [join] configuration")?;
    Ok(cfg)
}
