use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level ipftools configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IpftoolsConfig {
    /// Sampling settings.
    #[serde(default)]
    pub sample: SampleToml,

    /// Join settings.
    #[serde(default)]
    pub join: JoinToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleToml {
    #[serde(default)]
    pub interpolate: bool,
    #[serde(default)]
    pub skip_outside_extent: bool,
    #[serde(default)]
    pub skip_no_data: bool,
    /// Column name or 1-based index.
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(default)]
    pub no_data: Option<f64>,
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    #[serde(default = "default_residual_column")]
    pub residual_column: String,
    #[serde(default = "default_abs_residual_column")]
    pub abs_residual_column: String,
    #[serde(default)]
    pub report: Option<PathBuf>,
    #[serde(default = "default_p_values")]
    pub p_values: Vec<f64>,
}

impl Default for SampleToml {
    fn default() -> Self {
        Self {
            interpolate: false,
            skip_outside_extent: false,
            skip_no_data: false,
            observation: None,
            no_data: None,
            decimals: default_decimals(),
            value_column: default_value_column(),
            residual_column: default_residual_column(),
            abs_residual_column: default_abs_residual_column(),
            report: None,
            p_values: default_p_values(),
        }
    }
}

fn default_decimals() -> usize {
    3
}
fn default_value_column() -> String {
    "value".to_string()
}
fn default_residual_column() -> String {
    "residual".to_string()
}
fn default_abs_residual_column() -> String {
    "absresidual".to_string()
}
fn default_p_values() -> Vec<f64> {
    vec![10.0, 50.0, 90.0]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinToml {
    #[serde(default = "default_join_type")]
    pub join_type: String,
    /// `yyyymmdd` or `yyyymmddhhmmss`.
    #[serde(default)]
    pub period_start: Option<String>,
    #[serde(default)]
    pub period_end: Option<String>,
    #[serde(default)]
    pub max_interpolation_distance_days: Option<f64>,
    #[serde(default)]
    pub interpolate_ts2: bool,
}

impl Default for JoinToml {
    fn default() -> Self {
        Self {
            join_type: default_join_type(),
            period_start: None,
            period_end: None,
            max_interpolation_distance_days: None,
            interpolate_ts2: false,
        }
    }
}

fn default_join_type() -> String {
    "full".to_string()
}

/// Reads the TOML file at `path`, or returns defaults when none is given.
pub fn load(path: Option<&Path>) -> Result<IpftoolsConfig> {
    let Some(path) = path else {
        return Ok(IpftoolsConfig::default());
    };
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}
