//! Configuration for point sampling.

use crate::error::SampleError;

const MAX_DECIMALS: usize = 15;

/// Configuration for [`sample`](crate::sample).
///
/// # Example
///
/// ```
/// use ipftools_sample::SampleConfig;
///
/// let config = SampleConfig::new()
///     .with_interpolate(true)
///     .with_observation_column(Some(3));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    interpolate: bool,
    skip_outside_extent: bool,
    skip_no_data: bool,
    observation_column: Option<usize>,
    no_data: Option<f64>,
    decimals: usize,
    value_column: String,
    residual_column: String,
    abs_residual_column: String,
}

impl SampleConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: nearest-cell lookup, no skipping, no observation column,
    /// NoData taken from the grid, `decimals = 3`, output columns
    /// `value`, `residual` and `absresidual`.
    pub fn new() -> Self {
        Self {
            interpolate: false,
            skip_outside_extent: false,
            skip_no_data: false,
            observation_column: None,
            no_data: None,
            decimals: 3,
            value_column: "value".to_string(),
            residual_column: "residual".to_string(),
            abs_residual_column: "absresidual".to_string(),
        }
    }

    /// Use bilinear interpolation instead of the nearest cell.
    pub fn with_interpolate(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    /// Drop points outside the grid extent.
    pub fn with_skip_outside_extent(mut self, skip: bool) -> Self {
        self.skip_outside_extent = skip;
        self
    }

    /// Drop points whose sampled value is NoData.
    pub fn with_skip_no_data(mut self, skip: bool) -> Self {
        self.skip_no_data = skip;
        self
    }

    /// Sets the 0-based column holding observed values.
    pub fn with_observation_column(mut self, column: Option<usize>) -> Self {
        self.observation_column = column;
        self
    }

    /// Overrides the NoData sentinel for observations and output values.
    pub fn with_no_data(mut self, no_data: Option<f64>) -> Self {
        self.no_data = no_data;
        self
    }

    /// Sets the number of decimals written for appended values.
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    pub fn with_residual_column(mut self, name: impl Into<String>) -> Self {
        self.residual_column = name.into();
        self
    }

    pub fn with_abs_residual_column(mut self, name: impl Into<String>) -> Self {
        self.abs_residual_column = name.into();
        self
    }

    // --- Accessors ---

    pub fn interpolate(&self) -> bool {
        self.interpolate
    }

    pub fn skip_outside_extent(&self) -> bool {
        self.skip_outside_extent
    }

    pub fn skip_no_data(&self) -> bool {
        self.skip_no_data
    }

    pub fn observation_column(&self) -> Option<usize> {
        self.observation_column
    }

    /// Returns the NoData override, if any.
    pub fn no_data(&self) -> Option<f64> {
        self.no_data
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn residual_column(&self) -> &str {
        &self.residual_column
    }

    pub fn abs_residual_column(&self) -> &str {
        &self.abs_residual_column
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.decimals > MAX_DECIMALS {
            return Err(SampleError::InvalidConfig {
                reason: format!("decimals must be <= {MAX_DECIMALS}, got {}", self.decimals),
            });
        }
        if let Some(nd) = self.no_data
            && !nd.is_finite()
        {
            return Err(SampleError::InvalidConfig {
                reason: format!("no_data must be finite, got {nd}"),
            });
        }
        for (what, name) in [
            ("value_column", &self.value_column),
            ("residual_column", &self.residual_column),
            ("abs_residual_column", &self.abs_residual_column),
        ] {
            if name.trim().is_empty() {
                return Err(SampleError::InvalidConfig {
                    reason: format!("{what} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self::new()
    }
}
