//! Sampling results and their JSON summary.

use ipftools_points::PointDataset;
use serde::Serialize;

use crate::error::SampleError;

/// Counts describing one sampling run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleSummary {
    /// Points in the input dataset.
    pub n_points: usize,
    /// Points written to the output dataset.
    pub n_sampled: usize,
    /// Points dropped for lying outside the grid extent.
    pub n_outside_extent: usize,
    /// Points dropped for sampling a NoData cell.
    pub n_no_data: usize,
    /// Points whose observation could not be parsed.
    pub n_invalid_observations: usize,
}

/// Output of [`sample`](crate::sample).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    /// Input points with the sampled columns appended.
    pub dataset: PointDataset,
    /// `(measured, modeled)` pairs with valid values on both sides.
    pub pairs: Vec<(f64, f64)>,
    pub summary: SampleSummary,
    /// Recovered per-point problems.
    pub warnings: Vec<String>,
}

impl SampleResult {
    /// Measured values of the valid pairs.
    pub fn measured(&self) -> Vec<f64> {
        self.pairs.iter().map(|&(m, _)| m).collect()
    }

    /// Modeled values of the valid pairs.
    pub fn modeled(&self) -> Vec<f64> {
        self.pairs.iter().map(|&(_, m)| m).collect()
    }
}

/// Serialize any summary value to a pretty JSON string.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, SampleError> {
    serde_json::to_string_pretty(value).map_err(|e| SampleError::Serialization {
        reason: e.to_string(),
    })
}
