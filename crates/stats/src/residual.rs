//! Summary statistics over measured/modeled pairs.

use serde::Serialize;
use tracing::debug;

use crate::error::StatsError;
use crate::{mean, percentile, population_sd, sd, sorted_copy};

/// Descriptive statistics of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStatistics {
    /// Values in ascending order.
    #[serde(skip)]
    pub sorted: Vec<f64>,
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation (÷ count).
    pub sd: f64,
    /// Sample standard deviation (÷ count - 1); NaN below two values.
    pub sample_sd: f64,
    /// `(p, value)` for each requested p-value, in request order.
    pub percentiles: Vec<(f64, f64)>,
}

impl SeriesStatistics {
    fn from_accumulated(acc: Accumulator, values: &[f64], p_values: &[f64]) -> Self {
        let count = acc.count;
        let sorted = sorted_copy(values);
        if count == 0 {
            return Self {
                sorted,
                count,
                sum: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                sd: f64::NAN,
                sample_sd: f64::NAN,
                percentiles: p_values.iter().map(|&p| (p, f64::NAN)).collect(),
            };
        }
        let percentiles = p_values
            .iter()
            .map(|&p| (p, percentile(&sorted, p)))
            .collect();
        Self {
            sorted,
            count,
            sum: acc.sum,
            min: acc.min,
            max: acc.max,
            mean: mean(values),
            sd: population_sd(values),
            sample_sd: sd(values),
            percentiles,
        }
    }

    /// Percentile computed for `p`, if it was requested.
    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|(q, _)| (q - p).abs() < 1e-12)
            .map(|&(_, v)| v)
    }
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, v: f64) {
        self.count += 1;
        self.sum += v;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }
}

/// Statistics of measured values, modeled values and their residuals
/// (`modeled - measured`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidualStatistics {
    count: usize,
    p_values: Vec<f64>,
    measured: SeriesStatistics,
    modeled: SeriesStatistics,
    residual: SeriesStatistics,
    abs_residual: SeriesStatistics,
    rmse: f64,
}

impl ResidualStatistics {
    /// Compute statistics for paired `measured`/`modeled` values.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::LengthMismatch`] if the slices differ in length
    /// and [`StatsError::InvalidPValue`] for p-values outside `[0, 100]`.
    pub fn compute(
        measured: &[f64],
        modeled: &[f64],
        p_values: &[f64],
    ) -> Result<Self, StatsError> {
        if measured.len() != modeled.len() {
            return Err(StatsError::LengthMismatch {
                measured: measured.len(),
                modeled: modeled.len(),
            });
        }
        if let Some(&value) = p_values
            .iter()
            .find(|p| !p.is_finite() || !(0.0..=100.0).contains(*p))
        {
            return Err(StatsError::InvalidPValue { value });
        }

        let n = measured.len();
        let mut residual = Vec::with_capacity(n);
        let mut abs_residual = Vec::with_capacity(n);
        let (mut acc_meas, mut acc_mod) = (Accumulator::new(), Accumulator::new());
        let (mut acc_res, mut acc_abs) = (Accumulator::new(), Accumulator::new());
        let mut sum_sq = 0.0;
        for (&meas, &modl) in measured.iter().zip(modeled) {
            let r = modl - meas;
            acc_meas.add(meas);
            acc_mod.add(modl);
            acc_res.add(r);
            acc_abs.add(r.abs());
            sum_sq += r * r;
            residual.push(r);
            abs_residual.push(r.abs());
        }

        let rmse = if n == 0 {
            f64::NAN
        } else {
            (sum_sq / n as f64).sqrt()
        };
        debug!(count = n, rmse, "residual statistics computed");

        Ok(Self {
            count: n,
            p_values: p_values.to_vec(),
            measured: SeriesStatistics::from_accumulated(acc_meas, measured, p_values),
            modeled: SeriesStatistics::from_accumulated(acc_mod, modeled, p_values),
            residual: SeriesStatistics::from_accumulated(acc_res, &residual, p_values),
            abs_residual: SeriesStatistics::from_accumulated(acc_abs, &abs_residual, p_values),
            rmse,
        })
    }

    /// Convenience wrapper over `(measured, modeled)` pairs.
    ///
    /// # Errors
    ///
    /// See [`ResidualStatistics::compute`].
    pub fn from_pairs(pairs: &[(f64, f64)], p_values: &[f64]) -> Result<Self, StatsError> {
        let (measured, modeled): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
        Self::compute(&measured, &modeled, p_values)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    pub fn measured(&self) -> &SeriesStatistics {
        &self.measured
    }

    pub fn modeled(&self) -> &SeriesStatistics {
        &self.modeled
    }

    pub fn residual(&self) -> &SeriesStatistics {
        &self.residual
    }

    pub fn abs_residual(&self) -> &SeriesStatistics {
        &self.abs_residual
    }

    /// Root mean square of the residuals; NaN for zero pairs.
    pub fn rmse(&self) -> f64 {
        self.rmse
    }
}
