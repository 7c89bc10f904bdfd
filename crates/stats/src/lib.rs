//! Statistical helpers for comparing sampled grid values with observations.
//!
//! Empty input yields NaN rather than panicking; residual summaries over
//! zero pairs are all-NaN.

mod error;
mod report;
mod residual;

pub use error::StatsError;
pub use report::{append_report, report_header};
pub use residual::{ResidualStatistics, SeriesStatistics};

/// Arithmetic mean of a slice. Returns NaN if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns NaN if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator.
/// Returns NaN if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Population standard deviation (N denominator). Returns NaN if empty.
pub fn population_sd(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let nf = data.len() as f64;
    let mean = data.iter().sum::<f64>() / nf;
    (data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / nf).sqrt()
}

/// Percentile `p` (0-100) of pre-sorted data, NIST method 7.
///
/// `rank = p / 100 * (n - 1) + 1`; the result interpolates linearly between
/// the values at `floor(rank)` and the next rank (1-based). `p` is clamped
/// to `[0, 100]`.
///
/// **Expects pre-sorted input** (caller's responsibility). Returns NaN if
/// empty.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
    let rank = p / 100.0 * (n - 1) as f64 + 1.0;
    let k = rank.floor() as usize;
    let f = rank - rank.floor();
    if k == 0 {
        sorted[0]
    } else if k >= n {
        sorted[n - 1]
    } else {
        sorted[k - 1] + f * (sorted[k] - sorted[k - 1])
    }
}

/// Sorted copy of `data`; NaN compares equal to everything.
pub fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_empty() {
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_sd() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sd(&data), 2.138090, epsilon = 1e-6);
    }

    #[test]
    fn test_sd_single() {
        assert!(sd(&[5.0]).is_nan());
    }

    #[test]
    fn test_population_sd() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(population_sd(&data), 2.0, epsilon = 1e-12);
        assert_eq!(population_sd(&[3.0]), 0.0);
        assert!(population_sd(&[]).is_nan());
    }

    #[test]
    fn test_variance_two() {
        // [3.0, 7.0]: mean=5, sum_sq=8, var=8/1=8
        assert_relative_eq!(variance(&[3.0, 7.0]), 8.0, epsilon = 1e-10);
    }

    #[test]
    fn test_percentile_one_to_five() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(percentile(&sorted, 50.0), 3.0);
        assert_relative_eq!(percentile(&sorted, 0.0), 1.0);
        assert_relative_eq!(percentile(&sorted, 100.0), 5.0);
        assert_relative_eq!(percentile(&sorted, 25.0), 2.0);
    }

    #[test]
    fn test_percentile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        // p=10 -> rank=1.4 -> 1 + 0.4*(2-1)
        assert_relative_eq!(percentile(&sorted, 10.0), 1.4, epsilon = 1e-10);
        let ten: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert_relative_eq!(percentile(&ten, 30.0), 3.7, epsilon = 1e-10);
    }

    #[test]
    fn test_percentile_clamped() {
        let sorted = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&sorted, -5.0), 1.0);
        assert_eq!(percentile(&sorted, 250.0), 3.0);
    }

    #[test]
    fn test_percentile_edges() {
        assert!(percentile(&[], 50.0).is_nan());
        assert_eq!(percentile(&[7.5], 90.0), 7.5);
    }

    #[test]
    fn test_sorted_copy() {
        assert_eq!(sorted_copy(&[3.0, -1.0, 2.0]), vec![-1.0, 2.0, 3.0]);
    }
}
