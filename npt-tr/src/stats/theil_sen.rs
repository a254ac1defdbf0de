//! Theil-Sen robust slope estimate
//!
//! The slope is the median of all pairwise slopes over the series (x is
//! the period index 0..n). Confidence bounds follow the standard normal
//! approximation over the Kendall variance of S, evaluated on the sorted
//! slope list.

use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::HashMap;

/// Result of the Theil-Sen estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TheilSen {
    /// Median pairwise slope
    pub slope: f64,
    /// `median(y) - slope * median(x)`
    pub intercept: f64,
    /// Lower confidence bound on the slope
    pub lower: f64,
    /// Upper confidence bound on the slope
    pub upper: f64,
}

/// Estimate the Theil-Sen slope of `series` against x = 0..n, with a
/// confidence interval at the given level (0.95 for the trend jobs)
pub fn theil_sen(series: &[f64], confidence: f64) -> TheilSen {
    let n = series.len();
    if n < 2 {
        return TheilSen {
            slope: 0.0,
            intercept: series.first().copied().unwrap_or(0.0),
            lower: 0.0,
            upper: 0.0,
        };
    }

    let mut slopes: Vec<f64> = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n - 1 {
        for j in (i + 1)..n {
            slopes.push((series[j] - series[i]) / (j - i) as f64);
        }
    }
    slopes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let slope = median_sorted(&slopes);
    let x_median = (n - 1) as f64 / 2.0;
    let mut sorted_y = series.to_vec();
    sorted_y.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let intercept = median_sorted(&sorted_y) - slope * x_median;

    // Normal-approximation confidence interval over the sorted slopes.
    // x has no ties (period indices); y-ties (zero-filled years) still
    // reduce the Kendall variance.
    let sigma = kendall_sigma(series);
    let z = Normal::standard().inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
    let count = slopes.len() as f64;
    let upper_rank = (((count + z * sigma) / 2.0).round() as usize).min(slopes.len() - 1);
    let lower_rank = ((((count - z * sigma) / 2.0).round() as isize) - 1).max(0) as usize;

    TheilSen {
        slope,
        intercept,
        lower: slopes[lower_rank],
        upper: slopes[upper_rank],
    }
}

/// Square root of the tie-corrected Kendall variance of S over `series`
fn kendall_sigma(series: &[f64]) -> f64 {
    let mut tie_counts: HashMap<u64, f64> = HashMap::new();
    for value in series {
        *tie_counts.entry(value.to_bits()).or_insert(0.0) += 1.0;
    }
    let tie_correction: f64 = tie_counts
        .values()
        .filter(|&&t| t > 1.0)
        .map(|&t| t * (t - 1.0) * (2.0 * t + 5.0))
        .sum();
    let nf = series.len() as f64;
    let var_s = (nf * (nf - 1.0) * (2.0 * nf + 5.0) - tie_correction) / 18.0;
    var_s.max(0.0).sqrt()
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
