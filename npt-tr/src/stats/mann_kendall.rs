//! Mann-Kendall monotonic trend test
//!
//! Non-parametric test for a monotonic upward or downward trend in a time
//! series. The S statistic is the sum of the signs of all pairwise
//! differences; its variance is corrected for tied values; the normalized
//! Z is tested two-tailed against the standard normal distribution.

use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::HashMap;

/// Direction classification of the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
    NoTrend,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::NoTrend => "no trend",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the Mann-Kendall test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannKendall {
    pub s: i64,
    pub var_s: f64,
    /// Normalized test statistic
    pub z: f64,
    /// Two-tailed p-value
    pub p: f64,
    /// Whether |z| exceeds the critical value at the given alpha
    pub significant: bool,
    pub trend: Trend,
}

/// Run the Mann-Kendall test at significance level `alpha`
/// (0.05 for the trend jobs)
pub fn mann_kendall(series: &[f64], alpha: f64) -> MannKendall {
    let n = series.len();

    let mut s: i64 = 0;
    for k in 0..n.saturating_sub(1) {
        for j in (k + 1)..n {
            s += match series[j].partial_cmp(&series[k]) {
                Some(std::cmp::Ordering::Greater) => 1,
                Some(std::cmp::Ordering::Less) => -1,
                _ => 0,
            };
        }
    }

    // Tie groups: exact float equality, matching the rank-test definition
    let mut tie_counts: HashMap<u64, f64> = HashMap::new();
    for value in series {
        *tie_counts.entry(value.to_bits()).or_insert(0.0) += 1.0;
    }
    let nf = n as f64;
    let tie_correction: f64 = tie_counts
        .values()
        .filter(|&&t| t > 1.0)
        .map(|&t| t * (t - 1.0) * (2.0 * t + 5.0))
        .sum();
    let var_s = (nf * (nf - 1.0) * (2.0 * nf + 5.0) - tie_correction) / 18.0;

    let z = if var_s > 0.0 {
        if s > 0 {
            (s as f64 - 1.0) / var_s.sqrt()
        } else if s < 0 {
            (s as f64 + 1.0) / var_s.sqrt()
        } else {
            0.0
        }
    } else {
        0.0
    };

    let normal = Normal::standard();
    let p = 2.0 * (1.0 - normal.cdf(z.abs()));
    let significant = z.abs() > normal.inverse_cdf(1.0 - alpha / 2.0);

    let trend = if significant && z > 0.0 {
        Trend::Increasing
    } else if significant && z < 0.0 {
        Trend::Decreasing
    } else {
        Trend::NoTrend
    };

    MannKendall {
        s,
        var_s,
        z,
        p,
        significant,
        trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_increasing_series_trends_up() {
        let series: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let result = mann_kendall(&series, 0.05);
        assert_eq!(result.s, 66); // n*(n-1)/2 concordant pairs
        assert_eq!(result.trend, Trend::Increasing);
        assert!(result.significant);
        assert!(result.p < 0.05);
    }

    #[test]
    fn strictly_decreasing_series_trends_down() {
        let series: Vec<f64> = (0..12).rev().map(|i| i as f64).collect();
        let result = mann_kendall(&series, 0.05);
        assert_eq!(result.trend, Trend::Decreasing);
        assert!(result.z < 0.0);
    }

    #[test]
    fn constant_series_has_no_trend() {
        let series = vec![3.0; 11];
        let result = mann_kendall(&series, 0.05);
        assert_eq!(result.s, 0);
        assert_eq!(result.z, 0.0);
        assert_eq!(result.trend, Trend::NoTrend);
        assert!(!result.significant);
    }

    #[test]
    fn short_noisy_series_is_not_significant() {
        let series = vec![1.0, 3.0, 2.0, 4.0, 1.5];
        let result = mann_kendall(&series, 0.05);
        assert_eq!(result.trend, Trend::NoTrend);
        assert!((0.0..=1.0).contains(&result.p));
    }

    #[test]
    fn ties_reduce_the_variance() {
        let tied = vec![1.0, 2.0, 2.0, 2.0, 3.0, 4.0];
        let untied = vec![1.0, 2.0, 2.1, 2.2, 3.0, 4.0];
        let with_ties = mann_kendall(&tied, 0.05);
        let without_ties = mann_kendall(&untied, 0.05);
        assert!(with_ties.var_s < without_ties.var_s);
    }
}
