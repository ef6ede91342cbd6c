//! Descriptive statistics over a numeric series. Pure and stateless.

use std::collections::BTreeMap;

use crate::util::round2;

/// Summary of one series, every field rounded to 2 dp.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    /// Most frequent value(s) after 2 dp rounding. Empty when every value is
    /// unique ("no mode").
    pub modes: Vec<f64>,
    /// Population standard deviation (divide by n).
    pub std_dev: f64,
    /// Third standardized moment; 0 when the deviation is 0.
    pub skewness: f64,
    /// Excess kurtosis (fourth standardized moment minus 3), same zero guard.
    pub kurtosis: f64,
}

/// Describe a series. An empty series has no summary.
#[must_use]
pub fn describe(series: &[f64]) -> Option<Summary> {
    if series.is_empty() {
        return None;
    }
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;

    let mut sorted: Vec<f64> = series.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    // Frequencies keyed in hundredths so equal-after-rounding values collapse.
    let mut freq: BTreeMap<i64, usize> = BTreeMap::new();
    for x in series {
        let cents = (round2(*x) * 100.0).round() as i64;
        *freq.entry(cents).or_insert(0) += 1;
    }
    let max_freq = freq.values().copied().max().unwrap_or(0);
    let modes: Vec<f64> = if max_freq <= 1 {
        Vec::new()
    } else {
        freq.iter()
            .filter(|&(_, &count)| count == max_freq)
            .map(|(&cents, _)| cents as f64 / 100.0)
            .collect()
    };

    let var = series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std_dev = var.sqrt();
    let (skewness, kurtosis) = if std_dev == 0.0 {
        (0.0, 0.0)
    } else {
        let m3 = series.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / n;
        let m4 = series.iter().map(|x| (x - mean).powi(4)).sum::<f64>() / n;
        (m3 / std_dev.powi(3), m4 / std_dev.powi(4) - 3.0)
    };

    Some(Summary {
        mean: round2(mean),
        median: round2(median),
        modes,
        std_dev: round2(std_dev),
        skewness: round2(skewness),
        kurtosis: round2(kurtosis),
    })
}
