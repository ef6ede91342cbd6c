//! Ordinary least-squares line fit over an index-ordered series.
//!
//! The independent variable is the 1-based position of each element; samples
//! are assumed equally spaced. Pure and stateless.

use crate::util::round2;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Fit y = slope * x + intercept with x = 1..=n. Needs at least 2 points.
#[must_use]
pub fn fit(series: &[f64]) -> Option<LineFit> {
    if series.len() < 2 {
        return None;
    }
    let n = series.len() as f64;
    let mean_x = (n + 1.0) / 2.0;
    let mean_y = series.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, y) in series.iter().enumerate() {
        let dx = (i + 1) as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = mean_y - slope * mean_x;
    Some(LineFit {
        slope: round2(slope),
        intercept: round2(intercept),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_two_points_has_no_fit() {
        assert!(fit(&[]).is_none());
        assert!(fit(&[3.0]).is_none());
    }

    #[test]
    fn perfectly_linear_series_recovers_slope_and_intercept() {
        let f = fit(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_eq!(f.slope, 2.0);
        assert_eq!(f.intercept, 0.0);
    }

    #[test]
    fn flat_series_has_zero_slope() {
        let f = fit(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(f.slope, 0.0);
        assert_eq!(f.intercept, 5.0);
    }

    #[test]
    fn noisy_series_stays_close_to_the_trend() {
        let f = fit(&[1.1, 1.9, 3.1, 3.9, 5.0]).unwrap();
        assert!((f.slope - 1.0).abs() < 0.05, "slope was {}", f.slope);
        assert!(f.intercept.abs() < 0.15, "intercept was {}", f.intercept);
    }
}
