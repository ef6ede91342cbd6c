//! Same-weekday load forecasting.
//!
//! Composes the weekday aggregator and the statistics engine: the predicted
//! load for a future date is the mean of prior day-representative values
//! sharing that date's weekday, withheld when the sample is too small or too
//! asymmetric to trust.

use chrono::{Datelike, FixedOffset, NaiveDate, Weekday};
use packload_traits::model::Measurement;
use tracing::debug;

use crate::stats::{describe, Summary};
use crate::weekday::day_values_for_weekday;

pub const REASON_INSUFFICIENT: &str = "insufficient same-weekday history";
pub const REASON_ASYMMETRY: &str = "high asymmetry reduces reliability";

/// Forecast tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastCfg {
    /// Absolute skewness above which a point forecast is withheld. A
    /// conservative heuristic, deliberately configurable.
    pub skew_threshold: f64,
    /// Minimum qualifying days before predicting.
    pub min_samples: usize,
}

impl Default for ForecastCfg {
    fn default() -> Self {
        Self {
            skew_threshold: 1.0,
            min_samples: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub predicted_kg: f64,
    pub sample_size: usize,
    pub target_weekday: Weekday,
}

/// Forecast result. `stats` is returned even when the prediction is withheld
/// so callers can still display the underlying distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub prediction: Option<Prediction>,
    pub stats: Option<Summary>,
    pub reason: Option<&'static str>,
}

/// Predict the load for `target_date` from same-weekday history.
#[must_use]
pub fn forecast(
    history: &[Measurement],
    target_date: NaiveDate,
    tz: FixedOffset,
    cfg: &ForecastCfg,
) -> Forecast {
    let target_weekday = target_date.weekday();
    let values = day_values_for_weekday(history, tz, target_weekday);

    if values.len() < cfg.min_samples {
        debug!(
            %target_weekday,
            qualifying = values.len(),
            "prediction withheld, not enough history"
        );
        return Forecast {
            prediction: None,
            stats: describe(&values),
            reason: Some(REASON_INSUFFICIENT),
        };
    }

    let stats = describe(&values);
    let Some(summary) = stats.as_ref() else {
        return Forecast {
            prediction: None,
            stats: None,
            reason: Some(REASON_INSUFFICIENT),
        };
    };

    if summary.skewness.abs() > cfg.skew_threshold {
        debug!(
            %target_weekday,
            skewness = summary.skewness,
            "prediction withheld, sample too asymmetric"
        );
        return Forecast {
            prediction: None,
            stats,
            reason: Some(REASON_ASYMMETRY),
        };
    }

    Forecast {
        prediction: Some(Prediction {
            predicted_kg: summary.mean,
            sample_size: values.len(),
            target_weekday,
        }),
        stats,
        reason: None,
    }
}
