//! Forecast engine behavior over realistic same-weekday histories.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};
use packload_core::forecast::{REASON_ASYMMETRY, REASON_INSUFFICIENT};
use packload_core::{forecast, ForecastCfg};
use packload_traits::model::{Classification, Measurement, Side};

fn tz() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

fn reading(at: DateTime<Utc>, side: Side, weight: f64) -> Measurement {
    Measurement {
        id: 0,
        device_id: 1,
        user_id: 1,
        weight_kg: weight,
        taken_at: at,
        side,
        classification: Classification::WithinLimit,
        percent_of_limit: 0.0,
        margin_kg: 0.0,
    }
}

/// One `Both`-side reading per listed Monday, at noon local time.
fn monday_history(per_day_kg: &[f64]) -> Vec<Measurement> {
    // 2026-03-02 is a Monday.
    per_day_kg
        .iter()
        .enumerate()
        .map(|(week, kg)| {
            let at = Utc
                .with_ymd_and_hms(2026, 3, 2 + 7 * week as u32, 15, 0, 0)
                .unwrap();
            // A Both reading counts toward both straps, so the combined
            // day value is twice the raw weight. Halve here to keep the
            // day values equal to `per_day_kg`.
            reading(at, Side::Both, kg / 2.0)
        })
        .collect()
}

fn next_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 30).unwrap()
}

#[test]
fn too_little_history_withholds_the_prediction() {
    let history = monday_history(&[5.0]);
    let f = forecast(&history, next_monday(), tz(), &ForecastCfg::default());
    assert!(f.prediction.is_none());
    assert_eq!(f.reason, Some(REASON_INSUFFICIENT));
    // Partial stats over the single qualifying day are still returned.
    assert_eq!(f.stats.unwrap().mean, 5.0);
}

#[test]
fn centre_only_history_never_predicts_zero() {
    // Centre readings have no strap attribution, so two Mondays of carried
    // weight measured dead-centre must not turn into a confident 0 kg.
    let history = vec![
        reading(
            Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap(),
            Side::Centre,
            7.0,
        ),
        reading(
            Utc.with_ymd_and_hms(2026, 3, 9, 15, 0, 0).unwrap(),
            Side::Centre,
            5.0,
        ),
    ];
    let f = forecast(&history, next_monday(), tz(), &ForecastCfg::default());
    assert!(f.prediction.is_none());
    assert_eq!(f.reason, Some(REASON_INSUFFICIENT));
    assert!(f.stats.is_none());
}

#[test]
fn no_history_at_all_yields_no_stats_either() {
    let f = forecast(&[], next_monday(), tz(), &ForecastCfg::default());
    assert!(f.prediction.is_none());
    assert!(f.stats.is_none());
    assert_eq!(f.reason, Some(REASON_INSUFFICIENT));
}

#[test]
fn symmetric_history_predicts_the_mean() {
    let history = monday_history(&[4.0, 5.0, 6.0]);
    let f = forecast(&history, next_monday(), tz(), &ForecastCfg::default());
    let p = f.prediction.expect("symmetric history must predict");
    assert_eq!(p.predicted_kg, 5.0);
    assert_eq!(p.sample_size, 3);
    assert_eq!(p.target_weekday, Weekday::Mon);
    assert!(f.reason.is_none());
}

#[test]
fn an_outlier_trips_the_confidence_gate() {
    let history = monday_history(&[4.0, 4.1, 3.9, 4.0, 20.0]);
    let f = forecast(&history, next_monday(), tz(), &ForecastCfg::default());
    assert!(f.prediction.is_none());
    assert_eq!(f.reason, Some(REASON_ASYMMETRY));
    // Stats survive the gate for display.
    let stats = f.stats.unwrap();
    assert!(stats.skewness.abs() > 1.0);

    // Without the outlier the same history predicts normally.
    let history = monday_history(&[4.0, 4.1, 3.9, 4.0]);
    let f = forecast(&history, next_monday(), tz(), &ForecastCfg::default());
    assert_eq!(f.prediction.unwrap().predicted_kg, 4.0);
}

#[test]
fn the_gate_threshold_is_configurable() {
    let history = monday_history(&[4.0, 4.1, 3.9, 4.0, 20.0]);
    let permissive = ForecastCfg {
        skew_threshold: 5.0,
        ..ForecastCfg::default()
    };
    let f = forecast(&history, next_monday(), tz(), &permissive);
    assert!(f.prediction.is_some());
}

#[test]
fn other_weekdays_do_not_contaminate_the_sample() {
    let mut history = monday_history(&[4.0, 6.0]);
    // A heavy Tuesday reading must not shift a Monday forecast.
    history.push(reading(
        Utc.with_ymd_and_hms(2026, 3, 3, 15, 0, 0).unwrap(),
        Side::Both,
        50.0,
    ));
    let f = forecast(&history, next_monday(), tz(), &ForecastCfg::default());
    assert_eq!(f.prediction.unwrap().predicted_kg, 5.0);
}
