//! History report selectors.
//!
//! Each selector fetches an immutable history slice for one (user, device)
//! pair, bounded by local calendar days in the reference offset, and attaches
//! descriptive statistics and a trend line over the weight series. Window
//! bounds are end-exclusive: `[start midnight, end midnight)`.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use packload_traits::model::{DeviceId, Measurement, UserId};
use packload_traits::Store;

use crate::error::{map_store_error_dyn, CoreError};
use crate::regress::{fit, LineFit};
use crate::stats::{describe, Summary};

/// One report: the raw slice plus derived numbers. `summary` and `trend` are
/// absent when the slice is too small, which is a normal state for a new
/// pairing, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub measurements: Vec<Measurement>,
    pub summary: Option<Summary>,
    pub trend: Option<LineFit>,
}

impl Report {
    fn over(measurements: Vec<Measurement>) -> Self {
        let weights: Vec<f64> = measurements.iter().map(|m| m.weight_kg).collect();
        Self {
            summary: describe(&weights),
            trend: fit(&weights),
            measurements,
        }
    }
}

/// Midnight of `date` in the reference offset, expressed in UTC.
fn local_midnight_utc(date: NaiveDate, tz: FixedOffset) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    let shifted = naive - Duration::seconds(i64::from(tz.local_minus_utc()));
    DateTime::<Utc>::from_naive_utc_and_offset(shifted, Utc)
}

fn between<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    device: DeviceId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Report, CoreError> {
    let rows = store
        .measurements_between(user, device, from, to)
        .map_err(map_store_error_dyn)?;
    Ok(Report::over(rows))
}

/// The trailing seven local days ending with today, inclusive of today's
/// readings so far.
pub fn last_seven_days<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    device: DeviceId,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Result<Report, CoreError> {
    let today = now.with_timezone(&tz).date_naive();
    let from = local_midnight_utc(today - Duration::days(6), tz);
    let to = local_midnight_utc(today + Duration::days(1), tz);
    between(store, user, device, from, to)
}

/// One local calendar day.
pub fn day_report<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    device: DeviceId,
    date: NaiveDate,
    tz: FixedOffset,
) -> Result<Report, CoreError> {
    let from = local_midnight_utc(date, tz);
    let to = local_midnight_utc(date + Duration::days(1), tz);
    between(store, user, device, from, to)
}

/// One local calendar month.
pub fn month_report<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    device: DeviceId,
    year: i32,
    month: u32,
    tz: FixedOffset,
) -> Result<Report, CoreError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::Validation(format!("invalid month {year}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| CoreError::Validation(format!("invalid month {year}-{month:02}")))?;
    between(
        store,
        user,
        device,
        local_midnight_utc(first, tz),
        local_midnight_utc(next, tz),
    )
}

/// One local calendar year.
pub fn year_report<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    device: DeviceId,
    year: i32,
    tz: FixedOffset,
) -> Result<Report, CoreError> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| CoreError::Validation(format!("invalid year {year}")))?;
    let next = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .ok_or_else(|| CoreError::Validation(format!("invalid year {year}")))?;
    between(
        store,
        user,
        device,
        local_midnight_utc(first, tz),
        local_midnight_utc(next, tz),
    )
}

/// An arbitrary inclusive range of local calendar days.
pub fn range_report<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    device: DeviceId,
    from: NaiveDate,
    to: NaiveDate,
    tz: FixedOffset,
) -> Result<Report, CoreError> {
    if from > to {
        return Err(CoreError::Validation(format!(
            "range start {from} is after range end {to}"
        )));
    }
    between(
        store,
        user,
        device,
        local_midnight_utc(from, tz),
        local_midnight_utc(to + Duration::days(1), tz),
    )
}

/// Heaviest and lightest reading ever recorded for the pair.
pub fn extremes<S: Store + ?Sized>(
    store: &S,
    user: UserId,
    device: DeviceId,
) -> Result<Option<(Measurement, Measurement)>, CoreError> {
    store
        .extreme_measurements(user, device)
        .map_err(map_store_error_dyn)
}
