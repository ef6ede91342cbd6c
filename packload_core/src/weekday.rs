//! Weekday aggregator.
//!
//! Collapses raw strap readings into one representative load value per
//! calendar day, then groups days by weekday. A three-stage pure pipeline:
//! bucket by (day, minute), reduce each minute to a combined left+right
//! value, aggregate minutes into a daily mean. All calendar math happens in
//! one fixed reference offset so a reading near midnight lands on the same
//! day no matter where the server runs.

use std::collections::BTreeMap;

use chrono::{Datelike, FixedOffset, NaiveDate, Timelike, Weekday};
use packload_traits::model::{Measurement, Side};

use crate::util::round2;

/// One calendar day's representative combined load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayLoad {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub combined_kg: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct SideSums {
    left_sum: f64,
    left_n: u32,
    right_sum: f64,
    right_n: u32,
}

impl SideSums {
    /// Combined value for one minute: average left plus average right. A side
    /// with no samples contributes zero.
    fn combined(&self) -> f64 {
        let left = if self.left_n == 0 {
            0.0
        } else {
            self.left_sum / f64::from(self.left_n)
        };
        let right = if self.right_n == 0 {
            0.0
        } else {
            self.right_sum / f64::from(self.right_n)
        };
        left + right
    }
}

/// Reduce a measurement history to one combined load per calendar day,
/// oldest day first. Centre readings carry no strap attribution: they open no
/// minute bucket, so a strap-less day yields no day value at all rather than
/// a spurious zero.
#[must_use]
pub fn day_loads(history: &[Measurement], tz: FixedOffset) -> Vec<DayLoad> {
    let mut minutes: BTreeMap<(NaiveDate, u32), SideSums> = BTreeMap::new();
    for m in history {
        if m.side == Side::Centre {
            continue;
        }
        let local = m.taken_at.with_timezone(&tz);
        let key = (local.date_naive(), local.hour() * 60 + local.minute());
        let sums = minutes.entry(key).or_default();
        if matches!(m.side, Side::Left | Side::Both) {
            sums.left_sum += m.weight_kg;
            sums.left_n += 1;
        }
        if matches!(m.side, Side::Right | Side::Both) {
            sums.right_sum += m.weight_kg;
            sums.right_n += 1;
        }
    }

    let mut days: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for ((date, _minute), sums) in &minutes {
        let (sum, n) = days.entry(*date).or_insert((0.0, 0));
        *sum += sums.combined();
        *n += 1;
    }

    days.into_iter()
        .map(|(date, (sum, n))| DayLoad {
            date,
            weekday: date.weekday(),
            combined_kg: if n == 0 {
                0.0
            } else {
                round2(sum / f64::from(n))
            },
        })
        .collect()
}

/// Day-representative values restricted to one weekday, oldest first. This is
/// the series the forecast engine consumes.
#[must_use]
pub fn day_values_for_weekday(
    history: &[Measurement],
    tz: FixedOffset,
    weekday: Weekday,
) -> Vec<f64> {
    day_loads(history, tz)
        .into_iter()
        .filter(|d| d.weekday == weekday)
        .map(|d| d.combined_kg)
        .collect()
}

/// Mean representative load per weekday, Monday through Sunday. Weekdays with
/// no observed days are absent.
#[must_use]
pub fn weekly_profile(history: &[Measurement], tz: FixedOffset) -> Vec<(Weekday, f64)> {
    let mut per_weekday: BTreeMap<u32, (f64, u32)> = BTreeMap::new();
    for day in day_loads(history, tz) {
        let (sum, n) = per_weekday
            .entry(day.weekday.number_from_monday())
            .or_insert((0.0, 0));
        *sum += day.combined_kg;
        *n += 1;
    }
    per_weekday
        .into_iter()
        .map(|(num, (sum, n))| {
            // number_from_monday is 1-based; Weekday::try_from is 0-based.
            let weekday = Weekday::try_from((num - 1) as u8).unwrap_or(Weekday::Mon);
            (weekday, round2(sum / f64::from(n)))
        })
        .collect()
}
