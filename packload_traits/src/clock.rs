use chrono::{DateTime, Utc};

/// Wall-clock abstraction for timestamps and calendar arithmetic.
///
/// The core never reads the system clock directly; everything time-dependent
/// goes through this trait so tests can pin the clock to a known instant.
pub trait WallClock {
    fn now(&self) -> DateTime<Utc>;
}

/// Default, real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl WallClock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub mod manual {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Deterministic clock whose time is set or advanced manually.
    ///
    /// Used by tests that drive a whole session through explicit time steps
    /// instead of stamping each call individually.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                now: Arc::new(Mutex::new(start)),
            }
        }

        /// Move the clock to an absolute instant.
        pub fn set(&self, at: DateTime<Utc>) {
            if let Ok(mut now) = self.now.lock() {
                *now = at;
            }
        }

        /// Advance the clock by the given duration.
        pub fn advance(&self, d: chrono::Duration) {
            if let Ok(mut now) = self.now.lock() {
                *now += d;
            }
        }
    }

    impl WallClock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.now.lock().map(|g| *g).unwrap_or_else(|_| Utc::now())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::manual::ManualClock;
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn manual_clock_is_set_and_advanced_explicitly() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::minutes(30));
        assert_eq!(clock.now(), start + Duration::minutes(30));

        let later = Utc.with_ymd_and_hms(2026, 3, 3, 8, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn clones_share_the_same_time() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let view = clock.clone();
        clock.advance(Duration::hours(1));
        assert_eq!(view.now(), start + Duration::hours(1));
    }
}
