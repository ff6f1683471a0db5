use chrono::{NaiveDate, NaiveDateTime};

use crate::utils::Timezone;

/// Source of "now" for stamping entries and deciding what today is.
pub(crate) trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SystemClock {
    timezone: Timezone,
}

impl SystemClock {
    pub(crate) fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        self.timezone.now()
    }
}

#[cfg(test)]
pub(crate) use fixed::FixedClock;

#[cfg(test)]
mod fixed {
    use std::cell::Cell;

    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    use super::Clock;

    /// Manually driven clock for tests.
    #[derive(Debug)]
    pub(crate) struct FixedClock {
        now: Cell<NaiveDateTime>,
    }

    impl FixedClock {
        pub(crate) fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Self {
            let now = NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| date.and_hms_opt(h, min, s))
                .expect("valid fixed time");
            Self {
                now: Cell::new(now),
            }
        }

        pub(crate) fn advance(&self, seconds: i64) {
            self.now.set(self.now.get() + TimeDelta::seconds(seconds));
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.now.get()
        }
    }
}
