use chrono::{DateTime, Local, NaiveDateTime, SubsecRound, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::AppError;

/// Timezone the board uses to stamp entries and to decide what "today" is.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Timezone {
    Local,
    Named(Tz),
}

impl Timezone {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = value else {
            return Ok(Timezone::Local);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Timezone::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Timezone::Named(chrono_tz::UTC));
        }
        Tz::from_str(trimmed)
            .map(Timezone::Named)
            .map_err(|_| AppError::InvalidTimezone {
                input: trimmed.to_string(),
            })
    }

    /// Wall-clock time in this timezone, without an offset attached.
    pub(crate) fn naive_from_utc(self, utc: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Timezone::Local => utc.with_timezone(&Local).naive_local(),
            Timezone::Named(tz) => utc.with_timezone(&tz).naive_local(),
        }
    }

    /// Current wall-clock time, truncated to whole seconds.
    pub(crate) fn now(self) -> NaiveDateTime {
        self.naive_from_utc(Utc::now()).trunc_subsecs(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Timelike};

    #[test]
    fn parse_none_and_blank_return_local() {
        assert!(matches!(Timezone::parse(None).unwrap(), Timezone::Local));
        assert!(matches!(
            Timezone::parse(Some("  ")).unwrap(),
            Timezone::Local
        ));
        assert!(matches!(
            Timezone::parse(Some("LOCAL")).unwrap(),
            Timezone::Local
        ));
    }

    #[test]
    fn parse_utc_variants() {
        for raw in ["utc", "UTC", "z", "Z"] {
            let tz = Timezone::parse(Some(raw)).unwrap();
            assert!(matches!(tz, Timezone::Named(chrono_tz::UTC)), "{raw}");
        }
    }

    #[test]
    fn parse_named_timezone() {
        let tz = Timezone::parse(Some("Asia/Seoul")).unwrap();
        assert!(matches!(tz, Timezone::Named(chrono_tz::Asia::Seoul)));
    }

    #[test]
    fn parse_invalid_timezone_returns_error() {
        let err = Timezone::parse(Some("Mars/Olympus")).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn naive_from_utc_applies_offset() {
        let tz = Timezone::parse(Some("Asia/Seoul")).unwrap();
        let utc = Utc.with_ymd_and_hms(2025, 6, 1, 20, 30, 0).unwrap();
        let local = tz.naive_from_utc(utc);
        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(local.hour(), 5);
    }

    #[test]
    fn now_has_second_precision() {
        let now = Timezone::Named(chrono_tz::UTC).now();
        assert_eq!(now.nanosecond(), 0);
    }
}
