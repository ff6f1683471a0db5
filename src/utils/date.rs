use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound};

use super::Timezone;

/// Format used when writing `completed_at` to the store.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format used when writing `registered_date` to the store.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y년 %m월 %d일 %H시 %M분",
];

/// Parse a stored timestamp. Offset-carrying values (RFC 3339) are converted
/// into `timezone`; naive values are taken as already local.
pub(crate) fn parse_timestamp(s: &str, timezone: Timezone) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        // Fractional seconds from other writers are dropped.
        return Some(timezone.naive_from_utc(dt.to_utc()).trunc_subsecs(0));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Parse a stored calendar date (YYYY-MM-DD, YYYYMMDD or a full timestamp).
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(d);
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Reject strftime patterns chrono cannot render.
pub(crate) fn is_valid_format(fmt: &str) -> bool {
    !fmt.is_empty() && !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc() -> Timezone {
        Timezone::Named(chrono_tz::UTC)
    }

    #[test]
    fn parses_store_format() {
        let ts = parse_timestamp("2025-06-02 09:15:30", utc()).unwrap();
        assert_eq!(ts.to_string(), "2025-06-02 09:15:30");
    }

    #[test]
    fn parses_rfc3339_into_timezone() {
        let seoul = Timezone::parse(Some("Asia/Seoul")).unwrap();
        let ts = parse_timestamp("2025-06-01T23:00:00Z", seoul).unwrap();
        assert_eq!(ts.to_string(), "2025-06-02 08:00:00");
    }

    #[test]
    fn parses_korean_display_format() {
        let ts = parse_timestamp("2025년 06월 02일 14시 05분", utc()).unwrap();
        assert_eq!(ts.to_string(), "2025-06-02 14:05:00");
    }

    #[test]
    fn drops_fractional_seconds() {
        let ts = parse_timestamp("2025-06-02T09:15:30.250+00:00", utc()).unwrap();
        assert_eq!(ts.nanosecond(), 0);
    }

    #[test]
    fn rejects_garbage_and_blank() {
        assert!(parse_timestamp("yesterday-ish", utc()).is_none());
        assert!(parse_timestamp("   ", utc()).is_none());
        assert!(parse_timestamp("2025-13-40 10:00:00", utc()).is_none());
    }

    #[test]
    fn parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(parse_date("2025-06-02"), Some(expected));
        assert_eq!(parse_date("20250602"), Some(expected));
        assert_eq!(parse_date(" 2025-06-02 10:00:00 "), Some(expected));
        assert_eq!(parse_date("June 2nd"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn validates_format_strings() {
        assert!(is_valid_format(TIMESTAMP_FORMAT));
        assert!(is_valid_format("%Y년 %m월 %d일 %H시 %M분"));
        assert!(!is_valid_format("%Q"));
        assert!(!is_valid_format(""));
    }
}
