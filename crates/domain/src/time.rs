//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// UTC timestamp used for fetch times, forecast buckets and entry bookkeeping.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Interpret a naive database timestamp as UTC.
#[must_use]
pub fn from_naive_utc(naive: NaiveDateTime) -> Timestamp {
    naive.and_utc()
}

/// Format a timestamp the way forecast consumers expect it
/// (RFC 3339, UTC offset written as `+00:00`).
#[must_use]
pub fn to_iso(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_format_forecast_datetime_with_utc_offset() {
        let naive = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(to_iso(from_naive_utc(naive)), "2024-06-01T12:00:00+00:00");
    }
}
