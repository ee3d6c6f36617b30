use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

pub const REPLAY_BASE: &str = "https://app.logrocket.com";

/// Link to a session replay, optionally jumping to `timestamp_ms` into the recording.
pub fn build_session_url(app_id: &str, session_id: &str, timestamp_ms: Option<i64>) -> String {
    let url = format!("{}/{}/sessions/{}", REPLAY_BASE, app_id, session_id);
    match timestamp_ms {
        Some(t) => format!("{}?t={}", url, t),
        None => url,
    }
}

/// Format a timestamp the way the API expects it: UTC, millisecond precision, `Z` suffix.
pub fn format_timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a user supplied date into an API timestamp.
///
/// Accepts RFC 3339 timestamps, timestamps without an offset (read as UTC) and plain
/// `YYYY-MM-DD` dates (UTC midnight).
pub fn parse_api_date(input: &str) -> Option<String> {
    let input = input.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(format_timestamp(&datetime.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(input, format) {
            return Some(format_timestamp(&Utc.from_utc_datetime(&naive)));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| format_timestamp(&Utc.from_utc_datetime(&naive)))
}

/// Format epoch milliseconds as an API timestamp.
pub fn millis_to_api_date(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|datetime| format_timestamp(&datetime))
}
