use chrono::{DateTime, NaiveDateTime};

/// Parse an HTTP date header value into epoch milliseconds.
///
/// RFC 7231 section 7.1.1.1 formats, tried in preference order:
/// IMF-fixdate ("Sun, 06 Nov 1994 08:49:37 GMT"), RFC 850
/// ("Sunday, 06-Nov-94 08:49:37 GMT"), ANSI C asctime
/// ("Sun Nov  6 08:49:37 1994"), then RFC 2822 as a lenient fallback.
///
/// Returns `None` when no format matches; callers decide the fallback
/// semantics (an unparseable `Expires` means "already expired").
pub fn parse_http_date_ms(value: &str) -> Option<i64> {
    let value = value.trim();

    // The fixed formats all pin the zone to GMT in the grammar itself, so the
    // wall-clock fields parse as naive times and are interpreted as UTC.
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%a, %d %b %Y %H:%M:%S GMT") {
        return Some(dt.and_utc().timestamp_millis());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%A, %d-%b-%y %H:%M:%S GMT") {
        return Some(dt.and_utc().timestamp_millis());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%a %b %e %H:%M:%S %Y") {
        return Some(dt.and_utc().timestamp_millis());
    }

    // Lenient fallback: RFC 2822 allows numeric offsets
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.timestamp_millis());
    }

    None
}

/// Format epoch milliseconds as an IMF-fixdate string.
pub fn format_http_date_ms(epoch_ms: i64) -> String {
    let dt = DateTime::from_timestamp_millis(epoch_ms).unwrap_or_default();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOV_6_1994_084937: i64 = 784111777000;

    #[test]
    fn imf_fixdate() {
        assert_eq!(
            parse_http_date_ms("Sun, 06 Nov 1994 08:49:37 GMT"),
            Some(NOV_6_1994_084937)
        );
    }

    #[test]
    fn rfc850() {
        assert_eq!(
            parse_http_date_ms("Sunday, 06-Nov-94 08:49:37 GMT"),
            Some(NOV_6_1994_084937)
        );
    }

    #[test]
    fn asctime() {
        assert_eq!(
            parse_http_date_ms("Sun Nov  6 08:49:37 1994"),
            Some(NOV_6_1994_084937)
        );
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_http_date_ms("not a date"), None);
        assert_eq!(parse_http_date_ms(""), None);
        assert_eq!(parse_http_date_ms("-1"), None);
    }

    #[test]
    fn round_trip() {
        let formatted = format_http_date_ms(NOV_6_1994_084937);
        assert_eq!(formatted, "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(parse_http_date_ms(&formatted), Some(NOV_6_1994_084937));
    }
}
