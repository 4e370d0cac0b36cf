use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Parses a start time from RFC 3339 or 'YYYY-MM-DD HH:MM' (taken as UTC).
pub fn parse_start_time(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(naive.and_utc());
    }
    Err(anyhow!(
        "Invalid start time: '{input}'. Use RFC 3339 ('2025-03-01T09:00:00Z') or 'YYYY-MM-DD HH:MM' (UTC)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_both_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(parse_start_time("2025-03-01T09:00:00Z").unwrap(), expected);
        assert_eq!(parse_start_time("2025-03-01 09:00").unwrap(), expected);
        assert!(parse_start_time("next tuesday").is_err());
    }
}
