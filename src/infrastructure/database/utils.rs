use chrono::{DateTime, Utc};

use crate::domain::ports::DatabaseError;

/// Parse an RFC 3339 timestamp column into a UTC datetime.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_datetime("2026-08-25T10:00:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-08-25T08:00:00+00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("yesterday").is_err());
    }
}
