//! Helpers for the shapes the backend actually puts on the wire.
//!
//! MySQL `BOOLEAN` columns come back as `0`/`1`, and `DATETIME` columns are
//! serialized by the backend as RFC 2822 strings.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolLike {
    Bool(bool),
    Int(i64),
    Text(String),
}

pub fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BoolLike>::deserialize(deserializer)?;
    Ok(match raw {
        None => false,
        Some(BoolLike::Bool(b)) => b,
        Some(BoolLike::Int(i)) => i != 0,
        Some(BoolLike::Text(s)) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
    })
}

pub const NAIVE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a backend timestamp. Naive values are taken as UTC.
pub fn parse_backend_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(raw) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .map(|t| t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[derive(Deserialize)]
    struct Flag {
        #[serde(default, deserialize_with = "bool_or_int")]
        v: bool,
    }

    #[test]
    fn test_bool_or_int_accepts_all_shapes() {
        let cases = [
            (r#"{"v":true}"#, true),
            (r#"{"v":0}"#, false),
            (r#"{"v":1}"#, true),
            (r#"{"v":"1"}"#, true),
            (r#"{"v":null}"#, false),
            (r#"{}"#, false),
        ];
        for (json, want) in cases {
            let f: Flag = serde_json::from_str(json).unwrap();
            assert_eq!(f.v, want, "{json}");
        }
    }

    #[test]
    fn test_parse_backend_time_variants() {
        let rfc2822 = parse_backend_time("Tue, 21 Oct 2025 10:30:00 GMT").unwrap();
        assert_eq!((rfc2822.month(), rfc2822.day(), rfc2822.hour()), (10, 21, 10));

        let naive = parse_backend_time("2025-10-21 10:30:00").unwrap();
        assert_eq!(naive, rfc2822);

        let iso = parse_backend_time("2025-10-21T10:30:00Z").unwrap();
        assert_eq!(iso, rfc2822);

        assert!(parse_backend_time("").is_none());
        assert!(parse_backend_time("next tuesday").is_none());
    }
}
