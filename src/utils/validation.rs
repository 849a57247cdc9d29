// file: src/utils/validation.rs
// description: presence checks and input parsing helpers
// reference: input validation patterns

use crate::error::{Result, TodoError};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub struct Validator;

impl Validator {
    /// Returns the trimmed value, or a validation error naming the field.
    pub fn require_text(field: &str, value: Option<&str>) -> Result<String> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(TodoError::Validation(format!("{} is required", field))),
        }
    }

    pub fn parse_id(entity: &str, value: &str) -> Result<String> {
        Uuid::parse_str(value.trim())
            .map(|id| id.to_string())
            .map_err(|_| TodoError::Validation(format!("Invalid {} id: {}", entity, value)))
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let truncated: String = text.chars().take(max_chars).collect();
            format!("{}...", truncated)
        }
    }
}

/// Parses an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TodoError::Validation(format!("Invalid date: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_require_text() {
        assert_eq!(
            Validator::require_text("name", Some("  Buy milk ")).unwrap(),
            "Buy milk"
        );
        assert!(Validator::require_text("name", Some("   ")).is_err());
        assert!(Validator::require_text("name", None).is_err());
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4().to_string();
        assert_eq!(Validator::parse_id("task", &id).unwrap(), id);
        assert!(Validator::parse_id("task", "1' OR '1'='1").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-03-01").unwrap(), expected);
        assert_eq!(parse_date("2024-03-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_date("2024-03-01T02:00:00+02:00").unwrap(), expected);
        assert!(parse_date("03/01/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
    }
}
