// file: src/database/filter.rs
// description: SQL predicate builders for LanceDB scans
// reference: https://lancedb.github.io/lancedb/sql/

use crate::models::{DateRange, TaskStatus};
use chrono::{DateTime, Utc};

/// Single-quoted SQL string literal.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Escapes LIKE wildcards so the value matches literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn id_equals(id: &str) -> String {
    format!("id = {}", quote(id))
}

pub fn category_name_equals(name: &str) -> String {
    format!("category_name = {}", quote(name))
}

/// Case-insensitive substring match on the task name.
pub fn name_contains(term: &str) -> String {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    format!("lower(name) LIKE {}", quote(&pattern))
}

/// Undated tasks never match: comparisons against null are not true.
pub fn date_range(range: &DateRange) -> String {
    format!(
        "start_date >= {} AND end_date <= {}",
        range.start.timestamp_millis(),
        range.end.timestamp_millis()
    )
}

/// Mirrors `TaskStatus::derive` so status filtering runs inside the store.
pub fn status(status: TaskStatus, now: DateTime<Utc>) -> String {
    let now = now.timestamp_millis();
    let started = format!("(start_date IS NULL OR start_date <= {})", now);

    match status {
        TaskStatus::New => format!("start_date > {}", now),
        TaskStatus::Done => format!("{} AND end_date < {}", started, now),
        TaskStatus::InProgress => format!(
            "{} AND (end_date IS NULL OR end_date >= {})",
            started, now
        ),
    }
}
