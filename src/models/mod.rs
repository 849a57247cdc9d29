// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod category;
pub mod pagination;
pub mod task;

pub use category::{Category, CategoryRef, NewCategory};
pub use pagination::{DateRange, PageRequest, Pagination, TaskPage};
pub use task::{NewTask, Task, TaskResponse, TaskStatus, TaskUpdate};

use chrono::{DateTime, Utc};

/// Current time truncated to the millisecond precision the store keeps.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
