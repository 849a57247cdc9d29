// file: src/models/pagination.rs
// description: offset pagination and date-range query models

use crate::config::PaginationConfig;
use crate::models::task::TaskResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Unparseable or non-positive values fall back to page 1 and the
    /// configured default limit; the limit is capped at `max_limit`.
    pub fn from_query(page: Option<&str>, limit: Option<&str>, config: &PaginationConfig) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let limit = parse_positive(limit)
            .unwrap_or(config.default_limit)
            .min(config.max_limit.max(1));

        Self { page, limit }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .map(|v| v as usize)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub limit: usize,
}

impl Pagination {
    pub fn new(request: PageRequest, total_count: usize) -> Self {
        Self {
            current_page: request.page,
            total_pages: total_count.div_ceil(request.limit),
            total_count,
            limit: request.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPage {
    pub tasks: Vec<TaskResponse>,
    pub pagination: Pagination,
}

/// Tasks that start on or after `start` and end on or before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_limit: 20,
            max_limit: 100,
        }
    }

    #[test]
    fn test_defaults_for_missing_or_bad_values() {
        let request = PageRequest::from_query(None, None, &config());
        assert_eq!(request, PageRequest { page: 1, limit: 20 });

        let request = PageRequest::from_query(Some("abc"), Some("0"), &config());
        assert_eq!(request, PageRequest { page: 1, limit: 20 });

        let request = PageRequest::from_query(Some("-3"), Some("-1"), &config());
        assert_eq!(request, PageRequest { page: 1, limit: 20 });
    }

    #[test]
    fn test_limit_is_capped() {
        let request = PageRequest::from_query(Some("2"), Some("1000"), &config());
        assert_eq!(request.limit, 100);
        assert_eq!(request.offset(), 100);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest::from_query(Some("3"), Some("5"), &config());
        assert_eq!(request.offset(), 10);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest { page: 1, limit: 20 };
        assert_eq!(Pagination::new(request, 0).total_pages, 0);
        assert_eq!(Pagination::new(request, 20).total_pages, 1);
        assert_eq!(Pagination::new(request, 21).total_pages, 2);
    }

    #[test]
    fn test_pagination_json_keys() {
        let pagination = Pagination::new(PageRequest { page: 2, limit: 10 }, 35);
        let value = serde_json::to_value(&pagination).unwrap();
        assert_eq!(value["currentPage"], 2);
        assert_eq!(value["totalPages"], 4);
        assert_eq!(value["totalCount"], 35);
        assert_eq!(value["limit"], 10);
    }
}
