// file: src/client/display.rs
// description: terminal rendering of tasks, categories and pages

use crate::models::{Category, Pagination, TaskResponse, TaskStatus};
use crate::utils::Validator;
use chrono::{DateTime, Utc};
use colored::*;

pub fn status_icon(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::New => "●".blue().bold(),
        TaskStatus::InProgress => "◐".yellow().bold(),
        TaskStatus::Done => "✔".green().bold(),
    }
}

/// `YYYY-MM-DD`, or `-` when unset.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn empty_message(status: Option<TaskStatus>) -> &'static str {
    match status {
        Some(TaskStatus::New) => "No new tasks.",
        Some(TaskStatus::InProgress) => "No in-progress tasks.",
        Some(TaskStatus::Done) => "No done tasks.",
        None => "No tasks.",
    }
}

pub fn format_task(task: &TaskResponse) -> String {
    let category = task
        .task
        .category
        .as_ref()
        .map(|c| format!(" [{}]", c.category_name).cyan().to_string())
        .unwrap_or_default();

    format!(
        "{} {} {}{}\n   {} → {}\n   {}\n   id: {}",
        status_icon(task.status),
        task.task.name.bold(),
        format!("({})", task.status).dimmed(),
        category,
        format_date(task.task.start_date),
        format_date(task.task.end_date),
        Validator::truncate_text(&task.task.content, 120),
        task.task.id.dimmed()
    )
}

pub fn format_task_list(tasks: &[TaskResponse], status: Option<TaskStatus>) -> String {
    if tasks.is_empty() {
        return empty_message(status).to_string();
    }

    tasks
        .iter()
        .map(format_task)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories.".to_string();
    }

    categories
        .iter()
        .map(|c| format!("{} {}", "•".cyan(), c.category_name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_pagination(pagination: &Pagination) -> String {
    format!(
        "Page {}/{} ({} tasks, {} per page)",
        pagination.current_page,
        pagination.total_pages.max(1),
        pagination.total_count,
        pagination.limit
    )
}
