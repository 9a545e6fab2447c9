//! Table and list projection.

use chrono::NaiveDate;

use crate::fields::{Priority, Status};
use crate::filter::{apply, FilterCriteria};
use crate::task::Task;
use crate::views::kind_label;

/// Description preview length in the main table.
pub const TABLE_PREVIEW_LEN: usize = 50;
/// Description preview length in the compact list.
pub const LIST_PREVIEW_LEN: usize = 30;

/// Default date rendering, e.g. "May 1, 2024".
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// One display row. `id` is kept so the full record can be opened for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: String,
    pub kind: String,
    pub report: String,
    pub description: String,
    pub date: String,
    pub status: Status,
    pub priority: Priority,
    pub dependency: String,
}

/// Rows for `tasks`, filtered and with descriptions cut to `preview_len` characters.
pub fn table_rows(
    tasks: &[Task],
    criteria: Option<&FilterCriteria>,
    preview_len: usize,
    date_format: &str,
) -> Vec<TableRow> {
    apply(tasks, criteria)
        .into_iter()
        .map(|t| TableRow {
            id: t.id.clone(),
            kind: kind_label(&t.kind),
            report: t.report.clone(),
            description: preview(&t.description, preview_len),
            date: format_date(t.date, date_format),
            status: t.status,
            priority: t.priority,
            dependency: if t.has_dependency() {
                t.dependency.clone()
            } else {
                "None".to_string()
            },
        })
        .collect()
}

/// Cut `text` to `max` characters, appending "..." when anything was dropped.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max).collect();
        out.push_str("...");
        out
    }
}

/// Render `date` with a strftime pattern, falling back to ISO when the pattern is invalid.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        tracing::warn!(pattern, "invalid date format, using ISO");
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(description: &str) -> Task {
        Task {
            id: "1".into(),
            kind: String::new(),
            report: "R1".into(),
            description: description.into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            status: Status::Pending,
            priority: Priority::Low,
            dependency: String::new(),
        }
    }

    #[test]
    fn test_preview_bounds() {
        let long = "x".repeat(60);
        assert_eq!(preview(&long, TABLE_PREVIEW_LEN), format!("{}...", "x".repeat(50)));
        assert_eq!(preview(&long, LIST_PREVIEW_LEN).chars().count(), 33);
        assert_eq!(preview("short", 50), "short");
        assert_eq!(preview(&"é".repeat(50), 50), "é".repeat(50));
    }

    #[test]
    fn test_row_degrades_blank_fields() {
        let rows = table_rows(&[task("")], None, TABLE_PREVIEW_LEN, DEFAULT_DATE_FORMAT);
        assert_eq!(rows[0].kind, "Uncategorized");
        assert_eq!(rows[0].dependency, "None");
        assert_eq!(rows[0].description, "");
        assert_eq!(rows[0].date, "May 1, 2024");
    }

    #[test]
    fn test_invalid_date_pattern_falls_back() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_date(date, "%Q"), "2024-05-01");
    }
}
