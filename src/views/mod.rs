//! Read-only projections of the task collection.
//!
//! Each view is a pure function of the task list and optional filter criteria,
//! returning a display model that a front-end renders as it likes. None of them
//! fail: blank or odd values degrade to placeholders.

pub mod calendar;
pub mod dashboard;
pub mod kanban;
pub mod table;

pub use calendar::{
    calendar_month, shift_month, CalendarCell, CalendarEntry, CalendarMonth, WEEKDAY_HEADERS,
};
pub use dashboard::{dashboard, Dashboard};
pub use kanban::{kanban, KanbanBoard, KanbanCard, KanbanColumn};
pub use table::{
    format_date, preview, table_rows, TableRow, DEFAULT_DATE_FORMAT, LIST_PREVIEW_LEN,
    TABLE_PREVIEW_LEN,
};

/// Shown for a task whose type is blank.
pub const UNCATEGORIZED: &str = "Uncategorized";

pub(crate) fn kind_label(kind: &str) -> String {
    let trimmed = kind.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        trimmed.to_string()
    }
}
