//! Task data structure and form input.
//!
//! `Task` is the persisted record. `TaskFields` is what a front-end hands the store
//! on create and update: every field except the id, with the required ones still
//! optional so that a missing value can be reported instead of guessed.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fields::*;

/// One unit of trackable work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub report: String,
    pub description: String,
    pub date: NaiveDate,
    pub status: Status,
    pub priority: Priority,
    /// `report` of the task this one depends on; empty means none.
    #[serde(default)]
    pub dependency: String,
}

impl Task {
    pub fn has_dependency(&self) -> bool {
        !self.dependency.is_empty()
    }
}

/// Raw field values captured by a form or command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub kind: String,
    pub report: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub dependency: String,
}

/// `TaskFields` after the required-field check, with text trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidFields {
    pub kind: String,
    pub report: String,
    pub description: String,
    pub date: NaiveDate,
    pub status: Status,
    pub priority: Priority,
    pub dependency: String,
}

impl TaskFields {
    /// Pre-fill from an existing record, as the edit form does.
    pub fn from_task(task: &Task) -> Self {
        TaskFields {
            kind: task.kind.clone(),
            report: task.report.clone(),
            description: task.description.clone(),
            date: Some(task.date),
            status: Some(task.status),
            priority: Some(task.priority),
            dependency: task.dependency.clone(),
        }
    }

    /// Check every required field is present. Dependency existence is checked by the store.
    pub(crate) fn validate(&self) -> Result<ValidFields, ValidationError> {
        let kind = required_text(&self.kind, "type")?;
        let report = required_text(&self.report, "report")?;
        let description = required_text(&self.description, "description")?;
        let date = self.date.ok_or(ValidationError::MissingField("date"))?;
        let status = self.status.ok_or(ValidationError::MissingField("status"))?;
        let priority = self.priority.ok_or(ValidationError::MissingField("priority"))?;

        Ok(ValidFields {
            kind,
            report,
            description,
            date,
            status,
            priority,
            dependency: self.dependency.trim().to_string(),
        })
    }
}

/// Parse a date typed by a person, relative to `today`.
///
/// Supports "today", "tomorrow", "yesterday", "in 3d", "in 2w" and `YYYY-MM-DD`.
pub fn parse_date_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            return nd.trim().parse::<i64>().ok().map(|d| today + Duration::days(d));
        }
        if let Some(nw) = rest.strip_suffix('w') {
            return nw.trim().parse::<i64>().ok().map(|w| today + Duration::weeks(w));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn required_text(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
