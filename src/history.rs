//! Append-only log of task lifecycle events.
//!
//! The dashboard's trend series is computed from this log, so every point it shows
//! corresponds to something that actually happened.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::Status;

/// What happened to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    Created { status: Status },
    StatusChanged { from: Status, to: Status },
    Deleted,
}

/// A timestamped entry in the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub at: DateTime<Utc>,
    pub task_id: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl HistoryEvent {
    pub fn new(task_id: &str, kind: EventKind) -> Self {
        HistoryEvent {
            at: Utc::now(),
            task_id: task_id.to_string(),
            kind,
        }
    }

    fn is_creation(&self) -> bool {
        matches!(self.kind, EventKind::Created { .. })
    }

    fn is_completion(&self) -> bool {
        matches!(
            self.kind,
            EventKind::Created { status: Status::Completed }
                | EventKind::StatusChanged { to: Status::Completed, .. }
        )
    }
}

/// Activity during one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub label: String,
    pub created: u64,
    pub completed: u64,
}

/// Month-by-month counts for the `months` months ending with the month of `today`.
pub fn monthly_trend(events: &[HistoryEvent], today: NaiveDate, months: u32) -> Vec<TrendPoint> {
    let current = month_index(today.year(), today.month());
    let first = current - i64::from(months) + 1;

    let mut points: Vec<TrendPoint> = (first..=current)
        .map(|idx| TrendPoint {
            label: format!("{:04}-{:02}", idx.div_euclid(12), idx.rem_euclid(12) + 1),
            created: 0,
            completed: 0,
        })
        .collect();

    for event in events {
        let idx = month_index(event.at.year(), event.at.month());
        if idx < first || idx > current {
            continue;
        }
        let point = &mut points[(idx - first) as usize];
        if event.is_creation() {
            point.created += 1;
        }
        if event.is_completion() {
            point.completed += 1;
        }
    }
    points
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}
