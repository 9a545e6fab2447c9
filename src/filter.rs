//! Status, priority and type filters shared by every view.

use crate::fields::{Priority, Status};
use crate::task::Task;

/// Active filter selection. Absent criteria let everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub kind: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.kind.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self.kind.as_deref().map_or(true, |k| task.kind == k)
    }

    /// Short description for status bars, e.g. "status=Completed type=Dev".
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(s) = self.status {
            parts.push(format!("status={}", s.label()));
        }
        if let Some(p) = self.priority {
            parts.push(format!("priority={}", p.label()));
        }
        if let Some(k) = &self.kind {
            parts.push(format!("type={k}"));
        }
        parts.join(" ")
    }
}

/// Tasks matching every present criterion, in their original order.
pub fn filter<'a>(tasks: &'a [Task], criteria: &FilterCriteria) -> Vec<&'a Task> {
    tasks.iter().filter(|t| criteria.matches(t)).collect()
}

/// Apply optional criteria; `None` passes everything through.
pub(crate) fn apply<'a>(tasks: &'a [Task], criteria: Option<&FilterCriteria>) -> Vec<&'a Task> {
    match criteria {
        Some(c) => filter(tasks, c),
        None => tasks.iter().collect(),
    }
}

/// Distinct non-blank types in first-seen order.
pub fn distinct_kinds(tasks: &[Task]) -> Vec<String> {
    let mut kinds: Vec<String> = Vec::new();
    for t in tasks {
        if !t.kind.trim().is_empty() && !kinds.contains(&t.kind) {
            kinds.push(t.kind.clone());
        }
    }
    kinds
}
