//! Kanban projection: one fixed column per status.
//!
//! Stored statuses that no longer name a variant are folded into `Pending` when the
//! collection is decoded, so they show up in the Pending column here.

use chrono::NaiveDate;

use crate::fields::{Priority, Status};
use crate::filter::{apply, FilterCriteria};
use crate::task::Task;
use crate::views::kind_label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanCard {
    pub id: String,
    pub report: String,
    pub kind: String,
    pub priority: Priority,
    pub date: NaiveDate,
    pub dependency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanColumn {
    pub status: Status,
    pub cards: Vec<KanbanCard>,
}

impl KanbanColumn {
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn title(&self) -> String {
        format!("{} ({})", self.status.label(), self.count())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanBoard {
    /// In `Status::ALL` order.
    pub columns: Vec<KanbanColumn>,
}

impl KanbanBoard {
    pub fn total(&self) -> usize {
        self.columns.iter().map(KanbanColumn::count).sum()
    }

    pub fn column(&self, status: Status) -> &KanbanColumn {
        &self.columns[column_index(status)]
    }
}

fn column_index(status: Status) -> usize {
    match status {
        Status::Pending => 0,
        Status::InProgress => 1,
        Status::InReview => 2,
        Status::Completed => 3,
    }
}

/// Group the filtered tasks into status columns, keeping their relative order.
pub fn kanban(tasks: &[Task], criteria: Option<&FilterCriteria>) -> KanbanBoard {
    let mut columns: Vec<KanbanColumn> = Status::ALL
        .iter()
        .map(|&status| KanbanColumn {
            status,
            cards: Vec::new(),
        })
        .collect();

    for t in apply(tasks, criteria) {
        columns[column_index(t.status)].cards.push(KanbanCard {
            id: t.id.clone(),
            report: t.report.clone(),
            kind: kind_label(&t.kind),
            priority: t.priority,
            date: t.date,
            dependency: t.dependency.clone(),
        });
    }

    KanbanBoard { columns }
}
