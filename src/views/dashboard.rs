//! Dashboard projection: aggregate counts plus a monthly activity trend.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::fields::{Priority, Status};
use crate::filter::{apply, FilterCriteria};
use crate::history::{monthly_trend, HistoryEvent, TrendPoint};
use crate::task::Task;
use crate::views::kind_label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub total: usize,
    /// Every status in `Status::ALL` order, zeros included.
    pub by_status: Vec<(Status, usize)>,
    /// Every priority in `Priority::ALL` order, zeros included.
    pub by_priority: Vec<(Priority, usize)>,
    /// Most used types first, ties broken by name.
    pub by_type: Vec<(String, usize)>,
    /// Created/completed per month from the history log. Not affected by filters.
    pub trend: Vec<TrendPoint>,
}

impl Dashboard {
    pub fn status_count(&self, status: Status) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }

    /// Share of completed tasks, 0-100.
    pub fn completion_percent(&self) -> u16 {
        if self.total == 0 {
            return 0;
        }
        (self.status_count(Status::Completed) * 100 / self.total) as u16
    }
}

pub fn dashboard(
    tasks: &[Task],
    criteria: Option<&FilterCriteria>,
    history: &[HistoryEvent],
    today: NaiveDate,
    trend_months: u32,
) -> Dashboard {
    let visible = apply(tasks, criteria);

    let by_status = Status::ALL
        .iter()
        .map(|&s| (s, visible.iter().filter(|t| t.status == s).count()))
        .collect();
    let by_priority = Priority::ALL
        .iter()
        .map(|&p| (p, visible.iter().filter(|t| t.priority == p).count()))
        .collect();

    let mut type_counts: HashMap<String, usize> = HashMap::new();
    for t in &visible {
        *type_counts.entry(kind_label(&t.kind)).or_default() += 1;
    }
    let mut by_type: Vec<(String, usize)> = type_counts.into_iter().collect();
    by_type.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Dashboard {
        total: visible.len(),
        by_status,
        by_priority,
        by_type,
        trend: monthly_trend(history, today, trend_months),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(kind: &str, status: Status, priority: Priority) -> Task {
        Task {
            id: kind.into(),
            kind: kind.into(),
            report: String::new(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            status,
            priority,
            dependency: String::new(),
        }
    }

    #[test]
    fn test_aggregates() {
        let tasks = vec![
            task("Ops", Status::Completed, Priority::High),
            task("Dev", Status::Pending, Priority::High),
            task("Dev", Status::Completed, Priority::Low),
            task("", Status::InReview, Priority::Urgent),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let d = dashboard(&tasks, None, &[], today, 6);

        assert_eq!(d.total, 4);
        assert_eq!(
            d.by_status,
            vec![
                (Status::Pending, 1),
                (Status::InProgress, 0),
                (Status::InReview, 1),
                (Status::Completed, 2),
            ]
        );
        assert_eq!(d.by_priority[Priority::High as usize], (Priority::High, 2));
        assert_eq!(
            d.by_type,
            vec![("Dev".to_string(), 2), ("Ops".to_string(), 1), ("Uncategorized".to_string(), 1)]
        );
        assert_eq!(d.completion_percent(), 50);
        assert_eq!(d.trend.len(), 6);
        assert_eq!(d.trend[5].label, "2024-05");
    }

    #[test]
    fn test_empty_collection() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let d = dashboard(&[], None, &[], today, 3);
        assert_eq!(d.total, 0);
        assert_eq!(d.completion_percent(), 0);
        assert!(d.by_type.is_empty());
        assert!(d.trend.iter().all(|p| p.created == 0 && p.completed == 0));
    }
}
