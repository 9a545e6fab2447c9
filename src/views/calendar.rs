//! Month calendar projection, weeks starting on Monday.

use chrono::{Datelike, Months, NaiveDate};

use crate::fields::{Priority, Status};
use crate::filter::{apply, FilterCriteria};
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub id: String,
    pub report: String,
    pub status: Status,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCell {
    /// Padding before the 1st or after the last day of the month.
    Blank,
    Day {
        date: NaiveDate,
        entries: Vec<CalendarEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Always a whole number of weeks.
    pub cells: Vec<CalendarCell>,
}

impl CalendarMonth {
    /// e.g. "May 2024"
    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(7)
    }

    pub fn day(&self, day: u32) -> Option<&[CalendarEntry]> {
        self.cells.iter().find_map(|c| match c {
            CalendarCell::Day { date, entries } if date.day() == day => Some(entries.as_slice()),
            _ => None,
        })
    }
}

pub const WEEKDAY_HEADERS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Lay out `year`-`month` with the filtered tasks placed on their exact date.
/// Returns `None` when the month does not exist.
pub fn calendar_month(
    tasks: &[Task],
    criteria: Option<&FilterCriteria>,
    year: i32,
    month: u32,
) -> Option<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    let days_in_month = (next - first).num_days() as u32;
    let visible = apply(tasks, criteria);

    let leading = first.weekday().num_days_from_monday() as usize;
    let mut cells = vec![CalendarCell::Blank; leading];
    for date in first.iter_days().take(days_in_month as usize) {
        let entries = visible
            .iter()
            .filter(|t| t.date == date)
            .map(|t| CalendarEntry {
                id: t.id.clone(),
                report: t.report.clone(),
                status: t.status,
                priority: t.priority,
            })
            .collect();
        cells.push(CalendarCell::Day { date, entries });
    }
    while cells.len() % 7 != 0 {
        cells.push(CalendarCell::Blank);
    }

    Some(CalendarMonth { year, month, cells })
}

/// Move `delta` months from `year`-`month`, e.g. for previous/next navigation.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let idx = year * 12 + month as i32 - 1 + delta;
    (idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, date: &str) -> Task {
        Task {
            id: id.into(),
            kind: "Dev".into(),
            report: format!("R{id}"),
            description: String::new(),
            date: date.parse().unwrap(),
            status: Status::Pending,
            priority: Priority::Medium,
            dependency: String::new(),
        }
    }

    #[test]
    fn test_layout_starts_on_monday() {
        // 1 May 2024 is a Wednesday; 31 days.
        let cal = calendar_month(&[], None, 2024, 5).unwrap();
        assert_eq!(&cal.cells[..2], &[CalendarCell::Blank, CalendarCell::Blank]);
        assert!(matches!(&cal.cells[2], CalendarCell::Day { date, .. } if date.day() == 1));
        assert_eq!(cal.cells.len(), 35);
        assert_eq!(cal.weeks().count(), 5);
        assert_eq!(cal.title(), "May 2024");
    }

    #[test]
    fn test_tasks_placed_on_exact_date() {
        let tasks = vec![
            task("1", "2024-05-01"),
            task("2", "2024-05-31"),
            task("3", "2024-06-01"),
            task("4", "2024-05-01"),
        ];
        let cal = calendar_month(&tasks, None, 2024, 5).unwrap();
        let first: Vec<&str> = cal.day(1).unwrap().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(first, ["1", "4"]);
        assert_eq!(cal.day(31).unwrap().len(), 1);
        assert!(cal.day(2).unwrap().is_empty());
    }

    #[test]
    fn test_leap_february_and_invalid_month() {
        let cal = calendar_month(&[], None, 2024, 2).unwrap();
        let days = cal.cells.iter().filter(|c| matches!(c, CalendarCell::Day { .. })).count();
        assert_eq!(days, 29);
        assert!(calendar_month(&[], None, 2024, 13).is_none());
    }

    #[test]
    fn test_shift_month_wraps() {
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 5, 0), (2024, 5));
    }
}
