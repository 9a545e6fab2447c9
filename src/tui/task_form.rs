//! Task form handling for the terminal user interface.
//!
//! The same form serves add and edit. Text fields take free input; status,
//! priority and dependency are selectors cycled with the arrow keys.

use chrono::NaiveDate;

use crate::fields::{Priority, Status};
use crate::store::DependencyOption;
use crate::task::{parse_date_input, Task, TaskFields};
use crate::tui::input::InputField;

pub const KIND_ORDER: usize = 0;
pub const REPORT_ORDER: usize = 1;
pub const DESCRIPTION_ORDER: usize = 2;
pub const DATE_ORDER: usize = 3;
pub const STATUS_ORDER: usize = 4;
pub const PRIORITY_ORDER: usize = 5;
pub const DEPENDENCY_ORDER: usize = 6;
pub const FIELD_COUNT: usize = 7;

pub const FIELD_LABELS: [&str; FIELD_COUNT] = [
    "Type",
    "Report",
    "Description",
    "Date",
    "Status",
    "Priority",
    "Depends on",
];

/// Task form for editing fields
pub struct TaskForm {
    pub kind: InputField,
    pub report: InputField,
    pub description: InputField,
    pub date: InputField,
    pub status: usize,
    pub priority: usize,
    pub dependency: usize,
    pub dependency_options: Vec<DependencyOption>,
    pub current_field: usize,
}

impl TaskForm {
    /// Blank form for a new task. The date starts at today.
    pub fn new(dependency_options: Vec<DependencyOption>, today: NaiveDate) -> Self {
        let mut form = Self {
            kind: InputField::new(),
            report: InputField::new(),
            description: InputField::new(),
            date: InputField::with_value(&today.to_string()),
            status: 0,
            priority: Priority::ALL
                .iter()
                .position(|&p| p == Priority::Medium)
                .unwrap_or(0),
            dependency: 0,
            dependency_options,
            current_field: KIND_ORDER,
        };
        form.sync_active();
        form
    }

    /// Form pre-filled from `task`. `dependency_options` must already exclude the task itself.
    pub fn from_task(task: &Task, dependency_options: Vec<DependencyOption>) -> Self {
        let mut form = Self::new(dependency_options, task.date);
        form.kind = InputField::with_value(&task.kind);
        form.report = InputField::with_value(&task.report);
        form.description = InputField::with_value(&task.description);
        form.status = Status::ALL
            .iter()
            .position(|&s| s == task.status)
            .unwrap_or(0);
        form.priority = Priority::ALL
            .iter()
            .position(|&p| p == task.priority)
            .unwrap_or(0);
        form.dependency = form
            .dependency_options
            .iter()
            .position(|o| o.value == task.dependency)
            .unwrap_or(0);
        form.sync_active();
        form
    }

    pub fn is_text_field(&self) -> bool {
        self.current_field <= DATE_ORDER
    }

    pub fn current_input_mut(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            KIND_ORDER => Some(&mut self.kind),
            REPORT_ORDER => Some(&mut self.report),
            DESCRIPTION_ORDER => Some(&mut self.description),
            DATE_ORDER => Some(&mut self.date),
            _ => None,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.sync_active();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.sync_active();
    }

    /// Step the selector under the cursor by `delta`, wrapping. No-op on text fields.
    pub fn cycle_selector(&mut self, delta: isize) {
        let (slot, len) = match self.current_field {
            STATUS_ORDER => (&mut self.status, Status::ALL.len()),
            PRIORITY_ORDER => (&mut self.priority, Priority::ALL.len()),
            DEPENDENCY_ORDER => (&mut self.dependency, self.dependency_options.len()),
            _ => return,
        };
        if len == 0 {
            return;
        }
        let len = len as isize;
        *slot = (*slot as isize + delta).rem_euclid(len) as usize;
    }

    fn sync_active(&mut self) {
        let current = self.current_field;
        for (i, field) in [
            &mut self.kind,
            &mut self.report,
            &mut self.description,
            &mut self.date,
        ]
        .into_iter()
        .enumerate()
        {
            field.active = i == current;
        }
    }

    pub fn selected_status(&self) -> Status {
        Status::ALL[self.status.min(Status::ALL.len() - 1)]
    }

    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority.min(Priority::ALL.len() - 1)]
    }

    pub fn selected_dependency(&self) -> Option<&DependencyOption> {
        self.dependency_options.get(self.dependency)
    }

    /// Display text of a selector field.
    pub fn selector_label(&self, field: usize) -> String {
        match field {
            STATUS_ORDER => self.selected_status().label().to_string(),
            PRIORITY_ORDER => self.selected_priority().label().to_string(),
            DEPENDENCY_ORDER => self
                .selected_dependency()
                .map_or_else(|| "None".to_string(), |o| o.label.clone()),
            _ => String::new(),
        }
    }

    /// Whether the date box holds text that does not parse.
    pub fn date_is_invalid(&self, today: NaiveDate) -> bool {
        let raw = self.date.value.trim();
        !raw.is_empty() && parse_date_input(raw, today).is_none()
    }

    /// Collect the form into store input. An unparseable date comes through as missing.
    pub fn to_fields(&self, today: NaiveDate) -> TaskFields {
        TaskFields {
            kind: self.kind.value.clone(),
            report: self.report.value.clone(),
            description: self.description.value.clone(),
            date: parse_date_input(&self.date.value, today),
            status: Some(self.selected_status()),
            priority: Some(self.selected_priority()),
            dependency: self
                .selected_dependency()
                .map(|o| o.value.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn options() -> Vec<DependencyOption> {
        vec![
            DependencyOption::none(),
            DependencyOption {
                value: "R1".into(),
                label: "R1".into(),
            },
        ]
    }

    #[test]
    fn test_new_form_defaults() {
        let form = TaskForm::new(options(), today());
        let fields = form.to_fields(today());
        assert_eq!(fields.date, Some(today()));
        assert_eq!(fields.status, Some(Status::Pending));
        assert_eq!(fields.priority, Some(Priority::Medium));
        assert_eq!(fields.dependency, "");
        assert!(form.kind.active);
    }

    #[test]
    fn test_from_task_selects_existing_values() {
        let task = Task {
            id: "1".into(),
            kind: "Dev".into(),
            report: "R2".into(),
            description: "two".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            status: Status::InReview,
            priority: Priority::Urgent,
            dependency: "R1".into(),
        };
        let form = TaskForm::from_task(&task, options());
        assert_eq!(form.to_fields(today()), TaskFields::from_task(&task));
        assert_eq!(form.selector_label(DEPENDENCY_ORDER), "R1");
    }

    #[test]
    fn test_selector_wraps() {
        let mut form = TaskForm::new(options(), today());
        form.current_field = STATUS_ORDER;
        form.cycle_selector(-1);
        assert_eq!(form.selected_status(), Status::Completed);
        form.cycle_selector(1);
        assert_eq!(form.selected_status(), Status::Pending);

        form.current_field = DEPENDENCY_ORDER;
        form.cycle_selector(1);
        assert_eq!(form.to_fields(today()).dependency, "R1");
        form.cycle_selector(1);
        assert_eq!(form.to_fields(today()).dependency, "");
    }

    #[test]
    fn test_relative_and_invalid_dates() {
        let mut form = TaskForm::new(options(), today());
        form.date = InputField::with_value("tomorrow");
        assert_eq!(form.to_fields(today()).date, NaiveDate::from_ymd_opt(2024, 5, 2));
        form.date = InputField::with_value("someday");
        assert!(form.date_is_invalid(today()));
        assert_eq!(form.to_fields(today()).date, None);
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = TaskForm::new(options(), today());
        form.prev_field();
        assert_eq!(form.current_field, DEPENDENCY_ORDER);
        assert!(!form.is_text_field());
        form.next_field();
        assert_eq!(form.current_field, KIND_ORDER);
        assert!(form.current_input_mut().is_some());
    }
}
