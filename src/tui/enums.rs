//! Enumerations for TUI state management.

/// Which screen owns the keyboard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Browse,
    AddTask,
    EditTask,
    ConfirmDelete,
    Help,
}

/// The four views over the task collection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tab {
    Table,
    Kanban,
    Calendar,
    Dashboard,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Table, Tab::Kanban, Tab::Calendar, Tab::Dashboard];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Table => "Table",
            Tab::Kanban => "Kanban",
            Tab::Calendar => "Calendar",
            Tab::Dashboard => "Dashboard",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}
