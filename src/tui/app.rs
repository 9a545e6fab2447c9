//! Main application logic for the terminal user interface.
//!
//! `App` owns the task store for the lifetime of the session, translates key
//! presses into store operations and keeps the per-tab selection in range as the
//! collection and filters change. Drawing lives in `tui::render`.

use std::io;
use std::time::{Duration, Instant};

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, widgets::TableState, Terminal};

use crate::config::Config;
use crate::fields::{Priority, Status};
use crate::filter::{distinct_kinds, FilterCriteria};
use crate::gateway::PersistenceGateway;
use crate::store::TaskStore;
use crate::tui::enums::{AppState, Tab};
use crate::tui::task_form::TaskForm;
use crate::tui::toast::{Level, Toasts};
use crate::views::{self, shift_month, KanbanBoard, TableRow};

/// Task selected for deletion, with the reports of tasks that depend on it.
#[derive(Clone, Debug)]
pub struct PendingDelete {
    pub id: String,
    pub report: String,
    pub dependents: Vec<String>,
}

/// Main application state for the terminal user interface.
pub struct App<G: PersistenceGateway> {
    pub(super) store: TaskStore<G>,
    pub(super) config: Config,
    pub(super) state: AppState,
    pub(super) tab: Tab,
    pub(super) filter: FilterCriteria,
    /// Table tab shows the compact list layout.
    pub(super) compact: bool,
    pub(super) table_state: TableState,
    pub(super) kanban_column: usize,
    pub(super) kanban_card: usize,
    pub(super) calendar: (i32, u32),
    pub(super) form: Option<TaskForm>,
    pub(super) pending_delete: Option<PendingDelete>,
    pub(super) toasts: Toasts,
}

impl<G: PersistenceGateway> App<G> {
    pub fn new(store: TaskStore<G>, config: Config) -> Self {
        let today = Local::now().date_naive();
        let timeout = Duration::from_secs(config.notifications.timeout_secs);
        let mut app = App {
            store,
            config,
            state: AppState::Browse,
            tab: Tab::Table,
            filter: FilterCriteria::default(),
            compact: false,
            table_state: TableState::default(),
            kanban_column: 0,
            kanban_card: 0,
            calendar: (today.year(), today.month()),
            form: None,
            pending_delete: None,
            toasts: Toasts::new(timeout),
        };
        app.clamp_selection();
        app
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn store(&self) -> &TaskStore<G> {
        &self.store
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn form(&self) -> Option<&TaskForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        self.form.as_mut()
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub(super) fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub(super) fn table_rows(&self) -> Vec<TableRow> {
        let display = &self.config.display;
        let preview_len = if self.compact {
            display.list_preview
        } else {
            display.table_preview
        };
        views::table_rows(
            self.store.list(),
            Some(&self.filter),
            preview_len,
            &display.date_format,
        )
    }

    pub(super) fn board(&self) -> KanbanBoard {
        views::kanban(self.store.list(), Some(&self.filter))
    }

    /// Id of the highlighted task in the Table or Kanban tab.
    pub fn selected_id(&self) -> Option<String> {
        match self.tab {
            Tab::Table => {
                let rows = self.table_rows();
                self.table_state
                    .selected()
                    .and_then(|i| rows.get(i))
                    .map(|r| r.id.clone())
            }
            Tab::Kanban => self
                .board()
                .columns
                .get(self.kanban_column)
                .and_then(|c| c.cards.get(self.kanban_card))
                .map(|c| c.id.clone()),
            Tab::Calendar | Tab::Dashboard => None,
        }
    }

    /// Handle one key press. Returns true when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.state {
            AppState::Browse => return self.handle_browse_input(key.code),
            AppState::AddTask | AppState::EditTask => self.handle_form_input(key.code),
            AppState::ConfirmDelete => self.handle_confirm_input(key.code),
            AppState::Help => self.state = AppState::Browse,
        }
        false
    }

    fn handle_browse_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.switch_tab(Tab::ALL[idx]);
            }
            KeyCode::Tab => self.switch_tab(self.tab.next()),
            KeyCode::BackTab => self.switch_tab(self.tab.prev()),
            KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => self.open_delete_confirm(),
            KeyCode::Char('s') => {
                self.filter.status = cycle(self.filter.status.as_ref(), &Status::ALL);
                self.clamp_selection();
            }
            KeyCode::Char('p') => {
                self.filter.priority = cycle(self.filter.priority.as_ref(), &Priority::ALL);
                self.clamp_selection();
            }
            KeyCode::Char('t') => {
                let kinds = distinct_kinds(self.store.list());
                self.filter.kind = cycle(self.filter.kind.as_ref(), &kinds);
                self.clamp_selection();
            }
            KeyCode::Char('x') => {
                self.filter = FilterCriteria::default();
                self.clamp_selection();
            }
            KeyCode::Char('v') if self.tab == Tab::Table => self.compact = !self.compact,
            KeyCode::Up | KeyCode::Char('k') => self.move_vertical(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_vertical(1),
            KeyCode::Left | KeyCode::Char('h') => self.move_horizontal(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_horizontal(1),
            KeyCode::Char('[') => self.shift_calendar(-1),
            KeyCode::Char(']') => self.shift_calendar(1),
            _ => {}
        }
        false
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.clamp_selection();
    }

    fn move_vertical(&mut self, delta: isize) {
        match self.tab {
            Tab::Table => {
                let len = self.table_rows().len();
                if len > 0 {
                    let current = self.table_state.selected().unwrap_or(0);
                    self.table_state.select(Some(step(current, delta, len)));
                }
            }
            Tab::Kanban => {
                let len = self.kanban_column_len(self.kanban_column);
                if len > 0 {
                    self.kanban_card = step(self.kanban_card, delta, len);
                }
            }
            Tab::Calendar => self.shift_calendar(delta as i32),
            Tab::Dashboard => {}
        }
    }

    fn move_horizontal(&mut self, delta: isize) {
        match self.tab {
            Tab::Kanban => {
                self.kanban_column = step(self.kanban_column, delta, Status::ALL.len());
                self.clamp_selection();
            }
            Tab::Calendar => self.shift_calendar(delta as i32),
            Tab::Table | Tab::Dashboard => {}
        }
    }

    fn shift_calendar(&mut self, delta: i32) {
        if self.tab == Tab::Calendar {
            let (year, month) = self.calendar;
            self.calendar = shift_month(year, month, delta);
        }
    }

    fn kanban_column_len(&self, column: usize) -> usize {
        self.board().columns.get(column).map_or(0, |c| c.count())
    }

    /// Keep every selection inside the current (filtered) collection.
    fn clamp_selection(&mut self) {
        let rows = self.table_rows().len();
        if rows == 0 {
            self.table_state.select(None);
        } else {
            let current = self.table_state.selected().unwrap_or(0);
            self.table_state.select(Some(current.min(rows - 1)));
        }

        let cards = self.kanban_column_len(self.kanban_column);
        self.kanban_card = self.kanban_card.min(cards.saturating_sub(1));
    }

    /// Move the selection onto task `id` in the Table and Kanban tabs.
    fn select_task(&mut self, id: &str) {
        if let Some(i) = self.table_rows().iter().position(|r| r.id == id) {
            self.table_state.select(Some(i));
        }
        let board = self.board();
        for (c, column) in board.columns.iter().enumerate() {
            if let Some(i) = column.cards.iter().position(|card| card.id == id) {
                self.kanban_column = c;
                self.kanban_card = i;
            }
        }
        self.clamp_selection();
    }

    fn open_add_form(&mut self) {
        self.store.cancel_edit();
        let today = self.today();
        self.form = Some(TaskForm::new(self.store.dependency_candidates(), today));
        self.state = AppState::AddTask;
    }

    fn open_edit_form(&mut self) {
        let Some(id) = self.selected_id() else {
            self.toasts.push(Level::Warning, "Select a task in the Table or Kanban tab first");
            return;
        };
        let task = match self.store.begin_edit(&id) {
            Ok(task) => task.clone(),
            Err(e) => {
                self.toasts.push(Level::Error, e.to_string());
                return;
            }
        };
        // Candidates are computed after begin_edit so the task cannot depend on itself.
        let options = self.store.dependency_candidates();
        self.form = Some(TaskForm::from_task(&task, options));
        self.state = AppState::EditTask;
    }

    fn open_delete_confirm(&mut self) {
        let Some(id) = self.selected_id() else {
            self.toasts.push(Level::Warning, "Select a task in the Table or Kanban tab first");
            return;
        };
        let Some(task) = self.store.get(&id) else {
            return;
        };
        let dependents = self
            .store
            .dependents_of(&id)
            .into_iter()
            .map(|t| t.report.clone())
            .collect();
        self.pending_delete = Some(PendingDelete {
            id: task.id.clone(),
            report: task.report.clone(),
            dependents,
        });
        self.state = AppState::ConfirmDelete;
    }

    fn close_form(&mut self) {
        self.store.cancel_edit();
        self.form = None;
        self.state = AppState::Browse;
    }

    fn handle_form_input(&mut self, key: KeyCode) {
        let Some(form) = self.form.as_mut() else {
            self.state = AppState::Browse;
            return;
        };
        match key {
            KeyCode::Esc => self.close_form(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => match form.current_input_mut() {
                Some(input) => input.move_cursor_left(),
                None => form.cycle_selector(-1),
            },
            KeyCode::Right => match form.current_input_mut() {
                Some(input) => input.move_cursor_right(),
                None => form.cycle_selector(1),
            },
            KeyCode::Home => {
                if let Some(input) = form.current_input_mut() {
                    input.move_home();
                }
            }
            KeyCode::End => {
                if let Some(input) = form.current_input_mut() {
                    input.move_end();
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = form.current_input_mut() {
                    input.handle_backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(input) = form.current_input_mut() {
                    input.handle_delete();
                }
            }
            KeyCode::Char(c) => match form.current_input_mut() {
                Some(input) => input.handle_char(c),
                None if c == ' ' => form.cycle_selector(1),
                None => {}
            },
            _ => {}
        }
    }

    /// Create or update from the form. The form stays open when the store rejects it.
    fn submit_form(&mut self) {
        let today = self.today();
        let Some(form) = self.form.as_ref() else {
            return;
        };
        if form.date_is_invalid(today) {
            self.toasts.push(
                Level::Error,
                format!(
                    "Unrecognised date '{}': use YYYY-MM-DD, today, tomorrow or 'in 3d'",
                    form.date.value.trim()
                ),
            );
            return;
        }
        let fields = form.to_fields(today);

        let result = match self.state {
            AppState::AddTask => self.store.create(fields),
            AppState::EditTask => match self.store.editing_id().map(str::to_string) {
                Some(id) => self.store.update(&id, fields),
                None => {
                    self.toasts.push(Level::Error, "No task is being edited");
                    self.close_form();
                    return;
                }
            },
            _ => return,
        };

        match result {
            Ok(task) => {
                let verb = if self.state == AppState::AddTask {
                    "Added"
                } else {
                    "Updated"
                };
                self.toasts.push(Level::Success, format!("{verb} '{}'", task.report));
                self.close_form();
                self.select_task(&task.id);
            }
            Err(e) => self.toasts.push(Level::Error, e.to_string()),
        }
        self.report_persist_warning();
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        let Some(pending) = self.pending_delete.clone() else {
            self.state = AppState::Browse;
            return;
        };
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => match self.store.delete(&pending.id) {
                Ok(task) => {
                    self.toasts.push(Level::Success, format!("Deleted '{}'", task.report));
                    self.close_confirm();
                }
                Err(e) => self.toasts.push(Level::Error, e.to_string()),
            },
            KeyCode::Char('c') | KeyCode::Char('C') if !pending.dependents.is_empty() => {
                match self.store.delete_cascade(&pending.id) {
                    Ok(outcome) => {
                        self.toasts.push(
                            Level::Success,
                            format!(
                                "Deleted '{}' and cleared {} dependent task(s)",
                                outcome.removed.report,
                                outcome.cleared.len()
                            ),
                        );
                    }
                    Err(e) => self.toasts.push(Level::Error, e.to_string()),
                }
                self.close_confirm();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.close_confirm(),
            _ => {}
        }
        self.report_persist_warning();
    }

    fn close_confirm(&mut self) {
        self.pending_delete = None;
        self.state = AppState::Browse;
        self.clamp_selection();
    }

    fn report_persist_warning(&mut self) {
        if let Some(err) = self.store.take_persist_warning() {
            self.toasts.push(
                Level::Warning,
                format!("Change kept for this session only: {err}"),
            );
        }
    }

    /// Main event loop. Polls with a short timeout so toasts expire on time.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
            self.toasts.prune(Instant::now());
        }
        self.store.cancel_edit();
        Ok(())
    }
}

/// Next value of a filter selector: none, each item in turn, then none again.
fn cycle<T: Clone + PartialEq>(current: Option<&T>, all: &[T]) -> Option<T> {
    match current {
        None => all.first().cloned(),
        Some(value) => all
            .iter()
            .position(|x| x == value)
            .and_then(|i| all.get(i + 1))
            .cloned(),
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    let max = len.saturating_sub(1) as isize;
    (current as isize + delta).clamp(0, max) as usize
}
