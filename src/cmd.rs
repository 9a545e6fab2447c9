//! Command implementations for the CLI interface.
//!
//! Each subcommand opens the task store, performs one operation through it and
//! prints the relevant projection. Mutations report a failed write as a warning
//! instead of an error: the command itself succeeded.

use std::io::Write;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::config::{resolve_data_dir, Config, CONFIG_FILE};
use crate::error::{Error, Result, StoreError};
use crate::fields::*;
use crate::filter::FilterCriteria;
use crate::gateway::{FileGateway, PersistenceGateway};
use crate::store::TaskStore;
use crate::task::{parse_date_input, TaskFields};
use crate::tui::run::run_tui;
use crate::views::{self, CalendarCell, WEEKDAY_HEADERS};

/// Status, priority and type filters shared by the listing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only tasks with this status.
    #[arg(long, value_enum)]
    pub status: Option<Status>,
    /// Only tasks with this priority.
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,
    /// Only tasks of this type.
    #[arg(long = "type")]
    pub kind: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            status: self.status,
            priority: self.priority,
            kind: self.kind.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal UI.
    Ui,

    /// Add a new task.
    Add {
        /// Short title; other tasks name it as their dependency.
        report: String,
        /// Category of work, e.g. "Dev" or "Ops".
        #[arg(long = "type")]
        kind: String,
        /// Longer description.
        #[arg(long)]
        desc: String,
        /// Date: YYYY-MM-DD, "today", "tomorrow" or "in Nd". Defaults to today.
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_enum, default_value_t = Status::Pending)]
        status: Status,
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Report of the task this one depends on.
        #[arg(long)]
        dependency: Option<String>,
    },

    /// List tasks in a table.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Shorter description previews.
        #[arg(long)]
        compact: bool,
    },

    /// Show every field of a task.
    View {
        /// Task ID
        id: String,
    },

    /// Update fields on a task. Unspecified fields keep their value.
    Update {
        /// Task ID
        id: String,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        report: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_dependency")]
        dependency: Option<String>,
        /// Remove the dependency.
        #[arg(long)]
        clear_dependency: bool,
    },

    /// Delete a task.
    Delete {
        /// Task ID
        id: String,
        /// Clear the dependency of every task that depends on this one first.
        #[arg(long)]
        cascade: bool,
    },

    /// List the reports a task may depend on.
    Deps {
        /// Exclude this task, as the edit form does.
        #[arg(long)]
        editing: Option<String>,
    },

    /// Show tasks grouped by status.
    Board {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show a month calendar of task dates.
    Calendar {
        /// Month as YYYY-MM. Defaults to the current month.
        #[arg(long)]
        month: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show counts per status, priority and type, and monthly activity.
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolve configuration, open the store and dispatch the parsed command.
pub fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let config_path = cli.config.unwrap_or_else(|| data_dir.join(CONFIG_FILE));
    let config = Config::load(&config_path)?;
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");

    let mut store = TaskStore::open(FileGateway::new(&data_dir))?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Ui => run_tui(store, config)?,

        Commands::Add { report, kind, desc, date, status, priority, dependency } => {
            let date = match date {
                Some(raw) => Some(parse_date(&raw, today)?),
                None => Some(today),
            };
            let fields = TaskFields {
                kind,
                report,
                description: desc,
                date,
                status: Some(status),
                priority: Some(priority),
                dependency: dependency.unwrap_or_default(),
            };
            cmd_add(&mut store, fields)?
        }

        Commands::List { filter, compact } => {
            let preview = if compact {
                config.display.list_preview
            } else {
                config.display.table_preview
            };
            cmd_list(&store, &filter.criteria(), preview, &config.display.date_format)
        }

        Commands::View { id } => cmd_view(&store, &id, &config)?,

        Commands::Update {
            id, kind, report, desc, date, status, priority, dependency, clear_dependency,
        } => {
            let date = date.map(|raw| parse_date(&raw, today)).transpose()?;
            let changes = UpdateArgs {
                kind,
                report,
                description: desc,
                date,
                status,
                priority,
                dependency: if clear_dependency { Some(String::new()) } else { dependency },
            };
            cmd_update(&mut store, &id, changes)?
        }

        Commands::Delete { id, cascade } => cmd_delete(&mut store, &id, cascade)?,

        Commands::Deps { editing } => cmd_deps(&mut store, editing.as_deref())?,

        Commands::Board { filter } => cmd_board(&store, &filter.criteria()),

        Commands::Calendar { month, filter } => {
            let (year, month) = match month {
                Some(raw) => parse_month(&raw)?,
                None => (today.year(), today.month()),
            };
            cmd_calendar(&store, &filter.criteria(), year, month)?
        }

        Commands::Dashboard { filter } => {
            cmd_dashboard(&store, &filter.criteria(), today, config.dashboard.trend_months)
        }

        Commands::Completions { shell } => cmd_completions(shell),
    }
    Ok(())
}

fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    parse_date_input(raw, today)
        .ok_or_else(|| Error::InvalidArgument(format!("unrecognised date '{raw}'")))
}

/// Parse `YYYY-MM`.
fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let invalid = || Error::InvalidArgument(format!("month must be YYYY-MM, got '{raw}'"));
    let (y, m) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// Print a warning if the last write through the gateway failed.
fn report_persist_warning<G: PersistenceGateway>(store: &mut TaskStore<G>) {
    if let Some(e) = store.take_persist_warning() {
        eprintln!("Warning: {e}. The change may not survive a reload.");
    }
}

/// Add a new task.
pub fn cmd_add<G: PersistenceGateway>(store: &mut TaskStore<G>, fields: TaskFields) -> Result<()> {
    let task = store.create(fields)?;
    report_persist_warning(store);
    println!("Added task {} ({})", task.id, task.report);
    Ok(())
}

/// Print the table projection.
pub fn cmd_list<G: PersistenceGateway>(
    store: &TaskStore<G>,
    criteria: &FilterCriteria,
    preview_len: usize,
    date_format: &str,
) {
    let rows = views::table_rows(store.list(), Some(criteria), preview_len, date_format);
    if rows.is_empty() {
        println!("No tasks.");
        return;
    }
    let desc_width = preview_len + 3;
    println!(
        "{:<14} {:<12} {:<16} {:<desc_width$} {:<18} {:<12} {:<9} {}",
        "ID", "Type", "Report", "Description", "Date", "Status", "Priority", "Dependency"
    );
    for row in rows {
        println!(
            "{:<14} {:<12} {:<16} {:<desc_width$} {:<18} {:<12} {:<9} {}",
            row.id,
            row.kind,
            row.report,
            row.description,
            row.date,
            row.status.label(),
            row.priority.label(),
            row.dependency
        );
    }
}

/// Print every field of one task.
pub fn cmd_view<G: PersistenceGateway>(store: &TaskStore<G>, id: &str, config: &Config) -> Result<()> {
    let task = store
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let dependents: Vec<&str> = store
        .dependents_of(id)
        .into_iter()
        .map(|t| t.report.as_str())
        .collect();

    println!("Task {}", task.id);
    println!("  Type:        {}", task.kind);
    println!("  Report:      {}", task.report);
    println!("  Date:        {}", views::format_date(task.date, &config.display.date_format));
    println!("  Status:      {}", task.status.label());
    println!("  Priority:    {}", task.priority.label());
    println!(
        "  Depends on:  {}",
        if task.has_dependency() { task.dependency.as_str() } else { "None" }
    );
    if !dependents.is_empty() {
        println!("  Needed by:   {}", dependents.join(", "));
    }
    println!("  Description:");
    println!("    {}", task.description);
    Ok(())
}

/// Field overrides for `update`; `None` keeps the current value.
#[derive(Debug, Default)]
pub struct UpdateArgs {
    pub kind: Option<String>,
    pub report: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub dependency: Option<String>,
}

/// Load a task into the edit pointer, merge the overrides and save it.
pub fn cmd_update<G: PersistenceGateway>(
    store: &mut TaskStore<G>,
    id: &str,
    changes: UpdateArgs,
) -> Result<()> {
    let mut fields = TaskFields::from_task(store.begin_edit(id)?);
    if let Some(kind) = changes.kind {
        fields.kind = kind;
    }
    if let Some(report) = changes.report {
        fields.report = report;
    }
    if let Some(description) = changes.description {
        fields.description = description;
    }
    if let Some(date) = changes.date {
        fields.date = Some(date);
    }
    if changes.status.is_some() {
        fields.status = changes.status;
    }
    if changes.priority.is_some() {
        fields.priority = changes.priority;
    }
    if let Some(dependency) = changes.dependency {
        fields.dependency = dependency;
    }

    match store.update(id, fields) {
        Ok(task) => {
            report_persist_warning(store);
            println!("Updated task {} ({})", task.id, task.report);
            Ok(())
        }
        Err(e) => {
            store.cancel_edit();
            Err(e.into())
        }
    }
}

/// Delete a task, optionally clearing references to it first.
pub fn cmd_delete<G: PersistenceGateway>(store: &mut TaskStore<G>, id: &str, cascade: bool) -> Result<()> {
    if cascade {
        let outcome = store.delete_cascade(id)?;
        report_persist_warning(store);
        if !outcome.cleared.is_empty() {
            println!(
                "Cleared dependency on '{}' from {} task(s): {}",
                outcome.removed.report,
                outcome.cleared.len(),
                outcome.cleared.join(", ")
            );
        }
        println!("Deleted task {} ({})", outcome.removed.id, outcome.removed.report);
        return Ok(());
    }

    match store.delete(id) {
        Ok(removed) => {
            report_persist_warning(store);
            println!("Deleted task {} ({})", removed.id, removed.report);
            Ok(())
        }
        Err(e @ StoreError::DependencyConflict { .. }) => {
            for dependent in store.dependents_of(id) {
                eprintln!("  needed by {} ({})", dependent.id, dependent.report);
            }
            eprintln!("Use --cascade to clear those dependencies and delete anyway.");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Print the dependency candidates, "None" first.
pub fn cmd_deps<G: PersistenceGateway>(store: &mut TaskStore<G>, editing: Option<&str>) -> Result<()> {
    if let Some(id) = editing {
        store.begin_edit(id)?;
    }
    for option in store.dependency_candidates() {
        println!("{}", option.label);
    }
    store.cancel_edit();
    Ok(())
}

/// Print the kanban projection one column after another.
pub fn cmd_board<G: PersistenceGateway>(store: &TaskStore<G>, criteria: &FilterCriteria) {
    let board = views::kanban(store.list(), Some(criteria));
    for column in &board.columns {
        println!("== {} ==", column.title());
        for card in &column.cards {
            let dependency = if card.dependency.is_empty() {
                String::new()
            } else {
                format!(" <- {}", card.dependency)
            };
            println!(
                "  [{}] {} | {} | {} | {}{}",
                card.id,
                card.report,
                card.kind,
                card.priority.label(),
                card.date,
                dependency
            );
        }
    }
}

/// Print the calendar projection as a Monday-first grid followed by the day agendas.
pub fn cmd_calendar<G: PersistenceGateway>(
    store: &TaskStore<G>,
    criteria: &FilterCriteria,
    year: i32,
    month: u32,
) -> Result<()> {
    let cal = views::calendar_month(store.list(), Some(criteria), year, month)
        .ok_or_else(|| Error::InvalidArgument(format!("no such month {year}-{month:02}")))?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", cal.title())?;
    writeln!(out, "{}", WEEKDAY_HEADERS.map(|d| format!("{d:>6}")).join(""))?;
    for week in cal.weeks() {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                CalendarCell::Blank => format!("{:>6}", ""),
                CalendarCell::Day { date, entries } if entries.is_empty() => format!("{:>6}", date.day()),
                CalendarCell::Day { date, entries } => format!("{:>6}", format!("{}*{}", date.day(), entries.len())),
            })
            .collect();
        writeln!(out, "{line}")?;
    }

    for cell in &cal.cells {
        if let CalendarCell::Day { date, entries } = cell {
            if entries.is_empty() {
                continue;
            }
            let reports: Vec<String> = entries
                .iter()
                .map(|e| format!("{} [{}]", e.report, e.status.label()))
                .collect();
            writeln!(out, "{}: {}", date.format("%b %-d"), reports.join(", "))?;
        }
    }
    Ok(())
}

/// Print the dashboard projection with text bars.
pub fn cmd_dashboard<G: PersistenceGateway>(
    store: &TaskStore<G>,
    criteria: &FilterCriteria,
    today: NaiveDate,
    trend_months: u32,
) {
    let d = views::dashboard(store.list(), Some(criteria), store.history(), today, trend_months);

    println!("Tasks: {} ({}% completed)", d.total, d.completion_percent());
    println!();
    println!("By status");
    for (status, n) in &d.by_status {
        println!("  {:<12} {:>4} {}", status.label(), n, "#".repeat(*n));
    }
    println!("By priority");
    for (priority, n) in &d.by_priority {
        println!("  {:<12} {:>4} {}", priority.label(), n, "#".repeat(*n));
    }
    println!("By type");
    for (kind, n) in &d.by_type {
        println!("  {:<12} {:>4}", kind, n);
    }
    println!("Activity");
    println!("  {:<8} {:>8} {:>10}", "Month", "Created", "Completed");
    for point in &d.trend {
        println!("  {:<8} {:>8} {:>10}", point.label, point.created, point.completed);
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
