//! # tt - a local task tracker
//!
//! Tasks carry a type, a short report title, a description, a date, a status, a
//! priority and an optional dependency on another task's report. The same
//! collection is shown four ways: a table (or compact list), a kanban board with
//! one column per status, a month calendar and a dashboard of aggregate counts
//! with a monthly activity trend.
//!
//! ## Layout
//!
//! - [`store::TaskStore`] owns the collection and the edit pointer. It validates
//!   input, keeps dependencies intact and writes through a
//!   [`gateway::PersistenceGateway`].
//! - [`views`] holds the pure projections; [`filter`] the criteria they share.
//! - [`cmd`] implements the `tt` subcommands and [`tui`] the interactive UI.
//!
//! ## Quick Start
//!
//! ```bash
//! tt add "Login page" --type Dev --desc "Email and password form" --priority high
//! tt add "Deploy" --type Ops --desc "Ship it" --dependency "Login page"
//! tt board
//! tt calendar --month 2024-05
//! tt ui
//! ```
//!
//! Data lives in `tasks.json` and `task_history.json` under the data directory
//! (`--data-dir`, `$TASKTRACKER_DIR`, or the platform data directory).

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fields;
pub mod filter;
pub mod gateway;
pub mod history;
pub mod logging;
pub mod store;
pub mod task;
pub mod views;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod render;
    pub mod run;
    pub mod task_form;
    pub mod toast;
    pub mod utils;
}

pub use error::{Error, Result};
