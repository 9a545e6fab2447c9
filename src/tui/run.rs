//! Terminal UI entry point and setup.

use std::io;

use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::gateway::FileGateway;
use crate::store::TaskStore;
use crate::tui::app::App;

/// Take over the terminal and run the interactive UI until the user quits.
/// The terminal is restored even when the event loop fails.
pub fn run_tui(store: TaskStore<FileGateway>, config: Config) -> anyhow::Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("entering the alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating the terminal")?;

    tracing::info!(tasks = store.list().len(), "terminal UI started");
    let mut app = App::new(store, config);
    let result = app.run(&mut terminal);

    disable_raw_mode().context("disabling raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leaving the alternate screen")?;
    terminal.show_cursor().context("restoring the cursor")?;

    result.context("terminal UI event loop")?;
    tracing::info!("terminal UI closed");
    Ok(())
}
