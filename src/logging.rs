//! Tracing setup.
//!
//! Tracing is opt-in via `RUST_LOG`. The CLI writes to stderr; the terminal UI
//! passes a log file so events never draw over the alternate screen.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter() -> EnvFilter {
    // Keep startup robust: ignore invalid or huge filters.
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"))
}

/// Where formatted events go.
#[derive(Debug)]
enum Sink {
    Stderr,
    File(File),
    /// The log file could not be opened; events are dropped.
    Discard,
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn sink_for(log_file: Option<&Path>) -> Sink {
    match log_file {
        None => Sink::Stderr,
        Some(path) => match open_log_file(path) {
            Ok(file) => Sink::File(file),
            Err(e) => {
                // Printed before the terminal UI takes over the screen.
                eprintln!("warning: logging disabled, cannot open {}: {e}", path.display());
                Sink::Discard
            }
        },
    }
}

/// Install the global subscriber. With `log_file`, events are appended there instead of stderr.
pub fn init(log_file: Option<&Path>) {
    let filter = env_filter();

    let result = match sink_for(log_file) {
        Sink::Stderr => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(filter)
            .try_init(),
        Sink::File(file) => tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(filter)
            .try_init(),
        Sink::Discard => tracing_subscriber::registry().with(filter).try_init(),
    };
    if let Err(e) = result {
        // Another subscriber is already installed; it keeps receiving events.
        tracing::debug!(error = %e, "tracing subscriber not replaced");
    }
}
