use clap::Parser;

use tasktracker::cli::Cli;
use tasktracker::cmd::{self, Commands};
use tasktracker::config::{resolve_data_dir, LOG_FILE};
use tasktracker::logging;

fn main() {
    let cli = Cli::parse();

    // The UI owns the screen, so its events go to a file in the data directory.
    let log_file = matches!(cli.command, Commands::Ui)
        .then(|| resolve_data_dir(cli.data_dir.as_deref()).join(LOG_FILE));
    logging::init(log_file.as_deref());

    if let Err(err) = cmd::run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
