use anyhow::Result;

use fpl_stats::cli::Command;
use fpl_stats::{handle_dashboard, handle_reset, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Dashboard { port, api_url } => handle_dashboard(*port, api_url.clone()),
        Command::Reset => handle_reset(),
    }
}
