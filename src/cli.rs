use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "fpl-stats backend and dashboard")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the stats API server
    Serve {
        /// Port number (optional, defaults to 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },
    /// Start the web dashboard
    Dashboard {
        /// Port number (optional, defaults to 8501)
        #[arg(short, long, default_value_t = 8501)]
        port: u16,
        /// Base URL of the stats API (falls back to FPL_API_URL)
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Drop and recreate the database schema
    Reset,
}
