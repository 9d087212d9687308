pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod domain;
pub mod services;
pub mod stats;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::{AppConfig, DashboardSettings, DatabaseSettings};
use crate::services::dashboard::DashboardService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env()?;
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_dashboard(port: u16, api_url: Option<String>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let settings = DashboardSettings::from_env().with_api_url(api_url);
        let service = DashboardService::new(port, settings);
        service.run().await
    })
}

pub fn handle_reset() -> Result<()> {
    let settings = DatabaseSettings::from_env();
    let pool = database::create_pool(&settings.path)?;
    let conn = database::get_connection(&pool)?;
    database::setup::reset_database(&conn)?;
    log::info!("Database {} reset", settings.path);
    Ok(())
}
