use anyhow::Result;
use axum_extra::extract::cookie::Key;
use log::info;
use std::net::SocketAddr;

use crate::config::settings::DashboardSettings;
use crate::dashboard::{create_router, DashboardState, StatsClient};

pub struct DashboardService {
    port: u16,
    settings: DashboardSettings,
}

impl DashboardService {
    pub fn new(port: u16, settings: DashboardSettings) -> Self {
        Self { port, settings }
    }

    pub async fn run(&self) -> Result<()> {
        let client = StatsClient::new(&self.settings)?;
        info!("Dashboard talking to stats API at {}", client.base_url());

        // Sessions are sealed with a per-process key, so a restart logs everyone out.
        let state = DashboardState::new(client, self.settings.clone(), Key::generate())?;
        let app = create_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Dashboard listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
