pub mod client;
pub mod forms;
pub mod handlers;
pub mod render;
pub mod session;

pub use client::{ClientError, StatsClient};
pub use handlers::{create_router, DashboardState};
