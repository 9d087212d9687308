use crate::api::error::ApiError;
use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, DbPool};

pub mod admin;
pub mod matches;
pub mod players;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self { pool, config }
    }

    pub fn connection(&self) -> Result<DbConn, ApiError> {
        database::get_connection(&self.pool).map_err(ApiError::internal("Database connection error"))
    }
}
