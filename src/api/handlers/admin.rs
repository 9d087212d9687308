use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use std::sync::Arc;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::models::{LoginRequest, LoginResponse, Overview};
use crate::database;

/// Checks the configured admin credentials. No session is created; the
/// caller keeps the returned flag.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;

    if !state.config.admin.verify(&request.username, &request.password) {
        log::warn!("Rejected admin login for user {:?}", request.username);
        return Err(ApiError::Unauthorized);
    }

    log::info!("Admin login for user {:?}", request.username);
    Ok(Json(LoginResponse { success: true }))
}

pub async fn overview(State(state): State<Arc<AppState>>) -> Result<Json<Overview>, ApiError> {
    let conn = state.connection()?;

    let total_matches = database::matches::count(&conn)
        .map_err(ApiError::internal("Internal error while counting matches"))?;
    let total_players = database::players::count(&conn)
        .map_err(ApiError::internal("Internal error while counting players"))?;

    Ok(Json(Overview {
        total_matches,
        total_players,
    }))
}
