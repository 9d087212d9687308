use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::models::{DeleteParams, MatchCreate, MatchCreated, MatchOut, MessageResponse, ParticipationUpdate};
use crate::database::{self, DeleteOutcome};
use crate::domain::NewMatch;

/// Delete reverses stat effects unless `adjust_stats=false` is given.
const DEFAULT_ADJUST_STATS: bool = true;

pub async fn create_match(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MatchCreate>, JsonRejection>,
) -> Result<Json<MatchCreated>, ApiError> {
    let Json(request) = payload?;
    let new_match = NewMatch::try_from(request)?;
    let mut conn = state.connection()?;

    let created = database::matches::create(&mut conn, &new_match, Utc::now().naive_utc())
        .map_err(ApiError::internal("Internal error while saving match"))?;

    Ok(Json(MatchCreated {
        match_id: created.id,
        msg: "Match saved successfully.".into(),
        skipped_players: created.skipped_players,
    }))
}

pub async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
) -> Result<Json<MatchOut>, ApiError> {
    let conn = state.connection()?;

    let stored = database::matches::find(&conn, match_id)
        .map_err(ApiError::internal("Internal error while loading match"))?
        .ok_or_else(|| ApiError::NotFound("Match not found".into()))?;

    Ok(Json(MatchOut::from(stored)))
}

pub async fn delete_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Query(params) = params?;
    let adjust_stats = params.adjust_stats.unwrap_or(DEFAULT_ADJUST_STATS);
    let mut conn = state.connection()?;

    let outcome = database::matches::delete(&mut conn, match_id, adjust_stats)
        .map_err(ApiError::internal("Internal error while deleting match"))?;

    match outcome {
        DeleteOutcome::Deleted { players_adjusted } if adjust_stats => Ok(Json(MessageResponse::new(format!(
            "Match deleted; stats reverted for {} players.",
            players_adjusted
        )))),
        DeleteOutcome::Deleted { .. } => Ok(Json(MessageResponse::new("Match deleted; player stats kept."))),
        DeleteOutcome::NotFound => Err(ApiError::NotFound("Match not found".into())),
    }
}

/// Overwrites one participation row. The player's totals are not
/// recomputed, so they drift from the edited row.
pub async fn update_match_player(
    State(state): State<Arc<AppState>>,
    Path((match_id, player_name)): Path<(i64, String)>,
    payload: Result<Json<ParticipationUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(update) = payload?;
    let conn = state.connection()?;

    let updated = database::matches::update_participation(&conn, match_id, &player_name, update.into())
        .map_err(ApiError::internal("Internal error while updating match stats"))?;

    if !updated {
        return Err(ApiError::NotFound("Player not found in this match".into()));
    }

    log::info!("Edited stats of {} in match {}", player_name, match_id);
    Ok(Json(MessageResponse::new("Match stats updated.")))
}
