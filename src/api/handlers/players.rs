use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use std::sync::Arc;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::models::{MessageResponse, PlayerCreate, PlayerMatchOut, PlayerOut, PlayerRename};
use crate::database::{self, RegisterOutcome, RenameOutcome};
use crate::domain::PlayerName;
use crate::stats::{rank_players, RankedPlayer};

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlayerCreate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    let name = PlayerName::new(&request.name)?;
    let conn = state.connection()?;

    let outcome = database::players::register(&conn, &name)
        .map_err(ApiError::internal("Internal error while registering player"))?;

    let msg = match outcome {
        RegisterOutcome::Registered => {
            log::info!("Registered player {}", name);
            "Player registered successfully."
        }
        RegisterOutcome::AlreadyRegistered => "Player already registered.",
    };
    Ok(Json(MessageResponse::new(msg)))
}

pub async fn rename_player(
    State(state): State<Arc<AppState>>,
    Path(old_name): Path<String>,
    payload: Result<Json<PlayerRename>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    let new_name = PlayerName::new(&request.name)?;
    let mut conn = state.connection()?;

    let outcome = database::players::rename(&mut conn, &old_name, &new_name)
        .map_err(ApiError::internal("Internal error while renaming player"))?;

    match outcome {
        RenameOutcome::Renamed { .. } => Ok(Json(MessageResponse::new("Player renamed successfully."))),
        RenameOutcome::NameTaken => Ok(Json(MessageResponse::new(format!(
            "A player named {} already exists.",
            new_name
        )))),
        RenameOutcome::NotFound => Err(ApiError::Missing("Player not found".into())),
    }
}

pub async fn get_players(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PlayerOut>>, ApiError> {
    let conn = state.connection()?;

    let players = database::players::list_all(&conn)
        .map_err(ApiError::internal("Internal error while loading players"))?;

    Ok(Json(players.into_iter().map(PlayerOut::from).collect()))
}

pub async fn get_player_matches(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<PlayerMatchOut>>, ApiError> {
    let conn = state.connection()?;

    let player = database::players::find_by_name(&conn, &name)
        .map_err(ApiError::internal("Internal error while loading player"))?;
    if player.is_none() {
        return Err(ApiError::NotFound("Player not found".into()));
    }

    let history = database::players::match_history(&conn, &name)
        .map_err(ApiError::internal("Internal error while loading match history"))?;

    Ok(Json(history.into_iter().map(PlayerMatchOut::from).collect()))
}

/// Leaderboard of players with enough matches, best first.
pub async fn get_rankings(State(state): State<Arc<AppState>>) -> Result<Json<Vec<RankedPlayer>>, ApiError> {
    let conn = state.connection()?;

    let players = database::players::list_all(&conn)
        .map_err(ApiError::internal("Internal error while loading players"))?;

    let ranked = rank_players(
        players.iter().map(|p| (p.name.as_str(), &p.totals)),
        state.config.ranking.min_ranked_matches,
    );
    Ok(Json(ranked))
}
