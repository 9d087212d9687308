use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::{login, overview},
    matches::{create_match, delete_match, get_match, update_match_player},
    players::{create_player, get_player_matches, get_players, get_rankings, rename_player},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/players", get(get_players).post(create_player))
        .route("/players/:name", put(rename_player))
        .route("/players/:name/matches", get(get_player_matches))
        .route("/rankings", get(get_rankings))
        .route("/matches", post(create_match))
        .route("/matches/:id", get(get_match).delete(delete_match))
        .route("/matches/:id/players/:player_name", put(update_match_player))
        .route("/admin/overview", get(overview))
        .with_state(state)
}
