//! Wire payloads of the stats API and their mapping to storage records.
//!
//! The dashboard deserializes the same types, so every response type
//! derives both directions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::database::models::{MatchPlayer, MatchWithPlayers, Player, PlayerMatchRow};
use crate::domain::{NewMatch, RosterEntry, Score, StatLine, Team, ValidationError};
use crate::stats::Totals;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCreate {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRename {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerOut {
    pub name: String,
    #[serde(flatten)]
    pub totals: Totals,
}

impl From<Player> for PlayerOut {
    fn from(player: Player) -> Self {
        Self {
            name: player.name,
            totals: player.totals,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPlayerIn {
    pub player_name: String,
    pub team: Team,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCreate {
    pub map: String,
    pub score_blue: u32,
    pub score_red: u32,
    pub players: Vec<MatchPlayerIn>,
}

impl TryFrom<MatchCreate> for NewMatch {
    type Error = ValidationError;

    fn try_from(payload: MatchCreate) -> Result<Self, Self::Error> {
        let roster = payload
            .players
            .iter()
            .map(|p| RosterEntry::new(&p.player_name, p.team, StatLine::new(p.kills, p.deaths, p.assists)))
            .collect();

        NewMatch::new(&payload.map, Score::new(payload.score_blue, payload.score_red), roster)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCreated {
    pub match_id: i64,
    pub msg: String,
    #[serde(default)]
    pub skipped_players: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOut {
    pub blue: u32,
    pub red: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPlayerOut {
    pub player_name: String,
    pub team: Team,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

impl From<MatchPlayer> for MatchPlayerOut {
    fn from(row: MatchPlayer) -> Self {
        Self {
            player_name: row.player_name,
            team: row.team,
            kills: row.line.kills,
            deaths: row.line.deaths,
            assists: row.line.assists,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOut {
    pub id: i64,
    pub date: NaiveDateTime,
    pub map: String,
    pub score: ScoreOut,
    pub players: Vec<MatchPlayerOut>,
}

impl From<MatchWithPlayers> for MatchOut {
    fn from(stored: MatchWithPlayers) -> Self {
        let header = stored.header;
        Self {
            id: header.id,
            date: header.date,
            map: header.map,
            score: ScoreOut {
                blue: header.score_blue,
                red: header.score_red,
            },
            players: stored.players.into_iter().map(MatchPlayerOut::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMatchOut {
    pub match_id: i64,
    pub date: NaiveDateTime,
    pub map: String,
    pub score_blue: u32,
    pub score_red: u32,
    pub team: Team,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

impl From<PlayerMatchRow> for PlayerMatchOut {
    fn from(row: PlayerMatchRow) -> Self {
        Self {
            match_id: row.match_id,
            date: row.date,
            map: row.map,
            score_blue: row.score_blue,
            score_red: row.score_red,
            team: row.team,
            kills: row.line.kills,
            deaths: row.line.deaths,
            assists: row.line.assists,
        }
    }
}

impl PlayerMatchOut {
    pub fn won(&self) -> bool {
        Score::new(self.score_blue, self.score_red).winner() == self.team
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipationUpdate {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

impl From<ParticipationUpdate> for StatLine {
    fn from(update: ParticipationUpdate) -> Self {
        StatLine::new(update.kills, update.deaths, update.assists)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteParams {
    pub adjust_stats: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub total_matches: u32,
    pub total_players: u32,
}

/// Any JSON reply of the API: the expected payload or one of the error shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiReply<T> {
    Ok(T),
    Error { error: String },
    Detail { detail: String },
}

impl<T> ApiReply<T> {
    pub fn into_result(self) -> Result<T, String> {
        match self {
            ApiReply::Ok(value) => Ok(value),
            ApiReply::Error { error } => Err(error),
            ApiReply::Detail { detail } => Err(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_player_out_uses_wire_field_names() {
        let player = Player {
            name: "Ash".into(),
            totals: Totals {
                rounds_won: 5,
                rounds_lost: 3,
                ..Totals::default()
            },
        };

        let value = serde_json::to_value(PlayerOut::from(player)).unwrap();

        assert_eq!(value["name"], "Ash");
        assert_eq!(value["roundsWon"], 5);
        assert_eq!(value["roundsLost"], 3);
        assert_eq!(value["matches"], 0);
    }

    #[test]
    fn test_match_create_maps_to_new_match() {
        let payload: MatchCreate = serde_json::from_value(json!({
            "map": "Villa",
            "score_blue": 5,
            "score_red": 3,
            "players": [
                {"player_name": " Ash ", "team": "blue", "kills": 10, "deaths": 4, "assists": 2},
                {"player_name": "Jager", "team": "red", "kills": 3, "deaths": 8, "assists": 0}
            ]
        }))
        .unwrap();

        let new_match = NewMatch::try_from(payload).unwrap();

        assert_eq!(new_match.map, "Villa");
        assert_eq!(new_match.score, Score::new(5, 3));
        assert_eq!(new_match.roster[0].player_name.as_str(), "Ash");
        assert_eq!(new_match.roster[1].team, Team::Red);
        assert_eq!(new_match.roster[0].line, StatLine::new(10, 4, 2));
    }

    fn roster_line(name: &str, team: Team) -> MatchPlayerIn {
        MatchPlayerIn {
            player_name: name.into(),
            team,
            kills: 0,
            deaths: 0,
            assists: 0,
        }
    }

    #[test]
    fn test_match_create_keeps_blank_roster_name_for_the_store() {
        let payload = MatchCreate {
            map: "Villa".into(),
            score_blue: 1,
            score_red: 0,
            players: vec![roster_line("Ash", Team::Blue), roster_line("  ", Team::Red)],
        };

        let new_match = NewMatch::try_from(payload).unwrap();

        assert_eq!(new_match.roster.len(), 2);
        assert_eq!(new_match.roster[1].player_name, "");
    }

    #[test]
    fn test_match_create_rejects_duplicate_roster_names() {
        let payload = MatchCreate {
            map: "Villa".into(),
            score_blue: 1,
            score_red: 0,
            players: vec![roster_line("Ash", Team::Blue), roster_line("Ash", Team::Red)],
        };

        assert_eq!(
            NewMatch::try_from(payload),
            Err(ValidationError::DuplicateRosterName("Ash".into()))
        );
    }

    #[test]
    fn test_match_create_rejects_unknown_team_and_negative_counts() {
        let bad_team = json!({"player_name": "Ash", "team": "green", "kills": 0, "deaths": 0, "assists": 0});
        assert!(serde_json::from_value::<MatchPlayerIn>(bad_team).is_err());

        let negative = json!({"player_name": "Ash", "team": "blue", "kills": -1, "deaths": 0, "assists": 0});
        assert!(serde_json::from_value::<MatchPlayerIn>(negative).is_err());
    }

    #[test]
    fn test_api_reply_variants() {
        let ok: ApiReply<MessageResponse> = serde_json::from_value(json!({"msg": "done"})).unwrap();
        assert_eq!(ok.into_result().unwrap().msg, "done");

        let err: ApiReply<MessageResponse> =
            serde_json::from_value(json!({"error": "Match not found"})).unwrap();
        assert_eq!(err.into_result().unwrap_err(), "Match not found");

        let detail: ApiReply<LoginResponse> =
            serde_json::from_value(json!({"detail": "Invalid credentials"})).unwrap();
        assert_eq!(detail.into_result().unwrap_err(), "Invalid credentials");
    }

    #[test]
    fn test_player_match_out_won() {
        let line = PlayerMatchOut {
            match_id: 1,
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            map: "Bank".into(),
            score_blue: 4,
            score_red: 4,
            team: Team::Red,
            kills: 0,
            deaths: 0,
            assists: 0,
        };
        assert!(line.won());
    }
}
