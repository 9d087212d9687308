use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::api::models::{MatchCreate, MatchPlayerIn};
use crate::domain::Team;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("{field} must be a whole number, got {value:?}")]
    InvalidNumber { field: String, value: String },
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub player: Option<String>,
    pub match_id: Option<String>,
}

impl HomeQuery {
    /// Blank or non-numeric ids are treated as no lookup.
    pub fn match_id(&self) -> Option<i64> {
        self.match_id.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayerForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameForm {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMatchForm {
    pub match_id: i64,
    /// Checkbox; present only when ticked.
    pub adjust_stats: Option<String>,
}

impl DeleteMatchForm {
    pub fn adjust_stats(&self) -> bool {
        self.adjust_stats.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct EditParticipationForm {
    pub match_id: i64,
    pub player_name: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

/// The first half of the roster slots play blue, the rest red.
pub fn team_for_slot(slot: usize, roster_size: usize) -> Team {
    if slot < roster_size / 2 {
        Team::Blue
    } else {
        Team::Red
    }
}

/// Builds the API payload from the flat match form.
///
/// Slots `0..roster_size` are read from `player_{i}`, `kills_{i}`,
/// `deaths_{i}` and `assists_{i}`; slots with no player chosen are left out.
pub fn parse_match_form(fields: &HashMap<String, String>, roster_size: usize) -> Result<MatchCreate, FormError> {
    let map = required(fields, "map")?.to_string();
    let score_blue = number(fields, "score_blue")?;
    let score_red = number(fields, "score_red")?;

    let mut players = Vec::new();
    for slot in 0..roster_size {
        let player_name = fields
            .get(&format!("player_{slot}"))
            .map(|name| name.trim())
            .unwrap_or_default();
        if player_name.is_empty() {
            continue;
        }

        players.push(MatchPlayerIn {
            player_name: player_name.to_string(),
            team: team_for_slot(slot, roster_size),
            kills: number(fields, &format!("kills_{slot}"))?,
            deaths: number(fields, &format!("deaths_{slot}"))?,
            assists: number(fields, &format!("assists_{slot}"))?,
        });
    }

    Ok(MatchCreate {
        map,
        score_blue,
        score_red,
        players,
    })
}

fn required<'a>(fields: &'a HashMap<String, String>, field: &str) -> Result<&'a str, FormError> {
    fields
        .get(field)
        .map(String::as_str)
        .ok_or_else(|| FormError::MissingField(field.to_string()))
}

fn number(fields: &HashMap<String, String>, field: &str) -> Result<u32, FormError> {
    let raw = required(fields, field)?.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse().map_err(|_| FormError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_team_for_slot_splits_roster() {
        let teams: Vec<Team> = (0..10).map(|slot| team_for_slot(slot, 10)).collect();
        assert!(teams[..5].iter().all(|t| *t == Team::Blue));
        assert!(teams[5..].iter().all(|t| *t == Team::Red));
    }

    #[test]
    fn test_parse_match_form_reads_filled_slots() {
        let fields = form(&[
            ("map", "Bank"),
            ("score_blue", "5"),
            ("score_red", "3"),
            ("player_0", "Ash"),
            ("kills_0", "11"),
            ("deaths_0", "4"),
            ("assists_0", "2"),
            ("player_1", ""),
            ("kills_1", "0"),
            ("deaths_1", "0"),
            ("assists_1", "0"),
            ("player_7", "Jager"),
            ("kills_7", "6"),
            ("deaths_7", ""),
            ("assists_7", "1"),
        ]);

        let payload = parse_match_form(&fields, 10).unwrap();

        assert_eq!(payload.map, "Bank");
        assert_eq!((payload.score_blue, payload.score_red), (5, 3));
        assert_eq!(payload.players.len(), 2);
        assert_eq!(payload.players[0].player_name, "Ash");
        assert_eq!(payload.players[0].team, Team::Blue);
        assert_eq!(payload.players[0].kills, 11);
        assert_eq!(payload.players[1].player_name, "Jager");
        assert_eq!(payload.players[1].team, Team::Red);
        assert_eq!(payload.players[1].deaths, 0);
    }

    #[test]
    fn test_parse_match_form_reports_bad_numbers() {
        let fields = form(&[("map", "Bank"), ("score_blue", "five"), ("score_red", "3")]);

        let err = parse_match_form(&fields, 10).unwrap_err();

        assert_eq!(
            err,
            FormError::InvalidNumber {
                field: "score_blue".into(),
                value: "five".into()
            }
        );
    }

    #[test]
    fn test_parse_match_form_requires_map() {
        let fields = form(&[("score_blue", "1"), ("score_red", "0")]);
        assert_eq!(
            parse_match_form(&fields, 10).unwrap_err(),
            FormError::MissingField("map".into())
        );
    }

    #[test]
    fn test_home_query_match_id() {
        let query = HomeQuery {
            player: None,
            match_id: Some(" 12 ".into()),
        };
        assert_eq!(query.match_id(), Some(12));

        let blank = HomeQuery {
            player: None,
            match_id: Some("".into()),
        };
        assert_eq!(blank.match_id(), None);
    }
}
