use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::domain::{Score, StatLine, Team};
use crate::stats::Totals;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: i64,
    pub date: NaiveDateTime,
    pub map: String,
    pub score_blue: u32,
    pub score_red: u32,
}

impl Match {
    pub fn score(&self) -> Score {
        Score::new(self.score_blue, self.score_red)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPlayer {
    pub match_id: i64,
    pub player_name: String,
    pub team: Team,
    pub line: StatLine,
}

#[derive(Debug, Clone)]
pub struct MatchWithPlayers {
    pub header: Match,
    pub players: Vec<MatchPlayer>,
}

// DTO for the player history join
#[derive(Debug, Clone)]
pub struct PlayerMatchRow {
    pub match_id: i64,
    pub date: NaiveDateTime,
    pub map: String,
    pub score_blue: u32,
    pub score_red: u32,
    pub team: Team,
    pub line: StatLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    AlreadyRegistered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { match_rows: usize },
    NotFound,
    NameTaken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMatch {
    pub id: i64,
    /// Roster names with no registered player; they get no row and no stats.
    pub skipped_players: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { players_adjusted: usize },
    NotFound,
}

impl ToSql for Team {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Team {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
