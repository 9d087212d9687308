use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_NAME_LEN: usize = 64;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Player name must not be empty")]
    EmptyPlayerName,

    #[error("Player name is longer than 64 characters")]
    PlayerNameTooLong,

    #[error("Map name must not be empty")]
    EmptyMap,

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Player {0} appears more than once in the roster")]
    DuplicateRosterName(String),
}

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Blue => "blue",
            Team::Red => "red",
        }
    }

    pub fn opponent(&self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(Team::Blue),
            "red" => Ok(Team::Red),
            other => Err(ValidationError::UnknownTeam(other.to_string())),
        }
    }
}

/// Final round score of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub blue: u32,
    pub red: u32,
}

impl Score {
    pub fn new(blue: u32, red: u32) -> Self {
        Self { blue, red }
    }

    /// Blue wins only on a strictly higher score; a draw goes to red.
    pub fn winner(&self) -> Team {
        if self.blue > self.red {
            Team::Blue
        } else {
            Team::Red
        }
    }

    pub fn rounds_for(&self, team: Team) -> u32 {
        match team {
            Team::Blue => self.blue,
            Team::Red => self.red,
        }
    }

    pub fn rounds_against(&self, team: Team) -> u32 {
        self.rounds_for(team.opponent())
    }
}

/// Trimmed, non-empty player name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyPlayerName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::PlayerNameTooLong);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kills, deaths and assists of one player in one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

impl StatLine {
    pub fn new(kills: u32, deaths: u32, assists: u32) -> Self {
        Self {
            kills,
            deaths,
            assists,
        }
    }
}

/// One submitted roster line.
///
/// The name is only trimmed. Whether it names a registered player is up to
/// the store, which skips entries it cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub player_name: String,
    pub team: Team,
    pub line: StatLine,
}

impl RosterEntry {
    pub fn new(player_name: &str, team: Team, line: StatLine) -> Self {
        Self {
            player_name: player_name.trim().to_string(),
            team,
            line,
        }
    }
}

/// A validated match submission, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub map: String,
    pub score: Score,
    pub roster: Vec<RosterEntry>,
}

impl NewMatch {
    pub fn new(map: &str, score: Score, roster: Vec<RosterEntry>) -> Result<Self, ValidationError> {
        let map = map.trim();
        if map.is_empty() {
            return Err(ValidationError::EmptyMap);
        }

        let mut seen = HashSet::new();
        for entry in roster.iter().filter(|e| !e.player_name.is_empty()) {
            if !seen.insert(entry.player_name.as_str()) {
                return Err(ValidationError::DuplicateRosterName(entry.player_name.clone()));
            }
        }

        Ok(Self {
            map: map.to_string(),
            score,
            roster,
        })
    }
}
