pub mod models;

pub use models::{NewMatch, PlayerName, RosterEntry, Score, StatLine, Team, ValidationError};
