use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{CreatedMatch, DeleteOutcome, Match, MatchPlayer, MatchWithPlayers};
use super::players;
use crate::domain::{NewMatch, RosterEntry, StatLine};
use crate::stats::match_delta;

/// Stores a match with its roster and credits every known player's totals.
///
/// Roster entries naming an unregistered player are skipped: no
/// participation row, no stat change.
pub fn create(conn: &mut Connection, new_match: &NewMatch, played_at: NaiveDateTime) -> Result<CreatedMatch> {
    let tx = conn.transaction().context("Failed to begin match transaction")?;

    let id = insert_match(&tx, new_match, played_at)?;
    let mut skipped_players = Vec::new();

    for entry in &new_match.roster {
        let Some(mut player) = players::find_by_name(&tx, &entry.player_name)? else {
            warn!("Match {}: skipping unknown player {}", id, entry.player_name);
            skipped_players.push(entry.player_name.clone());
            continue;
        };

        let delta = match_delta(entry.team, new_match.score, entry.line);
        player.totals.apply(&delta);
        players::save_totals(&tx, &player.name, &player.totals)?;

        insert_participation(&tx, id, entry)?;
    }

    tx.commit().context("Failed to commit match")?;

    info!(
        "Created match {} on {} ({}-{}), {} players skipped",
        id,
        new_match.map,
        new_match.score.blue,
        new_match.score.red,
        skipped_players.len()
    );
    Ok(CreatedMatch { id, skipped_players })
}

fn insert_match(conn: &Connection, new_match: &NewMatch, played_at: NaiveDateTime) -> Result<i64> {
    let sql = "INSERT INTO matches (date, map, score_blue, score_red) VALUES (?1, ?2, ?3, ?4) RETURNING id";

    conn.query_row(
        sql,
        params![played_at, new_match.map, new_match.score.blue, new_match.score.red],
        |row| row.get(0),
    )
    .context("Failed to insert match")
}

fn insert_participation(conn: &Connection, match_id: i64, entry: &RosterEntry) -> Result<()> {
    let sql = "INSERT INTO match_players (match_id, player_name, team, kills, deaths, assists) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

    conn.execute(
        sql,
        params![
            match_id,
            entry.player_name,
            entry.team,
            entry.line.kills,
            entry.line.deaths,
            entry.line.assists
        ],
    )
    .with_context(|| format!("Failed to insert participation of {}", entry.player_name))?;

    Ok(())
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<MatchWithPlayers>> {
    let Some(header) = find_header(conn, id)? else {
        return Ok(None);
    };
    let players = list_participants(conn, id)?;

    Ok(Some(MatchWithPlayers { header, players }))
}

fn find_header(conn: &Connection, id: i64) -> Result<Option<Match>> {
    let sql = "SELECT id, date, map, score_blue, score_red FROM matches WHERE id = ?1";

    conn.query_row(sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

fn list_participants(conn: &Connection, match_id: i64) -> Result<Vec<MatchPlayer>> {
    let sql = "SELECT match_id, player_name, team, kills, deaths, assists FROM match_players WHERE match_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![match_id], parse_match_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to load roster of match {}", match_id))?;

    Ok(rows)
}

/// Deletes a match and its roster.
///
/// With `adjust_stats` the stored roster and score are first reverted from
/// each player's totals, flooring counters at zero.
pub fn delete(conn: &mut Connection, id: i64, adjust_stats: bool) -> Result<DeleteOutcome> {
    let tx = conn.transaction().context("Failed to begin delete transaction")?;

    let Some(header) = find_header(&tx, id)? else {
        return Ok(DeleteOutcome::NotFound);
    };

    let mut players_adjusted = 0;
    if adjust_stats {
        for participant in list_participants(&tx, id)? {
            let Some(mut player) = players::find_by_name(&tx, &participant.player_name)? else {
                continue;
            };
            let delta = match_delta(participant.team, header.score(), participant.line);
            player.totals.revert(&delta);
            players::save_totals(&tx, &player.name, &player.totals)?;
            players_adjusted += 1;
        }
    }

    tx.execute("DELETE FROM match_players WHERE match_id = ?1", params![id])
        .context("Failed to delete match roster")?;
    tx.execute("DELETE FROM matches WHERE id = ?1", params![id])
        .context("Failed to delete match")?;

    tx.commit().context("Failed to commit match deletion")?;

    info!("Deleted match {} (stats adjusted for {} players)", id, players_adjusted);
    Ok(DeleteOutcome::Deleted { players_adjusted })
}

/// Overwrites the participation row of `player_name` in a match; a name
/// appears at most once per roster. Player totals are left untouched.
pub fn update_participation(conn: &Connection, match_id: i64, player_name: &str, line: StatLine) -> Result<bool> {
    let sql = "UPDATE match_players SET kills = ?1, deaths = ?2, assists = ?3 WHERE match_id = ?4 AND player_name = ?5";

    let updated = conn
        .execute(sql, params![line.kills, line.deaths, line.assists, match_id, player_name])
        .context("Failed to update participation")?;

    Ok(updated > 0)
}

pub fn count(conn: &Connection) -> Result<u32> {
    conn.query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))
        .context("Failed to count matches")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        date: row.get(1)?,
        map: row.get(2)?,
        score_blue: row.get(3)?,
        score_red: row.get(4)?,
    })
}

fn parse_match_player_row(row: &rusqlite::Row) -> rusqlite::Result<MatchPlayer> {
    Ok(MatchPlayer {
        match_id: row.get(0)?,
        player_name: row.get(1)?,
        team: row.get(2)?,
        line: StatLine::new(row.get(3)?, row.get(4)?, row.get(5)?),
    })
}
