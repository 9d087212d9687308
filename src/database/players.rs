use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Player, PlayerMatchRow, RegisterOutcome, RenameOutcome};
use crate::domain::{PlayerName, StatLine};
use crate::stats::Totals;

const PLAYER_COLUMNS: &str =
    "name, matches, wins, losses, kills, deaths, assists, rounds_won, rounds_lost";

/// Inserts a player with zeroed counters unless the name is already taken.
pub fn register(conn: &Connection, name: &PlayerName) -> Result<RegisterOutcome> {
    let sql = "INSERT INTO players (name) VALUES (?1) ON CONFLICT(name) DO NOTHING";

    let inserted = conn
        .execute(sql, params![name.as_str()])
        .context("Failed to insert player")?;

    if inserted == 0 {
        Ok(RegisterOutcome::AlreadyRegistered)
    } else {
        Ok(RegisterOutcome::Registered)
    }
}

/// Renames a player and rewrites their match history in one transaction.
pub fn rename(conn: &mut Connection, old_name: &str, new_name: &PlayerName) -> Result<RenameOutcome> {
    let tx = conn.transaction().context("Failed to begin rename transaction")?;

    if find_by_name(&tx, old_name)?.is_none() {
        return Ok(RenameOutcome::NotFound);
    }
    if new_name.as_str() != old_name && find_by_name(&tx, new_name.as_str())?.is_some() {
        return Ok(RenameOutcome::NameTaken);
    }

    tx.execute(
        "UPDATE players SET name = ?1 WHERE name = ?2",
        params![new_name.as_str(), old_name],
    )
    .context("Failed to rename player")?;

    let match_rows = tx
        .execute(
            "UPDATE match_players SET player_name = ?1 WHERE player_name = ?2",
            params![new_name.as_str(), old_name],
        )
        .context("Failed to rename player in match history")?;

    tx.commit().context("Failed to commit rename")?;

    log::info!("Renamed player {} -> {} ({} match rows)", old_name, new_name, match_rows);
    Ok(RenameOutcome::Renamed { match_rows })
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE name = ?1");

    conn.query_row(&sql, params![name], parse_player_row)
        .optional()
        .context("Failed to query player by name")
}

/// Every player in registration order.
pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY rowid");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn save_totals(conn: &Connection, name: &str, totals: &Totals) -> Result<()> {
    let sql = "UPDATE players SET matches = ?1, wins = ?2, losses = ?3, kills = ?4, deaths = ?5, assists = ?6, rounds_won = ?7, rounds_lost = ?8 WHERE name = ?9";

    conn.execute(
        sql,
        params![
            totals.matches,
            totals.wins,
            totals.losses,
            totals.kills,
            totals.deaths,
            totals.assists,
            totals.rounds_won,
            totals.rounds_lost,
            name
        ],
    )
    .with_context(|| format!("Failed to save totals for player {}", name))?;

    Ok(())
}

pub fn count(conn: &Connection) -> Result<u32> {
    conn.query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
        .context("Failed to count players")
}

/// Participation rows of one player joined with their match, newest first.
pub fn match_history(conn: &Connection, name: &str) -> Result<Vec<PlayerMatchRow>> {
    let sql = "
        SELECT m.id, m.date, m.map, m.score_blue, m.score_red, mp.team, mp.kills, mp.deaths, mp.assists
        FROM match_players mp
        JOIN matches m ON m.id = mp.match_id
        WHERE mp.player_name = ?1
        ORDER BY m.date DESC, m.id DESC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![name], |row| {
            Ok(PlayerMatchRow {
                match_id: row.get(0)?,
                date: row.get(1)?,
                map: row.get(2)?,
                score_blue: row.get(3)?,
                score_red: row.get(4)?,
                team: row.get(5)?,
                line: StatLine::new(row.get(6)?, row.get(7)?, row.get(8)?),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to load match history for {}", name))?;

    Ok(rows)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        name: row.get(0)?,
        totals: Totals {
            matches: row.get(1)?,
            wins: row.get(2)?,
            losses: row.get(3)?,
            kills: row.get(4)?,
            deaths: row.get(5)?,
            assists: row.get(6)?,
            rounds_won: row.get(7)?,
            rounds_lost: row.get(8)?,
        },
    })
}
