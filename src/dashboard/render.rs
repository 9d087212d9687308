//! Server-side pages of the dashboard.
//!
//! Templates are compiled into the binary and rendered with Tera, which
//! escapes every interpolated value. Admin-only sections are emitted only
//! when the caller's session says so.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;
use urlencoding::encode;

use super::forms::team_for_slot;
use super::session::Session;
use crate::api::models::{MatchOut, MatchPlayerOut, Overview, PlayerMatchOut, PlayerOut};
use crate::config::maps::get_maps;
use crate::config::settings::DashboardSettings;
use crate::domain::Team;
use crate::stats::RankedPlayer;

const HOME_TEMPLATE: &str = "home.html";
const ADMIN_TEMPLATE: &str = "admin.html";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Message shown in the notification area after an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "text", rename_all = "lowercase")]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Error, Debug)]
#[error("Failed to render page: {0}")]
pub struct PageError(#[from] tera::Error);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        log::error!("{:?}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
    }
}

/// Everything fetched from the API for one page render.
#[derive(Debug, Default)]
pub struct HomeView {
    pub players: Vec<PlayerOut>,
    pub ranked: Vec<RankedPlayer>,
    pub history: Option<(String, Vec<PlayerMatchOut>)>,
    pub hud: Option<MatchOut>,
    pub overview: Option<Overview>,
}

pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (HOME_TEMPLATE, include_str!("templates/home.html")),
            (ADMIN_TEMPLATE, include_str!("templates/admin.html")),
        ])?;
        Ok(Self { tera })
    }

    pub fn home(
        &self,
        session: Session,
        notices: &[Notice],
        view: &HomeView,
        settings: &DashboardSettings,
    ) -> Result<String, PageError> {
        let page = HomePage::new(session, notices, view, settings);
        let context = Context::from_serialize(&page)?;
        Ok(self.tera.render(HOME_TEMPLATE, &context)?)
    }
}

// --- Template contexts ---

#[derive(Serialize)]
struct HomePage<'a> {
    is_admin: bool,
    notices: &'a [Notice],
    min_matches: u32,
    ranking: Vec<RankingRow<'a>>,
    history: Option<HistoryTable<'a>>,
    hud: Option<Hud<'a>>,
    overview: Option<&'a Overview>,
    players: Vec<&'a str>,
    maps: &'static [&'static str],
    slots: Vec<RosterSlot>,
}

impl<'a> HomePage<'a> {
    fn new(session: Session, notices: &'a [Notice], view: &'a HomeView, settings: &DashboardSettings) -> Self {
        let is_admin = session.is_admin;
        let (players, slots) = if is_admin {
            let slots = (0..settings.roster_size)
                .map(|index| RosterSlot {
                    index,
                    number: index + 1,
                    team: team_for_slot(index, settings.roster_size),
                })
                .collect();
            (view.players.iter().map(|p| p.name.as_str()).collect(), slots)
        } else {
            (Vec::new(), Vec::new())
        };

        Self {
            is_admin,
            notices,
            min_matches: settings.ranking.min_ranked_matches,
            ranking: view.ranked.iter().map(RankingRow::from).collect(),
            history: view.history.as_ref().map(|(name, rows)| HistoryTable {
                name,
                rows: rows.iter().map(HistoryRow::from).collect(),
            }),
            hud: view.hud.as_ref().map(Hud::from),
            overview: view.overview.as_ref().filter(|_| is_admin),
            players,
            maps: get_maps(),
            slots,
        }
    }
}

#[derive(Serialize)]
struct RankingRow<'a> {
    rank: usize,
    name: &'a str,
    link: String,
    matches: u32,
    wins: u32,
    losses: u32,
    kd: String,
    winrate: String,
    kills: u32,
    deaths: u32,
    assists: u32,
    round_diff: String,
    score: String,
}

impl<'a> From<&'a RankedPlayer> for RankingRow<'a> {
    fn from(row: &'a RankedPlayer) -> Self {
        let t = &row.totals;
        Self {
            rank: row.rank,
            name: &row.name,
            link: encode(&row.name).into_owned(),
            matches: t.matches,
            wins: t.wins,
            losses: t.losses,
            kd: format!("{:.2}", row.kd),
            winrate: format!("{:.1}", row.winrate),
            kills: t.kills,
            deaths: t.deaths,
            assists: t.assists,
            round_diff: format!("{:+}", row.round_diff),
            score: format!("{:.1}", row.ranking_score),
        }
    }
}

#[derive(Serialize)]
struct HistoryTable<'a> {
    name: &'a str,
    rows: Vec<HistoryRow<'a>>,
}

#[derive(Serialize)]
struct HistoryRow<'a> {
    match_id: i64,
    date: String,
    map: &'a str,
    team: Team,
    result: &'static str,
    score_blue: u32,
    score_red: u32,
    kills: u32,
    deaths: u32,
    assists: u32,
}

impl<'a> From<&'a PlayerMatchOut> for HistoryRow<'a> {
    fn from(row: &'a PlayerMatchOut) -> Self {
        Self {
            match_id: row.match_id,
            date: row.date.format(DATE_FORMAT).to_string(),
            map: &row.map,
            team: row.team,
            result: if row.won() { "W" } else { "L" },
            score_blue: row.score_blue,
            score_red: row.score_red,
            kills: row.kills,
            deaths: row.deaths,
            assists: row.assists,
        }
    }
}

#[derive(Serialize)]
struct Hud<'a> {
    map: &'a str,
    date: String,
    blue: u32,
    red: u32,
    players: &'a [MatchPlayerOut],
}

impl<'a> From<&'a MatchOut> for Hud<'a> {
    fn from(game: &'a MatchOut) -> Self {
        Self {
            map: &game.map,
            date: game.date.format(DATE_FORMAT).to_string(),
            blue: game.score.blue,
            red: game.score.red,
            players: &game.players,
        }
    }
}

#[derive(Serialize)]
struct RosterSlot {
    index: usize,
    number: usize,
    team: Team,
}
