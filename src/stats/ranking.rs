use super::types::{RankedPlayer, Totals};

const KILL_WEIGHT: f64 = 2.0;
const ASSIST_WEIGHT: f64 = 1.0;
const WIN_WEIGHT: f64 = 7.0;
const KD_WEIGHT: f64 = 10.0;
const WINRATE_WEIGHT: f64 = 0.5;
const DEATH_PENALTY: f64 = 2.0;
const LOSS_PENALTY: f64 = 7.0;

/// Metrics derived from totals at read time. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub kd: f64,
    pub winrate: f64,
    pub round_diff: i64,
    pub ranking_score: f64,
}

impl DerivedMetrics {
    pub fn from_totals(totals: &Totals) -> Self {
        let kd = kd_ratio(totals.kills, totals.deaths);
        let winrate = win_rate(totals.wins, totals.matches);

        Self {
            kd,
            winrate,
            round_diff: totals.round_diff(),
            ranking_score: ranking_score(totals, kd, winrate),
        }
    }
}

/// Zero deaths reports a K/D of 0 rather than infinity.
pub fn kd_ratio(kills: u32, deaths: u32) -> f64 {
    if deaths == 0 {
        0.0
    } else {
        f64::from(kills) / f64::from(deaths)
    }
}

pub fn win_rate(wins: u32, matches: u32) -> f64 {
    if matches == 0 {
        0.0
    } else {
        100.0 * f64::from(wins) / f64::from(matches)
    }
}

pub fn ranking_score(totals: &Totals, kd: f64, winrate: f64) -> f64 {
    let score = KILL_WEIGHT * f64::from(totals.kills)
        + ASSIST_WEIGHT * f64::from(totals.assists)
        + WIN_WEIGHT * f64::from(totals.wins)
        + KD_WEIGHT * kd
        + WINRATE_WEIGHT * winrate
        - DEATH_PENALTY * f64::from(totals.deaths)
        - LOSS_PENALTY * f64::from(totals.losses);

    round_one_decimal(score)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Builds the leaderboard from players with at least `min_matches` matches.
///
/// Ordered by ranking score descending; ties keep their input order. Ranks
/// are 1-based positions in the sorted list.
pub fn rank_players<'a, I>(players: I, min_matches: u32) -> Vec<RankedPlayer>
where
    I: IntoIterator<Item = (&'a str, &'a Totals)>,
{
    let mut ranked: Vec<RankedPlayer> = players
        .into_iter()
        .filter(|(_, totals)| totals.matches >= min_matches)
        .map(|(name, totals)| {
            let metrics = DerivedMetrics::from_totals(totals);
            RankedPlayer {
                rank: 0,
                name: name.to_string(),
                totals: *totals,
                kd: metrics.kd,
                winrate: metrics.winrate,
                round_diff: metrics.round_diff,
                ranking_score: metrics.ranking_score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.ranking_score.total_cmp(&a.ranking_score));

    for (idx, row) in ranked.iter_mut().enumerate() {
        row.rank = idx + 1;
    }

    ranked
}
