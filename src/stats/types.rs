use serde::{Deserialize, Serialize};

/// Cumulative counters kept per player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub rounds_won: u32,
    pub rounds_lost: u32,
}

impl Totals {
    pub fn apply(&mut self, delta: &Totals) {
        self.matches = self.matches.saturating_add(delta.matches);
        self.wins = self.wins.saturating_add(delta.wins);
        self.losses = self.losses.saturating_add(delta.losses);
        self.kills = self.kills.saturating_add(delta.kills);
        self.deaths = self.deaths.saturating_add(delta.deaths);
        self.assists = self.assists.saturating_add(delta.assists);
        self.rounds_won = self.rounds_won.saturating_add(delta.rounds_won);
        self.rounds_lost = self.rounds_lost.saturating_add(delta.rounds_lost);
    }

    /// Subtracts `delta`, flooring every counter at zero.
    ///
    /// Once a floor is hit the operation no longer inverts `apply`.
    pub fn revert(&mut self, delta: &Totals) {
        self.matches = self.matches.saturating_sub(delta.matches);
        self.wins = self.wins.saturating_sub(delta.wins);
        self.losses = self.losses.saturating_sub(delta.losses);
        self.kills = self.kills.saturating_sub(delta.kills);
        self.deaths = self.deaths.saturating_sub(delta.deaths);
        self.assists = self.assists.saturating_sub(delta.assists);
        self.rounds_won = self.rounds_won.saturating_sub(delta.rounds_won);
        self.rounds_lost = self.rounds_lost.saturating_sub(delta.rounds_lost);
    }

    pub fn round_diff(&self) -> i64 {
        i64::from(self.rounds_won) - i64::from(self.rounds_lost)
    }
}

/// Leaderboard row: raw counters plus read-time metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    pub rank: usize,
    pub name: String,
    #[serde(flatten)]
    pub totals: Totals,
    pub kd: f64,
    pub winrate: f64,
    pub round_diff: i64,
    pub ranking_score: f64,
}
