use crate::domain::{Score, StatLine, Team};

use super::types::Totals;

/// Counter changes one roster entry contributes to its player's totals.
///
/// `Totals::apply` adds it on match creation, `Totals::revert` removes it
/// when the match is deleted with stat adjustment.
pub fn match_delta(team: Team, score: Score, line: StatLine) -> Totals {
    let won = team == score.winner();

    Totals {
        matches: 1,
        wins: u32::from(won),
        losses: u32::from(!won),
        kills: line.kills,
        deaths: line.deaths,
        assists: line.assists,
        rounds_won: score.rounds_for(team),
        rounds_lost: score.rounds_against(team),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winning_side_delta() {
        let delta = match_delta(Team::Blue, Score::new(5, 3), StatLine::new(12, 4, 3));

        assert_eq!(delta.matches, 1);
        assert_eq!(delta.wins, 1);
        assert_eq!(delta.losses, 0);
        assert_eq!(delta.rounds_won, 5);
        assert_eq!(delta.rounds_lost, 3);
        assert_eq!((delta.kills, delta.deaths, delta.assists), (12, 4, 3));
    }

    #[test]
    fn test_losing_side_delta() {
        let delta = match_delta(Team::Red, Score::new(5, 3), StatLine::default());

        assert_eq!(delta.wins, 0);
        assert_eq!(delta.losses, 1);
        assert_eq!(delta.rounds_won, 3);
        assert_eq!(delta.rounds_lost, 5);
    }

    #[test]
    fn test_tie_counts_as_red_win() {
        let blue = match_delta(Team::Blue, Score::new(5, 5), StatLine::default());
        let red = match_delta(Team::Red, Score::new(5, 5), StatLine::default());

        assert_eq!((blue.wins, blue.losses), (0, 1));
        assert_eq!((red.wins, red.losses), (1, 0));
    }

    #[test]
    fn test_apply_then_revert_restores_totals() {
        let mut totals = Totals {
            matches: 4,
            wins: 3,
            losses: 1,
            kills: 40,
            deaths: 20,
            assists: 10,
            rounds_won: 20,
            rounds_lost: 12,
        };
        let before = totals;
        let delta = match_delta(Team::Red, Score::new(2, 5), StatLine::new(9, 6, 2));

        totals.apply(&delta);
        assert_eq!(totals.wins, 4);
        assert_eq!(totals.rounds_won, 25);

        totals.revert(&delta);
        assert_eq!(totals, before);
    }

    #[test]
    fn test_double_revert_clamps_at_zero() {
        let delta = match_delta(Team::Blue, Score::new(5, 3), StatLine::new(10, 2, 1));
        let mut totals = Totals::default();
        totals.apply(&delta);

        totals.revert(&delta);
        totals.revert(&delta);

        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_partial_clamp_is_lossy() {
        let mut totals = Totals {
            kills: 3,
            ..Totals::default()
        };
        let delta = match_delta(Team::Blue, Score::new(1, 0), StatLine::new(5, 0, 0));

        totals.revert(&delta);
        assert_eq!(totals.kills, 0);

        totals.apply(&delta);
        assert_eq!(totals.kills, 5);
    }

    #[test]
    fn test_round_diff_can_be_negative() {
        let totals = Totals {
            rounds_won: 4,
            rounds_lost: 9,
            ..Totals::default()
        };
        assert_eq!(totals.round_diff(), -5);
    }
}
