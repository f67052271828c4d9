use std::cmp::Ordering;

use itertools::Itertools;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::trackman::aggregate::{PlayerAggregate, Role};
use crate::trackman::stats::format_rate;

#[derive(Debug, Eq, PartialEq, EnumString, Display, EnumIter, Copy, Clone, Hash, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    Velocity,
    SpinRate,
    Batting,
    Strikeouts,
}

impl LeaderboardMetric {
    pub const fn role(self) -> Role {
        match self {
            Self::Velocity | Self::SpinRate => Role::Pitcher,
            Self::Batting | Self::Strikeouts => Role::Hitter,
        }
    }

    pub fn value(self, player: &PlayerAggregate) -> f64 {
        let pitching = player.pitching.unwrap_or_default();
        match self {
            Self::Velocity => pitching.avg_velocity,
            Self::SpinRate => pitching.avg_spin_rate,
            Self::Batting => player.batting_average,
            Self::Strikeouts => f64::from(player.strikeouts),
        }
    }

    pub fn display(self, value: f64) -> String {
        match self {
            Self::Velocity => format!("{value} mph"),
            Self::SpinRate => format!("{value} rpm"),
            Self::Batting => format_rate(value),
            Self::Strikeouts => format!("{value}"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player_id: String,
    pub player_name: String,
    pub value: f64,
    pub display: String,
}

/// Ranks the players of the metric's role, best first. Ties keep first-seen order.
pub fn leaderboard(
    players: &[PlayerAggregate],
    metric: LeaderboardMetric,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    players
        .iter()
        .filter(|p| p.role == metric.role())
        .map(|p| (p, metric.value(p)))
        .sorted_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal))
        .take(limit)
        .enumerate()
        .map(|(i, (p, value))| LeaderboardEntry {
            rank: i + 1,
            player_id: p.id.clone(),
            player_name: p.name.clone(),
            value,
            display: metric.display(value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trackman::aggregate::PitchingAggregate;

    fn pitcher(id: &str, velocity: f64, spin: f64) -> PlayerAggregate {
        let mut p = PlayerAggregate::new(id, id, Role::Pitcher);
        p.pitching = Some(PitchingAggregate {
            avg_velocity: velocity,
            max_velocity: velocity,
            avg_spin_rate: spin,
        });
        p
    }

    fn hitter(id: &str, strikeouts: u32) -> PlayerAggregate {
        let mut p = PlayerAggregate::new(id, id, Role::Hitter);
        p.strikeouts = strikeouts;
        p
    }

    #[test]
    fn test_velocity_board() {
        let players = vec![
            pitcher("P1", 88.0, 2400.0),
            hitter("B1", 4),
            pitcher("P2", 94.5, 2100.0),
            pitcher("P3", 91.0, 2600.0),
        ];
        let board = leaderboard(&players, LeaderboardMetric::Velocity, 10);
        let ids: Vec<&str> = board.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(ids, vec!["P2", "P3", "P1"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].display, "94.5 mph");

        let spin = leaderboard(&players, LeaderboardMetric::SpinRate, 1);
        assert_eq!(spin.len(), 1);
        assert_eq!(spin[0].player_id, "P3");
        assert_eq!(spin[0].display, "2600 rpm");
    }

    #[test]
    fn test_ties_keep_order() {
        let players = vec![hitter("B1", 2), hitter("B2", 3), hitter("B3", 2)];
        let board = leaderboard(&players, LeaderboardMetric::Strikeouts, 10);
        let ids: Vec<&str> = board.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(ids, vec!["B2", "B1", "B3"]);
        assert_eq!(board[0].display, "3");
    }

    #[test]
    fn test_batting_display() {
        let mut p = hitter("B1", 0);
        p.batting_average = 0.25;
        let board = leaderboard(&[p], LeaderboardMetric::Batting, 5);
        assert_eq!(board[0].display, "0.250");
    }
}
