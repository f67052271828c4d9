//! Display statistics derived from [`PlayerAggregate`] counters.
//!
//! Several of these are deliberately simplified and must stay that way so the numbers
//! match what the dashboard has always shown: slugging treats every hit as a single
//! doubled, and innings pitched are mocked as three per game.

use serde::Serialize;

use crate::trackman::aggregate::PlayerAggregate;
use crate::util::round_to;

pub const MOCK_INNINGS_PER_GAME: f64 = 3.0;

pub fn batting_average(hits: u32, at_bats: u32) -> f64 {
    f64::from(hits) / f64::from(at_bats.max(1))
}

pub fn on_base_percentage(hits: u32, walks: u32, at_bats: u32) -> f64 {
    f64::from(hits + walks) / f64::from((at_bats + walks).max(1))
}

pub fn slugging_percentage(hits: u32, at_bats: u32) -> f64 {
    if at_bats == 0 {
        return 0.0;
    }
    (f64::from(hits) / f64::from(at_bats)) * 2.0
}

/// OBP and SLG are each rounded to three places before being summed.
pub fn ops(hits: u32, walks: u32, at_bats: u32) -> String {
    let obp = round_to(on_base_percentage(hits, walks, at_bats), 3);
    let slg = round_to(slugging_percentage(hits, at_bats), 3);
    format_rate(obp + slg)
}

/// Placeholder until real innings pitched are tracked.
pub fn mocked_innings_pitched(games: u32) -> f64 {
    f64::from(games) * MOCK_INNINGS_PER_GAME
}

fn per_nine(count: f64, innings: f64) -> f64 {
    if innings <= 0.0 {
        return 0.0;
    }
    count * 9.0 / innings
}

pub fn era(earned_runs: u32, innings: f64) -> f64 {
    per_nine(f64::from(earned_runs), innings)
}

pub fn whip(walks: u32, hits: u32, innings: f64) -> f64 {
    if innings <= 0.0 {
        return 0.0;
    }
    f64::from(walks + hits) / innings
}

pub fn strikeouts_per_nine(strikeouts: u32, innings: f64) -> f64 {
    per_nine(f64::from(strikeouts), innings)
}

pub fn walks_per_nine(walks: u32, innings: f64) -> f64 {
    per_nine(f64::from(walks), innings)
}

pub fn format_rate(value: f64) -> String {
    format!("{value:.3}")
}

pub fn format_velocity(value: f64) -> String {
    format!("{value:.1}")
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct HittingLine {
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: String,
}

impl From<&PlayerAggregate> for HittingLine {
    fn from(p: &PlayerAggregate) -> Self {
        Self {
            avg: batting_average(p.hits, p.at_bats),
            obp: on_base_percentage(p.hits, p.walks, p.at_bats),
            slg: slugging_percentage(p.hits, p.at_bats),
            ops: ops(p.hits, p.walks, p.at_bats),
        }
    }
}

/// Earned runs are not tracked, so `era` is always zero for now.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct PitchingLine {
    pub innings_pitched: f64,
    pub era: f64,
    pub whip: f64,
    pub strikeouts_per_nine: f64,
    pub walks_per_nine: f64,
}

impl From<&PlayerAggregate> for PitchingLine {
    fn from(p: &PlayerAggregate) -> Self {
        let innings = mocked_innings_pitched(p.games);
        Self {
            innings_pitched: innings,
            era: era(0, innings),
            whip: whip(p.walks, p.hits, innings),
            strikeouts_per_nine: strikeouts_per_nine(p.strikeouts, innings),
            walks_per_nine: walks_per_nine(p.walks, innings),
        }
    }
}
