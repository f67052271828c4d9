use itertools::Itertools;
use serde::Serialize;

use crate::trackman::aggregate::{Aggregation, PlayerAggregate};
use crate::trackman::record::PitchRecord;
use crate::trackman::stats::{batting_average, on_base_percentage};
use crate::util::round_to;

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_u32), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0).round()
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct PitchMix {
    pub pitch_type: String,
    pub count: usize,
    pub percent: f64,
}

/// True per-pitch means for one pitcher, as opposed to the blended figures on the
/// aggregate.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct PitcherProfile {
    pub pitcher_id: String,
    pub pitcher_name: String,
    pub pitches: usize,
    pub avg_velocity: f64,
    pub max_velocity: f64,
    pub min_velocity: f64,
    pub velocity_spread_pct: f64,
    pub avg_spin_rate: f64,
    pub avg_vert_break: f64,
    pub avg_horz_break: f64,
    pub avg_plate_loc_height: f64,
    pub pitch_mix: Vec<PitchMix>,
}

impl PitcherProfile {
    pub fn build(pitcher_id: &str, pitches: &[PitchRecord]) -> Option<Self> {
        let thrown = pitches
            .iter()
            .filter(|p| p.pitcher_id == pitcher_id)
            .collect_vec();
        let first = thrown.first()?;
        let speeds = || thrown.iter().map(|p| p.rel_speed);

        let avg_velocity = mean(speeds());
        let max_velocity = speeds().fold(f64::NEG_INFINITY, f64::max);
        let min_velocity = speeds().fold(f64::INFINITY, f64::min);
        let velocity_spread_pct = if avg_velocity == 0.0 {
            0.0
        } else {
            (max_velocity - min_velocity) / avg_velocity * 100.0
        };

        let mut mix: Vec<(String, usize)> = Vec::new();
        for p in &thrown {
            match mix.iter_mut().find(|(t, _)| *t == p.tagged_pitch_type) {
                Some((_, count)) => *count += 1,
                None => mix.push((p.tagged_pitch_type.clone(), 1)),
            }
        }
        let pitch_mix = mix
            .into_iter()
            .map(|(pitch_type, count)| PitchMix {
                pitch_type,
                count,
                percent: percent(count, thrown.len()),
            })
            .collect();

        Some(Self {
            pitcher_id: pitcher_id.to_string(),
            pitcher_name: first.pitcher.clone(),
            pitches: thrown.len(),
            avg_velocity,
            max_velocity,
            min_velocity,
            velocity_spread_pct,
            avg_spin_rate: mean(thrown.iter().map(|p| p.spin_rate)),
            avg_vert_break: mean(thrown.iter().map(|p| p.vert_break)),
            avg_horz_break: mean(thrown.iter().map(|p| p.horz_break)),
            avg_plate_loc_height: mean(thrown.iter().map(|p| p.plate_loc_height)),
            pitch_mix,
        })
    }
}

/// Rate stats over every pitch the hitter saw, which the dashboard counts as at-bats.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct HitterProfile {
    pub batter_id: String,
    pub batter_name: String,
    pub plate_appearances: u32,
    pub batting_average: f64,
    pub on_base_percentage: f64,
    pub strikeout_rate_pct: f64,
    pub contact_rate_pct: f64,
}

impl HitterProfile {
    pub fn build(hitter: &PlayerAggregate, pitches: &[PitchRecord]) -> Self {
        let seen = pitches.iter().filter(|p| p.batter_id == hitter.id).count();
        let plate_appearances = u32::try_from(seen).unwrap_or(u32::MAX);
        let contact = seen.saturating_sub(hitter.strikeouts as usize);
        Self {
            batter_id: hitter.id.clone(),
            batter_name: hitter.name.clone(),
            plate_appearances,
            batting_average: batting_average(hitter.hits, plate_appearances),
            on_base_percentage: on_base_percentage(hitter.hits, hitter.walks, plate_appearances),
            strikeout_rate_pct: percent(hitter.strikeouts as usize, seen),
            contact_rate_pct: percent(contact, seen),
        }
    }
}

/// Headline numbers for one processed export.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct GameSummary {
    pub total_pitches: usize,
    pub total_players: usize,
    pub games_processed: u32,
    pub avg_velocity: f64,
    pub max_velocity: f64,
}

impl From<&Aggregation> for GameSummary {
    fn from(aggregation: &Aggregation) -> Self {
        let speeds = || aggregation.pitches.iter().map(|p| p.rel_speed);
        let max_velocity = if aggregation.pitches.is_empty() {
            0.0
        } else {
            speeds().fold(f64::NEG_INFINITY, f64::max)
        };
        Self {
            total_pitches: aggregation.pitches.len(),
            total_players: aggregation.players.len(),
            // One export covers one game
            games_processed: 1,
            avg_velocity: round_to(mean(speeds()), 1),
            max_velocity: round_to(max_velocity, 1),
        }
    }
}
