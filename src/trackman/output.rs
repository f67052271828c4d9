use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::trackman::aggregate::{Aggregation, PlayerAggregate, Role};
use crate::trackman::leaderboard::{leaderboard, LeaderboardEntry, LeaderboardMetric};
use crate::trackman::profile::{GameSummary, HitterProfile, PitcherProfile};
use crate::trackman::stats::{HittingLine, PitchingLine};

/// Flat CSV view of an aggregate with its derived display stats.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct PlayerRow<'a> {
    player_id: &'a str,
    player_name: &'a str,
    role: Role,
    games: u32,
    at_bats: u32,
    hits: u32,
    batting_average: f64,
    home_runs: u32,
    rbi: u32,
    strikeouts: u32,
    walks: u32,
    avg_velocity: Option<f64>,
    max_velocity: Option<f64>,
    avg_spin_rate: Option<f64>,
    avg: f64,
    obp: f64,
    slg: f64,
    ops: String,
    innings_pitched: Option<f64>,
    era: Option<f64>,
    whip: Option<f64>,
}

impl<'a> From<&'a PlayerAggregate> for PlayerRow<'a> {
    fn from(p: &'a PlayerAggregate) -> Self {
        let hitting = HittingLine::from(p);
        let pitching = p.pitching.map(|_| PitchingLine::from(p));
        Self {
            player_id: &p.id,
            player_name: &p.name,
            role: p.role,
            games: p.games,
            at_bats: p.at_bats,
            hits: p.hits,
            batting_average: p.batting_average,
            home_runs: p.home_runs,
            rbi: p.rbi,
            strikeouts: p.strikeouts,
            walks: p.walks,
            avg_velocity: p.pitching.map(|x| x.avg_velocity),
            max_velocity: p.pitching.map(|x| x.max_velocity),
            avg_spin_rate: p.pitching.map(|x| x.avg_spin_rate),
            avg: hitting.avg,
            obp: hitting.obp,
            slg: hitting.slg,
            ops: hitting.ops,
            innings_pitched: pitching.as_ref().map(|l| l.innings_pitched),
            era: pitching.as_ref().map(|l| l.era),
            whip: pitching.as_ref().map(|l| l.whip),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Leaderboard {
    pub metric: LeaderboardMetric,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub source: String,
    pub summary: GameSummary,
    pub leaderboards: Vec<Leaderboard>,
    pub pitchers: Vec<PitcherProfile>,
    pub hitters: Vec<HitterProfile>,
}

impl RunReport {
    pub fn new(source: &str, aggregation: &Aggregation, top: usize) -> Self {
        let leaderboards = LeaderboardMetric::iter()
            .map(|metric| Leaderboard {
                metric,
                entries: leaderboard(&aggregation.players, metric, top),
            })
            .collect();
        let pitchers = aggregation
            .players_in_role(Role::Pitcher)
            .filter_map(|p| PitcherProfile::build(&p.id, &aggregation.pitches))
            .collect();
        let hitters = aggregation
            .players_in_role(Role::Hitter)
            .map(|p| HitterProfile::build(p, &aggregation.pitches))
            .collect();
        Self {
            source: source.to_string(),
            summary: GameSummary::from(aggregation),
            leaderboards,
            pitchers,
            hitters,
        }
    }
}

/// Paths written for one export.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OutputFiles {
    pub pitches: PathBuf,
    pub players: PathBuf,
    pub summary: PathBuf,
}

impl OutputFiles {
    pub fn new(output_dir: &Path, stem: &str) -> Self {
        Self {
            pitches: output_dir.join(format!("{stem}_pitches.csv")),
            players: output_dir.join(format!("{stem}_players.csv")),
            summary: output_dir.join(format!("{stem}_summary.json")),
        }
    }
}

fn write_rows<S: Serialize>(path: &Path, rows: impl Iterator<Item = S>) -> Result<()> {
    debug!("Creating file {}", path.display());
    let mut csv = Writer::from_path(path)
        .with_context(|| format!("Failed to create file {}", path.display()))?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()
        .with_context(|| format!("Failed to flush writer for {}", path.display()))
}

pub fn write_run(
    output_dir: &Path,
    stem: &str,
    aggregation: &Aggregation,
    top: usize,
) -> Result<OutputFiles> {
    let files = OutputFiles::new(output_dir, stem);
    write_rows(&files.pitches, aggregation.pitches.iter())?;
    write_rows(&files.players, aggregation.players.iter().map(PlayerRow::from))?;

    let report = RunReport::new(stem, aggregation, top);
    let summary = File::create(&files.summary)
        .with_context(|| format!("Failed to create file {}", files.summary.display()))?;
    let mut writer = BufWriter::new(summary);
    serde_json::to_writer_pretty(&mut writer, &report).context("Failed to write run summary")?;
    writer.flush()?;
    Ok(files)
}
