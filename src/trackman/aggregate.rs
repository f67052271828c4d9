use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Terminator, Trim};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::debug;

use crate::trackman::record::{PitchRecord, PlayerId, TrackmanRecord};

pub const DELIMITER: u8 = b',';

#[derive(
    Debug, Eq, PartialEq, Ord, PartialOrd, EnumString, Display, Copy, Clone, Hash, Serialize, Deserialize,
)]
pub enum Role {
    Pitcher,
    Hitter,
}

/// Pitch-tracking figures only kept for pitcher entries.
///
/// `avg_velocity` and `avg_spin_rate` are blended as `(previous + new) / 2` on every
/// pitch rather than tracked as a true mean, so early pitches decay out quickly. This is
/// what the dashboard has always shown and changing it would change every published
/// number; use [`crate::trackman::profile::PitcherProfile`] for real means.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PitchingAggregate {
    pub avg_velocity: f64,
    pub max_velocity: f64,
    pub avg_spin_rate: f64,
}

impl PitchingAggregate {
    fn record(&mut self, pitch: &PitchRecord) {
        self.avg_velocity = (self.avg_velocity + pitch.rel_speed) / 2.0;
        self.max_velocity = self.max_velocity.max(pitch.rel_speed);
        self.avg_spin_rate = (self.avg_spin_rate + pitch.spin_rate) / 2.0;
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub games: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub batting_average: f64,
    pub home_runs: u32,
    pub rbi: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub pitching: Option<PitchingAggregate>,
}

impl PlayerAggregate {
    pub fn new(id: &str, name: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role,
            games: 0,
            at_bats: 0,
            hits: 0,
            batting_average: 0.0,
            home_runs: 0,
            rbi: 0,
            strikeouts: 0,
            walks: 0,
            pitching: match role {
                Role::Pitcher => Some(PitchingAggregate::default()),
                Role::Hitter => None,
            },
        }
    }

    fn record_hitting(&mut self, pitch: &PitchRecord) {
        if pitch.is_strikeout() {
            self.strikeouts += 1;
        }
        if pitch.is_walk() {
            self.walks += 1;
        }
    }
}

/// Player aggregates keyed by role and id, iterated in first-seen order.
#[derive(Debug, Default)]
struct PlayerTable {
    index: HashMap<(Role, PlayerId), usize>,
    players: Vec<PlayerAggregate>,
}

impl PlayerTable {
    fn entry(&mut self, role: Role, id: &str, name: &str) -> &mut PlayerAggregate {
        let players = &mut self.players;
        let i = *self
            .index
            .entry((role, id.to_string()))
            .or_insert_with(|| {
                players.push(PlayerAggregate::new(id, name, role));
                players.len() - 1
            });
        &mut self.players[i]
    }

    fn record(&mut self, pitch: &PitchRecord) {
        if pitch.has_pitcher() {
            let pitcher = self.entry(Role::Pitcher, &pitch.pitcher_id, &pitch.pitcher);
            if let Some(pitching) = pitcher.pitching.as_mut() {
                pitching.record(pitch);
            }
        }
        if pitch.has_batter() {
            self.entry(Role::Hitter, &pitch.batter_id, &pitch.batter)
                .record_hitting(pitch);
        }
    }
}

/// The result of one aggregation run over one export.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Aggregation {
    pub pitches: Vec<PitchRecord>,
    pub players: Vec<PlayerAggregate>,
}

impl Aggregation {
    pub fn player(&self, role: Role, id: &str) -> Option<&PlayerAggregate> {
        self.players.iter().find(|p| p.role == role && p.id == id)
    }

    pub fn players_in_role(&self, role: Role) -> impl Iterator<Item = &PlayerAggregate> {
        self.players.iter().filter(move |p| p.role == role)
    }
}

fn is_blank(record: &TrackmanRecord) -> bool {
    record.len() == 1 && record.get(0).map_or(true, |f| f.trim().is_empty())
}

/// Turns a raw TrackMan export into pitch records and per-player aggregates.
///
/// The first line is taken as the header and only its width matters: any later row
/// with fewer fields is dropped without touching the aggregates. Lines end at `\n`
/// only, and blank lines are ignored. Nothing about the content can make this fail.
pub fn aggregate(raw: &str) -> Aggregation {
    let (header, body) = match raw.split_once('\n') {
        Some(split) => split,
        None => return Aggregation::default(),
    };
    let header_width = header.split(char::from(DELIMITER)).count();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::None)
        .delimiter(DELIMITER)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(body.as_bytes());

    let mut pitches = Vec::new();
    let mut table = PlayerTable::default();
    let mut short_rows = 0_usize;

    // Unquoted, flexible reads over in-memory UTF-8 have no error path
    for record in reader
        .records()
        .filter_map(Result::ok)
        .filter(|r| !is_blank(r))
    {
        if record.len() < header_width {
            short_rows += 1;
            continue;
        }
        let pitch = PitchRecord::from(&record);
        table.record(&pitch);
        pitches.push(pitch);
    }
    if short_rows > 0 {
        debug!(
            "Skipped {} rows narrower than the {}-column header",
            short_rows, header_width
        );
    }

    Aggregation {
        pitches,
        players: table.players,
    }
}

/// Reads an export from disk. Invalid UTF-8 is replaced rather than rejected.
pub fn aggregate_file(path: &Path) -> Result<Aggregation> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read TrackMan export {}", path.display()))?;
    Ok(aggregate(&String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trackman::columns::Column;

    const WIDTH: usize = 50;

    fn header() -> String {
        (0..WIDTH).map(|i| format!("col{i}")).collect::<Vec<_>>().join(",")
    }

    struct Row(Vec<String>);

    impl Row {
        fn new() -> Self {
            Self(vec![String::new(); WIDTH])
        }

        fn set(mut self, column: Column, value: &str) -> Self {
            self.0[column.index()] = value.to_string();
            self
        }

        fn pitcher(self, id: &str, name: &str, speed: &str, spin: &str) -> Self {
            self.set(Column::PitcherId, id)
                .set(Column::Pitcher, name)
                .set(Column::RelSpeed, speed)
                .set(Column::SpinRate, spin)
        }

        fn batter(self, id: &str, name: &str) -> Self {
            self.set(Column::BatterId, id).set(Column::Batter, name)
        }

        fn line(&self) -> String {
            self.0.join(",")
        }
    }

    fn csv(rows: &[Row]) -> String {
        let mut lines = vec![header()];
        lines.extend(rows.iter().map(Row::line));
        lines.join("\n")
    }

    #[test]
    fn test_rows_in_order() {
        let raw = csv(&[
            Row::new().set(Column::PitchNo, "1"),
            Row::new().set(Column::PitchNo, "2"),
            Row::new().set(Column::PitchNo, "3"),
        ]);
        let result = aggregate(&raw);
        let numbers: Vec<i64> = result.pitches.iter().map(|p| p.pitch_no).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(result.players.is_empty());
    }

    #[test]
    fn test_short_row_dropped() {
        let short = "1,2,3,4,5,P9,7".to_string();
        let raw = format!(
            "{}\n{}\n{}",
            header(),
            short,
            Row::new().pitcher("P1", "Ace", "90", "2200").line()
        );
        let result = aggregate(&raw);
        assert_eq!(result.pitches.len(), 1);
        assert_eq!(result.players.len(), 1);
        assert_eq!(result.players[0].id, "P1");
    }

    #[test]
    fn test_blank_lines_and_empty_input() {
        let raw = format!(
            "{}\n\n   \n{}\n",
            header(),
            Row::new().set(Column::PitchNo, "4").line()
        );
        assert_eq!(aggregate(&raw).pitches.len(), 1);
        assert_eq!(aggregate(""), Aggregation::default());
        assert_eq!(aggregate(&header()), Aggregation::default());
    }

    #[test]
    fn test_empty_first_line_is_header() {
        let result = aggregate("\nA,B\n1,2\n");
        assert_eq!(result.pitches.len(), 2);
        assert_eq!(result.pitches[1].pitch_no, 1);
    }

    #[test]
    fn test_lone_carriage_return_stays_in_row() {
        let result = aggregate("a,b,c\n1,2\r,3\n");
        assert_eq!(result.pitches.len(), 1);
        assert_eq!(result.pitches[0].pitch_no, 1);
    }

    #[test]
    fn test_crlf_blank_lines() {
        let raw = format!(
            "{}\r\n\r\n{}\r\n",
            header(),
            Row::new().set(Column::PitchNo, "7").line()
        );
        let result = aggregate(&raw);
        assert_eq!(result.pitches.len(), 1);
        assert_eq!(result.pitches[0].pitch_no, 7);
    }

    #[test]
    fn test_invalid_utf8_file_is_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        let mut bytes = header().into_bytes();
        bytes.push(b'\n');
        bytes.extend(Row::new().pitcher("P1", "Ace", "90", "0").line().into_bytes());
        bytes.extend([b'\xff', b'\n']);
        fs::write(&path, bytes).unwrap();

        let result = aggregate_file(&path).unwrap();
        assert_eq!(result.pitches.len(), 1);
        assert_eq!(result.players[0].id, "P1");
    }

    #[test]
    fn test_non_numeric_velocity() {
        let raw = csv(&[Row::new().pitcher("P1", "Ace", "N/A", "")]);
        let result = aggregate(&raw);
        assert_eq!(result.pitches[0].rel_speed, 0.0);
    }

    #[test]
    fn test_blended_average_not_mean() {
        let raw = csv(&[
            Row::new().pitcher("P1", "Ace", "90", "2000"),
            Row::new().pitcher("P1", "Ace", "100", "2400"),
        ]);
        let result = aggregate(&raw);
        let pitching = result
            .player(Role::Pitcher, "P1")
            .and_then(|p| p.pitching)
            .unwrap();
        assert!((pitching.avg_velocity - 72.5).abs() < 1e-9);
        assert!((pitching.avg_spin_rate - 1700.0).abs() < 1e-9);
        assert!((pitching.max_velocity - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_velocity() {
        let raw = csv(&[
            Row::new().pitcher("P1", "Ace", "88", "0"),
            Row::new().pitcher("P1", "Ace", "95", "0"),
            Row::new().pitcher("P1", "Ace", "91", "0"),
        ]);
        let pitching = aggregate(&raw).players[0].pitching.unwrap();
        assert!((pitching.max_velocity - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_walks_and_strikeouts() {
        let raw = csv(&[
            Row::new().batter("B1", "Slugger").set(Column::KorBB, "Walk"),
            Row::new()
                .batter("B1", "Slugger")
                .set(Column::PlayResult, "Out"),
            Row::new()
                .batter("B1", "Slugger")
                .set(Column::PlayResult, "Strikeout")
                .set(Column::KorBB, "Walk"),
            Row::new()
                .batter("B1", "Slugger")
                .set(Column::PlayResult, "Single"),
        ]);
        let hitter = aggregate(&raw);
        let hitter = hitter.player(Role::Hitter, "B1").unwrap();
        assert_eq!(hitter.walks, 2);
        assert_eq!(hitter.strikeouts, 2);
        assert_eq!(hitter.pitching, None);
    }

    #[test]
    fn test_missing_name_skips_aggregate() {
        let raw = csv(&[
            Row::new().set(Column::PitcherId, "P1").set(Column::RelSpeed, "90"),
            Row::new().set(Column::Batter, "Nameless"),
        ]);
        let result = aggregate(&raw);
        assert_eq!(result.pitches.len(), 2);
        assert!(result.players.is_empty());
    }

    #[test]
    fn test_roles_are_independent() {
        let raw = csv(&[
            Row::new().pitcher("X1", "Two Way", "95", "2300"),
            Row::new()
                .batter("X1", "Two Way")
                .set(Column::PlayResult, "Strikeout"),
            Row::new().pitcher("X1", "Two Way", "97", "2300"),
        ]);
        let result = aggregate(&raw);
        assert_eq!(result.players.len(), 2);
        assert_eq!(result.players[0].role, Role::Pitcher);
        assert_eq!(result.players[0].strikeouts, 0);
        assert_eq!(result.players[1].role, Role::Hitter);
        assert_eq!(result.players[1].strikeouts, 1);
        assert_eq!(result.players_in_role(Role::Pitcher).count(), 1);
    }

    #[test]
    fn test_first_seen_order() {
        let raw = csv(&[
            Row::new().pitcher("P2", "Second", "90", "0").batter("B1", "Lead"),
            Row::new().pitcher("P1", "First", "90", "0"),
            Row::new().pitcher("P2", "Second", "90", "0"),
        ]);
        let ids: Vec<(Role, String)> = aggregate(&raw)
            .players
            .into_iter()
            .map(|p| (p.role, p.id))
            .collect();
        assert_eq!(
            ids,
            vec![
                (Role::Pitcher, "P2".to_string()),
                (Role::Hitter, "B1".to_string()),
                (Role::Pitcher, "P1".to_string()),
            ]
        );
    }

    #[test]
    fn test_pure() {
        let raw = csv(&[
            Row::new().pitcher("P1", "Ace", "90", "2000").batter("B1", "Lead"),
            Row::new().pitcher("P1", "Ace", "94", "2100"),
        ]);
        assert_eq!(aggregate(&raw), aggregate(&raw));
    }
}
