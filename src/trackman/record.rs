use std::str::FromStr;

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::trackman::columns::Column;
use crate::util::{leading_float, leading_int, non_empty, nonzero_float};

pub type TrackmanRecord = StringRecord;

pub type PlayerId = String;

#[derive(
    Debug, Eq, PartialEq, EnumString, Display, Copy, Clone, Hash, Default, Serialize, Deserialize,
)]
pub enum HalfInning {
    Top,
    Bottom,
    #[default]
    Unknown,
}

/// One tracked pitch. Numeric fields the export leaves blank or garbled read as zero;
/// batted-ball fields are only present when contact was measured.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PitchRecord {
    pub pitch_no: i64,
    pub date: String,
    pub time: String,
    pub pitcher: String,
    pub pitcher_id: PlayerId,
    pub batter: String,
    pub batter_id: PlayerId,
    pub inning: i64,
    pub top_bottom: HalfInning,
    pub outs: i64,
    pub balls: i64,
    pub strikes: i64,
    pub tagged_pitch_type: String,
    pub auto_pitch_type: String,
    pub pitch_call: String,
    pub kor_bb: Option<String>,
    pub tagged_hit_type: Option<String>,
    pub play_result: Option<String>,
    pub rel_speed: f64,
    pub spin_rate: f64,
    pub vert_break: f64,
    pub horz_break: f64,
    pub plate_loc_height: f64,
    pub plate_loc_side: f64,
    pub exit_speed: Option<f64>,
    pub angle: Option<f64>,
    pub direction: Option<f64>,
    pub hit_spin_rate: Option<f64>,
    pub distance: Option<f64>,
}

impl PitchRecord {
    pub fn has_pitcher(&self) -> bool {
        !self.pitcher_id.is_empty() && !self.pitcher.is_empty()
    }

    pub fn has_batter(&self) -> bool {
        !self.batter_id.is_empty() && !self.batter.is_empty()
    }

    pub fn is_strikeout(&self) -> bool {
        matches!(self.play_result.as_deref(), Some("Out" | "Strikeout"))
    }

    pub fn is_walk(&self) -> bool {
        self.kor_bb.as_deref() == Some("Walk")
    }
}

impl From<&TrackmanRecord> for PitchRecord {
    fn from(record: &TrackmanRecord) -> Self {
        let s = |c: Column| record.get(c.index()).unwrap_or_default();
        let i = |c: Column| leading_int::<i64>(s(c));
        let f = |c: Column| leading_float(s(c));
        let o = |c: Column| nonzero_float(s(c));
        Self {
            pitch_no: i(Column::PitchNo),
            date: s(Column::Date).to_string(),
            time: s(Column::Time).to_string(),
            pitcher: s(Column::Pitcher).to_string(),
            pitcher_id: s(Column::PitcherId).to_string(),
            batter: s(Column::Batter).to_string(),
            batter_id: s(Column::BatterId).to_string(),
            inning: i(Column::Inning),
            top_bottom: HalfInning::from_str(s(Column::TopBottom)).unwrap_or_default(),
            outs: i(Column::Outs),
            balls: i(Column::Balls),
            strikes: i(Column::Strikes),
            tagged_pitch_type: s(Column::TaggedPitchType).to_string(),
            auto_pitch_type: s(Column::AutoPitchType).to_string(),
            pitch_call: s(Column::PitchCall).to_string(),
            kor_bb: non_empty(s(Column::KorBB)),
            tagged_hit_type: non_empty(s(Column::TaggedHitType)),
            play_result: non_empty(s(Column::PlayResult)),
            rel_speed: f(Column::RelSpeed),
            spin_rate: f(Column::SpinRate),
            vert_break: f(Column::VertBreak),
            horz_break: f(Column::HorzBreak),
            plate_loc_height: f(Column::PlateLocHeight),
            plate_loc_side: f(Column::PlateLocSide),
            exit_speed: o(Column::ExitSpeed),
            angle: o(Column::Angle),
            direction: o(Column::Direction),
            hit_spin_rate: o(Column::HitSpinRate),
            distance: o(Column::Distance),
        }
    }
}
