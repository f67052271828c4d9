//! Fixed column offsets of the TrackMan export layout. Every positional lookup into a
//! row goes through this table.

use strum_macros::EnumIter;

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, EnumIter)]
pub enum Column {
    PitchNo,
    Date,
    Time,
    Pitcher,
    PitcherId,
    Batter,
    BatterId,
    Inning,
    TopBottom,
    Outs,
    Balls,
    Strikes,
    TaggedPitchType,
    AutoPitchType,
    PitchCall,
    KorBB,
    TaggedHitType,
    PlayResult,
    RelSpeed,
    SpinRate,
    VertBreak,
    HorzBreak,
    PlateLocHeight,
    PlateLocSide,
    ExitSpeed,
    Angle,
    Direction,
    HitSpinRate,
    Distance,
}

impl Column {
    pub const fn index(self) -> usize {
        match self {
            Self::PitchNo => 0,
            Self::Date => 1,
            Self::Time => 2,
            Self::Pitcher => 4,
            Self::PitcherId => 5,
            Self::Batter => 9,
            Self::BatterId => 10,
            Self::Inning => 14,
            Self::TopBottom => 15,
            Self::Outs => 16,
            Self::Balls => 17,
            Self::Strikes => 18,
            Self::TaggedPitchType => 19,
            Self::AutoPitchType => 20,
            Self::PitchCall => 21,
            Self::KorBB => 22,
            Self::TaggedHitType => 23,
            Self::PlayResult => 24,
            Self::RelSpeed => 29,
            Self::SpinRate => 33,
            Self::VertBreak => 37,
            Self::HorzBreak => 38,
            Self::PlateLocHeight => 39,
            Self::PlateLocSide => 40,
            Self::ExitSpeed => 42,
            Self::Angle => 43,
            Self::Direction => 44,
            Self::HitSpinRate => 45,
            Self::Distance => 48,
        }
    }
}
