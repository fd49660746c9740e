use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

/// Character position (`POS_*`). Ordering matters: anything below
/// `Sleeping` is incapacitated, below `Stunned` is bleeding out.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[repr(u8)]
pub enum Position {
    Dead = 0,
    MortallyWounded = 1,
    Incapacitated = 2,
    Stunned = 3,
    Sleeping = 4,
    Resting = 5,
    Sitting = 6,
    Fighting = 7,
    Standing = 8,
}

/// Base regeneration per real update, indexed by position.
pub const REGEN_BY_POS: [i32; Position::COUNT] = [0, 0, 0, 1, 4, 3, 2, 1, 1];

impl Position {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dead => "Dead",
            Self::MortallyWounded => "Mortally wounded",
            Self::Incapacitated => "Incapacitated",
            Self::Stunned => "Stunned",
            Self::Sleeping => "Sleeping",
            Self::Resting => "Resting",
            Self::Sitting => "Sitting",
            Self::Fighting => "Fighting",
            Self::Standing => "Standing",
        }
    }

    pub fn regen(self) -> i32 {
        REGEN_BY_POS[self as usize]
    }

    pub fn is_awake(self) -> bool {
        self > Self::Sleeping
    }

    /// The position implied by a health total, as `update_pos` computes it.
    /// A positive total never lifts a character out of an incapacitated position.
    pub fn from_health(health: i32, current: Self) -> Self {
        if health > 0 && current > Self::Stunned {
            current
        } else if health < -5 {
            Self::Dead
        } else if health < 0 {
            Self::Incapacitated
        } else if health == 0 {
            Self::Stunned
        } else {
            current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn count() {
        assert_eq!(Position::COUNT, 9);
    }

    #[test]
    fn regen_table() {
        assert_eq!(Position::Sleeping.regen(), 4);
        assert_eq!(Position::Standing.regen(), 1);
        assert_eq!(Position::Dead.regen(), 0);
    }

    #[test]
    fn health_positions() {
        assert_eq!(
            Position::from_health(10, Position::Standing),
            Position::Standing
        );
        assert_eq!(
            Position::from_health(10, Position::Incapacitated),
            Position::Incapacitated
        );
        assert_eq!(Position::from_health(0, Position::Standing), Position::Stunned);
        assert_eq!(
            Position::from_health(-4, Position::Standing),
            Position::Incapacitated
        );
        assert_eq!(Position::from_health(-6, Position::Standing), Position::Dead);
    }

    #[test]
    fn ordering() {
        let all: Vec<_> = Position::iter().collect();
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }
}
