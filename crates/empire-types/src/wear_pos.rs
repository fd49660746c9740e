use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

use crate::names::search_block;

/// Equipment slots, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount, FromRepr,
)]
#[repr(u8)]
pub enum WearPos {
    Head = 0,
    Ears = 1,
    Neck1 = 2,
    Neck2 = 3,
    Clothes = 4,
    Armor = 5,
    About = 6,
    Arms = 7,
    Wrists = 8,
    Hands = 9,
    FingerR = 10,
    FingerL = 11,
    Waist = 12,
    Legs = 13,
    Feet = 14,
    Pack = 15,
    Saddle = 16,
    Sheath1 = 17,
    Sheath2 = 18,
    Wield = 19,
    Ranged = 20,
    Hold = 21,
}

// "\r!" marks slots that cannot be named directly.
const WEAR_KEYWORDS: [&str; WearPos::COUNT] = [
    "head", "ears", "neck", "\r!", "clothes", "armor", "about", "arms", "wrists", "hands",
    "finger", "\r!", "waist", "legs", "feet", "pack", "saddle", "\r!", "\r!", "\r!", "\r!", "\r!",
];

impl WearPos {
    /// Finds a slot by keyword, accepting abbreviations.
    pub fn from_keyword(arg: &str) -> Option<Self> {
        search_block(arg, &WEAR_KEYWORDS, false).and_then(|i| Self::from_repr(i as u8))
    }

    pub fn keyword(self) -> &'static str {
        WEAR_KEYWORDS[self as usize]
    }

    /// Whether gear here counts toward stats and gear level.
    pub fn counts_stats(self) -> bool {
        !matches!(self, Self::Sheath1 | Self::Sheath2)
    }
}

/// How a mob moves; a few kinds change where it may go.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[repr(u8)]
pub enum MoveType {
    #[default]
    Walk = 0,
    Climb = 1,
    Fly = 2,
    Paddle = 3,
    Ride = 4,
    Slither = 5,
    Swim = 6,
    Scurry = 7,
    Skitter = 8,
    Creep = 9,
    Ooze = 10,
    Run = 11,
    Gallop = 12,
    Shamble = 13,
    Trot = 14,
    Hop = 15,
    Waddle = 16,
    Crawl = 17,
    Flutter = 18,
}

impl MoveType {
    /// Verb used in movement messages.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Walk => "walks",
            Self::Climb => "climbs",
            Self::Fly => "flies",
            Self::Paddle => "paddles",
            Self::Ride => "rides",
            Self::Slither => "slithers",
            Self::Swim => "swims",
            Self::Scurry => "scurries",
            Self::Skitter => "skitters",
            Self::Creep => "creeps",
            Self::Ooze => "oozes",
            Self::Run => "runs",
            Self::Gallop => "gallops",
            Self::Shamble => "shambles",
            Self::Trot => "trots",
            Self::Hop => "hops",
            Self::Waddle => "waddles",
            Self::Crawl => "crawls",
            Self::Flutter => "flutters",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count() {
        assert_eq!(WearPos::COUNT, 22);
        assert_eq!(MoveType::COUNT, 19);
    }

    #[test]
    fn keywords() {
        assert_eq!(WearPos::from_keyword("fing"), Some(WearPos::FingerR));
        assert_eq!(WearPos::from_keyword("neck"), Some(WearPos::Neck1));
        assert_eq!(WearPos::from_keyword("wield"), None);
        assert!(!WearPos::Sheath2.counts_stats());
    }
}
