use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

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
pub enum Sex {
    #[default]
    Neutral = 0,
    Male = 1,
    Female = 2,
}

impl Sex {
    pub fn name(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn heshe(self) -> &'static str {
        match self {
            Self::Neutral => "it",
            Self::Male => "he",
            Self::Female => "she",
        }
    }

    pub fn himher(self) -> &'static str {
        match self {
            Self::Neutral => "it",
            Self::Male => "him",
            Self::Female => "her",
        }
    }

    pub fn hisher(self) -> &'static str {
        match self {
            Self::Neutral => "its",
            Self::Male => "his",
            Self::Female => "her",
        }
    }
}
