use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

/// Player conditions (`FULL`, `THIRST`, `DRUNK`). Higher is worse for
/// hunger and thirst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount, FromRepr,
)]
#[repr(u8)]
pub enum Condition {
    Full = 0,
    Thirst = 1,
    Drunk = 2,
}

/// A condition value that never changes.
pub const UNLIMITED: i16 = -1;

/// Weather over a map tile.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount, FromRepr,
)]
#[repr(u8)]
pub enum Sky {
    #[default]
    Cloudless = 0,
    Cloudy = 1,
    Raining = 2,
    Lightning = 3,
}

impl Sky {
    /// The word `%weather%` and `%room.weather%` report.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cloudless => "sunny",
            Self::Cloudy => "cloudy",
            Self::Raining => "raining",
            Self::Lightning => "lightning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count() {
        assert_eq!(Condition::COUNT, 3);
        assert_eq!(Sky::COUNT, 4);
    }

    #[test]
    fn sky_names() {
        assert_eq!(Sky::Cloudless.name(), "sunny");
        assert_eq!(Sky::from_repr(2).map(Sky::name), Some("raining"));
    }
}
