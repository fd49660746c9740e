use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

/// Object materials (`MAT_*`).
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
pub enum Material {
    #[default]
    Wood = 0,
    Rock = 1,
    Iron = 2,
    Silver = 3,
    Gold = 4,
    Flint = 5,
    Clay = 6,
    Flesh = 7,
    Glass = 8,
    Wax = 9,
    Magic = 10,
    Cloth = 11,
    Gem = 12,
    Copper = 13,
    Bone = 14,
    Hair = 15,
}

impl Material {
    pub fn name(self) -> &'static str {
        match self {
            Self::Wood => "WOOD",
            Self::Rock => "ROCK",
            Self::Iron => "IRON",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Flint => "FLINT",
            Self::Clay => "CLAY",
            Self::Flesh => "FLESH",
            Self::Glass => "GLASS",
            Self::Wax => "WAX",
            Self::Magic => "MAGIC",
            Self::Cloth => "CLOTH",
            Self::Gem => "GEM",
            Self::Copper => "COPPER",
            Self::Bone => "BONE",
            Self::Hair => "HAIR",
        }
    }

    /// Decay text for a carried item of this material; `$p` is the item.
    pub fn decay_on_char(self) -> Option<&'static str> {
        match self {
            Self::Wood => Some("$p rots away in your hands."),
            Self::Flesh => Some("$p rots away to nothing."),
            Self::Cloth | Self::Hair => Some("$p falls apart in your hands."),
            Self::Wax => Some("$p crumbles in your hands."),
            Self::Magic => Some("$p fades away."),
            _ => None,
        }
    }

    pub fn decay_in_room(self) -> Option<&'static str> {
        match self {
            Self::Wood => Some("$p rots away."),
            Self::Flesh => Some("A quivering horde of maggots consumes $p."),
            Self::Cloth | Self::Hair => Some("$p falls apart."),
            Self::Wax => Some("$p crumbles to dust."),
            Self::Magic => Some("$p fades away."),
            _ => None,
        }
    }

    /// Objects of this material drift on water instead of sinking.
    pub fn floats(self) -> bool {
        matches!(
            self,
            Self::Wood | Self::Flesh | Self::Wax | Self::Magic | Self::Cloth | Self::Bone | Self::Hair
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn count() {
        assert_eq!(Material::COUNT, 16);
    }

    #[test]
    fn floating() {
        assert!(Material::Wood.floats());
        assert!(Material::Hair.floats());
        assert!(!Material::Iron.floats());
        assert_eq!(Material::iter().filter(|m| m.floats()).count(), 7);
    }

    #[test]
    fn decay_text_is_optional() {
        assert!(Material::Flesh.decay_in_room().is_some());
        assert!(Material::Iron.decay_on_char().is_none());
        for m in Material::iter() {
            assert_eq!(m.decay_on_char().is_some(), m.decay_in_room().is_some(), "{m:?}");
        }
    }

    #[test]
    fn round_trip() {
        for m in Material::iter() {
            assert_eq!(Material::from_repr(m as u8), Some(m));
        }
    }
}
