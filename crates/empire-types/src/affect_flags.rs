use bitflags::bitflags;
use serde::Serialize;

use crate::named_flags;

bitflags! {
    /// Affect bits (`AFF_*`), granted by timed affects or innate to a mob.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct AffFlags: u32 {
        const BLIND                = 0x0000_0001;
        const MAJESTY              = 0x0000_0002;
        const INFRAVISION          = 0x0000_0004;
        const SNEAK                = 0x0000_0008;
        const HIDE                 = 0x0000_0010;
        const CHARM                = 0x0000_0020;
        const INVISIBLE            = 0x0000_0040;
        const IMMUNE_BATTLE        = 0x0000_0080;
        const SENSE_HIDE           = 0x0000_0100;
        const IMMUNE_PHYSICAL      = 0x0000_0200;
        const NO_TARGET_IN_ROOM    = 0x0000_0400;
        const NO_SEE_IN_ROOM       = 0x0000_0800;
        const FLY                  = 0x0000_1000;
        const NO_ATTACK            = 0x0000_2000;
        const IMMUNE_HIGH_SORCERY  = 0x0000_4000;
        const DISARM               = 0x0000_8000;
        const HASTE                = 0x0001_0000;
        const ENTANGLED            = 0x0002_0000;
        const SLOW                 = 0x0004_0000;
        const STUNNED              = 0x0008_0000;
        const STONED               = 0x0010_0000;
        const CANT_SPEND_BLOOD     = 0x0020_0000;
        const CLAWS                = 0x0040_0000;
        const DEATHSHROUD          = 0x0080_0000;
        const EARTHMELD            = 0x0100_0000;
        const MUMMIFY              = 0x0200_0000;
        const SOULMASK             = 0x0400_0000;
        const IMMUNE_NATURAL_MAGIC = 0x0800_0000;
        const IMMUNE_STEALTH       = 0x1000_0000;
        const IMMUNE_VAMPIRE       = 0x2000_0000;
        const IMMUNE_STUN          = 0x4000_0000;
        const ORDERED              = 0x8000_0000;
    }
}

pub const AFF_FLAG_NAMES: &[&str] = &[
    "BLIND",
    "MAJESTY",
    "INFRA",
    "SNEAK",
    "HIDE",
    "*CHARM",
    "INVIS",
    "!BATTLE",
    "SENSE-HIDE",
    "!PHYSICAL",
    "!TARGET",
    "!SEE",
    "FLY",
    "!ATTACK",
    "!HIGH-SORCERY",
    "DISARM",
    "HASTE",
    "ENTANGLED",
    "SLOW",
    "STUNNED",
    "STONED",
    "!BLOOD",
    "CLAWS",
    "DEATHSHROUD",
    "EARTHMELD",
    "MUMMIFY",
    "SOULMASK",
    "!NATURAL-MAGIC",
    "!STEALTH",
    "!VAMPIRE",
    "!STUN",
    "*ORDERED",
];

named_flags!(AffFlags, "affect", AFF_FLAG_NAMES);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NamedFlags;

    #[test]
    fn names_cover_every_bit() {
        assert_eq!(AFF_FLAG_NAMES.len(), 32);
        assert_eq!(AffFlags::from_index(31), Some(AffFlags::ORDERED));
    }

    #[test]
    fn lookup() {
        assert_eq!(AffFlags::from_script_name("fly"), Ok(AffFlags::FLY));
        assert_eq!(AffFlags::from_script_name("!STUN"), Ok(AffFlags::IMMUNE_STUN));
        assert_eq!(AffFlags::from_script_name("ENTANGLED"), Ok(AffFlags::ENTANGLED));
    }
}
