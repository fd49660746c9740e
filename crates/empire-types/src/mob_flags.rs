use bitflags::bitflags;
use serde::Serialize;

use crate::named_flags;

bitflags! {
    /// NPC action flags (`MOB_*`).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct MobFlags: u32 {
        const BRING_A_FRIEND = 0x0000_0001;
        const SENTINEL       = 0x0000_0002;
        const AGGRESSIVE     = 0x0000_0004;
        const ISNPC          = 0x0000_0008;
        const MOUNTABLE      = 0x0000_0010;
        const MILKABLE       = 0x0000_0020;
        const SCAVENGER      = 0x0000_0040;
        const UNDEAD         = 0x0000_0080;
        const TIED           = 0x0000_0100;
        const ANIMAL         = 0x0000_0200;
        const MOUNTAINWALK   = 0x0000_0400;
        const AQUATIC        = 0x0000_0800;
        const PLURAL         = 0x0000_1000;
        const NO_ATTACK      = 0x0000_2000;
        const SPAWNED        = 0x0000_4000;
        const CHAMPION       = 0x0000_8000;
        const EMPIRE         = 0x0001_0000;
        const FAMILIAR       = 0x0002_0000;
        const PICKPOCKETED   = 0x0004_0000;
        const CITYGUARD      = 0x0008_0000;
        const PURSUE         = 0x0010_0000;
        const HUMAN          = 0x0020_0000;
        const VAMPIRE        = 0x0040_0000;
        const CASTER         = 0x0080_0000;
        const TANK           = 0x0100_0000;
        const DPS            = 0x0200_0000;
        const HARD           = 0x0400_0000;
        const GROUP          = 0x0800_0000;
        const EXTRACTED      = 0x1000_0000;
        const NO_LOOT        = 0x2000_0000;
        const NO_TELEPORT    = 0x4000_0000;
    }
}

pub const MOB_FLAG_NAMES: &[&str] = &[
    "BRING-A-FRIEND",
    "SENTINEL",
    "AGGR",
    "ISNPC",
    "MOUNTABLE",
    "MILKABLE",
    "SCAVENGER",
    "UNDEAD",
    "TIED",
    "ANIMAL",
    "MOUNTAIN-WALK",
    "AQUATIC",
    "*PLURAL",
    "NO-ATTACK",
    "SPAWNED",
    "CHAMPION",
    "EMPIRE",
    "FAMILIAR",
    "*PICKPOCKETED",
    "CITYGUARD",
    "PURSUE",
    "HUMAN",
    "VAMPIRE",
    "CASTER",
    "TANK",
    "DPS",
    "HARD",
    "GROUP",
    "*EXTRACTED",
    "!LOOT",
    "!TELEPORT",
];

named_flags!(MobFlags, "mob flag", MOB_FLAG_NAMES);

impl MobFlags {
    /// Flags a script may never add or remove with `add_mob_flag`.
    pub const SCRIPT_PROTECTED: Self = Self::ISNPC.union(Self::EXTRACTED);
}
