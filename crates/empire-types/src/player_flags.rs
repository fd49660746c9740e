use bitflags::bitflags;
use serde::Serialize;

use crate::named_flags;

bitflags! {
    /// Player flags (`PLR_*`).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct PlayerFlags: u32 {
        const FROZEN             = 0x0000_0001;
        const WRITING            = 0x0000_0002;
        const MAILING            = 0x0000_0004;
        const DONTSET            = 0x0000_0008;
        const SITEOK             = 0x0000_0010;
        const MUTED              = 0x0000_0020;
        const NOTITLE            = 0x0000_0040;
        const DELETED            = 0x0000_0080;
        const LOADROOM           = 0x0000_0100;
        const NOWIZLIST          = 0x0000_0200;
        const NODELETE           = 0x0000_0400;
        const INVSTART           = 0x0000_0800;
        const IPMASK             = 0x0000_1000;
        const DISGUISED          = 0x0000_2000;
        const VAMPIRE            = 0x0000_4000;
        const MULTI              = 0x0000_8000;
        const NEEDS_NEWBIE_SETUP = 0x0001_0000;
        const NORESTRICT         = 0x0002_0000;
        const KEEP_LOGIN         = 0x0004_0000;
        const EXTRACTED          = 0x0008_0000;
        const ADVENTURE_SUMMONED = 0x0010_0000;
    }
}

pub const PLAYER_FLAG_NAMES: &[&str] = &[
    "FROZEN",
    "WRITING",
    "MAILING",
    "DONTSET",
    "SITEOK",
    "MUTED",
    "NOTITLE",
    "DELETED",
    "LOADRM",
    "!WIZL",
    "!DEL",
    "INVST",
    "IPMASK",
    "DISGUISED",
    "VAMPIRE",
    "MULTI",
    "NEEDS-NEWBIE-SETUP",
    "!RESTICT",
    "KEEP-LOGIN",
    "EXTRACTED",
    "ADV-SUMMON",
];

named_flags!(PlayerFlags, "player flag", PLAYER_FLAG_NAMES);

bitflags! {
    /// Player preferences that matter to the script engine.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct Preferences: u32 {
        /// Receive `[ SCRIPT ERR: ... ]` diagnostics.
        const SCRIPT_SYSLOG = 0x0000_0001;
        const NOHASSLE      = 0x0000_0002;
        const WIZHIDE       = 0x0000_0004;
        const HOLYLIGHT     = 0x0000_0008;
    }
}

bitflags! {
    /// Bonus traits chosen at creation that adjust upkeep and regeneration.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct BonusTraits: u32 {
        const NO_HUNGER  = 0x0000_0001;
        const NO_THIRST  = 0x0000_0002;
        const MANA_REGEN = 0x0000_0004;
        const MOVE_REGEN = 0x0000_0008;
    }
}
