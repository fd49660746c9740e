use bitflags::bitflags;
use serde::Serialize;

use crate::named_flags;

bitflags! {
    /// Object extra flags (`OBJ_*`).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct ObjFlags: u32 {
        const CHAIR            = 0x0000_0001;
        const PLANTABLE        = 0x0000_0002;
        const LIGHT            = 0x0000_0004;
        const SUPERIOR         = 0x0000_0008;
        const LARGE            = 0x0000_0010;
        const CREATED          = 0x0000_0020;
        const SINGLE_USE       = 0x0000_0040;
        const SLOW             = 0x0000_0080;
        const FAST             = 0x0000_0100;
        const ENCHANTED        = 0x0000_0200;
        const JUNK             = 0x0000_0400;
        const CREATABLE        = 0x0000_0800;
        const SCALABLE         = 0x0000_1000;
        const TWO_HANDED       = 0x0000_2000;
        const BIND_ON_EQUIP    = 0x0000_4000;
        const BIND_ON_PICKUP   = 0x0000_8000;
        const STAFF            = 0x0001_0000;
        const UNCOLLECTED_LOOT = 0x0002_0000;
        const KEEP             = 0x0004_0000;
        const TOOL_PAN         = 0x0008_0000;
        const TOOL_SHOVEL      = 0x0010_0000;
        const NO_AUTOSTORE     = 0x0020_0000;
        const HARD_DROP        = 0x0040_0000;
        const GROUP_DROP       = 0x0080_0000;
        const GENERIC_DROP     = 0x0100_0000;
    }
}

pub const OBJ_FLAG_NAMES: &[&str] = &[
    "CHAIR",
    "PLANTABLE",
    "LIGHT",
    "SUPERIOR",
    "LARGE",
    "*CREATED",
    "1-USE",
    "SLOW",
    "FAST",
    "ENCHANTED",
    "JUNK",
    "CREATABLE",
    "SCALABLE",
    "TWO-HANDED",
    "BOE",
    "BOP",
    "STAFF",
    "UNCOLLECTED-LOOT",
    "*KEEP",
    "TOOL-PAN",
    "TOOL-SHOVEL",
    "!AUTOSTORE",
    "HARD-DROP",
    "GROUP-DROP",
    "GENERIC-DROP",
];

named_flags!(ObjFlags, "object flag", OBJ_FLAG_NAMES);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NamedFlags;

    #[test]
    fn names_cover_every_bit() {
        assert_eq!(OBJ_FLAG_NAMES.len(), ObjFlags::all().bits().count_ones() as usize);
    }

    #[test]
    fn lookup() {
        assert_eq!(ObjFlags::from_script_name("1-use"), Ok(ObjFlags::SINGLE_USE));
        assert_eq!(ObjFlags::from_script_name("light"), Ok(ObjFlags::LIGHT));
        assert_eq!(ObjFlags::from_script_name("!AUTO"), Ok(ObjFlags::NO_AUTOSTORE));
    }
}
