use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Mobile trigger types (`MTRIG_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct MobTriggers: u32 {
        const GLOBAL        = 0x0000_0001;
        const RANDOM        = 0x0000_0002;
        const COMMAND       = 0x0000_0004;
        const SPEECH        = 0x0000_0008;
        const ACT           = 0x0000_0010;
        const DEATH         = 0x0000_0020;
        const GREET         = 0x0000_0040;
        const GREET_ALL     = 0x0000_0080;
        const ENTRY         = 0x0000_0100;
        const RECEIVE       = 0x0000_0200;
        const FIGHT         = 0x0000_0400;
        const HITPRCNT      = 0x0000_0800;
        const BRIBE         = 0x0000_1000;
        const LOAD          = 0x0000_2000;
        const MEMORY        = 0x0000_4000;
        const ABILITY       = 0x0000_8000;
        const LEAVE         = 0x0001_0000;
        const DOOR          = 0x0002_0000;
        const LEAVE_ALL     = 0x0004_0000;
        const FIGHT_CHARMED = 0x0008_0000;
    }
}

bitflags! {
    /// Object trigger types (`OTRIG_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct ObjTriggers: u32 {
        const GLOBAL  = 0x0000_0001;
        const RANDOM  = 0x0000_0002;
        const COMMAND = 0x0000_0004;
        // 0x08, 0x10 unused
        const TIMER   = 0x0000_0020;
        const GET     = 0x0000_0040;
        const DROP    = 0x0000_0080;
        const GIVE    = 0x0000_0100;
        const WEAR    = 0x0000_0200;
        const REMOVE  = 0x0000_0800;
        const LOAD    = 0x0000_2000;
        const ABILITY = 0x0000_8000;
        const LEAVE   = 0x0001_0000;
        const CONSUME = 0x0004_0000;
    }
}

bitflags! {
    /// Room trigger types (`WTRIG_*`), shared by room-template and adventure triggers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct WldTriggers: u32 {
        const GLOBAL            = 0x0000_0001;
        const RANDOM            = 0x0000_0002;
        const COMMAND           = 0x0000_0004;
        const SPEECH            = 0x0000_0008;
        const ADVENTURE_CLEANUP = 0x0000_0010;
        const RESET             = 0x0000_0020;
        const ENTER             = 0x0000_0040;
        const DROP              = 0x0000_0080;
        const ABILITY           = 0x0000_8000;
        const LEAVE             = 0x0001_0000;
        const DOOR              = 0x0002_0000;
    }
}

bitflags! {
    /// Vehicle trigger types (`VTRIG_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct VehTriggers: u32 {
        const GLOBAL  = 0x0000_0001;
        const RANDOM  = 0x0000_0002;
        const COMMAND = 0x0000_0004;
        const SPEECH  = 0x0000_0008;
        const DESTROY = 0x0000_0020;
        const GREET   = 0x0000_0040;
        const ENTRY   = 0x0000_0100;
        const LOAD    = 0x0000_2000;
        const LEAVE   = 0x0001_0000;
    }
}

/// Parses the letter form used in trigger files: `a` is bit 0, `b` bit 1, ...
///
/// A plain decimal number is accepted as the raw bitvector. Unknown
/// characters yield `None`.
pub fn parse_flag_letters(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok();
    }
    let mut bits = 0u32;
    for c in text.chars() {
        match c {
            'a'..='z' => bits |= 1 << (c as u32 - 'a' as u32),
            'A'..='F' => bits |= 1 << (26 + c as u32 - 'A' as u32),
            _ => return None,
        }
    }
    Some(bits)
}
