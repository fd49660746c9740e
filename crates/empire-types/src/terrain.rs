use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Sector properties (`SECTF_*`) that movement and scripts care about.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct SectorFlags: u32 {
        const IS_ROAD      = 0x0000_0001;
        const ROUGH        = 0x0000_0002;
        const FRESH_WATER  = 0x0000_0004;
        const OCEAN        = 0x0000_0008;
        const MAP_BUILDING = 0x0000_0010;
        const INSIDE       = 0x0000_0020;
        const HAS_CROP     = 0x0000_0040;
        const ADVENTURE    = 0x0000_0080;
        /// Characters here are swimming.
        const SHALLOW      = 0x0000_0100;
    }
}

impl SectorFlags {
    pub fn is_water(self) -> bool {
        self.intersects(Self::FRESH_WATER | Self::OCEAN)
    }
}

bitflags! {
    /// Building properties (`BLD_*`) plus the room functions the tick code needs.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct BuildingFlags: u32 {
        const OPEN           = 0x0000_0001;
        const NO_NPC         = 0x0000_0002;
        const BARRIER        = 0x0000_0004;
        const TWO_ENTRANCES  = 0x0000_0008;
        const LONG_AUTOSTORE = 0x0000_0010;
        const BEDROOM        = 0x0000_0020;
        const STABLE         = 0x0000_0040;
        const NO_MOB         = 0x0000_0080;
        const BURNABLE       = 0x0000_0100;
    }
}

bitflags! {
    /// Exit state (`EX_*`).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct ExitFlags: u32 {
        const ISDOOR = 0x0000_0001;
        const CLOSED = 0x0000_0002;
    }
}

pub const EXIT_FLAG_NAMES: &[&str] = &["DOOR", "CLOSED"];

crate::named_flags!(ExitFlags, "exit flag", EXIT_FLAG_NAMES);

bitflags! {
    /// Vehicle flags (`VEH_*`) that the tick and script code read.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct VehicleFlags: u32 {
        const INCOMPLETE = 0x0000_0001;
        const DRIVING    = 0x0000_0002;
        const SAILING    = 0x0000_0004;
        const FLYING     = 0x0000_0008;
        const ALLOW_ROUGH = 0x0000_0010;
        const SIT        = 0x0000_0020;
        const IN         = 0x0000_0040;
        const BURNABLE   = 0x0000_0080;
        const CONTAINER  = 0x0000_0100;
        const SHIPPING   = 0x0000_0200;
        const CUSTOMIZABLE = 0x0000_0400;
        const DRAGGABLE  = 0x0000_0800;
        const NO_BUILDING = 0x0000_1000;
        const CAN_PORTAL = 0x0000_2000;
        const LEADABLE   = 0x0000_4000;
        const CARRY_VEHICLES = 0x0000_8000;
        const CARRY_MOBS = 0x0001_0000;
        const SIEGE_WEAPONS = 0x0002_0000;
        const ON_FIRE    = 0x0004_0000;
        const NO_LOAD_ONTO_VEHICLE = 0x0008_0000;
        const VISIBLE_IN_DARK = 0x0010_0000;
        const NO_CLAIM   = 0x0020_0000;
        const EXTRACTED  = 0x0040_0000;
    }
}

pub const VEHICLE_FLAG_NAMES: &[&str] = &[
    "*INCOMPLETE",
    "DRIVING",
    "SAILING",
    "FLYING",
    "ALLOW-ROUGH",
    "SIT",
    "IN",
    "BURNABLE",
    "CONTAINER",
    "SHIPPING",
    "CUSTOMIZABLE",
    "DRAGGABLE",
    "!BUILDING",
    "CAN-PORTAL",
    "LEADABLE",
    "CARRY-VEHICLES",
    "CARRY-MOBS",
    "SIEGE-WEAPONS",
    "ON-FIRE",
    "!LOAD-ONTO-VEHICLE",
    "VISIBLE-IN-DARK",
    "!CLAIM",
    "*EXTRACTED",
];

crate::named_flags!(VehicleFlags, "vehicle flag", VEHICLE_FLAG_NAMES);

bitflags! {
    /// Injuries (`INJ_*`) that stop regeneration and movement.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct Injuries: u32 {
        const TIED   = 0x0000_0001;
        const STAKED = 0x0000_0002;
    }
}
