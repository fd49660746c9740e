use empire_types::{BuildingFlags, Direction, ExitFlags, SectorFlags};
use strum::EnumCount;

use crate::entity::{CharId, EmpireVnum, ObjId, RoomVnum, TrigVnum, VehId};
use crate::script_data::ScriptData;
use crate::uid::{MAP_SIZE, MAP_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub to_room: RoomVnum,
    pub flags: ExitFlags,
    pub keyword: Option<String>,
}

impl Exit {
    pub fn to(to_room: RoomVnum) -> Self {
        Self {
            to_room,
            flags: ExitFlags::empty(),
            keyword: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.flags.contains(ExitFlags::CLOSED)
    }
}

/// Scent left by whoever passed through, for pursuing mobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub player_id: u32,
    pub dir: Direction,
    pub timestamp: u64,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub vnum: RoomVnum,
    pub name: String,
    pub sector_name: String,
    pub sector: SectorFlags,
    pub building: Option<String>,
    pub bld_flags: BuildingFlags,
    pub complete: bool,
    /// Walled in: a closed building or an interior room.
    pub closed: bool,
    pub entrance: Option<Direction>,
    pub exits: [Option<Exit>; Direction::COUNT],
    pub people: Vec<CharId>,
    pub contents: Vec<ObjId>,
    pub vehicles: Vec<VehId>,
    pub owner: Option<EmpireVnum>,
    pub private_owner: Option<u32>,
    pub burning: bool,
    pub tracks: Vec<Track>,
    pub island: Option<i32>,
    pub crop: Option<String>,
    pub template: Option<i32>,
    /// Instance id when the room belongs to a live adventure.
    pub instance: Option<i32>,
    /// The map room an interior room belongs to.
    pub home_room: Option<RoomVnum>,
    /// The vehicle an interior room is part of.
    pub in_vehicle: Option<VehId>,
    /// Room template forbids mobs from wandering in.
    pub no_mob: bool,
    pub script: Option<ScriptData>,
    pub proto_script: Vec<TrigVnum>,
}

impl Room {
    pub fn new(vnum: RoomVnum, name: &str) -> Self {
        Self {
            vnum,
            name: name.to_string(),
            sector_name: "Plains".to_string(),
            sector: SectorFlags::empty(),
            building: None,
            bld_flags: BuildingFlags::empty(),
            complete: true,
            closed: false,
            entrance: None,
            exits: Default::default(),
            people: Vec::new(),
            contents: Vec::new(),
            vehicles: Vec::new(),
            owner: None,
            private_owner: None,
            burning: false,
            tracks: Vec::new(),
            island: None,
            crop: None,
            template: None,
            instance: None,
            home_room: None,
            in_vehicle: None,
            no_mob: false,
            script: None,
            proto_script: Vec::new(),
        }
    }

    pub fn is_map(&self) -> bool {
        (0..MAP_SIZE as i32).contains(&self.vnum)
    }

    /// Map coordinates; interior rooms report their home room's.
    pub fn coords(&self) -> Option<(i32, i32)> {
        let vnum = if self.is_map() { self.vnum } else { self.home_room? };
        (0..MAP_SIZE as i32)
            .contains(&vnum)
            .then(|| (vnum % MAP_WIDTH as i32, vnum / MAP_WIDTH as i32))
    }

    pub fn is_outdoors(&self) -> bool {
        !self.closed
    }

    pub fn is_adventure(&self) -> bool {
        self.instance.is_some() || self.sector.contains(SectorFlags::ADVENTURE)
    }

    pub fn is_water(&self) -> bool {
        self.sector.is_water()
    }

    pub fn exit(&self, dir: Direction) -> Option<&Exit> {
        self.exits[dir as usize].as_ref()
    }

    pub fn bld_flagged(&self, bits: BuildingFlags) -> bool {
        self.building.is_some() && self.bld_flags.intersects(bits)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_coordinates() {
        let room = Room::new(MAP_WIDTH as i32 * 3 + 7, "Plains");
        assert!(room.is_map());
        assert_eq!(room.coords(), Some((7, 3)));

        let mut inside = Room::new(MAP_SIZE as i32 + 10, "Hall");
        assert_eq!(inside.coords(), None);
        inside.home_room = Some(5);
        assert_eq!(inside.coords(), Some((5, 0)));
    }
}
