use empire_types::VehicleFlags;

use crate::entity::{CharId, EmpireVnum, ObjId, RoomVnum, TrigVnum, VehVnum};
use crate::script_data::ScriptData;
use crate::uid::Uid;

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub uid: Uid,
    pub vnum: VehVnum,
    pub keywords: String,
    pub short_descr: String,
    pub health: i32,
    pub max_health: i32,
    pub flags: VehicleFlags,
    pub owner: Option<EmpireVnum>,
    pub in_room: Option<RoomVnum>,
    pub contents: Vec<ObjId>,
    pub sitting_on: Option<CharId>,
    pub driver: Option<CharId>,
    pub led_by: Option<CharId>,
    pub interior_rooms: Vec<RoomVnum>,
    /// Interior room that carries the private-home owner, if any.
    pub interior_home: Option<RoomVnum>,
    pub last_move_time: u64,
    pub script: Option<ScriptData>,
    pub proto_script: Vec<TrigVnum>,
    pub extracted: bool,
}

impl Vehicle {
    pub fn new(vnum: VehVnum, keywords: &str, short_descr: &str, max_health: i32) -> Self {
        Self {
            uid: Uid(0),
            vnum,
            keywords: keywords.to_string(),
            short_descr: short_descr.to_string(),
            health: max_health,
            max_health,
            flags: VehicleFlags::empty(),
            owner: None,
            in_room: None,
            contents: Vec::new(),
            sitting_on: None,
            driver: None,
            led_by: None,
            interior_rooms: Vec::new(),
            interior_home: None,
            last_move_time: 0,
            script: None,
            proto_script: Vec::new(),
            extracted: false,
        }
    }

    pub fn is_named(&self, word: &str) -> bool {
        crate::character::is_name(word, &self.keywords)
    }

    pub fn on_fire(&self) -> bool {
        self.flags.contains(VehicleFlags::ON_FIRE)
    }
}
