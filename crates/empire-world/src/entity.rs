use empire_types::AttachType;

use crate::arena::Handle;
use crate::character::Character;
use crate::object::Object;
use crate::vehicle::Vehicle;

pub type CharId = Handle<Character>;
pub type ObjId = Handle<Object>;
pub type VehId = Handle<Vehicle>;

pub type RoomVnum = i32;
pub type EmpireVnum = i32;
pub type MobVnum = i32;
pub type ObjVnum = i32;
pub type VehVnum = i32;
pub type TrigVnum = i32;

pub const NOTHING: i32 = -1;

/// Anything that can own a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Char(CharId),
    Obj(ObjId),
    Room(RoomVnum),
    Vehicle(VehId),
    Empire(EmpireVnum),
}

impl EntityRef {
    /// The trigger class that runs on this kind of entity.
    pub fn attach_type(self) -> AttachType {
        match self {
            Self::Char(_) => AttachType::Mob,
            Self::Obj(_) => AttachType::Obj,
            Self::Room(_) => AttachType::Wld,
            Self::Vehicle(_) => AttachType::Veh,
            Self::Empire(_) => AttachType::Emp,
        }
    }

    pub fn as_char(self) -> Option<CharId> {
        match self {
            Self::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_obj(self) -> Option<ObjId> {
        match self {
            Self::Obj(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_room(self) -> Option<RoomVnum> {
        match self {
            Self::Room(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_vehicle(self) -> Option<VehId> {
        match self {
            Self::Vehicle(v) => Some(v),
            _ => None,
        }
    }
}
