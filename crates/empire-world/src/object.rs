use empire_types::{ItemType, Material, ObjFlags, WearPos};

use crate::entity::{CharId, EmpireVnum, ObjId, ObjVnum, RoomVnum, TrigVnum, VehId};
use crate::script_data::ScriptData;
use crate::uid::Uid;

/// Where an object is. Exactly one place at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjLocation {
    #[default]
    Nowhere,
    Room(RoomVnum),
    CarriedBy(CharId),
    WornBy(CharId, WearPos),
    InObj(ObjId),
    InVehicle(VehId),
}

#[derive(Debug, Clone)]
pub struct Object {
    pub uid: Uid,
    pub vnum: ObjVnum,
    pub keywords: String,
    pub short_descr: String,
    pub item_type: ItemType,
    pub material: Material,
    pub flags: ObjFlags,
    pub values: [i32; 4],
    /// Real updates until decay; 0 or less never decays.
    pub timer: i32,
    /// Wall time the object last changed hands or rooms.
    pub autostore_timer: u64,
    pub location: ObjLocation,
    pub contents: Vec<ObjId>,
    pub can_take: bool,
    /// Goes to empire storage when autostored.
    pub can_store: bool,
    /// Goes to unique (warehouse or home) storage when autostored.
    pub unique_storable: bool,
    pub bound_to: Vec<u32>,
    /// Custom decay messages; the stock text is used when unset.
    pub decay_on_char: Option<String>,
    pub decay_in_room: Option<String>,
    /// Size of the mob a corpse came from.
    pub corpse_size: i32,
    /// Level needed to keep wearing it.
    pub min_level: i32,
    pub coins_empire: Option<EmpireVnum>,
    /// Empire of whoever last held it.
    pub last_empire: Option<EmpireVnum>,
    /// A lit light that can set buildings alight.
    pub lights_fire: bool,
    pub script: Option<ScriptData>,
    pub proto_script: Vec<TrigVnum>,
    pub extracted: bool,
}

impl Default for Object {
    fn default() -> Self {
        Self {
            uid: Uid(0),
            vnum: -1,
            keywords: String::new(),
            short_descr: String::new(),
            item_type: ItemType::Other,
            material: Material::Wood,
            flags: ObjFlags::empty(),
            values: [0; 4],
            timer: 0,
            autostore_timer: 0,
            location: ObjLocation::Nowhere,
            contents: Vec::new(),
            can_take: true,
            can_store: false,
            unique_storable: false,
            bound_to: Vec::new(),
            decay_on_char: None,
            decay_in_room: None,
            corpse_size: 0,
            min_level: 0,
            coins_empire: None,
            last_empire: None,
            lights_fire: false,
            script: None,
            proto_script: Vec::new(),
            extracted: false,
        }
    }
}

impl Object {
    pub fn new(vnum: ObjVnum, keywords: &str, short_descr: &str, item_type: ItemType) -> Self {
        Self {
            vnum,
            keywords: keywords.to_string(),
            short_descr: short_descr.to_string(),
            item_type,
            ..Self::default()
        }
    }

    pub fn is_named(&self, word: &str) -> bool {
        crate::character::is_name(word, &self.keywords)
    }

    pub fn carried_by(&self) -> Option<CharId> {
        match self.location {
            ObjLocation::CarriedBy(ch) => Some(ch),
            _ => None,
        }
    }

    pub fn worn_by(&self) -> Option<CharId> {
        match self.location {
            ObjLocation::WornBy(ch, _) => Some(ch),
            _ => None,
        }
    }

    pub fn in_room(&self) -> Option<RoomVnum> {
        match self.location {
            ObjLocation::Room(r) => Some(r),
            _ => None,
        }
    }

    pub fn in_obj(&self) -> Option<ObjId> {
        match self.location {
            ObjLocation::InObj(o) => Some(o),
            _ => None,
        }
    }

    pub fn in_vehicle(&self) -> Option<VehId> {
        match self.location {
            ObjLocation::InVehicle(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_coins(&self) -> bool {
        self.item_type == ItemType::Coins
    }

    pub fn coins_amount(&self) -> i32 {
        if self.is_coins() { self.values[0] } else { 0 }
    }

    pub fn is_drink_container(&self) -> bool {
        self.item_type == ItemType::DrinkCon
    }

    /// Light sources are lit while flagged.
    pub fn is_lit(&self) -> bool {
        self.flags.contains(ObjFlags::LIGHT)
    }

    pub fn bind_ok(&self, idnum: u32) -> bool {
        self.bound_to.is_empty() || self.bound_to.contains(&idnum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_accessors() {
        let mut obj = Object::new(100, "iron sword", "an iron sword", ItemType::Weapon);
        assert_eq!(obj.in_room(), None);
        obj.location = ObjLocation::Room(3001);
        assert_eq!(obj.in_room(), Some(3001));
        assert!(obj.carried_by().is_none());
        assert!(obj.is_named("sw"));
    }

    #[test]
    fn binding() {
        let mut obj = Object::new(1, "ring", "a ring", ItemType::Worn);
        assert!(obj.bind_ok(7));
        obj.bound_to.push(3);
        assert!(obj.bind_ok(3));
        assert!(!obj.bind_ok(7));
    }
}
