use std::collections::HashMap;
use std::fmt;

use crate::entity::EntityRef;

/// Lead character of a UID string.
pub const UID_CHAR: char = '}';

pub const MAP_WIDTH: u32 = 1800;
pub const MAP_HEIGHT: u32 = 1000;
pub const MAP_SIZE: u32 = MAP_WIDTH * MAP_HEIGHT;

// player ids: 0 .. MOB_ID_BASE - 1
pub const MOB_ID_BASE: u32 = 10_000_000;
pub const EMPIRE_ID_BASE: u32 = 10_000_000 + MOB_ID_BASE;
pub const ROOM_ID_BASE: u32 = 10_000_000 + EMPIRE_ID_BASE;
pub const VEHICLE_ID_BASE: u32 = MAP_SIZE * 5 + ROOM_ID_BASE;
pub const OBJ_ID_BASE: u32 = 1_000_000 + VEHICLE_ID_BASE;

/// A live instance's script id. Rendered as `}<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(pub u32);

impl Uid {
    pub fn room(vnum: i32) -> Self {
        Self((vnum.max(0) as u32).saturating_add(ROOM_ID_BASE))
    }

    pub fn empire(vnum: i32) -> Self {
        Self((vnum.max(0) as u32).saturating_add(EMPIRE_ID_BASE))
    }

    /// Strict form: the sentinel followed by nothing but digits.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix(UID_CHAR)?;
        parse_digits(digits).map(Self)
    }

    /// The forms scripts pass as ids: with or without the sentinel.
    pub fn parse_id(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::parse(text).or_else(|| parse_digits(text).map(Self))
    }

    pub fn space(self) -> IdSpace {
        match self.0 {
            n if n < MOB_ID_BASE => IdSpace::Player,
            n if n < EMPIRE_ID_BASE => IdSpace::Mob,
            n if n < ROOM_ID_BASE => IdSpace::Empire,
            n if n < VEHICLE_ID_BASE => IdSpace::Room,
            n if n < OBJ_ID_BASE => IdSpace::Vehicle,
            _ => IdSpace::Object,
        }
    }
}

fn parse_digits(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{UID_CHAR}{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSpace {
    Player,
    Mob,
    Empire,
    Room,
    Vehicle,
    Object,
}

/// Maps live script ids to entities and hands out new ones.
#[derive(Debug)]
pub struct UidRegistry {
    live: HashMap<Uid, EntityRef>,
    next_mob: u32,
    next_vehicle: u32,
    next_obj: u32,
}

impl Default for UidRegistry {
    fn default() -> Self {
        Self {
            live: HashMap::new(),
            next_mob: MOB_ID_BASE,
            next_vehicle: VEHICLE_ID_BASE,
            next_obj: OBJ_ID_BASE,
        }
    }
}

impl UidRegistry {
    pub fn next_mob_id(&mut self) -> Uid {
        let id = Uid(self.next_mob);
        self.next_mob += 1;
        id
    }

    pub fn next_vehicle_id(&mut self) -> Uid {
        let id = Uid(self.next_vehicle);
        self.next_vehicle += 1;
        id
    }

    pub fn next_obj_id(&mut self) -> Uid {
        let id = Uid(self.next_obj);
        self.next_obj = self.next_obj.saturating_add(1);
        id
    }

    pub fn register(&mut self, uid: Uid, entity: EntityRef) {
        if let Some(old) = self.live.insert(uid, entity) {
            if old != entity {
                log::warn!("uid {uid} re-registered: {old:?} -> {entity:?}");
            }
        }
    }

    pub fn unregister(&mut self, uid: Uid) {
        self.live.remove(&uid);
    }

    pub fn lookup(&self, uid: Uid) -> Option<EntityRef> {
        self.live.get(&uid).copied()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render() {
        assert_eq!(Uid(42).to_string(), "}42");
        assert_eq!(Uid::room(100).to_string(), "}30000100");
    }

    #[test]
    fn parse_rejects_junk() {
        assert_eq!(Uid::parse("}123"), Some(Uid(123)));
        assert_eq!(Uid::parse("123"), None);
        assert_eq!(Uid::parse("}"), None);
        assert_eq!(Uid::parse("}12a"), None);
        assert_eq!(Uid::parse("}-5"), None);
        assert_eq!(Uid::parse("}99999999999"), None);
    }

    #[test]
    fn parse_id_accepts_bare_numbers() {
        assert_eq!(Uid::parse_id("}77"), Some(Uid(77)));
        assert_eq!(Uid::parse_id(" 77 "), Some(Uid(77)));
        assert_eq!(Uid::parse_id("bob"), None);
    }

    #[test]
    fn id_spaces() {
        assert_eq!(Uid(5).space(), IdSpace::Player);
        assert_eq!(Uid(MOB_ID_BASE).space(), IdSpace::Mob);
        assert_eq!(Uid::empire(3).space(), IdSpace::Empire);
        assert_eq!(Uid::room(0).space(), IdSpace::Room);
        assert_eq!(Uid(VEHICLE_ID_BASE).space(), IdSpace::Vehicle);
        assert_eq!(Uid(OBJ_ID_BASE + 9).space(), IdSpace::Object);
    }

    #[test]
    fn counters_are_independent() {
        let mut reg = UidRegistry::default();
        assert_eq!(reg.next_mob_id(), Uid(MOB_ID_BASE));
        assert_eq!(reg.next_mob_id(), Uid(MOB_ID_BASE + 1));
        assert_eq!(reg.next_obj_id(), Uid(OBJ_ID_BASE));
        assert_eq!(reg.next_vehicle_id(), Uid(VEHICLE_ID_BASE));
    }
}
