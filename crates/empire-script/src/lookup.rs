//! Finding the entity a script names, by `}id` or by keyword.
//!
//! Each owner class searches outward from where it stands: a mob checks its
//! own gear first, an object its container and holder, a room its occupants.

use empire_types::{AffFlags, AttachType, Preferences};
use empire_world::character::{LVL_IMPL, LVL_START_IMM};
use empire_world::value::atoi;
use empire_world::{
    CharId, Character, EntityRef, ObjId, ObjLocation, RoomVnum, UID_CHAR, Uid, VehId, World,
};

use crate::exec::Exec;

/// Whether scripts may act on `ch`. Mortals and NPCs always qualify; hidden
/// immortals never do, and implementors only when `allow_gods` is set.
pub fn valid_dg_target(ch: &Character, allow_gods: bool) -> bool {
    if ch.is_npc || ch.access_level < LVL_START_IMM || !ch.nohassle() {
        return true;
    }
    if !allow_gods && ch.access_level >= LVL_IMPL {
        return false;
    }
    !ch.prefs.contains(Preferences::WIZHIDE)
}

/// Whether `sub` can see `obj` well enough to pick it as a target.
pub fn can_see(world: &World, sub: CharId, obj: CharId) -> bool {
    if sub == obj {
        return true;
    }
    let (Some(s), Some(o)) = (world.char(sub), world.char(obj)) else {
        return false;
    };
    let holylight = s.is_immortal() && s.prefs.contains(Preferences::HOLYLIGHT);
    if o.is_immortal() && o.prefs.contains(Preferences::WIZHIDE) && !holylight {
        return false;
    }
    if holylight {
        return true;
    }
    if s.aff_flagged(AffFlags::BLIND) {
        return false;
    }
    if o.aff_flagged(AffFlags::INVISIBLE) {
        return false;
    }
    !(o.aff_flagged(AffFlags::HIDE) && !s.aff_flagged(AffFlags::SENSE_HIDE))
}

/// The id in a `}123` argument. Trailing junk is ignored.
pub fn uid_arg(name: &str) -> Option<Uid> {
    let digits = name.strip_prefix(UID_CHAR)?;
    u32::try_from(atoi(digits)).ok().map(Uid)
}

/// A character by id, subject to [`valid_dg_target`] with gods allowed.
pub fn find_char(world: &World, uid: Uid) -> Option<CharId> {
    let ch = world.find_uid(uid)?.as_char()?;
    world
        .char(ch)
        .is_some_and(|c| valid_dg_target(c, true))
        .then_some(ch)
}

pub fn find_obj(world: &World, uid: Uid) -> Option<ObjId> {
    world.find_uid(uid)?.as_obj()
}

fn char_named(world: &World, ch: CharId, name: &str) -> bool {
    world
        .char(ch)
        .is_some_and(|c| c.is_named(name) && valid_dg_target(c, true))
}

fn obj_named(world: &World, obj: ObjId, name: &str) -> bool {
    world.obj(obj).is_some_and(|o| o.is_named(name))
}

fn people(world: &World, room: RoomVnum) -> Vec<CharId> {
    world.room(room).map(|r| r.people.clone()).unwrap_or_default()
}

fn contents(world: &World, room: RoomVnum) -> Vec<ObjId> {
    world.room(room).map(|r| r.contents.clone()).unwrap_or_default()
}

/// Any character in the world.
pub fn get_char(world: &World, name: &str) -> Option<CharId> {
    if let Some(uid) = uid_arg(name) {
        return find_char(world, uid);
    }
    world
        .chars
        .iter()
        .map(|(id, _)| id)
        .find(|&id| char_named(world, id, name))
}

/// A character in `room` only, unless addressed by id.
pub fn get_char_in_room(world: &World, room: RoomVnum, name: &str) -> Option<CharId> {
    if let Some(uid) = uid_arg(name) {
        return find_char(world, uid);
    }
    people(world, room)
        .into_iter()
        .find(|&id| char_named(world, id, name))
}

/// A character in `room`, then anywhere.
pub fn get_char_by_room(world: &World, room: RoomVnum, name: &str) -> Option<CharId> {
    if uid_arg(name).is_some() {
        return get_char(world, name);
    }
    get_char_in_room(world, room, name).or_else(|| get_char(world, name))
}

/// The object's holder if it matches, then anyone anywhere.
pub fn get_char_by_obj(world: &World, obj: ObjId, name: &str) -> Option<CharId> {
    if uid_arg(name).is_some() {
        return get_char(world, name);
    }
    let o = world.obj(obj)?;
    for holder in [o.carried_by(), o.worn_by()].into_iter().flatten() {
        if char_named(world, holder, name) {
            return Some(holder);
        }
    }
    get_char(world, name)
}

/// A character in the object's room.
pub fn get_char_near_obj(world: &World, obj: ObjId, name: &str) -> Option<CharId> {
    if uid_arg(name).is_some() {
        return get_char(world, name);
    }
    let room = world.obj_room(obj)?;
    get_char_in_room(world, room, name)
}

/// An object in `list` by id or keyword.
pub fn get_obj_in_list(world: &World, name: &str, list: &[ObjId]) -> Option<ObjId> {
    match uid_arg(name) {
        Some(uid) => list
            .iter()
            .copied()
            .find(|&o| world.obj(o).is_some_and(|o| o.uid == uid)),
        None => list.iter().copied().find(|&o| obj_named(world, o, name)),
    }
}

/// Gear worn by `ch`, by id, vnum or keyword.
pub fn get_object_in_equip(world: &World, ch: CharId, name: &str) -> Option<ObjId> {
    let c = world.char(ch)?;
    let worn = c.equipment.iter().flatten().copied();
    if let Some(uid) = uid_arg(name) {
        return worn.into_iter().find(|&o| world.obj(o).is_some_and(|o| o.uid == uid));
    }
    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
        let vnum = atoi(name);
        return worn
            .into_iter()
            .find(|&o| world.obj(o).is_some_and(|o| i64::from(o.vnum) == vnum));
    }
    worn.into_iter().find(|&o| obj_named(world, o, name))
}

/// Any object in the world.
pub fn get_obj(world: &World, name: &str) -> Option<ObjId> {
    if let Some(uid) = uid_arg(name) {
        return find_obj(world, uid);
    }
    world
        .objs
        .iter()
        .find(|(_, o)| o.is_named(name))
        .map(|(id, _)| id)
}

/// Only the room's floor.
pub fn get_obj_in_room(world: &World, room: RoomVnum, name: &str) -> Option<ObjId> {
    get_obj_in_list(world, name, &contents(world, room))
}

/// The room's floor, then anywhere.
pub fn get_obj_by_room(world: &World, room: RoomVnum, name: &str) -> Option<ObjId> {
    if let Some(uid) = uid_arg(name) {
        return find_obj(world, uid);
    }
    get_obj_in_room(world, room, name).or_else(|| get_obj(world, name))
}

/// Searches outward from `obj`: itself, its contents, its container or
/// holder, the floor, then the world.
pub fn get_obj_by_obj(world: &World, obj: ObjId, name: &str) -> Option<ObjId> {
    if let Some(uid) = uid_arg(name) {
        return find_obj(world, uid);
    }
    if name.eq_ignore_ascii_case("self") || name.eq_ignore_ascii_case("me") {
        return Some(obj);
    }
    let o = world.obj(obj)?;
    if let Some(found) = get_obj_in_list(world, name, &o.contents) {
        return Some(found);
    }
    if let Some(parent) = o.in_obj().filter(|&p| obj_named(world, p, name)) {
        return Some(parent);
    }
    if let Some(found) = o.worn_by().and_then(|ch| get_object_in_equip(world, ch, name)) {
        return Some(found);
    }
    if let Some(found) = o
        .carried_by()
        .and_then(|ch| world.char(ch))
        .and_then(|c| get_obj_in_list(world, name, &c.carrying))
    {
        return Some(found);
    }
    if let Some(found) = world
        .obj_room(obj)
        .and_then(|room| get_obj_in_room(world, room, name))
    {
        return Some(found);
    }
    get_obj(world, name)
}

/// Like [`get_obj_by_obj`] but stays in the object's room, also checking
/// what people there are wearing.
pub fn get_obj_near_obj(world: &World, obj: ObjId, name: &str) -> Option<ObjId> {
    if name.eq_ignore_ascii_case("self") || name.eq_ignore_ascii_case("me") {
        return Some(obj);
    }
    let o = world.obj(obj)?;
    if let Some(found) = get_obj_in_list(world, name, &o.contents) {
        return Some(found);
    }
    match o.location {
        ObjLocation::InObj(parent) => {
            let hit = match uid_arg(name) {
                Some(uid) => world.obj(parent).is_some_and(|p| p.uid == uid),
                None => obj_named(world, parent, name),
            };
            return hit.then_some(parent);
        }
        ObjLocation::WornBy(ch, _) => return get_object_in_equip(world, ch, name),
        ObjLocation::CarriedBy(ch) => {
            return world
                .char(ch)
                .and_then(|c| get_obj_in_list(world, name, &c.carrying));
        }
        _ => {}
    }
    let room = world.obj_room(obj)?;
    get_obj_in_room(world, room, name).or_else(|| {
        people(world, room)
            .into_iter()
            .find_map(|ch| get_object_in_equip(world, ch, name))
    })
}

/// A vehicle in `room`, or any vehicle by id.
pub fn get_vehicle_in_room(world: &World, room: RoomVnum, name: &str) -> Option<VehId> {
    if let Some(uid) = uid_arg(name) {
        return world.find_uid(uid)?.as_vehicle();
    }
    world
        .room(room)?
        .vehicles
        .iter()
        .copied()
        .find(|&v| world.vehicle(v).is_some_and(|v| v.is_named(name)))
}

pub fn get_vehicle(world: &World, name: &str) -> Option<VehId> {
    if let Some(uid) = uid_arg(name) {
        return world.find_uid(uid)?.as_vehicle();
    }
    world
        .vehicles
        .iter()
        .find(|(_, v)| v.is_named(name))
        .map(|(id, _)| id)
}

/// A room by `}id`, by `i<template>` inside the origin's instance, or by
/// vnum. A vnum argument must start with a digit.
pub fn get_room(world: &World, origin: Option<RoomVnum>, name: &str) -> Option<RoomVnum> {
    if let Some(uid) = uid_arg(name) {
        return world.find_uid(uid)?.as_room();
    }
    if let Some(template) = name
        .strip_prefix('i')
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
    {
        let template = i32::try_from(atoi(template)).ok()?;
        let inst = world.instance_for_room(origin?)?;
        return inst
            .rooms
            .iter()
            .copied()
            .find(|&r| world.room(r).is_some_and(|room| room.template == Some(template)));
    }
    if !name.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let vnum = i32::try_from(atoi(name)).ok()?;
    world.room(vnum).map(|_| vnum)
}

/// How many of `list` (searching into containers) match `item`: an id,
/// a vnum or a keyword. An id or vnum hit stops the scan at that level.
pub fn item_in_list(world: &World, item: &str, list: &[ObjId]) -> i32 {
    let uid = uid_arg(item);
    let vnum = (!item.is_empty() && item.bytes().all(|b| b.is_ascii_digit())).then(|| atoi(item));
    let mut count = 0;
    for &id in list {
        let Some(o) = world.obj(id) else {
            continue;
        };
        let hit = match (uid, vnum) {
            (Some(uid), _) => o.uid == uid,
            (None, Some(vnum)) => i64::from(o.vnum) == vnum,
            (None, None) => o.is_named(item),
        };
        if hit {
            count += 1;
            if uid.is_some() || vnum.is_some() {
                break;
            }
        } else if o.item_type.is_container() {
            count += item_in_list(world, item, &o.contents);
        }
    }
    count
}

/// Whether `ch` has `item` anywhere on them, gear included.
pub fn char_has_item(world: &World, ch: CharId, item: &str) -> bool {
    let Some(c) = world.char(ch) else {
        return false;
    };
    let worn: Vec<ObjId> = c.equipment.iter().flatten().copied().collect();
    item_in_list(world, item, &worn) > 0 || item_in_list(world, item, &c.carrying) > 0
}

/// Resolves the name a variable holds to an entity, searching the way the
/// running trigger's owner class does. Ids resolve anywhere.
pub fn resolve_target(world: &World, ex: &Exec, name: &str) -> Option<EntityRef> {
    if name.is_empty() {
        return None;
    }
    if let Some(uid) = uid_arg(name) {
        let target = world.find_uid(uid)?;
        return match target {
            EntityRef::Char(ch) => find_char(world, uid).map(|_| EntityRef::Char(ch)),
            other => Some(other),
        };
    }
    let here = world.entity_room(ex.owner);
    match (ex.class, ex.owner) {
        (AttachType::Mob, EntityRef::Char(me)) => {
            let c = world.char(me)?;
            let worn = get_object_in_equip(world, me, name);
            worn.or_else(|| get_obj_in_list(world, name, &c.carrying))
                .map(EntityRef::Obj)
                .or_else(|| here.and_then(|r| get_char_in_room(world, r, name)).map(EntityRef::Char))
                .or_else(|| here.and_then(|r| get_obj_in_room(world, r, name)).map(EntityRef::Obj))
                .or_else(|| here.and_then(|r| get_vehicle_in_room(world, r, name)).map(EntityRef::Vehicle))
                .or_else(|| get_char(world, name).map(EntityRef::Char))
                .or_else(|| get_obj(world, name).map(EntityRef::Obj))
                .or_else(|| get_room(world, here, name).map(EntityRef::Room))
        }
        (AttachType::Obj, EntityRef::Obj(me)) => get_char_by_obj(world, me, name)
            .map(EntityRef::Char)
            .or_else(|| get_obj_by_obj(world, me, name).map(EntityRef::Obj))
            .or_else(|| here.and_then(|r| get_vehicle_in_room(world, r, name)).map(EntityRef::Vehicle))
            .or_else(|| get_room(world, here, name).map(EntityRef::Room))
            .or(Some(EntityRef::Obj(me))),
        (AttachType::Veh, EntityRef::Vehicle(me)) => {
            let inside = world.vehicle(me).map(|v| v.contents.clone()).unwrap_or_default();
            here.and_then(|r| get_char_in_room(world, r, name))
                .or_else(|| get_char(world, name))
                .map(EntityRef::Char)
                .or_else(|| get_obj_in_list(world, name, &inside).map(EntityRef::Obj))
                .or_else(|| here.and_then(|r| get_obj_by_room(world, r, name)).map(EntityRef::Obj))
                .or_else(|| here.and_then(|r| get_vehicle_in_room(world, r, name)).map(EntityRef::Vehicle))
                .or_else(|| get_room(world, here, name).map(EntityRef::Room))
        }
        (_, owner) => {
            let room = here.or_else(|| owner.as_room())?;
            get_char_by_room(world, room, name)
                .map(EntityRef::Char)
                .or_else(|| get_obj_by_room(world, room, name).map(EntityRef::Obj))
                .or_else(|| get_vehicle_in_room(world, room, name).map(EntityRef::Vehicle))
                .or_else(|| get_room(world, Some(room), name).map(EntityRef::Room))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use empire_world::character::LVL_TOP;

    #[test]
    fn hidden_immortals_are_not_targets() {
        let mut god = Character::new_player(9, "Zeus", 100);
        assert!(valid_dg_target(&god, false));
        god.access_level = LVL_TOP;
        god.prefs |= Preferences::NOHASSLE;
        assert!(valid_dg_target(&god, true));
        assert!(!valid_dg_target(&god, false));
        god.access_level = LVL_START_IMM;
        god.prefs |= Preferences::WIZHIDE;
        assert!(!valid_dg_target(&god, true));
    }

    #[test]
    fn uid_arguments_ignore_trailing_text() {
        assert_eq!(uid_arg("}42"), Some(Uid(42)));
        assert_eq!(uid_arg("}42abc"), Some(Uid(42)));
        assert_eq!(uid_arg("42"), None);
    }

    #[test]
    fn rooms_by_vnum_id_and_template() {
        let fx = Fixture::new();
        let square = fx.square;
        assert_eq!(get_room(&fx.world, None, &square.to_string()), Some(square));
        assert_eq!(get_room(&fx.world, None, &Uid::room(square).to_string()), Some(square));
        assert_eq!(get_room(&fx.world, None, "square"), None);
        assert_eq!(get_room(&fx.world, None, "99999"), None);
    }

    #[test]
    fn mob_finds_room_occupants_by_keyword() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let found = resolve_target(&fx.world, &ex, "traveler");
        assert_eq!(found, Some(EntityRef::Char(fx.player)));
        assert_eq!(resolve_target(&fx.world, &ex, "nosuchthing"), None);
    }

    #[test]
    fn object_owner_falls_back_to_itself() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_obj(&["nop"]);
        assert_eq!(resolve_target(&fx.world, &ex, "nosuchthing"), Some(ex.owner));
    }
}
