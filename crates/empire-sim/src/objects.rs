//! Item upkeep: drifting on water, decay timers, stray embers and
//! autostore.

use empire_script::timer_otrigger;
use empire_types::{BuildingFlags, ObjFlags, SectorFlags, UNLIMITED, VehicleFlags};
use empire_world::time::SECS_PER_REAL_MIN;
use empire_world::{
    ActArg, ActTo, EmpireVnum, EntityRef, ObjId, ObjLocation, Relation, RoomVnum, World,
};

use crate::vehicles::start_vehicle_burning;

/// The five-second update for an object: a lit fire-starter on the floor
/// of a building may set it alight.
pub fn real_update_obj(world: &mut World, obj: ObjId) {
    let Some(o) = world.obj(obj) else {
        return;
    };
    if !o.is_lit() || !o.lights_fire {
        return;
    }
    let last_empire = o.last_empire;
    let Some(room) = o.in_room() else {
        return;
    };
    let Some(r) = world.room(room) else {
        return;
    };
    if r.building.is_none() && r.in_vehicle.is_none() {
        return;
    }
    let (interior_of, home) = (r.in_vehicle, r.home_room.unwrap_or(room));

    if let Some(veh) = interior_of {
        let Some(v) = world.vehicle(veh) else {
            return;
        };
        if !v.flags.contains(VehicleFlags::BURNABLE) || v.on_fire() {
            return;
        }
        if !ember_may_ignite(world, last_empire, v.owner) {
            return;
        }
        world.act_room(room, "A stray ember from $p ignites $V!", Some(obj), Some(ActArg::Vehicle(veh)));
        start_vehicle_burning(world, veh);
        log::info!("vehicle {} set alight by object {}", veh.index(), o_uid(world, obj));
        return;
    }

    let Some(h) = world.room(home) else {
        return;
    };
    if !h.bld_flagged(BuildingFlags::BURNABLE) || h.burning {
        return;
    }
    if !ember_may_ignite(world, last_empire, h.owner) {
        return;
    }
    world.act_room(room, "A stray ember from $p ignites the room!", Some(obj), None);
    if let Some(h) = world.room_mut(home) {
        h.burning = true;
    }
    log::info!("room {home} set alight by object {}", o_uid(world, obj));
}

fn o_uid(world: &World, obj: ObjId) -> u32 {
    world.obj(obj).map_or(0, |o| o.uid.0)
}

/// Only an item last held by an empire at war with the owner can set
/// owned property alight. Unowned property burns from anything.
fn ember_may_ignite(world: &World, last_empire: Option<EmpireVnum>, owner: Option<EmpireVnum>) -> bool {
    let Some(owner) = owner else {
        return true;
    };
    let Some(enemy) = last_empire.and_then(|e| world.empire(e)) else {
        return false;
    };
    enemy.relation(owner) == Some(Relation::War)
}

/// The hourly update for an object. Returns false if it is gone afterward.
pub fn point_update_obj(world: &mut World, obj: ObjId) -> bool {
    if !float_or_sink(world, obj) {
        return false;
    }
    if !tick_obj_timer(world, obj) {
        return false;
    }
    let now = world.now();
    let due = world
        .obj(obj)
        .is_some_and(|o| o.autostore_timer + autostore_secs(world) < now);
    if due {
        return check_autostore(world, obj, false, None);
    }
    true
}

fn autostore_secs(world: &World) -> u64 {
    world.config.autostore_time.max(0) as u64 * SECS_PER_REAL_MIN
}

/// Loose items on water drift west or sink. Returns false if it sank.
fn float_or_sink(world: &mut World, obj: ObjId) -> bool {
    let Some(o) = world.obj(obj) else {
        return false;
    };
    let Some(room) = o.in_room() else {
        return true;
    };
    if !o.can_take {
        return true;
    }
    let on_water = world
        .room(room)
        .is_some_and(|r| r.sector.intersects(SectorFlags::FRESH_WATER | SectorFlags::OCEAN));
    if !on_water {
        return true;
    }

    let west = o
        .material
        .floats()
        .then(|| world.real_shift(room, -1, 0))
        .flatten();
    let Some(to_room) = west else {
        world.act_room(room, "$p sinks quickly to the bottom.", Some(obj), None);
        world.extract_obj(obj);
        return false;
    };

    let open_water = world
        .room(to_room)
        .is_some_and(|r| !r.sector.contains(SectorFlags::ROUGH) && !r.closed);
    if world.rng.number(0, 2) == 0 && open_water {
        world.act_room(room, "$p floats west.", Some(obj), None);
        let stamp = world.obj(obj).map_or(0, |o| o.autostore_timer);
        world.obj_to_room(obj, to_room);
        if let Some(o) = world.obj_mut(obj) {
            o.autostore_timer = stamp;
        }
        world.act_room(to_room, "$p floats in from the east.", Some(obj), None);
    }
    true
}

/// Counts an object's decay timer down one game hour. When it runs out the
/// object's timer triggers get a say, then it spoils or decays. Returns
/// false if the object is gone.
pub fn tick_obj_timer(world: &mut World, obj: ObjId) -> bool {
    let Some(o) = world.obj_mut(obj) else {
        return false;
    };
    if o.timer <= 0 {
        return true;
    }
    o.timer -= 1;
    if o.timer > 0 {
        return true;
    }

    let before = world.obj_room(obj);
    match timer_otrigger(world, obj) {
        -1 => return false,
        0 => return true,
        _ if world.obj_room(obj) != before => return true,
        _ => {}
    }
    let Some(o) = world.obj(obj) else {
        return false;
    };
    let holder = o.carried_by().or_else(|| o.worn_by());
    let room = o.in_room();

    if o.is_drink_container() {
        let single_use = o.flags.contains(ObjFlags::SINGLE_USE);
        if o.values[1] > 0 || single_use {
            let to_char = o
                .decay_on_char
                .clone()
                .unwrap_or_else(|| "$p has gone bad and you pour it out.".to_string());
            let to_room = o.decay_in_room.clone().unwrap_or_else(|| "$p has gone bad.".to_string());
            announce_decay(world, obj, holder, room, &to_char, &to_room);
        }
        if let Some(o) = world.obj_mut(obj) {
            o.values[1] = 0;
            o.values[2] = 0;
            o.timer = i32::from(UNLIMITED);
        }
        world.request_save(EntityRef::Obj(obj));
        if single_use {
            empty_obj_before_extract(world, obj);
            world.extract_obj(obj);
            return false;
        }
        return true;
    }

    let to_char = o
        .decay_on_char
        .clone()
        .or_else(|| o.material.decay_on_char().map(str::to_string))
        .unwrap_or_else(|| "$p disintegrates in your hands.".to_string());
    let to_room = o
        .decay_in_room
        .clone()
        .or_else(|| o.material.decay_in_room().map(str::to_string))
        .unwrap_or_else(|| "$p disintegrates and falls apart.".to_string());
    announce_decay(world, obj, holder, room, &to_char, &to_room);
    log::debug!("object {} decayed", o_uid(world, obj));
    empty_obj_before_extract(world, obj);
    world.extract_obj(obj);
    false
}

fn announce_decay(
    world: &mut World,
    obj: ObjId,
    holder: Option<empire_world::CharId>,
    room: Option<RoomVnum>,
    to_char: &str,
    to_room: &str,
) {
    if let Some(ch) = holder {
        world.act(to_char, Some(ch), Some(obj), None, ActTo::Char);
    } else if let Some(room) = room {
        world.act_room(room, to_room, Some(obj), None);
    }
}

/// Moves an object's contents to wherever the object itself is.
pub fn empty_obj_before_extract(world: &mut World, obj: ObjId) {
    let Some(o) = world.obj(obj) else {
        return;
    };
    let location = o.location;
    for inner in o.contents.clone() {
        match location {
            ObjLocation::InObj(parent) => world.obj_to_obj(inner, parent),
            ObjLocation::CarriedBy(ch) | ObjLocation::WornBy(ch, _) => world.obj_to_char(inner, ch),
            ObjLocation::Room(room) => world.obj_to_room(inner, room),
            ObjLocation::InVehicle(_) | ObjLocation::Nowhere => world.extract_obj(inner),
        }
    }
}

/// Stores an unattended object into its owner's empire or junks it.
/// `force` skips the timers and the players-present check, and is how a
/// vehicle's contents get stored; `override_emp` names the owner outright.
/// Returns true if the object is still around.
pub fn check_autostore(world: &mut World, obj: ObjId, force: bool, override_emp: Option<EmpireVnum>) -> bool {
    let top = world.top_object(obj);
    let Some(t) = world.obj(top) else {
        return false;
    };
    if t.carried_by().is_some() || t.worn_by().is_some() {
        return true;
    }
    let Some(o) = world.obj(obj) else {
        return false;
    };
    if !o.can_take && !o.can_store {
        return true;
    }
    if matches!(o.location, ObjLocation::Nowhere) {
        return true;
    }
    if o.in_vehicle().is_some() && !force {
        return true;
    }

    let in_veh = t.in_vehicle();
    let mut real_loc = match in_veh {
        Some(v) => world.vehicle(v).and_then(|v| v.in_room),
        None => t.in_room(),
    };
    // climb out of vehicle interiors until something owns the room
    while let Some(r) = real_loc.and_then(|r| world.room(r)) {
        let outer = r
            .owner
            .is_none()
            .then_some(r.in_vehicle)
            .flatten()
            .and_then(|v| world.vehicle(v))
            .and_then(|v| v.in_room);
        match outer {
            Some(next) if Some(next) != real_loc => real_loc = Some(next),
            _ => break,
        }
    }

    let home_of = |room: RoomVnum| {
        world
            .room(room)
            .map(|r| r.home_room.unwrap_or(room))
            .and_then(|h| world.room(h))
    };
    let home_idnum = in_veh
        .and_then(|v| world.vehicle(v))
        .and_then(|v| v.interior_home)
        .and_then(|h| world.room(h))
        .and_then(|h| h.private_owner)
        .or_else(|| real_loc.and_then(home_of).and_then(|h| h.private_owner));
    let is_home = home_idnum.is_some();

    let mut emp = override_emp;
    if emp.is_none() {
        if let Some(v) = in_veh.and_then(|v| world.vehicle(v)) {
            emp = v
                .owner
                .or_else(|| v.in_room.and_then(|r| world.room(r)).and_then(|r| r.owner));
        }
    }
    if emp.is_none() {
        emp = real_loc.and_then(home_of).and_then(|h| h.owner);
    }

    if in_veh.is_some() && !force {
        return true;
    }
    if in_veh.is_none() && real_loc.and_then(|r| world.room(r)).is_none_or(|r| r.is_adventure()) {
        return true;
    }
    if !force && real_loc.is_some_and(|r| world.any_players_in_room(r)) {
        return true;
    }

    let now = world.now();
    let junk_after = world.config.bound_item_junk_time.max(0) as u64 * SECS_PER_REAL_MIN;
    let mut unique = false;
    let store = if o.flags.intersects(ObjFlags::JUNK | ObjFlags::UNCOLLECTED_LOOT) {
        true
    } else if o.can_store || o.is_coins() || emp.is_none() {
        true
    } else if o.flags.contains(ObjFlags::NO_AUTOSTORE) {
        false
    } else if is_home && o.unique_storable && home_idnum.is_some_and(|id| o.bind_ok(id)) {
        unique = true;
        true
    } else if !is_home && o.unique_storable {
        unique = true;
        true
    } else if !o.bound_to.is_empty() && !is_home {
        o.autostore_timer + junk_after < now
    } else {
        is_home
    };
    if !store {
        return true;
    }

    let long_wait = world.config.long_autostore_time.max(0) as u64 * SECS_PER_REAL_MIN;
    let long_room = real_loc
        .and_then(|r| world.room(r))
        .is_some_and(|r| r.bld_flagged(BuildingFlags::LONG_AUTOSTORE));
    if !force && long_room && o.autostore_timer + long_wait > now {
        return true;
    }

    let vnum = o.vnum;
    let coins = o.is_coins().then(|| o.coins_amount());
    let can_store = o.can_store;
    let island = real_loc.and_then(|r| world.room(r)).and_then(|r| r.island);

    empty_obj_before_extract(world, obj);

    if let Some(emp) = emp {
        if let Some(amount) = coins {
            if let Some(e) = world.empires.get_mut(&emp) {
                e.coins += i64::from(amount);
            }
        } else if unique && is_home {
            let owner = home_idnum.and_then(|id| world.find_player(id));
            if let Some(ch) = owner.and_then(|ch| world.char_mut(ch)) {
                ch.home_storage.push(vnum);
                log::debug!("object {vnum} moved to {}'s home storage", ch.name());
                world.extract_obj(obj);
                return false;
            }
        } else if unique {
            if let Some(e) = world.empires.get_mut(&emp) {
                e.unique_storage.push(vnum);
            }
        } else if can_store {
            if let Some(e) = world.empires.get_mut(&emp) {
                match island.or(e.main_island) {
                    Some(isle) => e.add_storage(isle, vnum, 1),
                    None => log::warn!("empire {emp} has nowhere to store object {vnum}"),
                }
            }
        }
    }

    world.extract_obj(obj);
    false
}
