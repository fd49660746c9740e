//! Hourly vehicle upkeep: autostoring abandoned cargo and burning.

use empire_types::VehicleFlags;
use empire_world::time::SECS_PER_REAL_MIN;
use empire_world::{ActArg, VehId, World};

use crate::objects::check_autostore;

/// The hourly update for a vehicle. Returns false if it burned away.
pub fn point_update_vehicle(world: &mut World, veh: VehId) -> bool {
    let now = world.now();
    let idle_limit = world.config.autostore_time.max(0) as u64 * SECS_PER_REAL_MIN;
    let Some(v) = world.vehicle(veh) else {
        return false;
    };
    if now.saturating_sub(v.last_move_time) > idle_limit {
        autostore_vehicle_contents(world, veh);
    }

    let Some(v) = world.vehicle(veh) else {
        return false;
    };
    if !v.on_fire() {
        return true;
    }
    let damage = (v.max_health / 12).max(1);
    if let Some(room) = v.in_room {
        world.act_room(room, "The flames roar as they envelop $V!", None, Some(ActArg::Vehicle(veh)));
    }
    burn_vehicle(world, veh, damage)
}

/// Applies fire damage. Returns false if the vehicle was destroyed.
fn burn_vehicle(world: &mut World, veh: VehId, damage: i32) -> bool {
    let Some(v) = world.vehicle_mut(veh) else {
        return false;
    };
    v.health -= damage;
    if v.health > 0 {
        return true;
    }
    let room = v.in_room;
    if let Some(room) = room {
        world.act_room(room, "$V burns to the ground!", None, Some(ActArg::Vehicle(veh)));
    }
    log::info!("vehicle {} burned down", veh.index());
    world.extract_vehicle(veh);
    false
}

/// Stores or junks everything aboard unless a player is around to mind it.
pub fn autostore_vehicle_contents(world: &mut World, veh: VehId) {
    let Some(v) = world.vehicle(veh) else {
        return;
    };
    if v.in_room.is_some_and(|r| world.any_players_in_room(r)) {
        return;
    }
    let is_pc = |ch: Option<empire_world::CharId>| ch.and_then(|c| world.char(c)).is_some_and(|c| !c.is_npc);
    if is_pc(v.sitting_on) || is_pc(v.driver) || is_pc(v.led_by) {
        return;
    }
    if v.interior_rooms.iter().any(|&r| world.any_players_in_room(r)) {
        return;
    }
    let owner = v.owner;
    for obj in v.contents.clone() {
        check_autostore(world, obj, true, owner);
    }
}

/// Sets a vehicle alight.
pub fn start_vehicle_burning(world: &mut World, veh: VehId) {
    if let Some(v) = world.vehicle_mut(veh) {
        if v.flags.contains(VehicleFlags::BURNABLE) {
            v.flags.insert(VehicleFlags::ON_FIRE);
        }
    }
}
