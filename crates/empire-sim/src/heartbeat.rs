//! The heartbeat: one call per pulse runs due events and the fixed
//! cadences layered on top of them.

use empire_script::{random_triggers, reset_wtrigger, trigger_wait_resume};
use empire_world::time::{PULSE_REAL_UPDATE, PULSES_PER_MUD_HOUR, REAL_UPDATES_PER_MUD_HOUR, rl_sec};
use empire_world::{EventId, Reschedule, RoomVnum, World, WorldEvent};

use crate::affects::heal_over_time_event;
use crate::limits::{advance_daily_cycle, real_update_char};
use crate::mobact::run_mob_event;
use crate::objects::{point_update_obj, real_update_obj};
use crate::vehicles::point_update_vehicle;

/// Pulses between random-trigger passes, a little longer than a mob's
/// fastest action.
pub const PULSE_SCRIPT_CHECK: u64 = rl_sec(13);

/// Advances the world one pulse.
pub fn heartbeat(world: &mut World) {
    world.clock.pulse += 1;
    let pulse = world.pulse();

    run_due_events(world);

    if pulse % PULSE_SCRIPT_CHECK == 0 {
        random_triggers(world);
    }
    if pulse % PULSES_PER_MUD_HOUR == 0 {
        reset_rooms(world);
    }
    if pulse % PULSE_REAL_UPDATE == 0 {
        real_update(world);
    }
}

/// Runs `pulses` heartbeats back to back.
pub fn run_pulses(world: &mut World, pulses: u64) {
    for _ in 0..pulses {
        heartbeat(world);
    }
}

/// Fires every event due on the current pulse, including events that a
/// handler schedules for right now.
pub fn run_due_events(world: &mut World) {
    let pulse = world.pulse();
    while let Some((id, event)) = world.events.pop_due(pulse) {
        dispatch(world, id, event);
    }
}

fn dispatch(world: &mut World, id: EventId, event: WorldEvent) {
    match event {
        WorldEvent::TriggerWait { owner, trig } => trigger_wait_resume(world, owner, trig),
        WorldEvent::MobAi { mob, kind } => {
            let Reschedule::After(delay) = run_mob_event(world, mob, kind) else {
                return;
            };
            // a handler may have scheduled its own replacement
            let free = world
                .char(mob)
                .is_some_and(|m| m.mob_event(kind).is_none_or(|slot| slot == id));
            if free {
                let pulse = world.pulse();
                world.events.reinsert(id, pulse, delay, event);
                if let Some(m) = world.char_mut(mob) {
                    m.set_mob_event(kind, Some(id));
                }
            }
        }
        WorldEvent::HealOverTime { ch } => {
            let Reschedule::After(delay) = heal_over_time_event(world, ch) else {
                return;
            };
            let free = world
                .char(ch)
                .is_some_and(|c| c.heal_event.is_none_or(|slot| slot == id));
            if free {
                let pulse = world.pulse();
                world.events.reinsert(id, pulse, delay, event);
                if let Some(c) = world.char_mut(ch) {
                    c.heal_event = Some(id);
                }
            }
        }
    }
}

fn reset_rooms(world: &mut World) {
    let rooms: Vec<RoomVnum> = world
        .rooms
        .iter()
        .filter(|(_, r)| r.script.is_some())
        .map(|(&vnum, _)| vnum)
        .collect();
    for room in rooms {
        reset_wtrigger(world, room);
    }
}

/// The five-second update. Every character gets its real update; objects
/// and vehicles whose slot matches the rotating cycle get their hourly
/// point update, so each hour's work is spread over fifteen passes.
pub fn real_update(world: &mut World) {
    advance_daily_cycle(world);
    world.point_update_cycle = (world.point_update_cycle + 1) % REAL_UPDATES_PER_MUD_HOUR;
    let cycle = world.point_update_cycle;

    let mut chars = world.chars.sweep();
    while let Some(ch) = chars.next_live(&world.chars) {
        real_update_char(world, ch);
    }

    let mut objs = world.objs.sweep();
    while let Some(obj) = objs.next_live(&world.objs) {
        real_update_obj(world, obj);
        let due = world
            .obj(obj)
            .is_some_and(|o| u64::from(o.uid.0) % REAL_UPDATES_PER_MUD_HOUR == cycle);
        if due {
            point_update_obj(world, obj);
        }
    }

    let mut vehicles = world.vehicles.sweep();
    while let Some(veh) = vehicles.next_live(&world.vehicles) {
        let due = world
            .vehicle(veh)
            .is_some_and(|v| u64::from(v.vnum.unsigned_abs()) % REAL_UPDATES_PER_MUD_HOUR == cycle);
        if due {
            point_update_vehicle(world, veh);
        }
    }
    log::trace!("real update {cycle} done at pulse {}", world.pulse());
}
