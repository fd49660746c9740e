//! Entry points the game calls when something may fire a trigger.

use empire_types::{AffFlags, Direction, MobTriggers, ObjTriggers, VehTriggers, WldTriggers};
use empire_world::{CharId, EntityRef, ObjId, RoomVnum, TrigId, Uid, Value, World};

use crate::driver::{DriverResult, Mode, script_driver};
use crate::lookup::{can_see, valid_dg_target};

/// Map tiles a player may be from a random trigger for it to run.
pub const PLAYER_SCRIPT_RADIUS: i32 = 25;

fn has_types(world: &World, owner: EntityRef, bits: u32) -> bool {
    world.script(owner).is_some_and(|sc| sc.has_type(bits))
}

/// Idle triggers on `owner` carrying any of `bits`, in attach order.
fn candidates(world: &World, owner: EntityRef, bits: u32) -> Vec<TrigId> {
    world.script(owner).map_or_else(Vec::new, |sc| sc.triggers_with(bits))
}

/// Whether `trig` is still attached, idle and wins its `narg` percent roll.
fn ready(world: &mut World, owner: EntityRef, trig: TrigId, roll: bool) -> bool {
    let Some(narg) = world
        .trigger(owner, trig)
        .filter(|t| !t.is_running())
        .map(|t| t.proto.narg)
    else {
        return false;
    };
    !roll || world.rng.number(1, 100) <= narg
}

fn add_var(world: &mut World, owner: EntityRef, trig: TrigId, name: &str, value: Value) {
    if let Some(t) = world.trigger_mut(owner, trig) {
        // names here never contain a dot
        let _ = t.vars.set(name, value, 0);
    }
}

fn run(world: &mut World, owner: EntityRef, trig: TrigId) -> DriverResult {
    script_driver(world, owner, trig, Mode::New)
}

fn charmed(world: &World, ch: CharId) -> bool {
    world.char(ch).is_some_and(|c| c.aff_flagged(AffFlags::CHARM))
}

/// Mobs in `actor`'s room greet it. `dir` is the way the actor came in.
/// Returns false if any greet trigger returned 0, which blocks the move.
pub fn greet_mtrigger(world: &mut World, actor: CharId, dir: Option<Direction>) -> bool {
    let greet = MobTriggers::GREET.bits();
    let greet_all = MobTriggers::GREET_ALL.bits();
    let Some(a) = world.char(actor) else {
        return true;
    };
    if !valid_dg_target(a, true) {
        return true;
    }
    let sneaking = a.aff_flagged(AffFlags::SNEAK);
    let Some(room) = a.in_room else {
        return true;
    };
    let Some(actor_uid) = world.uid_of(EntityRef::Char(actor)) else {
        return true;
    };
    let direction = dir.map_or("none", |d| d.reverse().name());

    let mut allowed = true;
    let people = world.room(room).map(|r| r.people.clone()).unwrap_or_default();
    for ch in people {
        let owner = EntityRef::Char(ch);
        if ch == actor || !has_types(world, owner, greet | greet_all) || charmed(world, ch) {
            continue;
        }
        let busy = world.char(ch).is_none_or(|c| !c.is_awake() || c.fighting.is_some());
        if !has_types(world, owner, greet_all) && (busy || sneaking) {
            continue;
        }
        for trig in candidates(world, owner, greet | greet_all) {
            let fits = world.trigger(owner, trig).is_some_and(|t| {
                t.has_type(greet_all) || (t.has_type(greet) && can_see(world, ch, actor))
            });
            if !fits || !ready(world, owner, trig, true) {
                continue;
            }
            add_var(world, owner, trig, "direction", Value::from(direction));
            add_var(world, owner, trig, "actor", Value::Uid(actor_uid));
            let result = run(world, owner, trig);
            if result.ret_val == 0 {
                allowed = false;
            }
            if result.owner_purged {
                break;
            }
        }
    }
    allowed
}

/// A mob arrives in a room. The first entry trigger that fires decides.
pub fn entry_mtrigger(world: &mut World, ch: CharId) -> i32 {
    let owner = EntityRef::Char(ch);
    let bits = MobTriggers::ENTRY.bits();
    if !has_types(world, owner, bits) || charmed(world, ch) {
        return 1;
    }
    for trig in candidates(world, owner, bits) {
        if ready(world, owner, trig, true) {
            return run(world, owner, trig).ret_val;
        }
    }
    1
}

pub fn load_mtrigger(world: &mut World, ch: CharId) {
    let owner = EntityRef::Char(ch);
    let bits = MobTriggers::LOAD.bits();
    for trig in candidates(world, owner, bits) {
        if ready(world, owner, trig, true) {
            run(world, owner, trig);
            break;
        }
    }
}

pub fn load_otrigger(world: &mut World, obj: ObjId) {
    let owner = EntityRef::Obj(obj);
    let bits = ObjTriggers::LOAD.bits();
    for trig in candidates(world, owner, bits) {
        if ready(world, owner, trig, true) {
            run(world, owner, trig);
            break;
        }
    }
}

/// An object's timer ran out. -1: the object purged itself. 0: a trigger
/// returned 0, so the expiry is cancelled. 1: carry on.
pub fn timer_otrigger(world: &mut World, obj: ObjId) -> i32 {
    let owner = EntityRef::Obj(obj);
    let bits = ObjTriggers::TIMER.bits();
    for trig in candidates(world, owner, bits) {
        if !ready(world, owner, trig, false) {
            continue;
        }
        let result = run(world, owner, trig);
        if result.owner_purged || !world.is_alive(owner) {
            return -1;
        }
        if result.ret_val == 0 {
            return 0;
        }
    }
    1
}

pub fn reset_wtrigger(world: &mut World, room: RoomVnum) {
    let owner = EntityRef::Room(room);
    let bits = WldTriggers::RESET.bits();
    for trig in candidates(world, owner, bits) {
        if ready(world, owner, trig, true) {
            add_var(world, owner, trig, "room", Value::Uid(Uid::room(room)));
            run(world, owner, trig);
            break;
        }
    }
}

/// Runs random triggers on `owner` until one returns non-zero.
fn random_on(world: &mut World, owner: EntityRef, bits: u32) {
    for trig in candidates(world, owner, bits) {
        if !ready(world, owner, trig, true) {
            continue;
        }
        if let EntityRef::Room(room) = owner {
            add_var(world, owner, trig, "room", Value::Uid(Uid::room(room)));
        }
        let result = run(world, owner, trig);
        if result.owner_purged || result.ret_val != 0 {
            break;
        }
    }
}

/// A random trigger on something in `room` runs when it is marked global
/// or a player is close enough to notice.
fn wants_random(world: &World, owner: EntityRef, random: u32, global: u32) -> bool {
    if !has_types(world, owner, random) {
        return false;
    }
    has_types(world, owner, global)
        || world
            .entity_room(owner)
            .is_some_and(|room| world.distance_to_nearest_player(room) <= PLAYER_SCRIPT_RADIUS)
}

/// One pass of random triggers over every mob, object, room and vehicle.
pub fn random_triggers(world: &mut World) {
    let mobs: Vec<CharId> = world
        .chars
        .iter()
        .filter(|(_, c)| c.script.is_some())
        .map(|(id, _)| id)
        .collect();
    let (random, global) = (MobTriggers::RANDOM.bits(), MobTriggers::GLOBAL.bits());
    for ch in mobs {
        let owner = EntityRef::Char(ch);
        if wants_random(world, owner, random, global) && !charmed(world, ch) {
            random_on(world, owner, random);
        }
    }

    let objs: Vec<ObjId> = world
        .objs
        .iter()
        .filter(|(_, o)| o.script.is_some())
        .map(|(id, _)| id)
        .collect();
    for obj in objs {
        let owner = EntityRef::Obj(obj);
        if has_types(world, owner, ObjTriggers::RANDOM.bits()) {
            random_on(world, owner, ObjTriggers::RANDOM.bits());
        }
    }

    let rooms: Vec<RoomVnum> = world
        .rooms
        .iter()
        .filter(|(_, r)| r.script.is_some())
        .map(|(&vnum, _)| vnum)
        .collect();
    let (random, global) = (WldTriggers::RANDOM.bits(), WldTriggers::GLOBAL.bits());
    for room in rooms {
        let owner = EntityRef::Room(room);
        if wants_random(world, owner, random, global) {
            random_on(world, owner, random);
        }
    }

    let vehicles: Vec<_> = world
        .vehicles
        .iter()
        .filter(|(_, v)| v.script.is_some())
        .map(|(id, _)| id)
        .collect();
    let (random, global) = (VehTriggers::RANDOM.bits(), VehTriggers::GLOBAL.bits());
    for veh in vehicles {
        let owner = EntityRef::Vehicle(veh);
        if wants_random(world, owner, random, global) {
            random_on(world, owner, random);
        }
    }
}

/// A `wait` finished. Owners that are gone were already cleaned up when
/// they were extracted, so a missing trigger is not an error.
pub fn trigger_wait_resume(world: &mut World, owner: EntityRef, trig: TrigId) {
    if world.trigger(owner, trig).is_none() {
        log::debug!(target: "script", "wait resumed on a detached trigger");
        return;
    }
    script_driver(world, owner, trig, Mode::Restart);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use empire_types::AttachType;

    #[test]
    fn greet_sets_actor_and_direction() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["msend %actor% You came from the %direction%."]);
        fx.set_types(&ex, MobTriggers::GREET.bits(), 100);
        assert!(greet_mtrigger(&mut fx.world, fx.player, Some(Direction::North)));
        let out = fx.world.char(fx.player).map(|c| c.output.clone()).unwrap_or_default();
        assert_eq!(out, vec!["You came from the south."]);
        // locals are gone once the run is over
        assert!(fx.world.trigger(ex.owner, ex.trig).is_some_and(|t| t.vars.is_empty()));
    }

    #[test]
    fn greet_returning_zero_blocks() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["return 0"]);
        fx.set_types(&ex, MobTriggers::GREET_ALL.bits(), 100);
        assert!(!greet_mtrigger(&mut fx.world, fx.player, None));
    }

    #[test]
    fn zero_percent_never_fires() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["return 0"]);
        fx.set_types(&ex, MobTriggers::GREET.bits(), 0);
        for _ in 0..20 {
            assert!(greet_mtrigger(&mut fx.world, fx.player, None));
        }
    }

    #[test]
    fn running_triggers_do_not_refire() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["msend %actor% hello", "wait 5"]);
        fx.set_types(&ex, MobTriggers::GREET.bits(), 100);
        greet_mtrigger(&mut fx.world, fx.player, None);
        greet_mtrigger(&mut fx.world, fx.player, None);
        let out = fx.world.char(fx.player).map(|c| c.output.len());
        assert_eq!(out, Some(1));
    }

    #[test]
    fn timer_results() {
        let mut fx = Fixture::new();
        let keep = fx.exec_on_obj(&["return 0"]);
        fx.set_types(&keep, ObjTriggers::TIMER.bits(), 100);
        let EntityRef::Obj(obj) = keep.owner else {
            panic!("object owner");
        };
        assert_eq!(timer_otrigger(&mut fx.world, obj), 0);

        let gone = fx.exec_on_obj(&["opurge"]);
        fx.set_types(&gone, ObjTriggers::TIMER.bits(), 100);
        let EntityRef::Obj(obj) = gone.owner else {
            panic!("object owner");
        };
        assert_eq!(timer_otrigger(&mut fx.world, obj), -1);
        assert!(fx.world.obj(obj).is_none());
    }

    #[test]
    fn reset_sees_its_room() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_room(&["wecho %room.name% resets."]);
        fx.set_types(&ex, WldTriggers::RESET.bits(), 100);
        reset_wtrigger(&mut fx.world, fx.square);
        let out = fx.world.char(fx.player).map(|c| c.output.clone()).unwrap_or_default();
        assert_eq!(out, vec!["Town Square resets."]);
    }

    #[test]
    fn random_needs_a_nearby_player_or_global() {
        let mut fx = Fixture::new();
        fx.add_proto(700, AttachType::Wld, WldTriggers::RANDOM.bits(), &["set ran 1", "global ran"]);
        fx.world.attach_trigger(EntityRef::Room(9007), 700).expect("attach");
        let ran = |fx: &Fixture| {
            fx.world
                .script(EntityRef::Room(9007))
                .is_some_and(|sc| sc.global_vars.find_any("ran").is_some())
        };
        fx.world.char_mut(fx.player).expect("player").connected = false;
        random_triggers(&mut fx.world);
        assert!(!ran(&fx));

        fx.world.char_mut(fx.player).expect("player").connected = true;
        random_triggers(&mut fx.world);
        assert!(ran(&fx));
    }

    #[test]
    fn wait_resume_finishes_the_script() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["wait 1", "mecho done"]);
        script_driver(&mut fx.world, ex.owner, ex.trig, Mode::New);
        assert!(fx.world.trigger(ex.owner, ex.trig).is_some_and(|t| t.is_running()));
        trigger_wait_resume(&mut fx.world, ex.owner, ex.trig);
        assert!(fx.world.trigger(ex.owner, ex.trig).is_some_and(|t| !t.is_running()));
        let out = fx.world.char(fx.player).map(|c| c.output.clone()).unwrap_or_default();
        assert_eq!(out, vec!["done"]);
    }
}
