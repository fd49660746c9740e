//! The mob AI event layer. Each behavior is its own scheduled event that
//! decides on every run whether to go again.

use empire_script::lookup::can_see;
use empire_script::{entry_mtrigger, greet_mtrigger};
use empire_types::{
    AffFlags, BuildingFlags, Direction, Injuries, ItemType, MobFlags, MoveType, NUM_2D_DIRS,
    Position, Preferences, SectorFlags,
};
use empire_world::character::{LVL_GOD, SEE_THROUGH_DISGUISE_LEVEL};
use empire_world::time::{SECS_PER_MUD_HOUR, SECS_PER_REAL_MIN, rl_sec};
use empire_world::{
    ActTo, CharId, EntityRef, MobEventKind, PursuitEntry, Reschedule, RoomVnum, World,
};

/// Seconds between pursuit steps.
pub const PURSUIT_INTERVAL_SECS: u64 = 5;

/// Base delay in pulses for one category, before jitter.
pub fn base_interval(world: &World, mob: CharId, kind: MobEventKind) -> u64 {
    let secs = |s: i32| rl_sec(s.max(1) as u64);
    match kind {
        MobEventKind::Aggro => secs(world.config.aggro_interval_secs),
        MobEventKind::Movement => secs(world.config.movement_interval_secs),
        MobEventKind::Pursuit => rl_sec(PURSUIT_INTERVAL_SECS),
        MobEventKind::Scavenge => secs(world.config.scavenge_interval_secs),
        MobEventKind::Despawn => despawn_interval(world, mob),
        MobEventKind::Reset => rl_sec(SECS_PER_MUD_HOUR),
    }
}

fn despawn_interval(world: &World, mob: CharId) -> u64 {
    let base = rl_sec(world.config.mob_despawn_interval.max(1) as u64 * SECS_PER_REAL_MIN);
    let stabled = world.char(mob).is_some_and(|m| {
        m.mob_flagged(MobFlags::ANIMAL)
            && m.in_room
                .and_then(|r| world.room(r))
                .is_some_and(|r| r.is_complete() && r.bld_flagged(BuildingFlags::STABLE))
    });
    if stabled {
        base * world.config.stable_despawn_multiplier.max(1) as u64
    } else {
        base
    }
}

fn jittered(world: &mut World, base: u64) -> u64 {
    base + world.rng.number(0, (base / 2) as i32).max(0) as u64
}

fn next_run(world: &mut World, mob: CharId, kind: MobEventKind) -> Reschedule {
    let base = base_interval(world, mob, kind);
    Reschedule::After(jittered(world, base))
}

/// Whether a category applies to this mob at all.
fn wants(world: &World, mob: CharId, kind: MobEventKind) -> bool {
    let Some(m) = world.char(mob) else {
        return false;
    };
    if !m.is_npc {
        return false;
    }
    match kind {
        MobEventKind::Aggro => m.mob_flagged(MobFlags::AGGRESSIVE | MobFlags::CITYGUARD),
        MobEventKind::Movement => !m.mob_flagged(MobFlags::SENTINEL),
        MobEventKind::Pursuit => {
            m.mob_flagged(MobFlags::PURSUE) && (!m.pursuit.is_empty() || m.pursuit_leash.is_some())
        }
        MobEventKind::Scavenge => m.mob_flagged(MobFlags::SCAVENGER),
        MobEventKind::Despawn => m.mob_flagged(MobFlags::SPAWNED),
        MobEventKind::Reset => m.points.health < m.points.max_health,
    }
}

/// Schedules every category that applies to `mob`, each with its own jitter.
pub fn schedule_all_mob_events(world: &mut World, mob: CharId) {
    use strum::IntoEnumIterator;
    for kind in MobEventKind::iter() {
        if wants(world, mob, kind) {
            let base = base_interval(world, mob, kind);
            let delay = jittered(world, base);
            world.schedule_mob_event(mob, kind, delay);
        }
    }
}

/// Starts the reset countdown for a hurt mob, unless one is running.
pub fn schedule_reset_mob(world: &mut World, mob: CharId) {
    if wants(world, mob, MobEventKind::Reset) {
        let delay = base_interval(world, mob, MobEventKind::Reset);
        world.schedule_mob_event(mob, MobEventKind::Reset, delay);
    }
}

/// Cancels and reschedules every despawn event, after the interval changes.
pub fn reschedule_all_despawns(world: &mut World) {
    let mobs: Vec<CharId> = world
        .chars
        .iter()
        .filter(|(_, c)| c.mob_flagged(MobFlags::SPAWNED))
        .map(|(id, _)| id)
        .collect();
    log::info!("rescheduling {} despawn events", mobs.len());
    for mob in mobs {
        world.cancel_mob_event(mob, MobEventKind::Despawn);
        let base = despawn_interval(world, mob);
        let delay = jittered(world, base);
        world.schedule_mob_event(mob, MobEventKind::Despawn, delay);
    }
}

/// Runs one AI event. The mob's slot for `kind` is cleared first, so the
/// handler is free to schedule a replacement.
pub fn run_mob_event(world: &mut World, mob: CharId, kind: MobEventKind) -> Reschedule {
    let Some(m) = world.char_mut(mob) else {
        return Reschedule::Done;
    };
    m.set_mob_event(kind, None);
    if !wants(world, mob, kind) {
        return Reschedule::Done;
    }

    match kind {
        MobEventKind::Despawn => return despawn_event(world, mob),
        MobEventKind::Reset => return reset_event(world, mob),
        _ => {}
    }
    if mob_is_busy(world, mob) {
        return next_run(world, mob, kind);
    }
    match kind {
        MobEventKind::Aggro => {
            if !check_aggro(world, mob) {
                check_cityguard(world, mob);
            }
        }
        MobEventKind::Movement => {
            let pursuing = world
                .char(mob)
                .is_some_and(|m| m.mob_flagged(MobFlags::PURSUE) && !m.pursuit.is_empty());
            if !pursuing && may_wander(world, mob) {
                try_mobile_movement(world, mob);
            }
        }
        MobEventKind::Pursuit => {
            run_pursuit(world, mob);
        }
        MobEventKind::Scavenge => {
            check_scavenge(world, mob);
        }
        MobEventKind::Despawn | MobEventKind::Reset => {}
    }
    if !world.chars.contains(mob) || !wants(world, mob, kind) {
        return Reschedule::Done;
    }
    next_run(world, mob, kind)
}

fn mob_is_busy(world: &World, mob: CharId) -> bool {
    let Some(m) = world.char(mob) else {
        return true;
    };
    m.fed_on_by.is_some()
        || m.is_dead()
        || m.aff_flagged(AffFlags::STUNNED)
        || m.fighting.is_some()
        || !m.is_awake()
        || m.aff_flagged(AffFlags::CHARM)
        || m.mob_flagged(MobFlags::TIED)
        || m.is_injured(Injuries::TIED)
        || m.led_by.is_some()
}

fn may_wander(world: &World, mob: CharId) -> bool {
    let Some(m) = world.char(mob) else {
        return false;
    };
    let master_here = m
        .master
        .and_then(|ms| world.char(ms))
        .is_some_and(|ms| ms.in_room == m.in_room);
    !m.aff_flagged(AffFlags::ENTANGLED) && m.position == Position::Standing && !master_here
}

// movement

/// Whether the terrain of `to_room` suits the way this mob gets around.
pub fn mob_can_move_to_sect(world: &World, mob: CharId, to_room: RoomVnum) -> bool {
    let (Some(m), Some(to)) = (world.char(mob), world.room(to_room)) else {
        return false;
    };
    let sect = to.sector;
    let move_type = m.move_type;
    let swimmer = matches!(move_type, MoveType::Swim | MoveType::Paddle);

    let mut ok = if sect.contains(SectorFlags::IS_ROAD)
        && !m.mob_flagged(MobFlags::AQUATIC)
        && move_type != MoveType::Swim
    {
        true
    } else if m.aff_flagged(AffFlags::FLY) {
        true
    } else if to.bld_flagged(BuildingFlags::NO_NPC) && to.is_complete() {
        false
    } else if sect.contains(SectorFlags::ROUGH) {
        move_type == MoveType::Climb || m.mob_flagged(MobFlags::MOUNTAINWALK)
    } else if sect.intersects(SectorFlags::FRESH_WATER | SectorFlags::OCEAN) {
        m.mob_flagged(MobFlags::AQUATIC) || swimmer
    } else {
        !swimmer
    };

    // open buildings only let animals in while unfinished
    if !m.mob_flagged(MobFlags::HUMAN)
        && sect.intersects(SectorFlags::MAP_BUILDING | SectorFlags::INSIDE)
        && (!to.bld_flagged(BuildingFlags::OPEN) || to.is_complete())
    {
        ok = false;
    }
    ok
}

/// Ownership and building rules for a mob entering `to_room`.
pub fn validate_mobile_move(world: &World, mob: CharId, to_room: RoomVnum) -> bool {
    let (Some(m), Some(to)) = (world.char(mob), world.room(to_room)) else {
        return false;
    };
    if to.no_mob || (to.is_complete() && to.bld_flagged(BuildingFlags::NO_NPC)) {
        return false;
    }
    if to.bld_flagged(BuildingFlags::BARRIER) && to.is_complete() {
        return false;
    }
    let Some(room_emp) = to.owner else {
        return true;
    };
    if !to.closed || m.loyalty == Some(room_emp) {
        return true;
    }
    let hostile = m
        .loyalty
        .zip(world.empire(room_emp))
        .is_some_and(|(mine, theirs)| theirs.is_hostile(mine));
    if !m.mob_flagged(MobFlags::AGGRESSIVE) && !hostile {
        return true;
    }
    if m.mob_flagged(MobFlags::AGGRESSIVE | MobFlags::CITYGUARD) {
        return !world.empire(room_emp).is_some_and(|e| e.has_locks);
    }
    false
}

/// Picks a random direction and wanders that way if the way is open.
/// Returns true if the mob moved.
pub fn try_mobile_movement(world: &mut World, mob: CharId) -> bool {
    let Some(m) = world.char(mob) else {
        return false;
    };
    let Some(was_in) = m.in_room else {
        return false;
    };
    let Some(here) = world.room(was_in) else {
        return false;
    };
    // animals stay put once indoors
    if m.mob_flagged(MobFlags::ANIMAL) && !here.is_adventure() && here.closed {
        return false;
    }
    let complex = here.building.is_some() || !here.is_map();
    let roll = world.rng.number(0, 40 / if complex { 2 } else { 1 });
    let Some(dir) = usize::try_from(roll)
        .ok()
        .filter(|&d| d < NUM_2D_DIRS)
        .and_then(|d| Direction::from_repr(d as u8))
    else {
        return false;
    };

    let Some(here) = world.room(was_in) else {
        return false;
    };
    let to_room = if !here.closed && !here.is_adventure() {
        let (dx, dy) = dir.shift();
        let inside = here.sector.contains(SectorFlags::INSIDE);
        let Some(to_room) = world.real_shift(was_in, dx, dy) else {
            return false;
        };
        let Some(to) = world.room(to_room) else {
            return false;
        };
        if !mob_can_move_to_sect(world, mob, to_room) || to.private_owner.is_some() {
            return false;
        }
        let unfinished = !to.bld_flagged(BuildingFlags::OPEN) && !to.is_complete();
        let wrong_side = !inside
            && to.closed
            && to.entrance != Some(dir)
            && (!to.bld_flagged(BuildingFlags::TWO_ENTRANCES) || to.entrance != Some(dir.reverse()));
        if unfinished || wrong_side {
            return false;
        }
        to_room
    } else if complex {
        match here.exit(dir) {
            Some(ex) if !ex.is_closed() => ex.to_room,
            _ => return false,
        }
    } else {
        return false;
    };

    if !validate_mobile_move(world, mob, to_room) {
        return false;
    }
    perform_move(world, mob, dir, to_room);
    world.char(mob).and_then(|m| m.in_room) != Some(was_in)
}

/// Walks a mob one room, with the usual messages and arrival triggers.
pub fn perform_move(world: &mut World, mob: CharId, dir: Direction, to_room: RoomVnum) {
    let sneaking = world.char(mob).is_some_and(|m| m.aff_flagged(AffFlags::SNEAK));
    if !sneaking {
        let msg = format!("$n leaves {}.", dir.name());
        world.act(&msg, Some(mob), None, None, ActTo::Room);
    }
    world.char_to_room(mob, to_room);
    if !sneaking {
        world.act("$n has arrived.", Some(mob), None, None, ActTo::Room);
    }
    if world.chars.contains(mob) {
        entry_mtrigger(world, mob);
    }
    if world.chars.contains(mob) {
        greet_mtrigger(world, mob, Some(dir));
    }
}

// pursuit

/// Remembers `target` so a pursuing mob can chase them. Any older entry
/// for the same player is replaced.
pub fn add_pursuit(world: &mut World, mob: CharId, target: CharId) {
    let now = world.now();
    let Some(t) = world.char(target) else {
        return;
    };
    if t.is_npc || t.is_immortal() {
        return;
    }
    let (idnum, disguise) = (t.idnum, t.disguise.clone());
    let Some(m) = world.char(mob) else {
        return;
    };
    if !m.is_npc {
        return;
    }
    let location = m
        .in_room
        .and_then(|r| world.room(r))
        .map(|r| r.home_room.unwrap_or(r.vnum));
    let Some(location) = location else {
        return;
    };
    if let Some(m) = world.char_mut(mob) {
        m.pursuit.retain(|p| p.idnum != idnum);
        m.pursuit.insert(
            0,
            PursuitEntry {
                idnum,
                last_seen: now,
                location,
                disguise,
            },
        );
    }
    if wants(world, mob, MobEventKind::Pursuit) {
        let delay = base_interval(world, mob, MobEventKind::Pursuit);
        world.schedule_mob_event(mob, MobEventKind::Pursuit, delay);
    }
}

/// Sends a mob that gave up a chase back to where it started.
pub fn return_to_pursuit_location(world: &mut World, mob: CharId) -> bool {
    let Some(m) = world.char(mob) else {
        return false;
    };
    if !m.is_npc
        || m.connected
        || m.fighting.is_some()
        || m.position < Position::Standing
        || m.aff_flagged(AffFlags::ENTANGLED)
    {
        return false;
    }
    let Some(leash) = m.pursuit_leash else {
        return false;
    };
    if world.room(leash).is_none() {
        if let Some(m) = world.char_mut(mob) {
            m.pursuit_leash = None;
        }
        return false;
    }
    world.act("$n goes back to where $e was.", Some(mob), None, None, ActTo::Room);
    world.char_to_room(mob, leash);
    world.act("$n returns to what $e was doing.", Some(mob), None, None, ActTo::Room);
    if let Some(m) = world.char_mut(mob) {
        m.pursuit_leash = None;
        m.pursuit.clear();
    }
    true
}

fn recognizes(mob_level: i32, entry: &PursuitEntry, disguise: Option<&String>) -> bool {
    mob_level >= SEE_THROUGH_DISGUISE_LEVEL || entry.disguise.as_ref() == disguise
}

/// One step of a chase: engage a quarry in the room, else follow their
/// tracks, else head straight for them across open map. A mob that cannot
/// make progress goes home.
fn run_pursuit(world: &mut World, mob: CharId) {
    let now = world.now();
    let timeout = world.config.mob_pursuit_timeout.max(0) as u64 * SECS_PER_REAL_MIN;
    let max_distance = world.config.mob_pursuit_distance;
    let Some(m) = world.char(mob) else {
        return;
    };
    let Some(here) = m.in_room else {
        return;
    };
    let level = m.level;
    let entries = m.pursuit.clone();
    if m.pursuit_leash.is_none() && !entries.is_empty() {
        if let Some(m) = world.char_mut(mob) {
            m.pursuit_leash = Some(here);
        }
    }

    let (live, stale): (Vec<PursuitEntry>, Vec<PursuitEntry>) = entries.into_iter().partition(|p| {
        now.saturating_sub(p.last_seen) <= timeout && world.compute_distance(here, p.location) <= max_distance
    });
    if !stale.is_empty() {
        log::debug!("mob {} dropped {} stale pursuits", mob.index(), stale.len());
        if let Some(m) = world.char_mut(mob) {
            m.pursuit.retain(|p| !stale.iter().any(|s| s.idnum == p.idnum));
        }
    }

    let mut step = None;
    for entry in &live {
        if let Some(vict) = quarry_in_room(world, mob, here, entry, level) {
            world.engage(mob, vict);
            return;
        }
        if let Some(track) = world
            .room(here)
            .and_then(|r| r.tracks.iter().find(|t| t.player_id == entry.idnum))
        {
            step = Some(track.dir);
            break;
        }
        if let Some(dir) = line_of_sight_step(world, mob, here, entry.idnum) {
            step = Some(dir);
            break;
        }
    }

    let mut moved = false;
    let entangled = world
        .char(mob)
        .is_none_or(|m| m.aff_flagged(AffFlags::CHARM | AffFlags::ENTANGLED));
    if let Some(dir) = step.filter(|_| !entangled) {
        if let Some(to_room) = destination(world, here, dir) {
            if validate_mobile_move(world, mob, to_room) {
                perform_move(world, mob, dir, to_room);
                moved = world.char(mob).and_then(|m| m.in_room) != Some(here);
            }
        }
    }

    if moved {
        let Some(now_in) = world.char(mob).and_then(|m| m.in_room) else {
            return;
        };
        for entry in &live {
            if let Some(vict) = quarry_in_room(world, mob, now_in, entry, level) {
                world.engage(mob, vict);
                return;
            }
        }
        return;
    }
    return_to_pursuit_location(world, mob);
}

fn quarry_in_room(
    world: &World,
    mob: CharId,
    room: RoomVnum,
    entry: &PursuitEntry,
    level: i32,
) -> Option<CharId> {
    world.room(room)?.people.iter().copied().find(|&v| {
        world.char(v).is_some_and(|c| {
            !c.is_npc
                && c.idnum == entry.idnum
                && recognizes(level, entry, c.disguise.as_ref())
                && can_see(world, mob, v)
                && can_fight(world, mob, v)
        })
    })
}

/// Outdoors and close by, a mob can head straight for a player it knows.
fn line_of_sight_step(world: &World, mob: CharId, here: RoomVnum, idnum: u32) -> Option<Direction> {
    let room = world.room(here)?;
    if room.closed || !room.is_map() {
        return None;
    }
    let target = world.char(world.find_player(idnum)?)?;
    if !target.connected {
        return None;
    }
    let target_room = target.in_room?;
    if !world.room(target_room)?.is_map()
        || world.compute_distance(here, target_room) > world.config.mob_pursuit_distance
    {
        return None;
    }
    let dir = world.direction_to(here, target_room)?;
    let to_room = destination(world, here, dir)?;
    mob_can_move_to_sect(world, mob, to_room).then_some(dir)
}

fn destination(world: &World, from: RoomVnum, dir: Direction) -> Option<RoomVnum> {
    let room = world.room(from)?;
    if room.is_map() && dir.is_map_dir() {
        let (dx, dy) = dir.shift();
        return world.real_shift(from, dx, dy);
    }
    room.exit(dir).filter(|ex| !ex.is_closed()).map(|ex| ex.to_room)
}

// aggression

fn can_fight(world: &World, ch: CharId, vict: CharId) -> bool {
    if ch == vict {
        return false;
    }
    let (Some(c), Some(v)) = (world.char(ch), world.char(vict)) else {
        return false;
    };
    c.in_room.is_some()
        && c.in_room == v.in_room
        && !v.is_dead()
        && !c.mob_flagged(MobFlags::NO_ATTACK)
        && !v.mob_flagged(MobFlags::NO_ATTACK)
        && !v.aff_flagged(AffFlags::NO_ATTACK)
}

fn can_aggro(world: &World, mob: CharId, vict: CharId) -> bool {
    let (Some(m), Some(v)) = (world.char(mob), world.char(vict)) else {
        return false;
    };
    !v.is_dead()
        && !v.nohassle()
        && (v.is_npc || !v.prefs.contains(Preferences::WIZHIDE))
        && !v.is_god()
        && can_see(world, mob, vict)
        && m.master != Some(vict)
        && !v.aff_flagged(
            AffFlags::IMMUNE_PHYSICAL
                | AffFlags::NO_TARGET_IN_ROOM
                | AffFlags::NO_SEE_IN_ROOM
                | AffFlags::NO_ATTACK,
        )
}

/// Majesty keeps mobs off unless they are immune to vampire powers.
fn majesty_holds(world: &World, mob: CharId, vict: CharId) -> bool {
    world.char(vict).is_some_and(|v| v.aff_flagged(AffFlags::MAJESTY))
        && !world.char(mob).is_some_and(|m| m.aff_flagged(AffFlags::IMMUNE_VAMPIRE))
}

fn attack(world: &mut World, mob: CharId, vict: CharId) {
    log::debug!("mob {} attacks {}", mob.index(), vict.index());
    world.engage(mob, vict);
    if world.char(mob).is_some_and(|m| m.mob_flagged(MobFlags::PURSUE)) {
        add_pursuit(world, mob, vict);
    }
}

/// An aggressive mob attacks the first fair target in its room.
pub fn check_aggro(world: &mut World, mob: CharId) -> bool {
    let Some(m) = world.char(mob) else {
        return false;
    };
    if !m.mob_flagged(MobFlags::AGGRESSIVE) {
        return false;
    }
    let faction = m.faction.clone();
    let Some(room) = m.in_room else {
        return false;
    };
    let people = world.room(room).map(|r| r.people.clone()).unwrap_or_default();
    for vict in people {
        if vict == mob {
            continue;
        }
        let Some(v) = world.char(vict) else {
            continue;
        };
        if !v.is_npc && !v.connected {
            continue;
        }
        let v_in_adventure = v.in_room.and_then(|r| world.room(r)).is_some_and(|r| r.is_adventure());
        if v.is_npc
            && (v_in_adventure || v.mob_flagged(MobFlags::AGGRESSIVE) || !v.mob_flagged(MobFlags::HUMAN))
        {
            continue;
        }
        if !can_aggro(world, mob, vict) || !can_fight(world, mob, vict) {
            continue;
        }
        if faction.as_ref().is_some_and(|f| v.liked_factions.contains(f)) {
            continue;
        }
        if majesty_holds(world, mob, vict) {
            continue;
        }
        attack(world, mob, vict);
        return true;
    }
    false
}

/// A city guard first helps its own people, then turns on intruders.
pub fn check_cityguard(world: &mut World, mob: CharId) -> bool {
    let now = world.now();
    let Some(m) = world.char(mob) else {
        return false;
    };
    let Some(chemp) = m.loyalty.filter(|_| m.mob_flagged(MobFlags::CITYGUARD)) else {
        return false;
    };
    let master = m.master;
    let Some(room) = m.in_room else {
        return false;
    };
    let people = world.room(room).map(|r| r.people.clone()).unwrap_or_default();

    for &vict in &people {
        let Some(v) = world.char(vict) else {
            continue;
        };
        let Some(targ) = v.fighting else {
            continue;
        };
        if vict == mob || targ == mob || master == Some(targ) {
            continue;
        }
        let Some(t) = world.char(targ) else {
            continue;
        };
        if !t.is_npc && t.access_level >= LVL_GOD {
            continue;
        }
        if !can_see(world, mob, targ) || !can_aggro(world, mob, vict) || v.loyalty != Some(chemp) {
            continue;
        }
        if (t.is_npc || t.loyalty != Some(chemp)) && can_fight(world, mob, targ) {
            attack(world, mob, targ);
            return true;
        }
    }

    let Some(emp) = world.empire(chemp) else {
        return false;
    };
    for &vict in &people {
        if vict == mob {
            continue;
        }
        let Some(v) = world.char(vict) else {
            continue;
        };
        let go = if !v.is_npc && v.connected {
            let victemp = v.loyalty;
            // a follower is judged by the group leader's allegiance
            let leader_loyalty = v
                .master
                .and_then(|ms| world.char(ms))
                .filter(|ms| !ms.is_npc && ms.in_room == v.in_room)
                .map_or(victemp, |ms| ms.loyalty);
            victemp != Some(chemp)
                && leader_loyalty != Some(chemp)
                && can_aggro(world, mob, vict)
                && !victemp.is_some_and(|e| emp.is_ally(e))
                && can_fight(world, mob, vict)
                && (v.hostile_until > now
                    || (v.disguise.is_none() && victemp.is_some_and(|e| emp.is_hostile(e))))
                && !majesty_holds(world, mob, vict)
        } else if v.is_npc && v.mob_flagged(MobFlags::AGGRESSIVE) && v.loyalty != Some(chemp) {
            can_fight(world, mob, vict)
        } else {
            v.is_npc && v.loyalty.is_some_and(|e| e != chemp && emp.is_hostile(e))
        };
        if go {
            attack(world, mob, vict);
            return true;
        }
    }
    false
}

// scavenging

/// Eats at most one corpse small enough to manage.
pub fn check_scavenge(world: &mut World, mob: CharId) -> bool {
    let Some(m) = world.char(mob) else {
        return false;
    };
    let size = m.size;
    let Some(room) = m.in_room else {
        return false;
    };
    let contents = world.room(room).map(|r| r.contents.clone()).unwrap_or_default();
    for obj in contents {
        let edible = world
            .obj(obj)
            .is_some_and(|o| o.item_type == ItemType::Corpse && o.corpse_size <= size);
        if edible && world.rng.number(0, 10) == 0 {
            world.act("$n eats $p.", Some(mob), Some(obj), None, ActTo::Room);
            crate::objects::empty_obj_before_extract(world, obj);
            world.extract_obj(obj);
            return true;
        }
    }
    false
}

// despawn and reset

fn despawn_event(world: &mut World, mob: CharId) -> Reschedule {
    let Some(m) = world.char(mob) else {
        return Reschedule::Done;
    };
    let entangled = m.led_by.is_some()
        || m.leading_mob.is_some()
        || m.leading_vehicle.is_some()
        || m.feeding_from.is_some()
        || m.fed_on_by.is_some();
    let near_player = m
        .in_room
        .is_none_or(|r| world.distance_to_nearest_player(r) <= world.config.mob_despawn_radius);
    if entangled || near_player {
        return next_run(world, mob, MobEventKind::Despawn);
    }
    log::debug!("despawning {}", m.name());
    despawn_mob(world, mob);
    Reschedule::Done
}

/// Removes a spawned mob along with everything it carries.
pub fn despawn_mob(world: &mut World, mob: CharId) {
    let Some(m) = world.char(mob) else {
        return;
    };
    if !m.is_npc {
        return;
    }
    let carried = m.carrying.clone();
    let worn: Vec<_> = m.equipment.iter().flatten().copied().collect();
    for obj in carried.into_iter().chain(worn) {
        world.extract_obj(obj);
    }
    world.extract_char(mob);
}

fn reset_event(world: &mut World, mob: CharId) -> Reschedule {
    let pulse = world.pulse();
    let interval = base_interval(world, mob, MobEventKind::Reset);
    let Some(m) = world.char_mut(mob) else {
        return Reschedule::Done;
    };
    if m.points.health >= m.points.max_health {
        return Reschedule::Done;
    }
    if m.fighting.is_some() || m.last_damaged + interval > pulse {
        return Reschedule::After(interval);
    }
    m.points.health = m.points.max_health;
    m.update_pos();
    m.tagged_by.clear();
    log::debug!("{} reset to full health", m.name());
    world.request_save(EntityRef::Char(mob));
    Reschedule::Done
}
