//! Regeneration, conditions and the per-character halves of the real and
//! point updates.

use empire_types::{
    AffFlags, BonusTraits, BuildingFlags, Condition, Injuries, MobFlags, Position, SectorFlags,
    UNLIMITED, WearPos,
};
use empire_world::character::MAX_CONDITION;
use empire_world::time::{REAL_UPDATES_PER_MUD_HOUR, SECS_PER_REAL_DAY, SECS_PER_REAL_MIN, SECS_PER_REAL_UPDATE};
use empire_world::{ActTo, AffectType, CharId, Character, EntityRef, World};

use crate::affects::{affect_from_char, affect_update, dot_update, expire_cooldowns};
use crate::mobact::despawn_mob;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pool {
    Health,
    Mana,
    Move,
}

/// Health regained per real update.
pub fn health_gain(world: &World, ch: CharId) -> i32 {
    world.char(ch).map_or(0, |c| regen(world, c, Pool::Health))
}

/// Mana regained per real update.
pub fn mana_gain(world: &World, ch: CharId) -> i32 {
    world.char(ch).map_or(0, |c| regen(world, c, Pool::Mana))
}

/// Movement regained per real update.
pub fn move_gain(world: &World, ch: CharId) -> i32 {
    world.char(ch).map_or(0, |c| regen(world, c, Pool::Move))
}

fn regen(world: &World, c: &Character, pool: Pool) -> i32 {
    if c.is_injured(Injuries::STAKED | Injuries::TIED) {
        return 0;
    }
    if pool == Pool::Health && (c.position == Position::Fighting || c.fighting.is_some()) {
        return 0;
    }
    let bonus = match pool {
        Pool::Health => c.extras.health_regen,
        Pool::Mana => c.extras.mana_regen,
        Pool::Move => c.extras.move_regen,
    };

    if c.is_npc {
        let gain = f64::from(c.level) / 10.0 + f64::from(bonus);
        return (gain as i32).max(0);
    }

    let mut gain = f64::from(c.position.regen() + bonus);
    let bonus_trait = match pool {
        Pool::Health => false,
        Pool::Mana => c.bonus_traits.contains(BonusTraits::MANA_REGEN),
        Pool::Move => c.bonus_traits.contains(BonusTraits::MOVE_REGEN),
    };
    if bonus_trait {
        gain += f64::from(1 + c.level / 20);
    }
    if c.position == Position::Sleeping && !c.aff_flagged(AffFlags::EARTHMELD) {
        let p = &c.points;
        let needed = match pool {
            Pool::Health => p.max_health + p.health_deficit,
            Pool::Mana => p.max_mana + p.mana_deficit,
            Pool::Move => p.max_move + p.move_deficit,
        };
        gain = gain.max(sleeping_minimum(world, c, needed));
    }
    if is_starving(world, c) {
        gain /= 4.0;
    }
    (gain as i32).max(0)
}

/// Per-update gain that fills `needed` within the configured sleeping time.
/// A finished bedroom halves that time.
fn sleeping_minimum(world: &World, c: &Character, needed: i32) -> f64 {
    let bedroom = c
        .in_room
        .and_then(|r| world.room(r))
        .is_some_and(|r| r.is_complete() && r.bld_flagged(BuildingFlags::BEDROOM));
    let full_time = f64::from(world.config.max_sleeping_regen_time) / if bedroom { 2.0 } else { 1.0 };
    let updates = full_time / SECS_PER_REAL_UPDATE as f64;
    if updates <= 0.0 {
        return f64::from(needed);
    }
    (f64::from(needed) / updates).round()
}

fn is_starving(world: &World, c: &Character) -> bool {
    c.is_hungry() || c.is_thirsty() || c.is_blood_starved(world.config.blood_starvation_level)
}

fn is_swimming(world: &World, c: &Character) -> bool {
    if c.is_immortal() || c.aff_flagged(AffFlags::FLY) || c.sitting_on.is_some() {
        return false;
    }
    c.in_room
        .and_then(|r| world.room(r))
        .is_some_and(|r| r.is_water() || r.sector.contains(SectorFlags::SHALLOW))
}

/// Moves one of `ch`'s conditions by `value`, warning them at most once a
/// real minute per condition.
pub fn gain_condition(world: &mut World, ch: CharId, cond: Condition, value: i16) {
    let now = world.now();
    let Some(c) = world.char(ch) else {
        return;
    };
    if c.is_npc || c.condition(cond) == UNLIMITED {
        return;
    }
    if value > 0 && cond == Condition::Thirst && c.bonus_traits.contains(BonusTraits::NO_THIRST) {
        return;
    }
    if value > 0 && cond == Condition::Full && c.bonus_traits.contains(BonusTraits::NO_HUNGER) {
        return;
    }
    let intoxicated = c.condition(Condition::Drunk) > 0;

    if let Some(c) = world.char_mut(ch) {
        let slot = &mut c.conditions[cond as usize];
        *slot = (i32::from(*slot) + i32::from(value)).clamp(0, i32::from(MAX_CONDITION)) as i16;
    }
    if value > 0 && world.char(ch).is_some_and(Character::is_hungry) {
        affect_from_char(world, ch, AffectType::WellFed, true);
    }

    let Some(c) = world.char_mut(ch) else {
        return;
    };
    if c.last_cond_message[cond as usize] + SECS_PER_REAL_MIN > now {
        return;
    }
    let msg = match cond {
        Condition::Full if value > 0 && c.is_hungry() => "You are hungry.",
        Condition::Thirst if value > 0 && c.is_thirsty() => "You are thirsty.",
        Condition::Drunk if intoxicated && c.condition(Condition::Drunk) == 0 => "You are now sober.",
        _ => return,
    };
    c.send(msg);
    c.last_cond_message[cond as usize] = now;
}

/// Moves the process-wide daily cycle forward a whole day at a time.
pub fn advance_daily_cycle(world: &mut World) {
    let now = world.now();
    if now <= world.daily_cycle + SECS_PER_REAL_DAY {
        return;
    }
    while now > world.daily_cycle + SECS_PER_REAL_DAY {
        world.daily_cycle += SECS_PER_REAL_DAY;
    }
    log::info!("daily cycle advanced to {}", world.daily_cycle);
}

/// Resets a player's daily bonus experience and quests once per cycle.
pub fn check_daily_cycle_reset(world: &mut World, ch: CharId) {
    let cycle = world.daily_cycle;
    let per_day = world.config.num_daily_skill_points;
    let Some(c) = world.char_mut(ch) else {
        return;
    };
    if c.is_npc || c.daily_cycle >= cycle {
        return;
    }
    c.daily_bonus_exp = c.daily_bonus_exp.max(per_day);
    c.daily_quests = 0;
    c.send("Your daily quests and bonus experience have reset!");
    c.daily_cycle = cycle;
    world.request_save(EntityRef::Char(ch));
}

/// Takes off worn gear `ch` no longer qualifies for.
pub fn check_gear(world: &mut World, ch: CharId) {
    let Some(c) = world.char(ch) else {
        return;
    };
    if c.is_npc || c.is_immortal() {
        return;
    }
    let level = c.level;
    let illegal: Vec<(WearPos, empire_world::ObjId, i32)> = c
        .equipment
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| {
            let pos = WearPos::from_repr(i as u8)?;
            let obj = (*slot)?;
            let min = world.obj(obj)?.min_level;
            (pos.counts_stats() && min > level).then_some((pos, obj, min))
        })
        .collect();
    if illegal.is_empty() {
        return;
    }
    for (pos, obj, min) in illegal {
        let msg = format!("You need to be level {min} to use $p.");
        world.act(&msg, Some(ch), Some(obj), None, ActTo::Char);
        world.act("$n stops using $p.", Some(ch), Some(obj), None, ActTo::Room);
        world.unequip_char_to_inventory(ch, pos);
    }
    determine_gear_level(world, ch);
}

/// Average level requirement of stat-bearing gear.
pub fn determine_gear_level(world: &mut World, ch: CharId) {
    let Some(c) = world.char(ch) else {
        return;
    };
    let levels: Vec<i32> = c
        .equipment
        .iter()
        .enumerate()
        .filter(|(i, _)| WearPos::from_repr(*i as u8).is_some_and(WearPos::counts_stats))
        .filter_map(|(_, slot)| slot.and_then(|o| world.obj(o)).map(|o| o.min_level))
        .collect();
    let gear_level = match levels.len() {
        0 => 0,
        n => levels.iter().sum::<i32>() / n as i32,
    };
    if let Some(c) = world.char_mut(ch) {
        c.gear_level = gear_level;
    }
}

fn die_of(world: &mut World, ch: CharId, to_char: &str, to_room: &str) {
    world.send_to_char(ch, to_char);
    world.act(to_room, Some(ch), None, None, ActTo::Room);
    log::debug!("character {} died: {to_char}", world.char(ch).map_or(0, |c| c.uid.0));
    world.die(ch);
}

pub fn out_of_blood(world: &mut World, ch: CharId) {
    die_of(world, ch, "You die from lack of blood!", "$n falls down, dead.");
}

/// Ends a fight whose opponent is gone or elsewhere.
fn check_combat_end(world: &mut World, ch: CharId) {
    let Some(c) = world.char(ch) else {
        return;
    };
    let Some(opp) = c.fighting else {
        return;
    };
    let here = c.in_room;
    if world.char(opp).is_none_or(|o| o.is_dead() || o.in_room != here) {
        world.stop_fighting(ch);
    }
}

/// Breaks charm on NPC followers beyond the configured limit.
fn check_follower_limit(world: &mut World, ch: CharId) {
    let Some(room) = world.char(ch).and_then(|c| c.in_room) else {
        return;
    };
    let limit = world.config.npc_follower_limit;
    let people = world.room(room).map(|r| r.people.clone()).unwrap_or_default();
    let mut count = 0;
    for mob in people {
        let follows = world
            .char(mob)
            .is_some_and(|m| m.is_npc && !m.connected && m.master == Some(ch));
        if !follows {
            continue;
        }
        count += 1;
        if count <= limit {
            continue;
        }
        if let Some(m) = world.char_mut(mob) {
            m.base_aff.remove(AffFlags::CHARM);
            while let Some(idx) = m.affects.iter().position(|af| af.bits.contains(AffFlags::CHARM)) {
                m.affect_remove(idx);
            }
        }
        world.stop_follower(mob);
        let can_fight = world
            .char(mob)
            .is_some_and(|m| !m.mob_flagged(MobFlags::NO_ATTACK) && !m.aff_flagged(AffFlags::NO_ATTACK));
        if can_fight {
            world.act("$n becomes enraged!", Some(mob), None, None, ActTo::Room);
            world.engage(mob, ch);
        }
    }
}

/// The five-second update for one player, in the order the game expects.
pub fn real_update_player(world: &mut World, ch: CharId) {
    let Some(c) = world.char(ch) else {
        return;
    };
    if c.is_npc || c.is_dead() {
        return;
    }

    if c.fighting.is_some() {
        check_combat_end(world, ch);
    }

    let Some(c) = world.char(ch) else {
        return;
    };
    if c.carry_limit() > world.max_inventory_size {
        world.max_inventory_size = c.carry_limit();
    }
    if let Some(c) = world.char_mut(ch) {
        if c.points.blood > c.points.max_blood {
            c.set_blood(c.points.max_blood);
        }
    }

    check_daily_cycle_reset(world, ch);

    let Some(c) = world.char(ch) else {
        return;
    };
    let no_hunger = c.bonus_traits.contains(BonusTraits::NO_HUNGER);
    let no_thirst = c.bonus_traits.contains(BonusTraits::NO_THIRST);
    let awake = c.is_awake();
    if no_hunger {
        gain_condition(world, ch, Condition::Full, -1);
    } else if world.rng.number(0, 1) == 0 {
        gain_condition(world, ch, Condition::Full, 1);
    }
    if no_thirst {
        gain_condition(world, ch, Condition::Thirst, -1);
    } else if world.rng.number(0, 1) == 0 {
        gain_condition(world, ch, Condition::Thirst, 1);
    }
    gain_condition(world, ch, Condition::Drunk, if awake { -1 } else { -6 });

    check_gear(world, ch);

    // bleeding out
    let Some(c) = world.char(ch) else {
        return;
    };
    let position = c.position;
    if position < Position::Stunned || (position == Position::Stunned && health_gain(world, ch) <= 0) {
        if let Some(c) = world.char_mut(ch) {
            c.set_health(c.points.health.min(0) - 1);
            c.update_pos();
        }
        if world.char(ch).is_some_and(Character::is_dead) {
            die_of(world, ch, "You die from your wounds!", "$n falls down, dead.");
        } else {
            world.send_to_char(ch, "You are bleeding and will die soon without aid.");
        }
        return;
    }

    // health only regenerates without damage over time
    if world.char(ch).is_some_and(|c| c.dots.is_empty()) {
        let gain = health_gain(world, ch);
        if let Some(c) = world.char_mut(ch) {
            c.heal(gain);
            c.points.health_deficit = (c.points.health_deficit - gain).max(0);
        }
    }

    if world.char(ch).is_some_and(|c| is_swimming(world, c)) {
        let Some(c) = world.char_mut(ch) else {
            return;
        };
        if c.points.moves > 0 {
            c.set_move(c.points.moves - 1);
        }
        if c.points.moves <= 0 {
            die_of(
                world,
                ch,
                "You sink beneath the water and die!",
                "$n sinks beneath the water and dies!",
            );
            return;
        }
    } else {
        let gain = move_gain(world, ch);
        if let Some(c) = world.char_mut(ch) {
            c.set_move(c.points.moves + gain);
            c.points.move_deficit = (c.points.move_deficit - gain).max(0);
        }
    }

    let gain = mana_gain(world, ch);
    if let Some(c) = world.char_mut(ch) {
        c.set_mana(c.points.mana + gain);
        c.points.mana_deficit = (c.points.mana_deficit - gain).max(0);
    }

    let Some(c) = world.char(ch) else {
        return;
    };
    if c.points.blood <= 0 && c.fed_on_by.is_none() && c.feeding_from.is_none() {
        out_of_blood(world, ch);
        return;
    }
    if c.is_blood_starved(world.config.blood_starvation_level) && c.blood_upkeep > 0 {
        log::debug!("{} is starving; blood upkeep cancelled", c.name());
        if let Some(c) = world.char_mut(ch) {
            c.blood_upkeep = 0;
        }
    }

    check_follower_limit(world, ch);

    let connected = world.char(ch).is_some_and(|c| c.connected);
    expire_cooldowns(world, ch, connected);

    let Some(idnum) = world.char(ch).map(|c| u64::from(c.idnum)) else {
        return;
    };
    if idnum % REAL_UPDATES_PER_MUD_HOUR == world.point_update_cycle {
        point_update_player(world, ch);
    }
}

/// The hourly update for one player. Returns false if they did not survive it.
pub fn point_update_player(world: &mut World, ch: CharId) -> bool {
    let Some(c) = world.char(ch) else {
        return false;
    };
    if c.is_npc || c.is_dead() {
        return false;
    }

    // way over-inventory
    if !c.is_immortal() && c.carrying.len() as i32 > 2 * c.carry_limit() {
        let limit = 2 * c.carry_limit();
        let room = c.in_room;
        let items = c.carrying.clone();
        world.send_to_char(ch, "You are way overburdened and begin losing items...");
        for obj in items {
            if world.char(ch).is_none_or(|c| c.carrying.len() as i32 <= limit) {
                break;
            }
            world.act("You drop $p.", Some(ch), Some(obj), None, ActTo::Char);
            world.act("$n drops $p.", Some(ch), Some(obj), None, ActTo::Room);
            match room {
                Some(r) => world.obj_to_room(obj, r),
                None => world.extract_obj(obj),
            }
        }
    }

    let starvation = world.config.blood_starvation_level;
    let Some(c) = world.char(ch) else {
        return false;
    };
    if c.is_blood_starved(starvation) {
        world.send_to_char(ch, "You are starving!");
    }

    let Some(c) = world.char_mut(ch) else {
        return false;
    };
    let room = c.in_room;
    if c.is_vampire() && !c.is_immortal() {
        if c.blood_upkeep > 0 {
            c.set_blood(c.points.blood - c.blood_upkeep);
        }
        if c.points.blood < 0 {
            out_of_blood(world, ch);
            return false;
        }
    } else if c.fed_on_by.is_none() {
        c.set_blood(c.points.blood + 1);
    }

    if let Some(r) = room.and_then(|r| world.room(r)).filter(|r| r.burning) {
        let msg = if r.closed {
            "The walls crackle and crisp as they burn!"
        } else {
            "The fire rages as the building burns!"
        };
        world.send_to_char(ch, msg);
    }
    true
}

/// The hourly update for an NPC: stable crowding and silent cooldowns.
pub fn point_update_npc(world: &mut World, mob: CharId) -> bool {
    let Some(m) = world.char(mob) else {
        return false;
    };
    if !m.is_npc {
        return false;
    }
    let crowded = m.mob_flagged(MobFlags::ANIMAL)
        && m.mob_flagged(MobFlags::SPAWNED)
        && m.in_room.is_some_and(|r| stable_is_crowded(world, r));
    if crowded {
        log::debug!("despawning {} from a crowded stable", m.name());
        despawn_mob(world, mob);
        return false;
    }
    expire_cooldowns(world, mob, false);
    true
}

fn stable_is_crowded(world: &World, room: empire_world::RoomVnum) -> bool {
    let Some(r) = world.room(room) else {
        return false;
    };
    if !r.bld_flagged(BuildingFlags::STABLE) || !r.is_complete() {
        return false;
    }
    let animals = r
        .people
        .iter()
        .filter_map(|&p| world.char(p))
        .filter(|c| c.mob_flagged(MobFlags::ANIMAL))
        .count();
    animals as i32 > world.config.max_stable_animals
}

/// Affects and damage over time for anyone; the rest for players. NPC
/// point updates come around on their uid's slot of the hour.
pub fn real_update_char(world: &mut World, ch: CharId) {
    affect_update(world, ch);
    if !dot_update(world, ch) {
        return;
    }
    world.schedule_heal_over_time(ch);

    let Some(c) = world.char(ch) else {
        return;
    };
    if !c.is_npc {
        real_update_player(world, ch);
        return;
    }
    if u64::from(c.uid.0) % REAL_UPDATES_PER_MUD_HOUR == world.point_update_cycle
        && !point_update_npc(world, ch)
    {
        return;
    }
    crate::mobact::schedule_reset_mob(world, ch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use empire_types::ItemType;
    use empire_world::character::CONDITION_THRESHOLD;
    use empire_world::{Affect, Object};

    fn set_pos(fx: &mut Fixture, pos: Position) {
        fx.world.char_mut(fx.player).expect("player").position = pos;
    }

    #[test]
    fn position_drives_player_regen() {
        let mut fx = Fixture::new();
        set_pos(&mut fx, Position::Standing);
        assert_eq!(health_gain(&fx.world, fx.player), 1);
        set_pos(&mut fx, Position::Resting);
        assert_eq!(health_gain(&fx.world, fx.player), 3);
        fx.world.char_mut(fx.player).expect("player").extras.mana_regen = 2;
        assert_eq!(mana_gain(&fx.world, fx.player), 5);
    }

    #[test]
    fn npc_regen_scales_with_level() {
        let mut fx = Fixture::new();
        let ogre = fx.mob("ogre", 47);
        assert_eq!(health_gain(&fx.world, ogre), 4);
        fx.world.char_mut(ogre).expect("ogre").extras.move_regen = 3;
        assert_eq!(move_gain(&fx.world, ogre), 7);
    }

    #[test]
    fn sleeping_fills_within_the_configured_time() {
        let mut fx = Fixture::new();
        set_pos(&mut fx, Position::Sleeping);
        // 100 health over 300 seconds is 60 updates: round(100 / 60) = 2,
        // but the position bonus of 4 is larger
        assert_eq!(health_gain(&fx.world, fx.player), 4);

        fx.world.char_mut(fx.player).expect("player").points.max_health = 1200;
        assert_eq!(health_gain(&fx.world, fx.player), 20);

        let room = fx.room;
        let r = fx.world.room_mut(room).expect("room");
        r.building = Some("Inn".to_string());
        r.bld_flags = BuildingFlags::BEDROOM;
        assert_eq!(health_gain(&fx.world, fx.player), 40);
    }

    #[test]
    fn restraints_and_combat_stop_regen() {
        let mut fx = Fixture::new();
        let rat = fx.mob("rat", 1);
        fx.world.engage(fx.player, rat);
        assert_eq!(health_gain(&fx.world, fx.player), 0);
        assert!(mana_gain(&fx.world, fx.player) > 0);

        fx.world.stop_fighting(fx.player);
        fx.world.char_mut(fx.player).expect("player").injuries = Injuries::TIED;
        assert_eq!(health_gain(&fx.world, fx.player), 0);
        assert_eq!(mana_gain(&fx.world, fx.player), 0);
        assert_eq!(move_gain(&fx.world, fx.player), 0);
    }

    #[test]
    fn hunger_never_raises_regen() {
        for pos in [Position::Sleeping, Position::Resting, Position::Sitting, Position::Standing] {
            for regen in [0, 3, 11] {
                let mut fx = Fixture::new();
                set_pos(&mut fx, pos);
                fx.world.char_mut(fx.player).expect("player").extras.health_regen = regen;
                let fed = health_gain(&fx.world, fx.player);
                assert!(fed >= 0);

                for cond in [Condition::Full, Condition::Thirst] {
                    let c = fx.world.char_mut(fx.player).expect("player");
                    c.conditions = [0; 3];
                    c.conditions[cond as usize] = CONDITION_THRESHOLD;
                    let hungry = health_gain(&fx.world, fx.player);
                    assert!(hungry >= 0 && hungry <= fed, "{pos:?} {regen} {cond:?}");
                }
            }
        }
    }

    #[test]
    fn conditions_clamp_and_warn_once_a_minute() {
        let mut fx = Fixture::new();
        let p = fx.player;
        fx.world.char_mut(p).expect("player").conditions[Condition::Full as usize] = CONDITION_THRESHOLD - 1;

        gain_condition(&mut fx.world, p, Condition::Full, 1);
        gain_condition(&mut fx.world, p, Condition::Full, 1);
        assert_eq!(fx.output(p), vec!["You are hungry."]);

        gain_condition(&mut fx.world, p, Condition::Full, 1000);
        assert_eq!(fx.world.char(p).expect("player").condition(Condition::Full), MAX_CONDITION);
        gain_condition(&mut fx.world, p, Condition::Full, -1000);
        assert_eq!(fx.world.char(p).expect("player").condition(Condition::Full), 0);

        fx.world.clock.pulse += 600;
        gain_condition(&mut fx.world, p, Condition::Full, MAX_CONDITION);
        assert_eq!(fx.output(p).len(), 2);
    }

    #[test]
    fn sobering_up_and_immunities() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let c = fx.world.char_mut(p).expect("player");
        c.conditions[Condition::Drunk as usize] = 3;
        c.bonus_traits = BonusTraits::NO_THIRST;

        gain_condition(&mut fx.world, p, Condition::Thirst, 50);
        assert_eq!(fx.world.char(p).expect("player").condition(Condition::Thirst), 0);
        gain_condition(&mut fx.world, p, Condition::Drunk, -6);
        assert_eq!(fx.output(p), vec!["You are now sober."]);

        let rat = fx.mob("rat", 1);
        gain_condition(&mut fx.world, rat, Condition::Full, 10);
        assert_eq!(fx.world.char(rat).expect("rat").condition(Condition::Full), UNLIMITED);
    }

    #[test]
    fn hunger_ends_well_fed() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let c = fx.world.char_mut(p).expect("player");
        c.conditions[Condition::Full as usize] = CONDITION_THRESHOLD;
        c.affect_to_char(Affect {
            atype: AffectType::WellFed,
            cast_by: None,
            duration: 10,
            modifier: 1,
            location: empire_types::ApplyType::HealthRegen,
            bits: AffFlags::empty(),
        });
        gain_condition(&mut fx.world, p, Condition::Full, 1);
        let c = fx.world.char(p).expect("player");
        assert!(!c.affected_by(AffectType::WellFed));
        assert_eq!(c.extras.health_regen, 0);
    }

    #[test]
    fn daily_cycle_resets_once() {
        let mut fx = Fixture::new();
        let p = fx.player;
        fx.world.clock.pulse = (SECS_PER_REAL_DAY * 2 + 10) * 10;
        advance_daily_cycle(&mut fx.world);
        assert_eq!(fx.world.daily_cycle, 1_000_000 + SECS_PER_REAL_DAY * 2);

        check_daily_cycle_reset(&mut fx.world, p);
        check_daily_cycle_reset(&mut fx.world, p);
        let c = fx.world.char(p).expect("player");
        assert_eq!(c.daily_bonus_exp, 10);
        assert_eq!(c.output.len(), 1);
        assert!(fx.world.pending_saves.contains(&EntityRef::Char(p)));
    }

    #[test]
    fn gear_above_level_comes_off() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let mut crown = Object::new(7, "crown", "a gold crown", ItemType::Worn);
        crown.min_level = 50;
        let crown = fx.world.add_object(crown);
        let mut boots = Object::new(8, "boots", "leather boots", ItemType::Worn);
        boots.min_level = 10;
        let boots = fx.world.add_object(boots);
        fx.world.equip_char(p, crown, WearPos::Head);
        fx.world.equip_char(p, boots, WearPos::Feet);

        check_gear(&mut fx.world, p);
        let c = fx.world.char(p).expect("player");
        assert_eq!(c.equipment[WearPos::Head as usize], None);
        assert_eq!(c.carrying, vec![crown]);
        assert_eq!(c.gear_level, 10);
        assert_eq!(c.output, vec!["You need to be level 50 to use a gold crown."]);
    }

    #[test]
    fn bleeding_out_kills() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let watcher = fx.mob("watcher", 1);
        let c = fx.world.char_mut(p).expect("player");
        c.points.health = -5;
        c.position = Position::Incapacitated;

        real_update_player(&mut fx.world, p);
        let c = fx.world.char(p).expect("player");
        assert!(c.is_dead());
        assert!(c.output.contains(&"You die from your wounds!".to_string()));
        assert!(fx.output(watcher).contains(&"Ada falls down, dead.".to_string()));
    }

    #[test]
    fn swimmers_tire_and_drown() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let room = fx.room;
        fx.world.room_mut(room).expect("room").sector = SectorFlags::OCEAN;
        fx.world.char_mut(p).expect("player").points.moves = 2;

        real_update_player(&mut fx.world, p);
        assert_eq!(fx.world.char(p).expect("player").points.moves, 1);
        real_update_player(&mut fx.world, p);
        let c = fx.world.char(p).expect("player");
        assert!(c.is_dead());
        assert!(c.output.contains(&"You sink beneath the water and die!".to_string()));
    }

    #[test]
    fn extra_followers_turn_on_their_leader() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let mobs: Vec<_> = (0..3).map(|_| fx.mob("wolf", 3)).collect();
        for &m in &mobs {
            let c = fx.world.char_mut(m).expect("wolf");
            c.master = Some(p);
            c.base_aff = AffFlags::CHARM;
        }
        fx.world.char_mut(p).expect("player").followers = mobs.clone();

        check_follower_limit(&mut fx.world, p);
        let loyal = mobs
            .iter()
            .filter(|&&m| fx.world.char(m).is_some_and(|c| c.master == Some(p)))
            .count();
        assert_eq!(loyal, 2);
        assert!(fx.world.char(p).expect("player").fighting.is_some());
    }

    #[test]
    fn overburdened_players_drop_items() {
        let mut fx = Fixture::new();
        let p = fx.player;
        for i in 0..55 {
            let rock = fx.world.add_object(Object::new(i, "rock", "a rock", ItemType::Other));
            fx.world.obj_to_char(rock, p);
        }
        assert!(point_update_player(&mut fx.world, p));
        let c = fx.world.char(p).expect("player");
        assert_eq!(c.carrying.len(), 50);
        assert_eq!(c.output[0], "You are way overburdened and begin losing items...");
        assert_eq!(fx.world.room(fx.room).expect("room").contents.len(), 5);
    }

    #[test]
    fn vampires_pay_upkeep() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let c = fx.world.char_mut(p).expect("player");
        c.is_vampire = true;
        c.blood_upkeep = 4;
        c.points.blood = 3;
        assert!(!point_update_player(&mut fx.world, p));
        assert!(fx.world.char(p).expect("player").is_dead());
    }
}
