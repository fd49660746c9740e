//! Timed affects, damage over time, heal over time and cooldowns.

use empire_types::{AffFlags, ApplyType, Position};
use empire_world::time::rl_sec;
use empire_world::{Affect, AffectType, CharId, EntityRef, Reschedule, World};

/// Real updates of stun immunity granted when a stun runs out.
pub const STUN_IMMUNITY_DURATION: i32 = 2;

/// Pulses between heal-over-time ticks.
pub const HEAL_OVER_TIME_INTERVAL: u64 = rl_sec(5);

/// Removes every affect of `atype` from `ch`. Returns whether any were removed.
pub fn affect_from_char(world: &mut World, ch: CharId, atype: AffectType, show_msg: bool) -> bool {
    let Some(c) = world.char_mut(ch) else {
        return false;
    };
    let mut removed = false;
    while let Some(idx) = c.affects.iter().position(|af| af.atype == atype) {
        c.affect_remove(idx);
        removed = true;
    }
    if removed && show_msg {
        if let Some(msg) = atype.wear_off_msg() {
            c.send(msg);
        }
    }
    removed
}

/// Counts `ch`'s timed affects down by one real update and removes the ones
/// that run out. Negative durations never expire.
pub fn affect_update(world: &mut World, ch: CharId) {
    let Some(c) = world.char_mut(ch) else {
        return;
    };
    let mut expired: Vec<AffectType> = Vec::new();
    let mut idx = 0;
    while idx < c.affects.len() {
        let af = &mut c.affects[idx];
        if af.duration > 0 {
            af.duration -= 1;
        }
        if af.duration == 0 {
            if let Some(af) = c.affect_remove(idx) {
                if !expired.contains(&af.atype) {
                    expired.push(af.atype);
                }
            }
            continue;
        }
        idx += 1;
    }

    for atype in expired {
        // another affect of the same type is still running
        if c.affected_by(atype) {
            continue;
        }
        if let Some(msg) = atype.wear_off_msg() {
            c.send(msg);
        }
        if atype == AffectType::Stun {
            c.affect_to_char(Affect {
                atype: AffectType::StunImmunity,
                cast_by: None,
                duration: STUN_IMMUNITY_DURATION,
                modifier: 0,
                location: ApplyType::None,
                bits: AffFlags::IMMUNE_STUN,
            });
        }
    }
}

/// Applies one tick of every damage-over-time effect on `ch`, then counts
/// them down. A caster still in the room is credited with the damage.
/// Returns false if `ch` died.
pub fn dot_update(world: &mut World, ch: CharId) -> bool {
    let Some(c) = world.char(ch) else {
        return false;
    };
    let room = c.in_room;
    let ticks: Vec<(Option<empire_world::Uid>, i32)> =
        c.dots.iter().map(|d| (d.cast_by, d.damage * d.stack)).collect();

    for (cast_by, amount) in ticks {
        let caster = cast_by
            .and_then(|uid| world.find_uid(uid))
            .and_then(EntityRef::as_char)
            .filter(|&a| a != ch && world.char(a).is_some_and(|a| a.in_room == room));
        let credit = caster.and_then(|a| world.char(a)).filter(|a| !a.is_npc).map(|a| a.idnum);
        if let (Some(idnum), Some(c)) = (credit, world.char_mut(ch)) {
            if !c.tagged_by.contains(&idnum) {
                c.tagged_by.push(idnum);
            }
        }
        if !world.damage(ch, amount) {
            return false;
        }
    }

    let Some(c) = world.char_mut(ch) else {
        return false;
    };
    let mut expired: Vec<AffectType> = Vec::new();
    c.dots.retain_mut(|d| {
        if d.duration > 0 {
            d.duration -= 1;
        }
        if d.duration == 0 {
            expired.push(d.atype);
            return false;
        }
        true
    });
    for atype in expired {
        if !c.affected_by(atype) {
            if let Some(msg) = atype.wear_off_msg() {
                c.send(msg);
            }
        }
    }
    true
}

/// The heal-over-time event. Heals `ch` by their heal-over-time rating and
/// keeps going while the rating stays positive.
pub fn heal_over_time_event(world: &mut World, ch: CharId) -> Reschedule {
    let Some(c) = world.char_mut(ch) else {
        return Reschedule::Done;
    };
    if c.in_room.is_none() {
        return Reschedule::After(HEAL_OVER_TIME_INTERVAL);
    }
    c.heal_event = None;

    let amount = c.extras.heal_over_time;
    if amount > 0 && !c.is_dead() && c.position >= Position::Sleeping && c.points.health > 0 {
        c.heal(amount);
    }
    if c.extras.heal_over_time <= 0 || c.is_dead() {
        return Reschedule::Done;
    }
    Reschedule::After(HEAL_OVER_TIME_INTERVAL)
}

/// Drops expired cooldowns. Connected players are told about each one.
pub fn expire_cooldowns(world: &mut World, ch: CharId, notify: bool) {
    let now = world.now();
    let Some(c) = world.char_mut(ch) else {
        return;
    };
    let mut ended = Vec::new();
    c.cooldowns.retain(|cd| {
        if cd.expires <= now {
            ended.push(cd.name.clone());
            return false;
        }
        true
    });
    if notify {
        for name in ended {
            c.send(format!("Your {name} cooldown has ended."));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use empire_world::DotEffect;
    use empire_world::character::Cooldown;

    fn stun(duration: i32) -> Affect {
        Affect {
            atype: AffectType::Stun,
            cast_by: None,
            duration,
            modifier: 0,
            location: ApplyType::None,
            bits: AffFlags::STUNNED,
        }
    }

    #[test]
    fn stun_wears_off_into_immunity() {
        let mut fx = Fixture::new();
        let p = fx.player;
        fx.world.char_mut(p).expect("player").affect_to_char(stun(2));

        affect_update(&mut fx.world, p);
        assert!(fx.world.char(p).expect("player").aff_flagged(AffFlags::STUNNED));

        affect_update(&mut fx.world, p);
        let c = fx.world.char(p).expect("player");
        assert!(!c.aff_flagged(AffFlags::STUNNED));
        assert!(c.aff_flagged(AffFlags::IMMUNE_STUN));
        assert_eq!(c.output, vec!["You are no longer stunned."]);

        for _ in 0..STUN_IMMUNITY_DURATION {
            affect_update(&mut fx.world, p);
        }
        assert!(fx.world.char(p).expect("player").affects.is_empty());
    }

    #[test]
    fn permanent_affects_stay_and_twins_share_one_message() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let c = fx.world.char_mut(p).expect("player");
        c.affect_to_char(stun(-1));
        c.affect_to_char(Affect {
            atype: AffectType::WellFed,
            ..stun(1)
        });
        c.affect_to_char(Affect {
            atype: AffectType::WellFed,
            ..stun(1)
        });

        affect_update(&mut fx.world, p);
        let c = fx.world.char(p).expect("player");
        assert_eq!(c.affects.len(), 1);
        assert_eq!(c.output, vec!["You are no longer well-fed."]);
    }

    #[test]
    fn dots_credit_a_present_caster() {
        let mut fx = Fixture::new();
        let rat = fx.mob("rat", 5);
        let caster_uid = fx.world.char(fx.player).map(|c| c.uid);
        fx.world.char_mut(rat).expect("rat").apply_dot(DotEffect {
            atype: AffectType::Poison,
            cast_by: caster_uid,
            duration: 1,
            damage: 3,
            stack: 1,
            max_stack: 1,
        });
        let before = fx.world.char(rat).expect("rat").points.health;

        assert!(dot_update(&mut fx.world, rat));
        let c = fx.world.char(rat).expect("rat");
        assert_eq!(c.points.health, before - 3);
        assert_eq!(c.tagged_by, vec![1]);
        assert!(c.dots.is_empty());
        assert_eq!(c.output, vec!["The poison wears off."]);
    }

    #[test]
    fn lethal_dot_reports_death() {
        let mut fx = Fixture::new();
        let rat = fx.mob("rat", 1);
        fx.world.char_mut(rat).expect("rat").apply_dot(DotEffect {
            atype: AffectType::NatureBurn,
            cast_by: None,
            duration: 5,
            damage: 100,
            stack: 1,
            max_stack: 1,
        });
        assert!(!dot_update(&mut fx.world, rat));
        assert!(fx.world.char(rat).is_none());
    }

    #[test]
    fn heal_over_time_stops_when_the_rating_drops() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let c = fx.world.char_mut(p).expect("player");
        c.points.health = 50;
        c.extras.heal_over_time = 4;
        assert_eq!(
            heal_over_time_event(&mut fx.world, p),
            Reschedule::After(HEAL_OVER_TIME_INTERVAL)
        );
        assert_eq!(fx.world.char(p).expect("player").points.health, 54);

        fx.world.char_mut(p).expect("player").extras.heal_over_time = 0;
        assert_eq!(heal_over_time_event(&mut fx.world, p), Reschedule::Done);
    }

    #[test]
    fn cooldowns_expire_quietly_or_with_a_message() {
        let mut fx = Fixture::new();
        let p = fx.player;
        let now = fx.world.now();
        fx.world.char_mut(p).expect("player").cooldowns = vec![
            Cooldown {
                name: "rescue".to_string(),
                expires: now,
            },
            Cooldown {
                name: "bash".to_string(),
                expires: now + 30,
            },
        ];
        expire_cooldowns(&mut fx.world, p, true);
        let c = fx.world.char(p).expect("player");
        assert_eq!(c.cooldowns.len(), 1);
        assert_eq!(c.output, vec!["Your rescue cooldown has ended."]);
    }
}
