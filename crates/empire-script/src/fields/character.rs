use empire_types::{
    AffFlags, Attribute, CLASS_SKILL_CAP, MobFlags, NamedFlags, PlayerFlags, Position, Skill,
    WearPos,
};
use empire_world::value::atoi;
use empire_world::{ActTo, AffectType, CharId, Character, EntityRef, World};
use strum::EnumCount;

use super::{FieldFn, comma_args, starts_with_digit, uid_text};
use crate::exec::Exec;
use crate::lookup::{can_see, char_has_item, resolve_target};
use crate::text::flag;

pub(super) const FIELDS: &[(&str, FieldFn<CharId>)] = &[
    ("ability", ability),
    ("add_mob_flag", add_mob_flag),
    ("aff_flagged", aff_flagged),
    ("affect", affect),
    ("alias", pc_name),
    ("blood", blood),
    ("block", block),
    ("can_afford", can_afford),
    ("canbeseen", canbeseen),
    ("cha", charisma),
    ("charge_coins", charge_coins),
    ("charisma", charisma),
    ("class", class),
    ("coins", coins),
    ("dex", dexterity),
    ("dexterity", dexterity),
    ("disabled", disabled),
    ("dodge", dodge),
    ("eq", eq),
    ("fighting", fighting),
    ("follower", follower),
    ("gain_skill", gain_skill),
    ("give_coins", give_coins),
    ("global", global),
    ("greatness", greatness),
    ("grt", greatness),
    ("has_item", has_item),
    ("health", health),
    ("heshe", heshe),
    ("himher", himher),
    ("hisher", hisher),
    ("hitp", health),
    ("home", home),
    ("id", id),
    ("int", intelligence),
    ("intelligence", intelligence),
    ("inventory", inventory),
    ("is_ally", is_ally),
    ("is_enemy", is_enemy),
    ("is_god", is_god),
    ("is_hostile", is_hostile),
    ("is_immortal", is_immortal),
    ("is_name", is_name),
    ("is_npc", is_npc),
    ("is_pc", is_pc),
    ("level", level),
    ("mana", mana),
    ("master", master),
    ("maxblood", maxblood),
    ("maxhealth", maxhealth),
    ("maxhitp", maxhealth),
    ("maxmana", maxmana),
    ("maxmove", maxmove),
    ("mob_flagged", mob_flagged),
    ("move", moves),
    ("name", name),
    ("next_in_room", next_in_room),
    ("nohassle", nohassle),
    ("pc_name", pc_name),
    ("plr_flagged", plr_flagged),
    ("position", position),
    ("remove_mob_flag", remove_mob_flag),
    ("resist_magical", resist_magical),
    ("resist_physical", resist_physical),
    ("riding", riding),
    ("room", room),
    ("set_skill", set_skill),
    ("sex", sex),
    ("skill", skill),
    ("str", strength),
    ("strength", strength),
    ("tohit", tohit),
    ("varexists", varexists),
    ("vnum", vnum),
    ("wit", wits),
    ("wits", wits),
];

/// Read-only fields that only need the character.
macro_rules! getter {
    ($name:ident, |$c:ident| $body:expr) => {
        fn $name(world: &mut World, _: &Exec, ch: CharId, _: &str) -> Option<String> {
            let $c = world.char(ch)?;
            Some($body.to_string())
        }
    };
}

getter!(block, |c| c.extras.block);
getter!(class, |_c| "");
getter!(coins, |c| c.coins);
getter!(dodge, |c| c.extras.dodge);
getter!(tohit, |c| c.extras.to_hit);
getter!(resist_magical, |c| c.extras.resist_magical);
getter!(resist_physical, |c| c.extras.resist_physical);
getter!(health, |c| c.points.health);
getter!(maxhealth, |c| c.points.max_health);
getter!(maxmana, |c| c.points.max_mana);
getter!(maxmove, |c| c.points.max_move);
getter!(maxblood, |c| c.points.max_blood);
getter!(level, |c| c.level);
getter!(name, |c| c.name());
getter!(pc_name, |c| c.pc_name());
getter!(heshe, |c| c.sex.heshe());
getter!(himher, |c| c.sex.himher());
getter!(hisher, |c| c.sex.hisher());
getter!(sex, |c| c.sex.name());
getter!(position, |c| c.position.name());
getter!(id, |c| c.uid.0);
getter!(vnum, |c| if c.is_npc { c.vnum } else { -1 });
getter!(is_pc, |c| flag(!c.is_npc));
getter!(is_npc, |c| flag(c.is_npc));
getter!(is_god, |c| flag(c.is_god()));
getter!(is_immortal, |c| flag(c.is_immortal()));
getter!(nohassle, |c| flag(c.nohassle()));
getter!(riding, |c| flag(c.riding));
getter!(charisma, |c| c.attribute(Attribute::Charisma));
getter!(dexterity, |c| c.attribute(Attribute::Dexterity));
getter!(greatness, |c| c.attribute(Attribute::Greatness));
getter!(intelligence, |c| c.attribute(Attribute::Intelligence));
getter!(strength, |c| c.attribute(Attribute::Strength));
getter!(wits, |c| c.attribute(Attribute::Wits));
getter!(disabled, |c| flag(
    c.feeding_from.is_some()
        || c.fed_on_by.is_some()
        || c.is_dead()
        || c.position < Position::Sleeping
        || c.aff_flagged(AffFlags::STUNNED)
));

fn char_uid(world: &World, other: Option<CharId>) -> String {
    other.map_or_else(String::new, |o| uid_text(world, EntityRef::Char(o)))
}

fn fighting(world: &mut World, _: &Exec, ch: CharId, _: &str) -> Option<String> {
    let other = world.char(ch)?.fighting;
    Some(char_uid(world, other))
}

fn master(world: &mut World, _: &Exec, ch: CharId, _: &str) -> Option<String> {
    let other = world.char(ch)?.master;
    Some(char_uid(world, other))
}

fn follower(world: &mut World, _: &Exec, ch: CharId, _: &str) -> Option<String> {
    let other = world.char(ch)?.followers.first().copied();
    Some(char_uid(world, other))
}

fn next_in_room(world: &mut World, _: &Exec, ch: CharId, _: &str) -> Option<String> {
    let room = world.char(ch)?.in_room?;
    let people = &world.room(room)?.people;
    let next = people
        .iter()
        .position(|&p| p == ch)
        .and_then(|i| people.get(i + 1).copied());
    Some(char_uid(world, next))
}

fn room(world: &mut World, _: &Exec, ch: CharId, _: &str) -> Option<String> {
    let room = world.char(ch)?.in_room;
    Some(room.map_or_else(String::new, |r| uid_text(world, EntityRef::Room(r))))
}

fn home(world: &mut World, _: &Exec, ch: CharId, _: &str) -> Option<String> {
    let home = world.char(ch)?.home_room;
    Some(home.map_or_else(String::new, |r| uid_text(world, EntityRef::Room(r))))
}

fn ability(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    Some(flag(!sub.trim().is_empty() && (c.is_npc || c.has_ability(sub.trim()))))
}

fn mob_flagged(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    Some(flag(MobFlags::from_script_name(sub).is_ok_and(|f| c.mob_flagged(f))))
}

fn aff_flagged(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    Some(flag(AffFlags::from_script_name(sub).is_ok_and(|f| c.aff_flagged(f))))
}

fn plr_flagged(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    Some(flag(PlayerFlags::from_script_name(sub).is_ok_and(|f| c.plr_flagged(f))))
}

fn change_mob_flag(world: &mut World, ex: &Exec, ch: CharId, sub: &str, on: bool) -> Option<String> {
    if !world.char(ch)?.is_npc {
        return Some("0".to_string());
    }
    match MobFlags::from_script_name(sub) {
        Ok(f) if f.intersects(MobFlags::ISNPC | MobFlags::EXTRACTED) => {
            ex.log(world, &format!("mob flag '{sub}' cannot be changed by scripts"));
        }
        Ok(f) => {
            if let Some(c) = world.char_mut(ch) {
                c.mob_flags.set(f, on);
            }
        }
        Err(_) => ex.log(world, &format!("unknown mob flag: '{sub}'")),
    }
    Some("0".to_string())
}

fn add_mob_flag(world: &mut World, ex: &Exec, ch: CharId, sub: &str) -> Option<String> {
    change_mob_flag(world, ex, ch, sub, true)
}

fn remove_mob_flag(world: &mut World, ex: &Exec, ch: CharId, sub: &str) -> Option<String> {
    change_mob_flag(world, ex, ch, sub, false)
}

fn affect(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    Some(flag(AffectType::from_name(sub).is_some_and(|t| c.affected_by(t))))
}

/// Adjusts a pool by `sub` when it is a non-zero number, then reports it.
fn adjust_pool(
    world: &mut World,
    ch: CharId,
    sub: &str,
    read: fn(&Character) -> i32,
    write: fn(&mut Character, i32),
) -> Option<String> {
    let delta = i32::try_from(atoi(sub)).unwrap_or(0);
    let c = world.char_mut(ch)?;
    if delta != 0 {
        let current = read(c);
        write(c, current.saturating_add(delta));
    }
    Some(read(c).to_string())
}

fn mana(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    adjust_pool(world, ch, sub, |c| c.points.mana, Character::set_mana)
}

fn moves(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    adjust_pool(world, ch, sub, |c| c.points.moves, Character::set_move)
}

fn blood(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let out = adjust_pool(world, ch, sub, |c| c.points.blood, |c, v| c.set_blood(v.max(0)))?;
    let drained = world
        .char(ch)
        .is_some_and(|c| atoi(sub) != 0 && c.points.blood <= 0 && !c.is_dead());
    if drained {
        world.send_to_char(ch, "You die from lack of blood!");
        world.act("$n falls to the ground, drained of blood.", Some(ch), None, None, ActTo::Room);
        world.die(ch);
    }
    Some(out)
}

fn can_afford(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    Some(flag(starts_with_digit(sub) && i64::from(c.coins) >= atoi(sub)))
}

fn charge_coins(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    if !starts_with_digit(sub) {
        return None;
    }
    let amount = i32::try_from(atoi(sub)).unwrap_or(i32::MAX);
    let c = world.char_mut(ch)?;
    c.coins = c.coins.saturating_sub(amount).max(0);
    Some(String::new())
}

fn give_coins(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    if !starts_with_digit(sub) {
        return None;
    }
    let amount = i32::try_from(atoi(sub)).unwrap_or(i32::MAX);
    let c = world.char_mut(ch)?;
    c.coins = c.coins.saturating_add(amount);
    Some(String::new())
}

fn canbeseen(world: &mut World, ex: &Exec, ch: CharId, _: &str) -> Option<String> {
    world.char(ch)?;
    let seen = match ex.owner {
        EntityRef::Char(me) => can_see(world, me, ch),
        _ => true,
    };
    Some(flag(seen))
}

/// Slot names `eq()` accepts, beyond a bare slot number.
const EQ_POSITIONS: &[(&str, WearPos)] = &[
    ("head", WearPos::Head),
    ("ears", WearPos::Ears),
    ("neck1", WearPos::Neck1),
    ("neck2", WearPos::Neck2),
    ("clothes", WearPos::Clothes),
    ("armor", WearPos::Armor),
    ("about", WearPos::About),
    ("arms", WearPos::Arms),
    ("wrists", WearPos::Wrists),
    ("hands", WearPos::Hands),
    ("rfinger", WearPos::FingerR),
    ("lfinger", WearPos::FingerL),
    ("waist", WearPos::Waist),
    ("legs", WearPos::Legs),
    ("feet", WearPos::Feet),
    ("pack", WearPos::Pack),
    ("saddle", WearPos::Saddle),
    ("sheath1", WearPos::Sheath1),
    ("sheath2", WearPos::Sheath2),
    ("wield", WearPos::Wield),
    ("ranged", WearPos::Ranged),
    ("hold", WearPos::Hold),
    ("held", WearPos::Hold),
];

fn eq_pos(arg: &str) -> Option<WearPos> {
    if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) {
        let idx = atoi(arg);
        return (idx < WearPos::COUNT as i64)
            .then(|| WearPos::from_repr(idx as u8))
            .flatten();
    }
    EQ_POSITIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(arg))
        .map(|&(_, pos)| pos)
}

fn eq(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    let sub = sub.trim();
    if sub.is_empty() {
        return Some(String::new());
    }
    if sub == "*" {
        let any = c.equipment.iter().any(Option::is_some);
        return Some(if any { "1".to_string() } else { String::new() });
    }
    let worn = eq_pos(sub).and_then(|pos| c.equipment[pos as usize]);
    Some(worn.map_or_else(String::new, |o| uid_text(world, EntityRef::Obj(o))))
}

fn inventory(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    let sub = sub.trim();
    let found = if sub.is_empty() {
        c.carrying.first().copied()
    } else {
        let vnum = atoi(sub);
        c.carrying
            .iter()
            .copied()
            .find(|&o| world.obj(o).is_some_and(|o| i64::from(o.vnum) == vnum))
    };
    Some(found.map_or_else(String::new, |o| uid_text(world, EntityRef::Obj(o))))
}

fn has_item(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    world.char(ch)?;
    let sub = sub.trim();
    if sub.is_empty() {
        return Some(String::new());
    }
    Some(flag(char_has_item(world, ch, sub)))
}

fn is_name(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    Some(flag(c.is_named(sub)))
}

/// On the same side of the fight `ch` is in.
pub(crate) fn is_fight_ally(world: &World, ch: CharId, other: CharId) -> bool {
    if ch == other {
        return true;
    }
    let (Some(c), Some(o)) = (world.char(ch), world.char(other)) else {
        return false;
    };
    let Some(fighting) = o.fighting else {
        return false;
    };
    o.master == Some(ch)
        || c.master == Some(other)
        || (c.master.is_some() && o.master == c.master)
        || c.fighting == Some(fighting)
}

/// Fighting `ch` or someone in `ch`'s group.
pub(crate) fn is_fight_enemy(world: &World, ch: CharId, other: CharId) -> bool {
    if ch == other {
        return false;
    }
    let (Some(c), Some(o)) = (world.char(ch), world.char(other)) else {
        return false;
    };
    let Some(target) = o.fighting else {
        return false;
    };
    let target_master = world.char(target).and_then(|t| t.master);
    target == ch
        || target_master == Some(ch)
        || c.master == Some(target)
        || (c.master.is_some() && target_master == c.master)
}

fn other_char(world: &World, ex: &Exec, sub: &str) -> Option<CharId> {
    resolve_target(world, ex, sub.trim())?.as_char()
}

fn is_ally(world: &mut World, ex: &Exec, ch: CharId, sub: &str) -> Option<String> {
    world.char(ch)?;
    Some(flag(other_char(world, ex, sub).is_some_and(|o| is_fight_ally(world, ch, o))))
}

fn is_enemy(world: &mut World, ex: &Exec, ch: CharId, sub: &str) -> Option<String> {
    world.char(ch)?;
    Some(flag(other_char(world, ex, sub).is_some_and(|o| is_fight_enemy(world, ch, o))))
}

fn is_hostile(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let now = world.now();
    let hostile_secs = u64::try_from(world.config.hostile_flag_time).unwrap_or(0) * 60;
    let c = world.char_mut(ch)?;
    if c.is_npc {
        return Some("0".to_string());
    }
    match sub.trim().to_ascii_lowercase().as_str() {
        "on" => c.hostile_until = now + hostile_secs,
        "off" => c.hostile_until = 0,
        _ => {}
    }
    Some(flag(c.hostile_until > now))
}

fn skill(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    let level = match Skill::from_name(sub) {
        Ok(sk) if !c.is_npc => c.skill(sk.name()),
        _ => 0,
    };
    Some(level.to_string())
}

fn gain_skill(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let (name, amount) = comma_args(sub);
    let amount = i32::try_from(atoi(amount)).unwrap_or(0);
    let c = world.char_mut(ch)?;
    let ok = match Skill::from_name(name) {
        Ok(sk) if !c.is_npc && amount != 0 => {
            let level = (c.skill(sk.name()) + amount).clamp(0, CLASS_SKILL_CAP);
            c.skills.insert(sk.name().to_string(), level);
            true
        }
        _ => false,
    };
    Some(flag(ok))
}

fn set_skill(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let (name, level) = comma_args(sub);
    let c = world.char_mut(ch)?;
    let ok = match (Skill::from_name(name), level.is_empty()) {
        (Ok(sk), false) if !c.is_npc => {
            let level = atoi(level);
            let ok = (0..=i64::from(CLASS_SKILL_CAP)).contains(&level);
            if ok {
                c.skills.insert(sk.name().to_string(), level as i32);
            }
            ok
        }
        _ => false,
    };
    Some(flag(ok))
}

fn varexists(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    let exists = c
        .script
        .as_ref()
        .is_some_and(|sc| sc.global_vars.find_any(sub.trim()).is_some());
    Some(flag(exists))
}

/// Another mob's global, as that mob's current context sees it.
fn global(world: &mut World, _: &Exec, ch: CharId, sub: &str) -> Option<String> {
    let c = world.char(ch)?;
    let value = c
        .script
        .as_ref()
        .filter(|_| c.is_npc)
        .and_then(|sc| sc.global_vars.get(sub.trim(), sc.context))
        .map(|v| v.value.to_string());
    Some(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::super::find_replacement;
    use crate::testing::Fixture;
    use empire_world::Value;

    fn on_player(fx: &mut Fixture, field: &str, sub: &str) -> String {
        let ex = fx.exec_on_mob(&["nop"]);
        let uid = fx.player_uid();
        ex.set_local(&mut fx.world, "actor", Value::from(uid.as_str()));
        find_replacement(&mut fx.world, &ex, "actor", field, sub)
    }

    #[test]
    fn basic_reads() {
        let mut fx = Fixture::new();
        assert_eq!(on_player(&mut fx, "name", ""), "Traveler");
        assert_eq!(on_player(&mut fx, "vnum", ""), "-1");
        assert_eq!(on_player(&mut fx, "is_pc", ""), "1");
        assert_eq!(on_player(&mut fx, "level", ""), "10");
        assert_eq!(on_player(&mut fx, "heshe", ""), "it");
        assert_eq!(on_player(&mut fx, "id", ""), fx.player_uid().trim_start_matches('}'));
    }

    #[test]
    fn pools_adjust_and_clamp() {
        let mut fx = Fixture::new();
        assert_eq!(on_player(&mut fx, "mana", "-30"), "70");
        assert_eq!(on_player(&mut fx, "mana", "-500"), "0");
        assert_eq!(on_player(&mut fx, "mana", "1000"), "100");
        assert_eq!(on_player(&mut fx, "mana", "abc"), "100");
    }

    #[test]
    fn coins_need_a_number() {
        let mut fx = Fixture::new();
        fx.world.char_mut(fx.player).expect("pc").coins = 50;
        assert_eq!(on_player(&mut fx, "can_afford", "40"), "1");
        assert_eq!(on_player(&mut fx, "can_afford", "60"), "0");
        assert_eq!(on_player(&mut fx, "charge_coins", "20"), "");
        assert_eq!(on_player(&mut fx, "coins", ""), "30");
        assert_eq!(on_player(&mut fx, "give_coins", "x"), "");
        assert!(fx.world.script_errors.back().is_some_and(|e| e.contains("give_coins")));
        assert_eq!(on_player(&mut fx, "coins", ""), "30");
    }

    #[test]
    fn skills_respect_the_cap() {
        let mut fx = Fixture::new();
        assert_eq!(on_player(&mut fx, "set_skill", "Trade, 40"), "1");
        assert_eq!(on_player(&mut fx, "skill", "trade"), "40");
        assert_eq!(on_player(&mut fx, "set_skill", "Trade, 400"), "0");
        assert_eq!(on_player(&mut fx, "gain_skill", "trade, 100"), "1");
        assert_eq!(on_player(&mut fx, "skill", "Trade"), "100");
        assert_eq!(on_player(&mut fx, "gain_skill", "cooking, 1"), "0");
    }

    #[test]
    fn hostile_flag_toggles() {
        let mut fx = Fixture::new();
        assert_eq!(on_player(&mut fx, "is_hostile", ""), "0");
        assert_eq!(on_player(&mut fx, "is_hostile", "on"), "1");
        assert_eq!(on_player(&mut fx, "is_hostile", "off"), "0");
    }

    #[test]
    fn equipment_slots() {
        let mut fx = Fixture::new();
        assert_eq!(on_player(&mut fx, "eq", "*"), "");
        let hat = fx.give_hat();
        let uid = fx.world.obj(hat).expect("hat").uid.to_string();
        assert_eq!(on_player(&mut fx, "eq", "head"), uid);
        assert_eq!(on_player(&mut fx, "eq", "0"), uid);
        assert_eq!(on_player(&mut fx, "eq", "*"), "1");
        assert_eq!(on_player(&mut fx, "eq", "feet"), "");
        let vnum = fx.hat_vnum().to_string();
        assert_eq!(on_player(&mut fx, "has_item", &vnum), "1");
    }

    #[test]
    fn mob_flags_only_change_on_npcs() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        assert_eq!(find_replacement(&mut fx.world, &ex, "self", "mob_flagged", "sentinel"), "0");
        find_replacement(&mut fx.world, &ex, "self", "add_mob_flag", "sentinel");
        assert_eq!(find_replacement(&mut fx.world, &ex, "self", "mob_flagged", "sentinel"), "1");
        find_replacement(&mut fx.world, &ex, "self", "add_mob_flag", "bogus");
        assert!(fx.world.script_errors.back().is_some_and(|e| e.contains("unknown mob flag")));
    }

    #[test]
    fn flag_names_come_from_the_script_tables() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        find_replacement(&mut fx.world, &ex, "self", "add_mob_flag", "aggr");
        assert_eq!(find_replacement(&mut fx.world, &ex, "self", "mob_flagged", "AGGR"), "1");
        assert_eq!(find_replacement(&mut fx.world, &ex, "self", "mob_flagged", "AGGRESSIVE"), "0");
        assert_eq!(on_player(&mut fx, "aff_flagged", "fly"), "0");
    }
}
