//! Variables that exist without being set: the owner, command stems that
//! let one script body serve every owner class, and world state.

use empire_types::{AttachType, Skill};
use empire_world::value::atoi;
use empire_world::{CharId, EntityRef, Instance, Uid, World};

use super::character::{is_fight_ally, is_fight_enemy};
use super::uid_text;
use crate::exec::Exec;
use crate::lookup::{can_see, valid_dg_target};
use crate::text::flag;

/// Stems that expand to the running class's command, e.g. `%send%` is
/// `msend ` on a mob.
const COMMAND_STEMS: &[&str] = &[
    "send",
    "echo",
    "echoaround",
    "echoneither",
    "door",
    "force",
    "load",
    "purge",
    "scale",
    "teleport",
    "terracrop",
    "terraform",
    "damage",
    "aoe",
    "dot",
    "buildingecho",
    "regionecho",
    "asound",
    "at",
];

fn command_stem(class: AttachType, var: &str) -> Option<String> {
    let prefix = class.command_prefix()?;
    let lower = var.to_ascii_lowercase();
    if let Some(stem) = COMMAND_STEMS.iter().find(|s| **s == lower) {
        return Some(format!("{prefix}{stem} "));
    }
    match lower.as_str() {
        // rooms have no transform of their own
        "transform" if class == AttachType::Wld => Some(format!("{prefix}echo")),
        "transform" => Some(format!("{prefix}transform ")),
        "adventurecomplete" => Some(format!("{prefix}adventurecomplete")),
        _ => None,
    }
}

/// `%var%` for a variable that is not set.
pub(super) fn bare(world: &mut World, ex: &Exec, var: &str) -> String {
    if var.eq_ignore_ascii_case("self") {
        return uid_text(world, ex.owner);
    }
    if let Some(cmd) = command_stem(ex.class, var) {
        return cmd;
    }
    match var.to_ascii_lowercase().as_str() {
        "timestamp" => world.now().to_string(),
        "startloc" => {
            let start = world.config.start_room;
            if world.room(start).is_some() {
                Uid::room(start).to_string()
            } else {
                String::new()
            }
        }
        "weather" => world.weather.name().to_string(),
        _ => String::new(),
    }
}

/// `%var.field%` for a variable that is not set.
pub(super) fn with_field(world: &mut World, ex: &Exec, var: &str, field: &str, subfield: &str) -> String {
    match var.to_ascii_lowercase().as_str() {
        "people" => people_in(world, ex, field),
        "time" => time_field(world, field),
        "instance" => instance_field(world, ex, field, subfield),
        "random" => random_field(world, ex, field),
        "skill" => skill_field(field, subfield),
        "event" => event_field(world, field),
        _ => String::new(),
    }
}

fn people_in(world: &mut World, ex: &Exec, field: &str) -> String {
    let vnum = atoi(field);
    if vnum <= 0 {
        return "0".to_string();
    }
    match i32::try_from(vnum).ok().and_then(|v| world.room(v)) {
        Some(room) => room.people.len().to_string(),
        None => {
            ex.log(world, "people.vnum: room does not exist");
            "-1".to_string()
        }
    }
}

fn time_field(world: &World, field: &str) -> String {
    let t = world.clock.time_info();
    match field.to_ascii_lowercase().as_str() {
        "hour" => t.hours.to_string(),
        "day" => (t.day + 1).to_string(),
        "month" => (t.month + 1).to_string(),
        "year" => t.year.to_string(),
        _ => String::new(),
    }
}

fn owner_instance(world: &World, ex: &Exec) -> Option<Instance> {
    let room = world.entity_room(ex.owner)?;
    world.instance_for_room(room).cloned()
}

fn room_uid_or_zero(world: &World, vnum: i32) -> String {
    if world.room(vnum).is_some() {
        Uid::room(vnum).to_string()
    } else {
        "0".to_string()
    }
}

fn instance_field(world: &mut World, ex: &Exec, field: &str, subfield: &str) -> String {
    let Some(inst) = owner_instance(world, ex) else {
        return "0".to_string();
    };
    match field.to_ascii_lowercase().as_str() {
        "location" => room_uid_or_zero(world, inst.location),
        "start" => room_uid_or_zero(world, inst.start),
        "name" => inst.name,
        "mob" => {
            if !subfield.starts_with(|c: char| c.is_ascii_digit()) {
                return String::new();
            }
            let vnum = atoi(subfield);
            let found = world.chars.iter().find(|(_, c)| {
                c.is_npc
                    && i64::from(c.vnum) == vnum
                    && c.in_room.is_some_and(|r| inst.rooms.contains(&r))
            });
            found.map_or_else(String::new, |(id, _)| uid_text(world, EntityRef::Char(id)))
        }
        "level" => {
            let wanted = i32::try_from(atoi(subfield)).unwrap_or(0);
            let Some(live) = world.instances.iter_mut().find(|i| i.id == inst.id) else {
                return "0".to_string();
            };
            if live.level == 0 && wanted > 0 {
                live.level = wanted;
            }
            live.level.to_string()
        }
        _ => inst.id.to_string(),
    }
}

/// Picks uniformly among the candidates in one pass.
fn pick_random(world: &mut World, candidates: &[CharId]) -> Option<CharId> {
    let mut chosen = None;
    for (count, &c) in (0i32..).zip(candidates) {
        if world.rng.number(0, count) == 0 {
            chosen = Some(c);
        }
    }
    chosen
}

fn random_field(world: &mut World, ex: &Exec, field: &str) -> String {
    let lower = field.to_ascii_lowercase();
    if !matches!(lower.as_str(), "char" | "ally" | "enemy") {
        let n = atoi(field);
        return if n > 0 {
            world.rng.number(1, i32::try_from(n).unwrap_or(i32::MAX)).to_string()
        } else {
            "0".to_string()
        };
    }
    let Some(room) = world.entity_room(ex.owner) else {
        return String::new();
    };
    let people = world.room(room).map(|r| r.people.clone()).unwrap_or_default();
    let candidates: Vec<CharId> = people
        .into_iter()
        .filter(|&c| world.char(c).is_some_and(|ch| valid_dg_target(ch, true)))
        .filter(|&c| match ex.owner {
            EntityRef::Char(me) => {
                c != me
                    && can_see(world, me, c)
                    && match lower.as_str() {
                        "ally" => is_fight_ally(world, me, c),
                        "enemy" => is_fight_enemy(world, me, c),
                        _ => true,
                    }
            }
            _ => true,
        })
        .collect();
    pick_random(world, &candidates).map_or_else(String::new, |c| uid_text(world, EntityRef::Char(c)))
}

fn skill_field(field: &str, subfield: &str) -> String {
    let found = Skill::from_name(subfield).ok().filter(|_| !subfield.trim().is_empty());
    match field.to_ascii_lowercase().as_str() {
        "name" => found.map(|s| s.name().to_string()).unwrap_or_default(),
        "validate" => flag(found.is_some()),
        _ => String::new(),
    }
}

fn event_field(world: &World, field: &str) -> String {
    let event = world.current_event.as_ref();
    match field.to_ascii_lowercase().as_str() {
        "id" => event.map_or_else(|| "0".to_string(), |e| e.id.to_string()),
        "name" => event.map(|e| e.name.clone()).unwrap_or_default(),
        "running" => flag(event.is_some_and(|e| e.running)),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::find_replacement;
    use crate::testing::Fixture;
    use empire_world::{GameEvent, Instance};

    #[test]
    fn command_stems_follow_the_owner_class() {
        let mut fx = Fixture::new();
        let mob = fx.exec_on_mob(&["nop"]);
        assert_eq!(find_replacement(&mut fx.world, &mob, "send", "", ""), "msend ");
        assert_eq!(find_replacement(&mut fx.world, &mob, "adventurecomplete", "", ""), "madventurecomplete");
        let room = fx.exec_on_room(&["nop"]);
        assert_eq!(find_replacement(&mut fx.world, &room, "transform", "", ""), "wecho");
        assert_eq!(find_replacement(&mut fx.world, &room, "echo", "", ""), "wecho ");
        assert_eq!(find_replacement(&mut fx.world, &room, "nothing", "", ""), "");
    }

    #[test]
    fn people_counts_a_room() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let square = fx.square.to_string();
        assert_eq!(find_replacement(&mut fx.world, &ex, "people", &square, ""), "2");
        assert_eq!(find_replacement(&mut fx.world, &ex, "people", "0", ""), "0");
        assert_eq!(find_replacement(&mut fx.world, &ex, "people", "424242", ""), "-1");
    }

    #[test]
    fn random_numbers_and_people() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        for _ in 0..20 {
            let n: i32 = find_replacement(&mut fx.world, &ex, "random", "6", "").parse().expect("number");
            assert!((1..=6).contains(&n));
        }
        assert_eq!(find_replacement(&mut fx.world, &ex, "random", "0", ""), "0");
        // the crier never picks itself
        assert_eq!(find_replacement(&mut fx.world, &ex, "random", "char", ""), fx.player_uid());
        assert_eq!(find_replacement(&mut fx.world, &ex, "random", "enemy", ""), "");
    }

    #[test]
    fn instance_level_locks_once() {
        let mut fx = Fixture::new();
        fx.world.instances.push(Instance {
            id: 12,
            name: "Goblin Warren".into(),
            location: fx.square,
            start: fx.square,
            level: 0,
            rooms: vec![fx.square],
        });
        fx.world.room_mut(fx.square).expect("square").instance = Some(12);
        let ex = fx.exec_on_mob(&["nop"]);
        assert_eq!(find_replacement(&mut fx.world, &ex, "instance", "id", ""), "12");
        assert_eq!(find_replacement(&mut fx.world, &ex, "instance", "name", ""), "Goblin Warren");
        assert_eq!(find_replacement(&mut fx.world, &ex, "instance", "level", "30"), "30");
        assert_eq!(find_replacement(&mut fx.world, &ex, "instance", "level", "50"), "30");
    }

    #[test]
    fn no_instance_reads_zero() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        assert_eq!(find_replacement(&mut fx.world, &ex, "instance", "id", ""), "0");
    }

    #[test]
    fn skills_and_events() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        assert_eq!(find_replacement(&mut fx.world, &ex, "skill", "name", "surv"), "Survival");
        assert_eq!(find_replacement(&mut fx.world, &ex, "skill", "validate", "juggling"), "0");
        assert_eq!(find_replacement(&mut fx.world, &ex, "event", "running", ""), "0");
        assert_eq!(find_replacement(&mut fx.world, &ex, "event", "id", ""), "0");
        fx.world.current_event = Some(GameEvent {
            id: 4,
            name: "Harvest Festival".into(),
            running: true,
        });
        assert_eq!(find_replacement(&mut fx.world, &ex, "event", "name", ""), "Harvest Festival");
        assert_eq!(find_replacement(&mut fx.world, &ex, "event", "running", ""), "1");
    }

    #[test]
    fn time_is_one_based_for_days() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        assert_eq!(find_replacement(&mut fx.world, &ex, "time", "day", ""), "1");
        assert_eq!(find_replacement(&mut fx.world, &ex, "time", "hour", ""), "0");
        assert_eq!(find_replacement(&mut fx.world, &ex, "time", "century", ""), "");
    }
}
