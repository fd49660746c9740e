//! The commands a script owner can issue: `msend`, `oecho`, `wteleport`
//! and the rest of the class-prefixed stems. Mobs also speak and emote.

use empire_types::AttachType;
use empire_world::value::atoi;
use empire_world::{ActArg, ActTo, CharId, EntityRef, RoomVnum, World};

use crate::error::ScriptError;
use crate::exec::Exec;
use crate::lookup::{
    find_char, get_char, get_char_by_obj, get_char_by_room, get_char_in_room, get_room, resolve_target,
    uid_arg,
};
use crate::text::{half_chop, is_abbrev, skip_spaces};
use crate::triggers::{load_mtrigger, load_otrigger};

/// Where a command acts from. `at` swaps the room and runs the rest.
#[derive(Debug, Clone, Copy)]
struct Ctx<'a> {
    ex: &'a Exec,
    room: Option<RoomVnum>,
}

type CmdFn = fn(&mut World, Ctx<'_>, &str) -> Result<(), ScriptError>;

/// Stems every class understands once its prefix letter is stripped.
/// Earlier entries win when a command is abbreviated.
const COMMANDS: &[(&str, CmdFn)] = &[
    ("send", send),
    ("echo", echo),
    ("echoaround", echoaround),
    ("purge", purge),
    ("teleport", teleport),
    ("load", load),
    ("force", force),
    ("damage", damage),
    ("at", at),
];

/// Mob-only commands that need no prefix.
const MOB_COMMANDS: &[(&str, CmdFn)] = &[("say", say), ("emote", emote)];

/// Runs a substituted line that was not a built-in as a command issued by
/// the trigger's owner.
pub fn command_interpreter(world: &mut World, ex: &Exec, cmd: &str) {
    let room = world.entity_room(ex.owner);
    interpret(world, Ctx { ex, room }, cmd);
}

fn interpret(world: &mut World, ctx: Ctx<'_>, cmd: &str) {
    let cmd = skip_spaces(cmd);
    let (word, arg) = half_chop(cmd);
    let Some(prefix) = ctx.ex.class.command_prefix() else {
        ctx.ex.log(world, "empire triggers cannot issue commands");
        return;
    };

    let stem = word
        .strip_prefix(prefix)
        .filter(|s| !s.is_empty())
        .and_then(|stem| COMMANDS.iter().find(|(name, _)| is_abbrev(stem, name)));
    let mob_cmd = || {
        (ctx.ex.class == AttachType::Mob)
            .then(|| MOB_COMMANDS.iter().find(|(name, _)| is_abbrev(word, name)))
            .flatten()
    };
    let Some((_, handler)) = stem.or_else(mob_cmd) else {
        let class = ctx.ex.class.name().to_ascii_lowercase();
        ctx.ex.log(world, &format!("Unknown {class} cmd: '{cmd}'"));
        return;
    };
    if let Err(err) = handler(world, ctx, arg) {
        ctx.ex.log(world, &err.to_string());
    }
}

/// The acting character, for mobs.
fn me(ctx: Ctx<'_>) -> Option<CharId> {
    match ctx.ex.owner {
        EntityRef::Char(ch) => Some(ch),
        _ => None,
    }
}

/// A character the way the owner's class looks for one.
fn find_victim(world: &World, ctx: Ctx<'_>, name: &str) -> Option<CharId> {
    if let Some(uid) = uid_arg(name) {
        return find_char(world, uid);
    }
    match (ctx.ex.owner, ctx.room) {
        (EntityRef::Obj(obj), _) if ctx.room == world.entity_room(ctx.ex.owner) => {
            get_char_by_obj(world, obj, name)
        }
        (_, Some(room)) if ctx.ex.class == AttachType::Wld => get_char_by_room(world, room, name),
        (_, Some(room)) => get_char_in_room(world, room, name).or_else(|| get_char(world, name)),
        (_, None) => get_char(world, name),
    }
}

fn victim(world: &World, ctx: Ctx<'_>, cmd: &'static str, name: &str) -> Result<CharId, ScriptError> {
    find_victim(world, ctx, name)
        .ok_or_else(|| ScriptError::Other(format!("{cmd}: victim ({name}) does not exist")))
}

fn send(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let (name, msg) = half_chop(arg);
    if name.is_empty() || msg.is_empty() {
        return Err(ScriptError::MissingArg("send"));
    }
    let ch = victim(world, ctx, "send", name)?;
    world.send_to_char(ch, msg);
    Ok(())
}

fn echo(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let msg = skip_spaces(arg);
    if msg.is_empty() {
        return Err(ScriptError::MissingArg("echo"));
    }
    if let Some(room) = ctx.room {
        world.send_to_room(room, msg, me(ctx));
    }
    Ok(())
}

fn echoaround(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let (name, msg) = half_chop(arg);
    if name.is_empty() || msg.is_empty() {
        return Err(ScriptError::MissingArg("echoaround"));
    }
    let ch = victim(world, ctx, "echoaround", name)?;
    if let Some(room) = world.char(ch).and_then(|c| c.in_room) {
        world.send_to_room(room, msg, Some(ch));
    }
    Ok(())
}

fn purge(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let name = skip_spaces(arg);
    if name.is_empty() {
        match ctx.ex.owner {
            EntityRef::Char(ch) => world.extract_char(ch),
            EntityRef::Obj(obj) => world.extract_obj(obj),
            _ => {
                // a room or vehicle clears the room of everything but players
                let Some(room) = ctx.room else {
                    return Ok(());
                };
                let Some(r) = world.room(room) else {
                    return Ok(());
                };
                let (people, contents) = (r.people.clone(), r.contents.clone());
                for ch in people {
                    if world.char(ch).is_some_and(|c| c.is_npc) {
                        world.extract_char(ch);
                    }
                }
                for obj in contents {
                    world.extract_obj(obj);
                }
            }
        }
        return Ok(());
    }

    let target = resolve_target(world, ctx.ex, name)
        .filter(|&t| {
            t != ctx.ex.owner || name.eq_ignore_ascii_case("self") || name.eq_ignore_ascii_case("me")
        })
        .ok_or_else(|| ScriptError::Other(format!("purge: bad argument ({name})")))?;
    match target {
        EntityRef::Char(ch) => {
            if world.char(ch).is_some_and(|c| !c.is_npc) {
                return Err(ScriptError::Other("purge: purging a PC".into()));
            }
            world.extract_char(ch);
        }
        EntityRef::Obj(obj) => world.extract_obj(obj),
        EntityRef::Vehicle(veh) => world.extract_vehicle(veh),
        _ => return Err(ScriptError::Other(format!("purge: bad argument ({name})"))),
    }
    Ok(())
}

fn teleport(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let (name, dest) = half_chop(arg);
    if name.is_empty() || dest.is_empty() {
        return Err(ScriptError::MissingArg("teleport"));
    }
    let Some(dest) = get_room(world, ctx.room, dest) else {
        return Err(ScriptError::Other("teleport target is an invalid room".into()));
    };

    if name.eq_ignore_ascii_case("all") {
        let Some(room) = ctx.room else {
            return Ok(());
        };
        if room == dest {
            return Err(ScriptError::Other("teleport all target is itself".into()));
        }
        let people = world.room(room).map(|r| r.people.clone()).unwrap_or_default();
        for ch in people.into_iter().filter(|&ch| Some(ch) != me(ctx)) {
            world.char_to_room(ch, dest);
        }
        return Ok(());
    }

    match resolve_target(world, ctx.ex, name) {
        Some(EntityRef::Char(ch)) => world.char_to_room(ch, dest),
        Some(EntityRef::Obj(obj)) => world.obj_to_room(obj, dest),
        Some(EntityRef::Vehicle(veh)) => world.vehicle_to_room(veh, dest),
        _ => return Err(ScriptError::Other(format!("teleport: no target found ({name})"))),
    }
    Ok(())
}

fn load(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let (kind, rest) = half_chop(arg);
    let (vnum, _) = half_chop(rest);
    if kind.is_empty() || vnum.is_empty() || !vnum.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ScriptError::Other("load: bad syntax".into()));
    }
    let vnum = i32::try_from(atoi(vnum)).unwrap_or(-1);
    let Some(room) = ctx.room else {
        return Err(ScriptError::Other("load: owner is nowhere".into()));
    };

    if is_abbrev(kind, "mob") {
        let mob = world
            .read_mobile(vnum)
            .map_err(|_| ScriptError::Other(format!("load: bad mob vnum {vnum}")))?;
        world.char_to_room(mob, room);
        load_mtrigger(world, mob);
    } else if is_abbrev(kind, "obj") {
        let obj = world
            .read_object(vnum)
            .map_err(|_| ScriptError::Other(format!("load: bad object vnum {vnum}")))?;
        match me(ctx) {
            Some(ch) if ctx.room == world.entity_room(ctx.ex.owner) => world.obj_to_char(obj, ch),
            _ => world.obj_to_room(obj, room),
        }
        load_otrigger(world, obj);
    } else {
        return Err(ScriptError::Other("load: bad type".into()));
    }
    Ok(())
}

fn force(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let (name, line) = half_chop(arg);
    if name.is_empty() || line.is_empty() {
        return Err(ScriptError::MissingArg("force"));
    }
    let targets = if name.eq_ignore_ascii_case("all") {
        let people = ctx
            .room
            .and_then(|r| world.room(r))
            .map(|r| r.people.clone())
            .unwrap_or_default();
        people.into_iter().filter(|&ch| Some(ch) != me(ctx)).collect()
    } else {
        vec![victim(world, ctx, "force", name)?]
    };
    for ch in targets {
        if let Some(c) = world.char_mut(ch) {
            if c.is_immortal() {
                continue;
            }
            c.input.push(line.to_string());
        }
    }
    Ok(())
}

fn damage(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let (name, amount) = half_chop(arg);
    if name.is_empty() || amount.is_empty() {
        return Err(ScriptError::MissingArg("damage"));
    }
    let ch = victim(world, ctx, "damage", name)?;
    if world.char(ch).is_some_and(|c| c.is_immortal()) {
        world.send_to_char(ch, "Being the cool immortal you are, you sidestep a trap, obviously placed to kill you.");
        return Ok(());
    }
    let amount = i32::try_from(atoi(amount)).unwrap_or(0);
    world.damage(ch, amount);
    Ok(())
}

fn at(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let (location, cmd) = half_chop(arg);
    if location.is_empty() || cmd.is_empty() {
        return Err(ScriptError::MissingArg("at"));
    }
    let Some(room) = get_room(world, ctx.room, location) else {
        return Err(ScriptError::Other(format!("at: location not found ({location})")));
    };
    interpret(world, Ctx { room: Some(room), ..ctx }, cmd);
    Ok(())
}

fn say(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let msg = skip_spaces(arg);
    let Some(ch) = me(ctx) else {
        return Ok(());
    };
    if msg.is_empty() {
        return Ok(());
    }
    world.act("$n says, '$T'", Some(ch), None, Some(ActArg::Text(msg.to_string())), ActTo::Room);
    Ok(())
}

fn emote(world: &mut World, ctx: Ctx<'_>, arg: &str) -> Result<(), ScriptError> {
    let msg = skip_spaces(arg);
    let Some(ch) = me(ctx) else {
        return Ok(());
    };
    if msg.is_empty() {
        return Ok(());
    }
    world.act("$n $T", Some(ch), None, Some(ActArg::Text(msg.to_string())), ActTo::Room);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn output(fx: &Fixture, ch: CharId) -> Vec<String> {
        fx.world.char(ch).map(|c| c.output.clone()).unwrap_or_default()
    }

    #[test]
    fn send_and_echo() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let uid = fx.player_uid();
        command_interpreter(&mut fx.world, &ex, &format!("msend {uid} You qualify."));
        command_interpreter(&mut fx.world, &ex, "msend traveler Welcome.");
        command_interpreter(&mut fx.world, &ex, "mecho The bell rings.");
        assert_eq!(output(&fx, fx.player), vec!["You qualify.", "Welcome.", "The bell rings."]);

        command_interpreter(&mut fx.world, &ex, "msend nobody hi");
        assert!(fx.world.script_errors.back().is_some_and(|e| e.contains("send: victim (nobody) does not exist")));
    }

    #[test]
    fn rooms_use_their_own_prefix() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_room(&["nop"]);
        command_interpreter(&mut fx.world, &ex, "wecho A breeze.");
        assert_eq!(output(&fx, fx.player), vec!["A breeze."]);
        command_interpreter(&mut fx.world, &ex, "mecho wrong class");
        assert!(fx.world.script_errors.back().is_some_and(|e| e.contains("Unknown room cmd: 'mecho wrong class'")));
    }

    #[test]
    fn mobs_speak() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        command_interpreter(&mut fx.world, &ex, "say Hear ye!");
        assert_eq!(output(&fx, fx.player), vec!["The town crier says, 'Hear ye!'"]);
    }

    #[test]
    fn teleport_load_and_at() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_room(&["nop"]);
        command_interpreter(&mut fx.world, &ex, "wteleport traveler 9006");
        assert_eq!(fx.world.char(fx.player).and_then(|c| c.in_room), Some(9006));

        fx.add_mob_proto(3001, "rat small", "a small rat");
        command_interpreter(&mut fx.world, &ex, "wat 9006 wload mob 3001");
        let people = fx.world.room(9006).map(|r| r.people.len());
        assert_eq!(people, Some(2));

        command_interpreter(&mut fx.world, &ex, "wat 9006 wecho Squeak.");
        assert_eq!(output(&fx, fx.player), vec!["Squeak."]);
    }

    #[test]
    fn force_queues_input_and_damage_hurts() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        command_interpreter(&mut fx.world, &ex, "mforce traveler kneel");
        assert_eq!(fx.world.char(fx.player).map(|c| c.input.clone()), Some(vec!["kneel".to_string()]));

        let before = fx.world.char(fx.player).map(|c| c.points.health).unwrap_or(0);
        command_interpreter(&mut fx.world, &ex, "mdamage traveler 3");
        assert_eq!(fx.world.char(fx.player).map(|c| c.points.health), Some(before - 3));
    }

    #[test]
    fn purge_targets_and_self() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        command_interpreter(&mut fx.world, &ex, "mpurge traveler");
        assert!(fx.world.char(fx.player).is_some());
        assert!(fx.world.script_errors.back().is_some_and(|e| e.contains("purging a PC")));

        let obj = fx.exec_on_obj(&["nop"]);
        command_interpreter(&mut fx.world, &obj, "opurge");
        assert!(!fx.world.is_alive(obj.owner));

        command_interpreter(&mut fx.world, &ex, "mpurge");
        assert!(!fx.world.is_alive(ex.owner));
    }
}
