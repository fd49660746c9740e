//! Commands the script engine handles itself instead of passing to the
//! owner's command interpreter.

use empire_types::{AffFlags, ApplyType, AttachType, NamedFlags, search_block};
use empire_world::time::SECS_PER_REAL_UPDATE;
use empire_world::value::atoi;
use empire_world::{Affect, AffectType, EntityRef, UID_CHAR, Uid, Value, WorldError, World};
use strum::IntoEnumIterator;

use crate::error::ScriptError;
use crate::exec::Exec;
use crate::expr::eval_expr;
use crate::lookup::{
    can_see, get_char, get_char_in_room, get_char_near_obj, get_obj_in_list, get_obj_in_room,
    get_obj_near_obj, get_room,
};
use crate::text::{any_one_arg, half_chop, is_abbrev, one_argument, skip_spaces, two_arguments};
use crate::wait::{WaitSpec, parse_wait};

pub const DG_SCRIPT_VERSION: &str = "DG Scripts 1.0.12 e2";

/// What the driver does after a built-in ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    Halt,
    /// Keep going, but the trigger now returns this value.
    Return(i32),
    Wait(WaitSpec),
}

type Outcome = Result<Flow, ScriptError>;

/// Runs `cmd` if it is a built-in. `None` means the owner's interpreter
/// should have it. Problems are logged and the trigger carries on.
pub fn run_builtin(world: &mut World, ex: &Exec, cmd: &str) -> Option<Flow> {
    let (word, _) = any_one_arg(cmd);
    let outcome = match word.to_ascii_lowercase().as_str() {
        "nop" => Ok(Flow::Next),
        "halt" => Ok(Flow::Halt),
        "set" => set(world, ex, cmd),
        "eval" => eval(world, ex, cmd),
        "extract" => extract(world, ex, cmd),
        "makeuid" => makeuid(world, ex, cmd),
        "global" => global(world, ex, cmd),
        "context" => context(world, ex, cmd),
        "remote" => remote(world, ex, cmd),
        "rdelete" => rdelete(world, ex, cmd),
        "unset" => unset(world, ex, cmd),
        "return" => return_value(world, ex, cmd),
        "wait" => wait(cmd),
        "attach" => attach(world, ex, cmd),
        "detach" => detach(world, ex, cmd),
        "dg_affect" => dg_affect(world, cmd),
        "dg_affect_room" => Err(ScriptError::Other("dg_affect_room is not supported".into())),
        "version" => {
            log::info!(target: "script", "{DG_SCRIPT_VERSION}");
            Ok(Flow::Next)
        }
        _ => return None,
    };
    Some(outcome.unwrap_or_else(|err| {
        report(world, ex, cmd, &err);
        Flow::Next
    }))
}

fn report(world: &mut World, ex: &Exec, cmd: &str, err: &ScriptError) {
    ex.log(world, &format!("{err}: '{cmd}'"));
}

/// `eval <name> <expr>`. Substitution also uses this to store the
/// intermediate value of a dotted chain.
pub fn process_eval(world: &mut World, ex: &Exec, cmd: &str) {
    if let Err(err) = eval(world, ex, cmd) {
        report(world, ex, cmd, &err);
    }
}

fn set(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, name, value) = two_arguments(cmd);
    if name.is_empty() {
        return Err(ScriptError::MissingArg("set"));
    }
    ex.set_local(world, name, Value::from(skip_spaces(value)));
    Ok(Flow::Next)
}

fn eval(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, rest) = one_argument(cmd);
    let (name, expr) = one_argument(rest);
    if name.is_empty() {
        return Err(ScriptError::MissingArg("eval"));
    }
    let result = eval_expr(world, ex, skip_spaces(expr));
    ex.set_local(world, name, Value::from(result.as_str()));
    Ok(Flow::Next)
}

/// `extract <to> <n> <list>`: the n-th word of the list.
fn extract(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, rest) = any_one_arg(cmd);
    let (to, rest) = half_chop(rest);
    let num = atoi(rest);
    if num < 1 {
        return Err(ScriptError::Other("extract number < 1!".into()));
    }
    let (_, mut list) = half_chop(rest);
    let mut word = "";
    for _ in 0..num {
        (word, list) = half_chop(list);
    }
    ex.set_local(world, to, Value::from(word));
    Ok(Flow::Next)
}

/// `makeuid <var> <id>` or `makeuid <var> mob|obj|room <name>`.
fn makeuid(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, rest) = half_chop(cmd);
    let (var, rest) = half_chop(rest);
    let (arg, rest) = half_chop(rest);
    let (name, _) = half_chop(rest);
    if var.is_empty() {
        return Err(ScriptError::MissingArg("makeuid"));
    }
    if arg.is_empty() {
        return Err(ScriptError::invalid("makeuid", "id arg"));
    }

    if atoi(arg) != 0 {
        let result = eval_expr(world, ex, arg);
        ex.set_local(world, var, Value::from(format!("{UID_CHAR}{result}").as_str()));
        return Ok(Flow::Next);
    }
    if name.is_empty() {
        return Err(ScriptError::Other("makeuid needs name".into()));
    }

    let here = world.entity_room(ex.owner);
    let found = if is_abbrev(arg, "mob") {
        let ch = match (ex.class, ex.owner) {
            (AttachType::Obj, EntityRef::Obj(me)) => get_char_near_obj(world, me, name),
            (AttachType::Mob, EntityRef::Char(me)) => here
                .and_then(|r| get_char_in_room(world, r, name))
                .filter(|&c| can_see(world, me, c)),
            _ => here.and_then(|r| get_char_in_room(world, r, name)),
        };
        ch.map(EntityRef::Char)
    } else if is_abbrev(arg, "obj") {
        let obj = match (ex.class, ex.owner) {
            (AttachType::Obj, EntityRef::Obj(me)) => get_obj_near_obj(world, me, name),
            (AttachType::Mob, EntityRef::Char(me)) => {
                let carried = world.char(me).map(|c| c.carrying.clone()).unwrap_or_default();
                get_obj_in_list(world, name, &carried)
                    .or_else(|| here.and_then(|r| get_obj_in_room(world, r, name)))
            }
            _ => here.and_then(|r| get_obj_in_room(world, r, name)),
        };
        obj.map(EntityRef::Obj)
    } else if is_abbrev(arg, "room") {
        get_room(world, here, name).map(EntityRef::Room)
    } else {
        return Err(ScriptError::Other("makeuid syntax error".into()));
    };

    if let Some(uid) = found.and_then(|e| world.uid_of(e)) {
        ex.set_local(world, var, Value::from(uid));
    }
    Ok(Flow::Next)
}

/// `global <name>`: moves a local into the owner's globals.
fn global(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, var) = any_one_arg(cmd);
    let var = skip_spaces(var);
    if var.is_empty() {
        return Err(ScriptError::MissingArg("global"));
    }
    let Some(local) = world
        .trigger(ex.owner, ex.trig)
        .and_then(|t| t.vars.find_any(var))
        .cloned()
    else {
        return Err(ScriptError::Other(format!("local var '{var}' not found in global call")));
    };
    let context = ex.context(world);
    if let Some(sc) = world.script_mut(ex.owner) {
        sc.global_vars.set(&local.name, local.value, context)?;
    }
    if let Some(t) = world.trigger_mut(ex.owner, ex.trig) {
        t.vars.remove_any(&local.name);
    }
    world.request_save(ex.owner);
    Ok(Flow::Next)
}

fn context(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, var) = any_one_arg(cmd);
    let var = skip_spaces(var);
    if var.is_empty() {
        return Err(ScriptError::MissingArg("context"));
    }
    if let Some(sc) = world.script_mut(ex.owner) {
        sc.context = atoi(var);
    }
    Ok(Flow::Next)
}

/// The script owner a `remote`/`rdelete` id names.
fn remote_target(world: &World, cmd: &'static str, id: &str) -> Result<EntityRef, ScriptError> {
    let uid = Uid::parse_id(id)
        .filter(|u| u.0 > 0)
        .ok_or_else(|| ScriptError::Other(format!("{cmd}: illegal uid '{id}'")))?;
    world
        .find_uid(uid)
        .ok_or_else(|| ScriptError::Other(format!("{cmd}: uid '{uid}' invalid")))
}

/// `remote <name> <uid>`: copies a variable into another owner's globals.
fn remote(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, line) = any_one_arg(cmd);
    let (name, id, _) = two_arguments(line);
    if name.is_empty() || id.is_empty() {
        return Err(ScriptError::Other("remote: invalid arguments".into()));
    }
    let context = ex.context(world);
    let var = world
        .trigger(ex.owner, ex.trig)
        .and_then(|t| t.vars.find_any(name))
        .or_else(|| world.script(ex.owner).and_then(|sc| sc.global_vars.get(name, context)))
        .cloned()
        .ok_or_else(|| ScriptError::Other(format!("local var '{name}' not found in remote call")))?;
    let target = remote_target(world, "remote", id)?;

    // players keep every global in the shared context
    let context = match target {
        EntityRef::Char(ch) if world.char(ch).is_some_and(|c| !c.is_npc) => 0,
        _ => var.context,
    };
    let Some(sc) = world.script_mut(target) else {
        return Ok(Flow::Next);
    };
    sc.global_vars.set(&var.name, var.value, context)?;
    world.request_save(target);
    Ok(Flow::Next)
}

/// `rdelete <name> <uid>`: removes one global from another owner.
fn rdelete(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, line) = any_one_arg(cmd);
    let (name, id, _) = two_arguments(line);
    if name.is_empty() || id.is_empty() {
        return Err(ScriptError::Other("rdelete: invalid arguments".into()));
    }
    let target = remote_target(world, "rdelete", id)?;
    let context = ex.context(world);
    let removed = world
        .script_mut(target)
        .is_some_and(|sc| sc.global_vars.remove_first(name, context));
    if removed {
        world.request_save(target);
    }
    Ok(Flow::Next)
}

/// `unset <name>`: a global if there is one, else a local.
fn unset(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, var) = any_one_arg(cmd);
    let var = skip_spaces(var);
    if var.is_empty() {
        return Err(ScriptError::MissingArg("unset"));
    }
    let context = ex.context(world);
    let global = world
        .script_mut(ex.owner)
        .is_some_and(|sc| sc.global_vars.remove(var, context));
    if global {
        world.request_save(ex.owner);
    } else if let Some(t) = world.trigger_mut(ex.owner, ex.trig) {
        t.vars.remove_any(var);
    }
    Ok(Flow::Next)
}

fn return_value(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, value, _) = two_arguments(cmd);
    if value.is_empty() {
        report(world, ex, cmd, &ScriptError::MissingArg("return"));
        return Ok(Flow::Return(1));
    }
    Ok(Flow::Return(i32::try_from(atoi(value)).unwrap_or(1)))
}

fn wait(cmd: &str) -> Outcome {
    let (_, arg) = any_one_arg(cmd);
    let arg = skip_spaces(arg);
    if arg.is_empty() {
        return Err(ScriptError::MissingArg("wait"));
    }
    parse_wait(arg)
        .map(Flow::Wait)
        .ok_or_else(|| ScriptError::invalid("wait", "arg"))
}

/// Evaluates the id argument of `attach`/`detach` to a live entity.
fn id_target(world: &mut World, ex: &Exec, cmd: &'static str, id: &str) -> Result<EntityRef, ScriptError> {
    let id = skip_spaces(id);
    if id.is_empty() {
        return Err(ScriptError::invalid(cmd, "id arg"));
    }
    let result = eval_expr(world, ex, id);
    Uid::parse_id(&result)
        .and_then(|uid| world.find_uid(uid))
        .ok_or_else(|| ScriptError::invalid(cmd, "id arg"))
}

/// `attach <vnum> <uid>`.
fn attach(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, trignum, id) = two_arguments(cmd);
    if trignum.is_empty() {
        return Err(ScriptError::MissingArg("attach"));
    }
    let target = id_target(world, ex, "attach", id)?;
    let vnum = i32::try_from(atoi(trignum)).unwrap_or(-1);
    world.attach_trigger(target, vnum).map_err(|err| match err {
        WorldError::PlayerScript => ScriptError::invalid("attach", "target"),
        WorldError::UnknownTrigger(_) => ScriptError::invalid("attach", "trigger"),
        other => ScriptError::World(other),
    })?;
    world.request_save(target);
    Ok(Flow::Next)
}

/// `detach <vnum|all> <uid>`.
fn detach(world: &mut World, ex: &Exec, cmd: &str) -> Outcome {
    let (_, trignum, id) = two_arguments(cmd);
    if trignum.is_empty() {
        return Err(ScriptError::MissingArg("detach"));
    }
    let target = id_target(world, ex, "detach", id)?;
    let which = if trignum.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(i32::try_from(atoi(trignum)).unwrap_or(-1))
    };
    if world.detach_trigger(target, which) {
        world.request_save(target);
    }
    Ok(Flow::Next)
}

/// What a `dg_affect` property names.
enum Property {
    Apply(ApplyType),
    Bit(AffFlags),
}

fn property(name: &str) -> Option<Property> {
    if let Some(apply) = ApplyType::iter().find(|a| a.name().eq_ignore_ascii_case(name)) {
        return Some(Property::Apply(apply));
    }
    search_block(name, AffFlags::NAMES, true)
        .and_then(AffFlags::from_index)
        .map(Property::Bit)
}

/// `dg_affect <target> <property> <value|off> <seconds>`.
fn dg_affect(world: &mut World, cmd: &str) -> Outcome {
    let (_, rest) = half_chop(cmd);
    let (target, rest) = half_chop(rest);
    let (prop, rest) = half_chop(rest);
    let (value, seconds) = half_chop(rest);
    if target.is_empty() || prop.is_empty() || value.is_empty() || seconds.is_empty() {
        return Err(ScriptError::Other(
            "dg_affect usage: <target> <property> <value> <duration>".into(),
        ));
    }
    let seconds = i32::try_from(atoi(seconds)).unwrap_or(0);
    if seconds <= 0 {
        return Err(ScriptError::Other("dg_affect: need positive duration!".into()));
    }
    let Some(prop) = property(prop) else {
        return Err(ScriptError::Other(format!("dg_affect: unknown property '{prop}'!")));
    };
    let Some(ch) = get_char(world, target) else {
        return Err(ScriptError::Other("dg_affect: cannot locate target!".into()));
    };
    let Some(c) = world.char_mut(ch) else {
        return Ok(Flow::Next);
    };

    if value.eq_ignore_ascii_case("off") {
        match prop {
            Property::Apply(apply) => c.affect_from_char_by_apply(AffectType::Script, apply),
            Property::Bit(bit) => c.affect_from_char_by_bits(AffectType::Script, bit),
        }
        return Ok(Flow::Next);
    }

    let per_update = SECS_PER_REAL_UPDATE as i32;
    let (location, bits) = match prop {
        Property::Apply(apply) => (apply, AffFlags::empty()),
        Property::Bit(bit) => (ApplyType::None, bit),
    };
    c.affect_to_char(Affect {
        atype: AffectType::Script,
        cast_by: None,
        duration: (seconds + per_update - 1) / per_update,
        modifier: i32::try_from(atoi(value)).unwrap_or(0),
        location,
        bits,
    });
    Ok(Flow::Next)
}
