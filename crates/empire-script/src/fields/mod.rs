//! `%var.field(subfield)%` resolution.
//!
//! A variable either names an entity, in which case the field is looked up
//! in that entity kind's table, or it is plain text and only the text
//! helpers apply. Variables that do not exist may still be pseudo-variables
//! such as `%time.hour%` or `%random.char%`.
//!
//! Field handlers return `None` when they do not produce a value, which lets
//! the lookup fall through to the entity's own globals exactly as an unknown
//! field would.

mod character;
mod empire;
mod object;
mod pseudo;
mod room;
mod vehicle;

use std::collections::HashMap;
use std::sync::OnceLock;

use empire_world::{CharId, EmpireVnum, EntityRef, ObjId, RoomVnum, VehId, World};

use crate::exec::Exec;
use crate::lookup::resolve_target;
use crate::subst::var_subst;
use crate::text::text_field;

/// A field on one kind of entity. The last argument is the already
/// substituted subfield, empty when none was given.
pub(crate) type FieldFn<Id> = fn(&mut World, &Exec, Id, &str) -> Option<String>;

type Table<Id> = HashMap<&'static str, FieldFn<Id>>;

struct Registry {
    chars: Table<CharId>,
    objs: Table<ObjId>,
    rooms: Table<RoomVnum>,
    vehicles: Table<VehId>,
    empires: Table<EmpireVnum>,
}

fn table<Id>(kind: &str, fields: &[(&'static str, FieldFn<Id>)]) -> Table<Id> {
    let mut map = HashMap::with_capacity(fields.len());
    for &(name, handler) in fields {
        if map.insert(name, handler).is_some() {
            log::error!("duplicate {kind} field '{name}'");
        }
    }
    map
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Registry {
        chars: table("char", character::FIELDS),
        objs: table("object", object::FIELDS),
        rooms: table("room", room::FIELDS),
        vehicles: table("vehicle", vehicle::FIELDS),
        empires: table("empire", empire::FIELDS),
    })
}

/// Text helpers, plus `process`, which needs the script to substitute with.
fn text_value(world: &mut World, ex: &Exec, value: &str, field: &str, subfield: &str) -> Option<String> {
    if field.eq_ignore_ascii_case("process") {
        return Some(var_subst(world, ex, value));
    }
    text_field(value, field, subfield)
}

/// The replacement text for one `%var.field(subfield)%` reference.
pub fn find_replacement(world: &mut World, ex: &Exec, var: &str, field: &str, subfield: &str) -> String {
    let vd = ex.lookup(world, var).map(|v| v.to_string());

    if field.is_empty() {
        return vd.unwrap_or_else(|| pseudo::bare(world, ex, var));
    }

    let target = match &vd {
        Some(name) => resolve_target(world, ex, name),
        None if var.eq_ignore_ascii_case("self") => Some(ex.owner).filter(|&o| world.is_alive(o)),
        None => return pseudo::with_field(world, ex, var, field, subfield),
    };

    if let Some(value) = &vd {
        if let Some(out) = text_value(world, ex, value, field, subfield) {
            return out;
        }
    }
    match target {
        Some(target) => entity_field(world, ex, target, field, subfield),
        None => String::new(),
    }
}

/// Looks `field` up on `target`, falling back to the target's globals.
pub fn entity_field(world: &mut World, ex: &Exec, target: EntityRef, field: &str, subfield: &str) -> String {
    let key = field.to_ascii_lowercase();
    let reg = registry();
    let (found, kind) = match target {
        EntityRef::Char(id) => (reg.chars.get(key.as_str()).and_then(|f| f(world, ex, id, subfield)), "char"),
        EntityRef::Obj(id) => (reg.objs.get(key.as_str()).and_then(|f| f(world, ex, id, subfield)), "object"),
        EntityRef::Room(id) => (reg.rooms.get(key.as_str()).and_then(|f| f(world, ex, id, subfield)), "room"),
        EntityRef::Vehicle(id) => (
            reg.vehicles.get(key.as_str()).and_then(|f| f(world, ex, id, subfield)),
            "vehicle",
        ),
        EntityRef::Empire(id) => (
            reg.empires.get(key.as_str()).and_then(|f| f(world, ex, id, subfield)),
            "empire",
        ),
    };
    if let Some(out) = found {
        return out;
    }
    if let Some(var) = world.script(target).and_then(|sc| sc.global_vars.find_any(field)) {
        return var.value.to_string();
    }
    ex.log(world, &format!("unknown {kind} field: '{field}'"));
    String::new()
}

/// The UID text for an entity, or empty when it is gone.
pub(crate) fn uid_text(world: &World, target: EntityRef) -> String {
    world.uid_of(target).map(|u| u.to_string()).unwrap_or_default()
}

/// Splits `a, b` into its two trimmed halves.
pub(crate) fn comma_args(subfield: &str) -> (&str, &str) {
    match subfield.split_once(',') {
        Some((a, b)) => (a.trim(), b.trim()),
        None => (subfield.trim(), ""),
    }
}

pub(crate) fn starts_with_digit(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::testing::Fixture;
    use empire_world::Value;

    fn no_duplicates<Id>(fields: &[(&'static str, FieldFn<Id>)]) -> bool {
        let mut seen = HashSet::new();
        fields.iter().all(|(name, _)| seen.insert(*name) && name.to_ascii_lowercase() == *name)
    }

    #[test]
    fn field_tables_have_unique_lowercase_names() {
        assert!(no_duplicates(character::FIELDS));
        assert!(no_duplicates(object::FIELDS));
        assert!(no_duplicates(room::FIELDS));
        assert!(no_duplicates(vehicle::FIELDS));
        assert!(no_duplicates(empire::FIELDS));
    }

    #[test]
    fn plain_values_only_take_text_helpers() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        ex.set_local(&mut fx.world, "word", Value::from("  spaced  "));
        assert_eq!(find_replacement(&mut fx.world, &ex, "word", "trim", ""), "spaced");
        assert_eq!(find_replacement(&mut fx.world, &ex, "word", "level", ""), "");
        assert!(fx.world.script_errors.is_empty());
    }

    #[test]
    fn process_substitutes_again() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        ex.set_local(&mut fx.world, "inner", Value::from("deep"));
        ex.set_local(&mut fx.world, "outer", Value::from("%inner%"));
        assert_eq!(find_replacement(&mut fx.world, &ex, "outer", "", ""), "%inner%");
        assert_eq!(find_replacement(&mut fx.world, &ex, "outer", "process", ""), "deep");
    }

    #[test]
    fn unknown_fields_fall_back_to_globals_then_log() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let owner = ex.owner;
        fx.world
            .script_mut(owner)
            .expect("script")
            .global_vars
            .set("mood", Value::from("grumpy"), 0)
            .expect("set");
        assert_eq!(find_replacement(&mut fx.world, &ex, "self", "mood", ""), "grumpy");
        assert_eq!(find_replacement(&mut fx.world, &ex, "self", "nonsense", ""), "");
        let last = fx.world.script_errors.back().expect("logged");
        assert!(last.contains("unknown char field: 'nonsense'"), "{last}");
    }

    #[test]
    fn field_names_ignore_case() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let name = find_replacement(&mut fx.world, &ex, "self", "NAME", "");
        assert_eq!(name, "the town crier");
    }

    #[test]
    fn comma_arguments() {
        assert_eq!(comma_args("Trade, 5"), ("Trade", "5"));
        assert_eq!(comma_args("Trade"), ("Trade", ""));
    }
}
