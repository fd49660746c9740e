use empire_types::{NamedFlags, ObjFlags};
use empire_world::{EntityRef, ObjId, ObjLocation, World};

use super::{FieldFn, uid_text};
use crate::exec::Exec;
use crate::lookup::item_in_list;
use crate::text::flag;

pub(super) const FIELDS: &[(&str, FieldFn<ObjId>)] = &[
    ("carried_by", carried_by),
    ("contents", contents),
    ("count", count),
    ("flag", toggle_flag),
    ("has_in", has_in),
    ("id", id),
    ("is_flagged", is_flagged),
    ("is_inroom", is_inroom),
    ("is_name", is_name),
    ("material", material),
    ("name", name),
    ("next_in_list", next_in_list),
    ("room", room),
    ("shortdesc", shortdesc),
    ("timer", timer),
    ("type", item_type),
    ("val0", val0),
    ("val1", val1),
    ("val2", val2),
    ("val3", val3),
    ("vnum", vnum),
    ("worn_by", worn_by),
];

macro_rules! getter {
    ($name:ident, |$o:ident| $body:expr) => {
        fn $name(world: &mut World, _: &Exec, obj: ObjId, _: &str) -> Option<String> {
            let $o = world.obj(obj)?;
            Some($body.to_string())
        }
    };
}

getter!(id, |o| o.uid.0);
getter!(material, |o| o.material.name());
getter!(name, |o| o.keywords);
getter!(shortdesc, |o| o.short_descr);
getter!(timer, |o| o.timer);
getter!(item_type, |o| o.item_type.name());
getter!(val0, |o| o.values[0]);
getter!(val1, |o| o.values[1]);
getter!(val2, |o| o.values[2]);
getter!(val3, |o| o.values[3]);
getter!(vnum, |o| o.vnum);

fn carried_by(world: &mut World, _: &Exec, obj: ObjId, _: &str) -> Option<String> {
    let ch = world.obj(obj)?.carried_by();
    Some(ch.map_or_else(String::new, |c| uid_text(world, EntityRef::Char(c))))
}

fn worn_by(world: &mut World, _: &Exec, obj: ObjId, _: &str) -> Option<String> {
    let ch = world.obj(obj)?.worn_by();
    Some(ch.map_or_else(String::new, |c| uid_text(world, EntityRef::Char(c))))
}

fn contents(world: &mut World, _: &Exec, obj: ObjId, _: &str) -> Option<String> {
    let first = world.obj(obj)?.contents.first().copied();
    Some(first.map_or_else(String::new, |o| uid_text(world, EntityRef::Obj(o))))
}

/// The object after this one in whatever list holds it.
fn next_in_list(world: &mut World, _: &Exec, obj: ObjId, _: &str) -> Option<String> {
    let o = world.obj(obj)?;
    let list: &[ObjId] = match o.location {
        ObjLocation::Room(r) => world.room(r).map_or(&[], |r| &r.contents),
        ObjLocation::CarriedBy(ch) => world.char(ch).map_or(&[], |c| &c.carrying),
        ObjLocation::InObj(parent) => world.obj(parent).map_or(&[], |p| &p.contents),
        ObjLocation::InVehicle(v) => world.vehicle(v).map_or(&[], |v| &v.contents),
        ObjLocation::WornBy(..) | ObjLocation::Nowhere => &[],
    };
    let next = list
        .iter()
        .position(|&x| x == obj)
        .and_then(|i| list.get(i + 1).copied());
    Some(next.map_or_else(String::new, |n| uid_text(world, EntityRef::Obj(n))))
}

/// Matches inside a container; anything else holds nothing.
fn count_inside(world: &World, obj: ObjId, item: &str) -> Option<i32> {
    let o = world.obj(obj)?;
    Some(if o.item_type.is_container() {
        item_in_list(world, item.trim(), &o.contents)
    } else {
        0
    })
}

fn count(world: &mut World, _: &Exec, obj: ObjId, sub: &str) -> Option<String> {
    count_inside(world, obj, sub).map(|n| n.to_string())
}

fn has_in(world: &mut World, _: &Exec, obj: ObjId, sub: &str) -> Option<String> {
    count_inside(world, obj, sub).map(|n| flag(n > 0))
}

fn is_flagged(world: &mut World, _: &Exec, obj: ObjId, sub: &str) -> Option<String> {
    let o = world.obj(obj)?;
    Some(flag(ObjFlags::from_script_name(sub.trim()).is_ok_and(|f| o.flags.intersects(f))))
}

/// Toggles an extra flag and reports its new state.
fn toggle_flag(world: &mut World, ex: &Exec, obj: ObjId, sub: &str) -> Option<String> {
    world.obj(obj)?;
    let bits = match ObjFlags::from_script_name(sub.trim()) {
        Ok(bits) => bits,
        Err(err) => {
            ex.log(world, &err.to_string());
            return Some("0".to_string());
        }
    };
    let o = world.obj_mut(obj)?;
    o.flags.toggle(bits);
    Some(flag(o.flags.intersects(bits)))
}

fn is_inroom(world: &mut World, _: &Exec, obj: ObjId, _: &str) -> Option<String> {
    let room = world.obj(obj)?.in_room();
    Some(room.map_or_else(String::new, |r| uid_text(world, EntityRef::Room(r))))
}

fn is_name(world: &mut World, _: &Exec, obj: ObjId, sub: &str) -> Option<String> {
    let o = world.obj(obj)?;
    Some(flag(o.is_named(sub.trim())))
}

fn room(world: &mut World, _: &Exec, obj: ObjId, _: &str) -> Option<String> {
    world.obj(obj)?;
    let room = world.obj_room(obj);
    Some(room.map_or_else(String::new, |r| uid_text(world, EntityRef::Room(r))))
}
