use empire_types::{NamedFlags, VehicleFlags};
use empire_world::{EntityRef, VehId, World};

use super::{FieldFn, uid_text};
use crate::exec::Exec;
use crate::text::flag;

pub(super) const FIELDS: &[(&str, FieldFn<VehId>)] = &[
    ("contents", contents),
    ("health", health),
    ("id", id),
    ("is_flagged", is_flagged),
    ("maxhealth", maxhealth),
    ("name", name),
    ("next_in_room", next_in_room),
    ("on_fire", on_fire),
    ("owner", owner),
    ("room", room),
    ("shortdesc", shortdesc),
    ("vnum", vnum),
];

macro_rules! getter {
    ($name:ident, |$v:ident| $body:expr) => {
        fn $name(world: &mut World, _: &Exec, veh: VehId, _: &str) -> Option<String> {
            let $v = world.vehicle(veh)?;
            Some($body.to_string())
        }
    };
}

getter!(health, |v| v.health);
getter!(id, |v| v.uid.0);
getter!(maxhealth, |v| v.max_health);
getter!(name, |v| v.keywords);
getter!(shortdesc, |v| v.short_descr);
getter!(vnum, |v| v.vnum);
getter!(on_fire, |v| flag(v.on_fire()));

fn is_flagged(world: &mut World, _: &Exec, veh: VehId, sub: &str) -> Option<String> {
    let v = world.vehicle(veh)?;
    Some(flag(VehicleFlags::from_script_name(sub.trim()).is_ok_and(|f| v.flags.intersects(f))))
}

fn contents(world: &mut World, _: &Exec, veh: VehId, _: &str) -> Option<String> {
    let first = world.vehicle(veh)?.contents.first().copied();
    Some(first.map_or_else(String::new, |o| uid_text(world, EntityRef::Obj(o))))
}

fn room(world: &mut World, _: &Exec, veh: VehId, _: &str) -> Option<String> {
    let room = world.vehicle(veh)?.in_room;
    Some(room.map_or_else(String::new, |r| uid_text(world, EntityRef::Room(r))))
}

fn owner(world: &mut World, _: &Exec, veh: VehId, _: &str) -> Option<String> {
    let owner = world.vehicle(veh)?.owner;
    Some(owner.map_or_else(String::new, |e| uid_text(world, EntityRef::Empire(e))))
}

fn next_in_room(world: &mut World, _: &Exec, veh: VehId, _: &str) -> Option<String> {
    let room = world.vehicle(veh)?.in_room?;
    let list = &world.room(room)?.vehicles;
    let next = list
        .iter()
        .position(|&v| v == veh)
        .and_then(|i| list.get(i + 1).copied());
    Some(next.map_or_else(String::new, |v| uid_text(world, EntityRef::Vehicle(v))))
}
