use empire_types::{Direction, ExitFlags, NamedFlags};
use empire_world::uid::MAP_SIZE;
use empire_world::value::atoi;
use empire_world::{EntityRef, RoomVnum, World};

use super::{FieldFn, uid_text};
use crate::exec::Exec;
use crate::lookup::get_room;

pub(super) const FIELDS: &[(&str, FieldFn<RoomVnum>)] = &[
    ("building", building),
    ("contents", contents),
    ("coords", coords),
    ("crop", crop),
    ("direction", direction),
    ("distance", distance),
    ("down", down),
    ("east", east),
    ("empire_adjective", empire_adjective),
    ("empire_id", empire_id),
    ("empire_name", empire_name),
    ("id", id),
    ("name", name),
    ("north", north),
    ("northeast", northeast),
    ("northwest", northwest),
    ("people", people),
    ("sector", sector),
    ("south", south),
    ("southeast", southeast),
    ("southwest", southwest),
    ("template", template),
    ("up", up),
    ("vnum", vnum),
    ("weather", weather),
    ("west", west),
];

macro_rules! getter {
    ($name:ident, |$r:ident| $body:expr) => {
        fn $name(world: &mut World, _: &Exec, room: RoomVnum, _: &str) -> Option<String> {
            let $r = world.room(room)?;
            Some($body.to_string())
        }
    };
}

getter!(building, |r| r.building.as_deref().unwrap_or(""));
getter!(crop, |r| r.crop.as_deref().unwrap_or(""));
getter!(name, |r| r.name);
getter!(sector, |r| r.sector_name);
getter!(vnum, |r| r.vnum);
getter!(id, |r| empire_world::Uid::room(r.vnum).0);
getter!(template, |r| r.template.map(|t| t.to_string()).unwrap_or_default());
getter!(coords, |r| match r.coords() {
    Some((x, y)) => format!("({x}, {y})"),
    None => "(???, ???)".to_string(),
});

fn weather(world: &mut World, _: &Exec, room: RoomVnum, _: &str) -> Option<String> {
    let closed = world.room(room)?.closed;
    Some(if closed { String::new() } else { world.weather.name().to_string() })
}

fn contents(world: &mut World, _: &Exec, room: RoomVnum, sub: &str) -> Option<String> {
    let r = world.room(room)?;
    let sub = sub.trim();
    let found = if sub.is_empty() {
        r.contents.first().copied()
    } else {
        let vnum = atoi(sub);
        r.contents
            .iter()
            .copied()
            .find(|&o| world.obj(o).is_some_and(|o| i64::from(o.vnum) == vnum))
    };
    Some(found.map_or_else(String::new, |o| uid_text(world, EntityRef::Obj(o))))
}

/// First occupant that is not on its way out.
fn people(world: &mut World, _: &Exec, room: RoomVnum, _: &str) -> Option<String> {
    let r = world.room(room)?;
    let first = r
        .people
        .iter()
        .copied()
        .find(|&p| world.char(p).is_some_and(|c| !c.extracted));
    Some(first.map_or_else(String::new, |p| uid_text(world, EntityRef::Char(p))))
}

fn direction(world: &mut World, _: &Exec, room: RoomVnum, sub: &str) -> Option<String> {
    world.room(room)?;
    let dir = get_room(world, Some(room), sub.trim()).and_then(|target| world.direction_to(room, target));
    Some(dir.map_or_else(String::new, |d| d.name().to_string()))
}

fn distance(world: &mut World, _: &Exec, room: RoomVnum, sub: &str) -> Option<String> {
    world.room(room)?;
    let dist = match get_room(world, Some(room), sub.trim()) {
        Some(target) => world.compute_distance(room, target),
        None => MAP_SIZE as i32,
    };
    Some(dist.to_string())
}

fn owner_text(world: &World, room: RoomVnum, read: fn(&empire_world::Empire) -> String) -> Option<String> {
    let owner = world.room(room)?.owner;
    Some(owner.and_then(|e| world.empire(e)).map(read).unwrap_or_default())
}

fn empire_adjective(world: &mut World, _: &Exec, room: RoomVnum, _: &str) -> Option<String> {
    owner_text(world, room, |e| e.adjective.clone())
}

fn empire_name(world: &mut World, _: &Exec, room: RoomVnum, _: &str) -> Option<String> {
    owner_text(world, room, |e| e.name.clone())
}

fn empire_id(world: &mut World, _: &Exec, room: RoomVnum, _: &str) -> Option<String> {
    owner_text(world, room, |e| e.vnum.to_string()).map(|id| if id.is_empty() { "0".to_string() } else { id })
}

fn exit_bits(flags: ExitFlags) -> String {
    if flags.is_empty() {
        "NOBITS".to_string()
    } else {
        flags.display_names()
    }
}

/// An exit, or on the open map the neighbouring tile. Unrecognised
/// subfields produce nothing so the lookup falls through.
fn direction_field(world: &World, room: RoomVnum, dir: Direction, sub: &str) -> Option<String> {
    let r = world.room(room)?;
    let sub = sub.trim();
    if let Some(exit) = r.exit(dir) {
        if sub.is_empty() {
            return Some(exit_bits(exit.flags));
        }
        return match sub.to_ascii_lowercase().as_str() {
            "vnum" => Some(exit.to_room.to_string()),
            "bits" => Some(exit_bits(exit.flags)),
            "room" => Some(uid_text(world, EntityRef::Room(exit.to_room))),
            _ => None,
        };
    }
    if r.closed || !dir.is_map_dir() {
        return Some(String::new());
    }
    let (dx, dy) = dir.shift();
    match world.real_shift(room, dx, dy) {
        Some(to) if !sub.is_empty() => match sub.to_ascii_lowercase().as_str() {
            "vnum" => Some(to.to_string()),
            "room" => Some(uid_text(world, EntityRef::Room(to))),
            _ => None,
        },
        _ => Some(String::new()),
    }
}

macro_rules! dir_field {
    ($name:ident, $dir:expr) => {
        fn $name(world: &mut World, _: &Exec, room: RoomVnum, sub: &str) -> Option<String> {
            direction_field(world, room, $dir, sub)
        }
    };
}

dir_field!(north, Direction::North);
dir_field!(east, Direction::East);
dir_field!(south, Direction::South);
dir_field!(west, Direction::West);
dir_field!(northeast, Direction::Northeast);
dir_field!(northwest, Direction::Northwest);
dir_field!(southeast, Direction::Southeast);
dir_field!(southwest, Direction::Southwest);
dir_field!(up, Direction::Up);
dir_field!(down, Direction::Down);

#[cfg(test)]
mod tests {
    use super::super::entity_field;
    use crate::testing::Fixture;
    use empire_types::{Direction, ExitFlags};
    use empire_world::{Empire, EntityRef, Exit, Uid};

    #[test]
    fn map_neighbours_without_exits() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let here = EntityRef::Room(fx.square);
        let east = fx.square + 1;
        assert_eq!(entity_field(&mut fx.world, &ex, here, "east", "vnum"), east.to_string());
        assert_eq!(entity_field(&mut fx.world, &ex, here, "east", "room"), Uid::room(east).to_string());
        assert_eq!(entity_field(&mut fx.world, &ex, here, "east", ""), "");
        assert_eq!(entity_field(&mut fx.world, &ex, here, "up", "vnum"), "");
        assert_eq!(entity_field(&mut fx.world, &ex, here, "coords", ""), "(5, 5)");
    }

    #[test]
    fn real_exits_report_their_bits() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let mut door = Exit::to(fx.square + 1);
        door.flags = ExitFlags::ISDOOR | ExitFlags::CLOSED;
        fx.world.room_mut(fx.square).expect("square").exits[Direction::Up as usize] = Some(door);
        let here = EntityRef::Room(fx.square);
        assert_eq!(entity_field(&mut fx.world, &ex, here, "up", ""), "DOOR CLOSED");
        assert_eq!(entity_field(&mut fx.world, &ex, here, "up", "vnum"), (fx.square + 1).to_string());
    }

    #[test]
    fn direction_and_distance() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let here = EntityRef::Room(fx.square);
        let target = (fx.square + 2).to_string();
        assert_eq!(entity_field(&mut fx.world, &ex, here, "direction", &target), "east");
        assert_eq!(entity_field(&mut fx.world, &ex, here, "distance", &target), "2");
        assert_eq!(entity_field(&mut fx.world, &ex, here, "direction", ""), "");
        assert_eq!(
            entity_field(&mut fx.world, &ex, here, "distance", "nowhere"),
            empire_world::uid::MAP_SIZE.to_string()
        );
    }

    #[test]
    fn ownership() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let here = EntityRef::Room(fx.square);
        assert_eq!(entity_field(&mut fx.world, &ex, here, "empire_id", ""), "0");
        assert_eq!(entity_field(&mut fx.world, &ex, here, "empire_name", ""), "");
        fx.world.add_empire(Empire::new(3, "Carthage", "Carthaginian"));
        fx.world.room_mut(fx.square).expect("square").owner = Some(3);
        assert_eq!(entity_field(&mut fx.world, &ex, here, "empire_id", ""), "3");
        assert_eq!(entity_field(&mut fx.world, &ex, here, "empire_adjective", ""), "Carthaginian");
    }
}
