//! Entity lifetimes as scripts observe them: ids stop resolving the moment
//! their owner is gone, and sweeps survive entities dying mid-walk.

use empire_types::{ItemType, WearPos};
use empire_world::{Character, EntityRef, GameConfig, Object, Room, Uid, World};

fn world_with_rooms() -> World {
    let mut world = World::new(GameConfig::default(), 11, 500_000);
    world.add_room(Room::new(10, "Road"));
    world.add_room(Room::new(11, "Field"));
    world
        .mob_protos
        .insert(200, Character::new_mob(200, "rabbit", "a brown rabbit", 1));
    world
        .obj_protos
        .insert(9, Object::new(9, "sack", "a burlap sack", ItemType::Container));
    world
}

#[test]
fn stale_uid_string_is_not_found() {
    let mut world = world_with_rooms();
    let mob = world.read_mobile(200).expect("rabbit");
    world.char_to_room(mob, 10);
    let rendered = world.uid_of(EntityRef::Char(mob)).expect("uid").to_string();

    let parsed = Uid::parse(&rendered).expect("parses");
    assert_eq!(world.find_uid(parsed), Some(EntityRef::Char(mob)));

    world.extract_char(mob);
    assert_eq!(world.find_uid(parsed), None);
    assert!(world.char(mob).is_none());
}

#[test]
fn sweep_skips_entities_extracted_by_earlier_steps() {
    let mut world = world_with_rooms();
    let mobs: Vec<_> = (0..4)
        .map(|_| {
            let m = world.read_mobile(200).expect("rabbit");
            world.char_to_room(m, 11);
            m
        })
        .collect();

    let mut sweep = world.chars.sweep();
    let mut visited = 0;
    while let Some(ch) = sweep.next_live(&world.chars) {
        visited += 1;
        if ch == mobs[0] {
            world.extract_char(mobs[1]);
        }
    }
    assert_eq!(visited, 3);
    assert_eq!(world.room(11).map(|r| r.people.len()), Some(3));
}

#[test]
fn containers_resolve_to_their_room() {
    let mut world = world_with_rooms();
    let pc = world.add_player(Character::new_player(3, "Bo", 5), 10);
    let sack = world.read_object(9).expect("sack");
    let inner = world.read_object(9).expect("sack");
    world.obj_to_char(sack, pc);
    world.obj_to_obj(inner, sack);
    assert_eq!(world.obj_room(inner), Some(10));
    assert_eq!(world.top_object(inner), sack);

    assert!(world.equip_char(pc, sack, WearPos::Pack));
    assert_eq!(world.obj(sack).and_then(Object::worn_by), Some(pc));
    assert!(world.char(pc).is_some_and(|c| c.carrying.is_empty()));

    world.extract_obj(sack);
    assert!(world.obj(inner).is_none());
    assert!(world.char(pc).is_some_and(|c| c.equipment[WearPos::Pack as usize].is_none()));
}

#[test]
fn rooms_list_newest_arrivals_first() {
    let mut world = world_with_rooms();
    let a = world.read_mobile(200).expect("rabbit");
    let b = world.read_mobile(200).expect("rabbit");
    world.char_to_room(a, 10);
    world.char_to_room(b, 10);
    assert_eq!(world.room(10).map(|r| r.people.clone()), Some(vec![b, a]));
    world.char_to_room(a, 11);
    assert_eq!(world.room(10).map(|r| r.people.clone()), Some(vec![b]));
}
