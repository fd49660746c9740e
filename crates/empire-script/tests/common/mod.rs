use empire_script::load_triggers;
use empire_world::{CharId, Character, EntityRef, GameConfig, Room, RoomVnum, World, WorldEvent};

pub const SQUARE: RoomVnum = 9005;
pub const ROAD: RoomVnum = 9006;
pub const GUARD_VNUM: i32 = 3010;

pub struct Town {
    pub world: World,
    pub player: CharId,
    pub guard: CharId,
}

/// Two map tiles, a guard standing in the square and a player on the road.
/// `triggers` is a trigger file; every trigger in it is attached to the guard.
pub fn town(triggers: &str, level: i32) -> Town {
    let mut world = World::new(GameConfig::default(), 17, 0);
    world.add_room(Room::new(SQUARE, "Town Square"));
    world.add_room(Room::new(ROAD, "Market Road"));
    let player = world.add_player(Character::new_player(7, "Mira", level), ROAD);

    load_triggers(&mut world, triggers).expect("trigger file");
    let mut guard = Character::new_mob(GUARD_VNUM, "guard city", "the city guard", 20);
    guard.proto_script = world.trig_protos.keys().copied().collect();
    world.mob_protos.insert(GUARD_VNUM, guard);
    let guard = world.read_mobile(GUARD_VNUM).expect("guard");
    world.char_to_room(guard, SQUARE);
    Town { world, player, guard }
}

pub fn output(world: &World, ch: CharId) -> Vec<String> {
    world.char(ch).map(|c| c.output.clone()).unwrap_or_default()
}

pub fn guard_ref(town: &Town) -> EntityRef {
    EntityRef::Char(town.guard)
}

/// Advances the clock pulse by pulse, resuming any waits that come due.
pub fn run_pulses(world: &mut World, pulses: u64) {
    for _ in 0..pulses {
        world.clock.pulse += 1;
        let now = world.pulse();
        while let Some((_, event)) = world.events.pop_due(now) {
            if let WorldEvent::TriggerWait { owner, trig } = event {
                empire_script::trigger_wait_resume(world, owner, trig);
            }
        }
    }
}
