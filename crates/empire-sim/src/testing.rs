//! A strip of map tiles shared by the unit tests.

use empire_world::{CharId, Character, GameConfig, MobVnum, Room, RoomVnum, World};

/// Map row 10, columns 10 through 14.
pub const ROW: [RoomVnum; 5] = [18010, 18011, 18012, 18013, 18014];

pub struct Fixture {
    pub world: World,
    /// The middle tile.
    pub room: RoomVnum,
    pub player: CharId,
    next_mob: MobVnum,
}

impl Fixture {
    pub fn new() -> Self {
        let mut world = World::new(GameConfig::default(), 99, 1_000_000);
        for (i, vnum) in ROW.into_iter().enumerate() {
            world.add_room(Room::new(vnum, &format!("Plains {i}")));
        }
        let room = ROW[2];
        let player = world.add_player(Character::new_player(1, "Ada", 20), room);
        Self {
            world,
            room,
            player,
            next_mob: 500,
        }
    }

    /// Loads a fresh mob into the middle tile.
    pub fn mob(&mut self, keywords: &str, level: i32) -> CharId {
        let vnum = self.next_mob;
        self.next_mob += 1;
        let short = format!("the {}", keywords.split_whitespace().next().unwrap_or("thing"));
        self.world
            .mob_protos
            .insert(vnum, Character::new_mob(vnum, keywords, &short, level));
        let mob = self.world.read_mobile(vnum).expect("mob");
        self.world.char_to_room(mob, self.room);
        mob
    }

    pub fn output(&self, ch: CharId) -> Vec<String> {
        self.world.char(ch).map(|c| c.output.clone()).unwrap_or_default()
    }

    pub fn clear_output(&mut self, ch: CharId) {
        if let Some(c) = self.world.char_mut(ch) {
            c.output.clear();
        }
    }
}
