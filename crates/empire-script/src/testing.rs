//! A small map world shared by the unit tests.

use std::rc::Rc;

use empire_types::{AttachType, ItemType, WearPos};
use empire_world::{
    CharId, Character, EntityRef, GameConfig, MobVnum, ObjId, ObjVnum, Object, Room, RoomVnum, TrigVnum,
    TriggerProto, World,
};

use crate::exec::Exec;

const CRIER_VNUM: MobVnum = 9000;
const HAT_VNUM: ObjVnum = 80;
const BELL_VNUM: ObjVnum = 81;

/// Three map tiles in a row, a player standing on the first.
pub struct Fixture {
    pub world: World,
    pub square: RoomVnum,
    pub player: CharId,
    crier: Option<CharId>,
    next_trig: TrigVnum,
}

impl Fixture {
    pub fn new() -> Self {
        let mut world = World::new(GameConfig::default(), 42, 0);
        world.add_room(Room::new(9005, "Town Square"));
        world.add_room(Room::new(9006, "Market Road"));
        world.add_room(Room::new(9007, "Old Well"));
        let player = world.add_player(Character::new_player(1, "Traveler", 10), 9005);
        Self {
            world,
            square: 9005,
            player,
            crier: None,
            next_trig: 100,
        }
    }

    pub fn player_uid(&self) -> String {
        self.world
            .char(self.player)
            .map(|c| c.uid.to_string())
            .unwrap_or_default()
    }

    pub fn add_proto(&mut self, vnum: TrigVnum, attach: AttachType, types: u32, lines: &[&str]) {
        self.world.add_trigger_proto(TriggerProto {
            vnum,
            name: format!("test trigger {vnum}"),
            attach,
            types,
            narg: 100,
            arglist: String::new(),
            commands: lines.iter().map(|l| l.to_string()).collect::<Vec<_>>().into(),
        });
    }

    pub fn add_mob_proto(&mut self, vnum: MobVnum, keywords: &str, short: &str) {
        self.world
            .mob_protos
            .insert(vnum, Character::new_mob(vnum, keywords, short, 5));
    }

    fn attach(&mut self, owner: EntityRef, attach: AttachType, lines: &[&str]) -> Exec {
        let vnum = self.next_trig;
        self.next_trig += 1;
        self.add_proto(vnum, attach, 0, lines);
        let trig = self.world.attach_trigger(owner, vnum).expect("attach");
        Exec::new(&self.world, owner, trig).expect("exec")
    }

    /// Runs as the town crier, who is loaded into the square on first use.
    pub fn exec_on_mob(&mut self, lines: &[&str]) -> Exec {
        let crier = match self.crier {
            Some(crier) => crier,
            None => {
                self.add_mob_proto(CRIER_VNUM, "crier town", "the town crier");
                let crier = self.world.read_mobile(CRIER_VNUM).expect("crier");
                self.world.char_to_room(crier, self.square);
                self.crier = Some(crier);
                crier
            }
        };
        self.attach(EntityRef::Char(crier), AttachType::Mob, lines)
    }

    /// Runs as a fresh bell lying in the square.
    pub fn exec_on_obj(&mut self, lines: &[&str]) -> Exec {
        let bell = self.world.add_object(Object::new(
            BELL_VNUM,
            "bell brass",
            "a brass bell",
            ItemType::Other,
        ));
        self.world.obj_to_room(bell, self.square);
        self.attach(EntityRef::Obj(bell), AttachType::Obj, lines)
    }

    pub fn exec_on_room(&mut self, lines: &[&str]) -> Exec {
        self.attach(EntityRef::Room(self.square), AttachType::Wld, lines)
    }

    /// Swaps in a prototype with the given trigger bits and percentage.
    pub fn set_types(&mut self, ex: &Exec, types: u32, narg: i32) {
        let sc = self.world.script_mut(ex.owner).expect("script");
        let t = sc.find_mut(ex.trig).expect("trigger");
        let mut proto = (*t.proto).clone();
        proto.types = types;
        proto.narg = narg;
        t.proto = Rc::new(proto);
        sc.recompute_types();
    }

    pub fn hat_vnum(&self) -> ObjVnum {
        HAT_VNUM
    }

    /// Puts a felt hat on the player's head.
    pub fn give_hat(&mut self) -> ObjId {
        let hat = self.world.add_object(Object::new(
            HAT_VNUM,
            "hat felt",
            "a felt hat",
            ItemType::Worn,
        ));
        self.world.equip_char(self.player, hat, WearPos::Head);
        hat
    }
}
