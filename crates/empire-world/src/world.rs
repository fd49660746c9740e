use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use empire_rng::MudRng;
use empire_types::{ItemType, Position, Sky, WearPos};

use crate::arena::Arena;
use crate::character::Character;
use crate::config::GameConfig;
use crate::empire::{Empire, GameEvent, Instance};
use crate::entity::{
    CharId, EmpireVnum, EntityRef, MobVnum, ObjId, ObjVnum, RoomVnum, TrigVnum, VehId, VehVnum,
};
use crate::error::WorldError;
use crate::event::{EventId, EventQueue, MobEventKind, WorldEvent};
use crate::map;
use crate::object::{ObjLocation, Object};
use crate::room::{Room, Track};
use crate::script_data::{ScriptData, TrigId, Trigger, TriggerProto};
use crate::time::Clock;
use crate::uid::{IdSpace, ROOM_ID_BASE, EMPIRE_ID_BASE, Uid, UidRegistry};
use crate::vehicle::Vehicle;

/// How many script diagnostics the world remembers.
pub const SCRIPT_ERROR_HISTORY: usize = 100;
/// Mud hours an NPC corpse lasts.
pub const NPC_CORPSE_TIME: i32 = 5;

/// Who sees an `act` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActTo {
    Char,
    Vict,
    /// Everyone in the actor's room except the actor.
    Room,
    /// Everyone in the room except the actor and the victim.
    NotVict,
}

/// The second `act` argument: `$N`, `$V` or `$T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActArg {
    Char(CharId),
    Vehicle(VehId),
    Text(String),
}

/// Every live entity plus the registries and services scripts and ticks share.
#[derive(Debug)]
pub struct World {
    pub chars: Arena<Character>,
    pub objs: Arena<Object>,
    pub vehicles: Arena<Vehicle>,
    pub rooms: BTreeMap<RoomVnum, Room>,
    pub empires: BTreeMap<EmpireVnum, Empire>,
    pub instances: Vec<Instance>,
    pub current_event: Option<GameEvent>,
    pub trig_protos: BTreeMap<TrigVnum, Rc<TriggerProto>>,
    pub mob_protos: BTreeMap<MobVnum, Character>,
    pub obj_protos: BTreeMap<ObjVnum, Object>,
    pub veh_protos: BTreeMap<VehVnum, Vehicle>,
    pub uids: UidRegistry,
    pub events: EventQueue<WorldEvent>,
    pub rng: MudRng,
    pub config: GameConfig,
    pub clock: Clock,
    pub weather: Sky,
    /// Nesting of running triggers, across all owners.
    pub script_depth: i32,
    /// Largest carry limit any player has had; feeds the loop ceiling.
    pub max_inventory_size: i32,
    pub script_errors: VecDeque<String>,
    pub pending_saves: Vec<EntityRef>,
    pub daily_cycle: u64,
    pub point_update_cycle: u64,
    next_trig_id: u64,
}

impl World {
    pub fn new(config: GameConfig, seed: u64, epoch: u64) -> Self {
        let max_inventory_size = config.max_inventory_size;
        Self {
            chars: Arena::new(),
            objs: Arena::new(),
            vehicles: Arena::new(),
            rooms: BTreeMap::new(),
            empires: BTreeMap::new(),
            instances: Vec::new(),
            current_event: None,
            trig_protos: BTreeMap::new(),
            mob_protos: BTreeMap::new(),
            obj_protos: BTreeMap::new(),
            veh_protos: BTreeMap::new(),
            uids: UidRegistry::default(),
            events: EventQueue::new(),
            rng: MudRng::new(seed),
            config,
            clock: Clock::new(epoch),
            weather: Sky::Cloudless,
            script_depth: 0,
            max_inventory_size,
            script_errors: VecDeque::new(),
            pending_saves: Vec::new(),
            daily_cycle: epoch,
            point_update_cycle: 0,
            next_trig_id: 1,
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn pulse(&self) -> u64 {
        self.clock.pulse
    }

    pub fn char(&self, id: CharId) -> Option<&Character> {
        self.chars.get(id)
    }

    pub fn char_mut(&mut self, id: CharId) -> Option<&mut Character> {
        self.chars.get_mut(id)
    }

    pub fn obj(&self, id: ObjId) -> Option<&Object> {
        self.objs.get(id)
    }

    pub fn obj_mut(&mut self, id: ObjId) -> Option<&mut Object> {
        self.objs.get_mut(id)
    }

    pub fn vehicle(&self, id: VehId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn vehicle_mut(&mut self, id: VehId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id)
    }

    pub fn room(&self, vnum: RoomVnum) -> Option<&Room> {
        self.rooms.get(&vnum)
    }

    pub fn room_mut(&mut self, vnum: RoomVnum) -> Option<&mut Room> {
        self.rooms.get_mut(&vnum)
    }

    pub fn empire(&self, vnum: EmpireVnum) -> Option<&Empire> {
        self.empires.get(&vnum)
    }

    pub fn add_room(&mut self, room: Room) {
        self.rooms.insert(room.vnum, room);
    }

    pub fn add_empire(&mut self, empire: Empire) {
        self.empires.insert(empire.vnum, empire);
    }

    pub fn add_trigger_proto(&mut self, proto: TriggerProto) {
        self.trig_protos.insert(proto.vnum, Rc::new(proto));
    }

    pub fn instance_for_room(&self, room: RoomVnum) -> Option<&Instance> {
        let id = self.room(room)?.instance?;
        self.instances.iter().find(|i| i.id == id)
    }

    /// Live players, in arena order.
    pub fn players(&self) -> Vec<CharId> {
        self.chars
            .iter()
            .filter(|(_, ch)| !ch.is_npc)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn find_player(&self, idnum: u32) -> Option<CharId> {
        self.chars
            .iter()
            .find(|(_, ch)| !ch.is_npc && ch.idnum == idnum)
            .map(|(id, _)| id)
    }

    // creation

    pub fn add_player(&mut self, mut ch: Character, room: RoomVnum) -> CharId {
        ch.uid = Uid(ch.idnum);
        ch.is_npc = false;
        // players always hold a container for their saved globals
        ch.script.get_or_insert_with(ScriptData::default);
        let uid = ch.uid;
        let id = self.chars.insert(ch);
        self.uids.register(uid, EntityRef::Char(id));
        self.char_to_room(id, room);
        id
    }

    /// Instantiates a mob prototype with its prototype triggers attached.
    pub fn read_mobile(&mut self, vnum: MobVnum) -> Result<CharId, WorldError> {
        let mut ch = self
            .mob_protos
            .get(&vnum)
            .cloned()
            .ok_or(WorldError::UnknownPrototype { kind: "mob", vnum })?;
        ch.uid = self.uids.next_mob_id();
        ch.is_npc = true;
        let uid = ch.uid;
        let protos = ch.proto_script.clone();
        let id = self.chars.insert(ch);
        self.uids.register(uid, EntityRef::Char(id));
        self.attach_proto_scripts(EntityRef::Char(id), &protos);
        Ok(id)
    }

    pub fn read_object(&mut self, vnum: ObjVnum) -> Result<ObjId, WorldError> {
        let mut obj = self
            .obj_protos
            .get(&vnum)
            .cloned()
            .ok_or(WorldError::UnknownPrototype { kind: "object", vnum })?;
        obj.uid = self.uids.next_obj_id();
        let uid = obj.uid;
        let protos = obj.proto_script.clone();
        let id = self.objs.insert(obj);
        self.uids.register(uid, EntityRef::Obj(id));
        self.attach_proto_scripts(EntityRef::Obj(id), &protos);
        Ok(id)
    }

    /// Registers an object built outside the prototype table.
    pub fn add_object(&mut self, mut obj: Object) -> ObjId {
        obj.uid = self.uids.next_obj_id();
        let uid = obj.uid;
        let id = self.objs.insert(obj);
        self.uids.register(uid, EntityRef::Obj(id));
        id
    }

    pub fn read_vehicle(&mut self, vnum: VehVnum) -> Result<VehId, WorldError> {
        let mut veh = self
            .veh_protos
            .get(&vnum)
            .cloned()
            .ok_or(WorldError::UnknownPrototype { kind: "vehicle", vnum })?;
        veh.uid = self.uids.next_vehicle_id();
        let uid = veh.uid;
        let protos = veh.proto_script.clone();
        let id = self.vehicles.insert(veh);
        self.uids.register(uid, EntityRef::Vehicle(id));
        self.attach_proto_scripts(EntityRef::Vehicle(id), &protos);
        Ok(id)
    }

    fn attach_proto_scripts(&mut self, target: EntityRef, vnums: &[TrigVnum]) {
        for &vnum in vnums {
            if let Err(err) = self.attach_trigger(target, vnum) {
                log::warn!("prototype script for {target:?}: {err}");
            }
        }
    }

    /// A fresh live copy of trigger `vnum`.
    pub fn read_trigger(&mut self, vnum: TrigVnum) -> Result<Trigger, WorldError> {
        let proto = self
            .trig_protos
            .get(&vnum)
            .cloned()
            .ok_or(WorldError::UnknownTrigger(vnum))?;
        let id = TrigId(self.next_trig_id);
        self.next_trig_id += 1;
        Ok(Trigger::new(id, proto))
    }

    /// Attaches a copy of trigger `vnum`, creating the script container on demand.
    pub fn attach_trigger(&mut self, target: EntityRef, vnum: TrigVnum) -> Result<TrigId, WorldError> {
        if let EntityRef::Char(ch) = target {
            let ch = self.char(ch).ok_or(WorldError::StaleHandle("character"))?;
            if !ch.is_npc {
                return Err(WorldError::PlayerScript);
            }
        }
        let trigger = self.read_trigger(vnum)?;
        let id = trigger.id;
        let slot = self.script_slot(target).ok_or(WorldError::StaleHandle("script owner"))?;
        slot.get_or_insert_with(ScriptData::default).add_trigger(trigger);
        Ok(id)
    }

    /// Detaches trigger `vnum`, or every trigger when `vnum` is `None`.
    /// Frees the container once it is empty. Returns whether anything went.
    pub fn detach_trigger(&mut self, target: EntityRef, vnum: Option<TrigVnum>) -> bool {
        let Some(slot) = self.script_slot(target) else {
            return false;
        };
        let Some(sc) = slot.as_mut() else {
            return false;
        };
        let removed = match vnum {
            Some(vnum) => sc.remove_trigger_vnum(vnum).into_iter().collect(),
            None => sc.remove_all(),
        };
        if sc.is_empty() {
            *slot = None;
        }
        let found = !removed.is_empty();
        for trig in removed {
            if let Some(ev) = trig.wait_event {
                self.events.cancel(ev);
            }
        }
        found
    }

    // scripts

    fn script_slot(&mut self, target: EntityRef) -> Option<&mut Option<ScriptData>> {
        match target {
            EntityRef::Char(id) => self.chars.get_mut(id).map(|c| &mut c.script),
            EntityRef::Obj(id) => self.objs.get_mut(id).map(|o| &mut o.script),
            EntityRef::Room(vnum) => self.rooms.get_mut(&vnum).map(|r| &mut r.script),
            EntityRef::Vehicle(id) => self.vehicles.get_mut(id).map(|v| &mut v.script),
            EntityRef::Empire(vnum) => self.empires.get_mut(&vnum).map(|e| &mut e.script),
        }
    }

    pub fn script(&self, target: EntityRef) -> Option<&ScriptData> {
        match target {
            EntityRef::Char(id) => self.chars.get(id)?.script.as_ref(),
            EntityRef::Obj(id) => self.objs.get(id)?.script.as_ref(),
            EntityRef::Room(vnum) => self.rooms.get(&vnum)?.script.as_ref(),
            EntityRef::Vehicle(id) => self.vehicles.get(id)?.script.as_ref(),
            EntityRef::Empire(vnum) => self.empires.get(&vnum)?.script.as_ref(),
        }
    }

    pub fn script_mut(&mut self, target: EntityRef) -> Option<&mut ScriptData> {
        self.script_slot(target)?.as_mut()
    }

    /// The owner's script container, created if it has none yet.
    pub fn script_entry(&mut self, target: EntityRef) -> Option<&mut ScriptData> {
        Some(self.script_slot(target)?.get_or_insert_with(ScriptData::default))
    }

    pub fn trigger(&self, owner: EntityRef, trig: TrigId) -> Option<&Trigger> {
        self.script(owner)?.find(trig)
    }

    pub fn trigger_mut(&mut self, owner: EntityRef, trig: TrigId) -> Option<&mut Trigger> {
        self.script_mut(owner)?.find_mut(trig)
    }

    pub fn is_alive(&self, target: EntityRef) -> bool {
        match target {
            EntityRef::Char(id) => self.chars.contains(id),
            EntityRef::Obj(id) => self.objs.contains(id),
            EntityRef::Room(vnum) => self.rooms.contains_key(&vnum),
            EntityRef::Vehicle(id) => self.vehicles.contains(id),
            EntityRef::Empire(vnum) => self.empires.contains_key(&vnum),
        }
    }

    pub fn uid_of(&self, target: EntityRef) -> Option<Uid> {
        match target {
            EntityRef::Char(id) => self.char(id).map(|c| c.uid),
            EntityRef::Obj(id) => self.obj(id).map(|o| o.uid),
            EntityRef::Vehicle(id) => self.vehicle(id).map(|v| v.uid),
            EntityRef::Room(vnum) => self.rooms.contains_key(&vnum).then(|| Uid::room(vnum)),
            EntityRef::Empire(vnum) => self.empires.contains_key(&vnum).then(|| Uid::empire(vnum)),
        }
    }

    /// Resolves a script id to a live entity; stale ids are not found.
    pub fn find_uid(&self, uid: Uid) -> Option<EntityRef> {
        match uid.space() {
            IdSpace::Room => {
                let vnum = i32::try_from(uid.0 - ROOM_ID_BASE).ok()?;
                self.rooms.contains_key(&vnum).then_some(EntityRef::Room(vnum))
            }
            IdSpace::Empire => {
                let vnum = i32::try_from(uid.0 - EMPIRE_ID_BASE).ok()?;
                self.empires.contains_key(&vnum).then_some(EntityRef::Empire(vnum))
            }
            _ => self.uids.lookup(uid).filter(|e| self.is_alive(*e)),
        }
    }

    pub fn request_save(&mut self, target: EntityRef) {
        if !self.pending_saves.contains(&target) {
            self.pending_saves.push(target);
        }
    }

    pub fn record_script_error(&mut self, msg: String) {
        if self.script_errors.len() >= SCRIPT_ERROR_HISTORY {
            self.script_errors.pop_front();
        }
        self.script_errors.push_back(msg);
    }

    // locations

    /// The room an entity is in, following containers and carriers up.
    pub fn entity_room(&self, target: EntityRef) -> Option<RoomVnum> {
        match target {
            EntityRef::Char(id) => self.char(id)?.in_room,
            EntityRef::Obj(id) => self.obj_room(id),
            EntityRef::Room(vnum) => Some(vnum),
            EntityRef::Vehicle(id) => self.vehicle(id)?.in_room,
            EntityRef::Empire(_) => None,
        }
    }

    pub fn obj_room(&self, obj: ObjId) -> Option<RoomVnum> {
        let mut cur = obj;
        // containers can't nest deeper than the arena holds
        for _ in 0..=self.objs.len() {
            match self.obj(cur)?.location {
                ObjLocation::Nowhere => return None,
                ObjLocation::Room(r) => return Some(r),
                ObjLocation::CarriedBy(ch) | ObjLocation::WornBy(ch, _) => {
                    return self.char(ch)?.in_room;
                }
                ObjLocation::InVehicle(v) => return self.vehicle(v)?.in_room,
                ObjLocation::InObj(parent) => cur = parent,
            }
        }
        log::warn!("container loop at {obj:?}");
        None
    }

    /// The outermost container of `obj`.
    pub fn top_object(&self, obj: ObjId) -> ObjId {
        let mut cur = obj;
        for _ in 0..=self.objs.len() {
            match self.obj(cur).and_then(Object::in_obj) {
                Some(parent) => cur = parent,
                None => break,
            }
        }
        cur
    }

    pub fn char_to_room(&mut self, ch: CharId, room: RoomVnum) {
        if !self.rooms.contains_key(&room) {
            log::warn!("char_to_room: no room {room}");
            return;
        }
        self.char_from_room(ch);
        let Some(c) = self.chars.get_mut(ch) else {
            return;
        };
        c.in_room = Some(room);
        if let Some(r) = self.rooms.get_mut(&room) {
            r.people.insert(0, ch);
        }
    }

    pub fn char_from_room(&mut self, ch: CharId) {
        let Some(room) = self.chars.get_mut(ch).and_then(|c| c.in_room.take()) else {
            return;
        };
        if let Some(r) = self.rooms.get_mut(&room) {
            r.people.retain(|&p| p != ch);
        }
    }

    /// Detaches an object from wherever it is.
    pub fn obj_from_location(&mut self, obj: ObjId) {
        let Some(loc) = self.obj(obj).map(|o| o.location) else {
            return;
        };
        match loc {
            ObjLocation::Nowhere => {}
            ObjLocation::Room(r) => {
                if let Some(room) = self.rooms.get_mut(&r) {
                    room.contents.retain(|&o| o != obj);
                }
            }
            ObjLocation::CarriedBy(ch) => {
                if let Some(c) = self.chars.get_mut(ch) {
                    c.carrying.retain(|&o| o != obj);
                }
            }
            ObjLocation::WornBy(ch, pos) => {
                if let Some(c) = self.chars.get_mut(ch) {
                    c.equipment[pos as usize] = None;
                }
            }
            ObjLocation::InObj(parent) => {
                if let Some(p) = self.objs.get_mut(parent) {
                    p.contents.retain(|&o| o != obj);
                }
            }
            ObjLocation::InVehicle(v) => {
                if let Some(veh) = self.vehicles.get_mut(v) {
                    veh.contents.retain(|&o| o != obj);
                }
            }
        }
        if let Some(o) = self.objs.get_mut(obj) {
            o.location = ObjLocation::Nowhere;
        }
    }

    pub fn obj_to_room(&mut self, obj: ObjId, room: RoomVnum) {
        if !self.rooms.contains_key(&room) {
            log::warn!("obj_to_room: no room {room}");
            return;
        }
        self.obj_from_location(obj);
        let now = self.now();
        let Some(o) = self.objs.get_mut(obj) else {
            return;
        };
        o.location = ObjLocation::Room(room);
        o.autostore_timer = now;
        if let Some(r) = self.rooms.get_mut(&room) {
            r.contents.insert(0, obj);
        }
    }

    pub fn obj_to_char(&mut self, obj: ObjId, ch: CharId) {
        if !self.chars.contains(ch) {
            return;
        }
        self.obj_from_location(obj);
        let loyalty = self.char(ch).and_then(|c| c.loyalty);
        let Some(o) = self.objs.get_mut(obj) else {
            return;
        };
        o.location = ObjLocation::CarriedBy(ch);
        o.last_empire = loyalty.or(o.last_empire);
        if let Some(c) = self.chars.get_mut(ch) {
            c.carrying.insert(0, obj);
        }
    }

    pub fn obj_to_obj(&mut self, obj: ObjId, container: ObjId) {
        if obj == container || !self.objs.contains(container) {
            return;
        }
        self.obj_from_location(obj);
        let now = self.now();
        let Some(o) = self.objs.get_mut(obj) else {
            return;
        };
        o.location = ObjLocation::InObj(container);
        o.autostore_timer = now;
        if let Some(c) = self.objs.get_mut(container) {
            c.contents.insert(0, obj);
        }
    }

    pub fn obj_to_vehicle(&mut self, obj: ObjId, veh: VehId) {
        if !self.vehicles.contains(veh) {
            return;
        }
        self.obj_from_location(obj);
        let now = self.now();
        let Some(o) = self.objs.get_mut(obj) else {
            return;
        };
        o.location = ObjLocation::InVehicle(veh);
        o.autostore_timer = now;
        if let Some(v) = self.vehicles.get_mut(veh) {
            v.contents.insert(0, obj);
        }
    }

    /// Wears `obj` at `pos`; fails if the slot is taken.
    pub fn equip_char(&mut self, ch: CharId, obj: ObjId, pos: WearPos) -> bool {
        match self.char(ch) {
            Some(c) if c.equipment[pos as usize].is_none() => {}
            _ => return false,
        }
        self.obj_from_location(obj);
        let Some(o) = self.objs.get_mut(obj) else {
            return false;
        };
        o.location = ObjLocation::WornBy(ch, pos);
        if let Some(c) = self.chars.get_mut(ch) {
            c.equipment[pos as usize] = Some(obj);
        }
        true
    }

    /// Moves whatever is worn at `pos` to inventory.
    pub fn unequip_char_to_inventory(&mut self, ch: CharId, pos: WearPos) -> Option<ObjId> {
        let obj = self.char(ch)?.equipment[pos as usize]?;
        self.obj_to_char(obj, ch);
        Some(obj)
    }

    pub fn vehicle_to_room(&mut self, veh: VehId, room: RoomVnum) {
        if !self.rooms.contains_key(&room) {
            return;
        }
        self.vehicle_from_room(veh);
        let now = self.now();
        let Some(v) = self.vehicles.get_mut(veh) else {
            return;
        };
        v.in_room = Some(room);
        v.last_move_time = now;
        if let Some(r) = self.rooms.get_mut(&room) {
            r.vehicles.insert(0, veh);
        }
    }

    pub fn vehicle_from_room(&mut self, veh: VehId) {
        let Some(room) = self.vehicles.get_mut(veh).and_then(|v| v.in_room.take()) else {
            return;
        };
        if let Some(r) = self.rooms.get_mut(&room) {
            r.vehicles.retain(|&v| v != veh);
        }
    }

    /// The map room `(dx, dy)` away from `origin`'s map location.
    pub fn real_shift(&self, origin: RoomVnum, dx: i32, dy: i32) -> Option<RoomVnum> {
        let (x, y) = self.room(origin)?.coords()?;
        let (nx, ny) = map::coord_shift(x, y, dx, dy)?;
        let vnum = map::map_vnum(nx, ny);
        self.rooms.contains_key(&vnum).then_some(vnum)
    }

    pub fn compute_distance(&self, a: RoomVnum, b: RoomVnum) -> i32 {
        let (x1, y1) = self.room(a).and_then(Room::coords).unwrap_or((-1, -1));
        let (x2, y2) = self.room(b).and_then(Room::coords).unwrap_or((-1, -1));
        map::compute_map_distance(x1, y1, x2, y2)
    }

    /// Map distance from `room` to the closest connected player.
    pub fn distance_to_nearest_player(&self, room: RoomVnum) -> i32 {
        self.chars
            .iter()
            .filter(|(_, c)| !c.is_npc && c.connected)
            .filter_map(|(_, c)| c.in_room)
            .map(|r| self.compute_distance(room, r))
            .min()
            .unwrap_or(i32::MAX)
    }

    pub fn direction_to(&self, from: RoomVnum, to: RoomVnum) -> Option<empire_types::Direction> {
        let (x1, y1) = self.room(from)?.coords()?;
        let (x2, y2) = self.room(to)?.coords()?;
        map::direction_between(x1, y1, x2, y2)
    }

    pub fn any_players_in_room(&self, room: RoomVnum) -> bool {
        self.room(room).is_some_and(|r| {
            r.people
                .iter()
                .filter_map(|&p| self.char(p))
                .any(|c| !c.is_npc)
        })
    }

    pub fn add_tracks(&mut self, room: RoomVnum, player_id: u32, dir: empire_types::Direction) {
        let now = self.now();
        if let Some(r) = self.rooms.get_mut(&room) {
            r.tracks.retain(|t| t.player_id != player_id);
            r.tracks.insert(
                0,
                Track {
                    player_id,
                    dir,
                    timestamp: now,
                },
            );
        }
    }

    // messaging

    pub fn send_to_char(&mut self, ch: CharId, msg: impl Into<String>) {
        if let Some(c) = self.chars.get_mut(ch) {
            c.send(msg);
        }
    }

    pub fn send_to_room(&mut self, room: RoomVnum, msg: &str, except: Option<CharId>) {
        let people = self.room(room).map(|r| r.people.clone()).unwrap_or_default();
        for p in people.into_iter().filter(|&p| Some(p) != except) {
            self.send_to_char(p, msg);
        }
    }

    /// Formats an `act` string for the given participants.
    pub fn format_act(
        &self,
        text: &str,
        ch: Option<CharId>,
        obj: Option<ObjId>,
        arg: Option<&ActArg>,
    ) -> String {
        let actor = ch.and_then(|c| self.char(c));
        let vict = match arg {
            Some(ActArg::Char(v)) => self.char(*v),
            _ => None,
        };
        let mut out = String::with_capacity(text.len() + 16);
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            let Some(code) = chars.next() else {
                out.push('$');
                break;
            };
            match code {
                'n' => out.push_str(actor.map_or("someone", |a| a.name())),
                'N' => out.push_str(vict.map_or("someone", |v| v.name())),
                'e' => out.push_str(actor.map_or("it", |a| a.sex.heshe())),
                'm' => out.push_str(actor.map_or("it", |a| a.sex.himher())),
                's' => out.push_str(actor.map_or("its", |a| a.sex.hisher())),
                'E' => out.push_str(vict.map_or("it", |v| v.sex.heshe())),
                'M' => out.push_str(vict.map_or("it", |v| v.sex.himher())),
                'S' => out.push_str(vict.map_or("its", |v| v.sex.hisher())),
                'p' => out.push_str(
                    obj.and_then(|o| self.obj(o))
                        .map_or("something", |o| o.short_descr.as_str()),
                ),
                'V' => match arg {
                    Some(ActArg::Vehicle(v)) => out.push_str(
                        self.vehicle(*v)
                            .map_or("something", |v| v.short_descr.as_str()),
                    ),
                    _ => out.push_str("something"),
                },
                'T' => {
                    if let Some(ActArg::Text(t)) = arg {
                        out.push_str(t);
                    }
                }
                '$' => out.push('$'),
                other => {
                    out.push('$');
                    out.push(other);
                }
            }
        }
        capitalize(&out)
    }

    /// Sends a formatted message to the audience `to` selects.
    pub fn act(
        &mut self,
        text: &str,
        ch: Option<CharId>,
        obj: Option<ObjId>,
        arg: Option<ActArg>,
        to: ActTo,
    ) {
        let msg = self.format_act(text, ch, obj, arg.as_ref());
        let vict = match arg {
            Some(ActArg::Char(v)) => Some(v),
            _ => None,
        };
        match to {
            ActTo::Char => {
                if let Some(c) = ch {
                    self.send_to_char(c, msg);
                }
            }
            ActTo::Vict => {
                if let Some(v) = vict {
                    self.send_to_char(v, msg);
                }
            }
            ActTo::Room | ActTo::NotVict => {
                let Some(room) = ch.and_then(|c| self.char(c)).and_then(|c| c.in_room) else {
                    return;
                };
                let people = self.room(room).map(|r| r.people.clone()).unwrap_or_default();
                for p in people {
                    if Some(p) == ch || (to == ActTo::NotVict && Some(p) == vict) {
                        continue;
                    }
                    self.send_to_char(p, msg.clone());
                }
            }
        }
    }

    /// An actor-less message to everyone in `room`.
    pub fn act_room(&mut self, room: RoomVnum, text: &str, obj: Option<ObjId>, arg: Option<ActArg>) {
        let msg = self.format_act(text, None, obj, arg.as_ref());
        self.send_to_room(room, &msg, None);
    }

    // combat glue

    pub fn engage(&mut self, ch: CharId, vict: CharId) {
        if ch == vict || !self.chars.contains(ch) || !self.chars.contains(vict) {
            return;
        }
        for (a, b) in [(ch, vict), (vict, ch)] {
            if let Some(c) = self.chars.get_mut(a) {
                if c.fighting.is_none() {
                    c.fighting = Some(b);
                    if c.position > Position::Fighting {
                        c.position = Position::Fighting;
                    }
                }
            }
        }
    }

    pub fn stop_fighting(&mut self, ch: CharId) {
        if let Some(c) = self.chars.get_mut(ch) {
            c.fighting = None;
            if c.position == Position::Fighting {
                c.position = Position::Standing;
            }
        }
    }

    /// Applies damage; returns false if `ch` died.
    pub fn damage(&mut self, ch: CharId, amount: i32) -> bool {
        let pulse = self.pulse();
        let Some(c) = self.chars.get_mut(ch) else {
            return false;
        };
        c.points.health -= amount;
        if amount > 0 {
            c.last_damaged = pulse;
        }
        c.update_pos();
        if c.is_dead() {
            self.die(ch);
            return false;
        }
        true
    }

    /// NPCs leave a corpse and are extracted; players stay, dead.
    pub fn die(&mut self, ch: CharId) {
        let Some(c) = self.char(ch) else {
            return;
        };
        let (is_npc, room, name, size) = (c.is_npc, c.in_room, c.name().to_string(), c.size);
        let fighters: Vec<CharId> = self
            .chars
            .iter()
            .filter(|(_, o)| o.fighting == Some(ch))
            .map(|(id, _)| id)
            .collect();
        for f in fighters {
            self.stop_fighting(f);
        }
        self.stop_fighting(ch);
        if let Some(c) = self.chars.get_mut(ch) {
            c.position = Position::Dead;
        }
        if !is_npc {
            return;
        }
        if let Some(room) = room {
            let mut corpse = Object::new(-1, "corpse", &format!("the corpse of {name}"), ItemType::Corpse);
            corpse.timer = NPC_CORPSE_TIME;
            corpse.corpse_size = size;
            let corpse = self.add_object(corpse);
            let mut items: Vec<ObjId> = self.char(ch).map(|c| c.carrying.clone()).unwrap_or_default();
            items.extend(self.char(ch).into_iter().flat_map(|c| c.equipment.iter().flatten().copied()));
            for obj in items {
                self.obj_to_obj(obj, corpse);
            }
            self.obj_to_room(corpse, room);
        }
        self.extract_char(ch);
    }

    pub fn stop_follower(&mut self, ch: CharId) {
        let Some(master) = self.chars.get_mut(ch).and_then(|c| c.master.take()) else {
            return;
        };
        if let Some(m) = self.chars.get_mut(master) {
            m.followers.retain(|&f| f != ch);
        }
    }

    // scheduling

    pub fn schedule_mob_event(&mut self, mob: CharId, kind: MobEventKind, delay: u64) {
        if self.char(mob).and_then(|c| c.mob_event(kind)).is_some() {
            return;
        }
        let pulse = self.pulse();
        let id = self.events.schedule(pulse, delay, WorldEvent::MobAi { mob, kind });
        if let Some(c) = self.chars.get_mut(mob) {
            c.set_mob_event(kind, Some(id));
        }
    }

    pub fn cancel_mob_event(&mut self, mob: CharId, kind: MobEventKind) {
        if let Some(id) = self.chars.get_mut(mob).and_then(|c| c.mob_events[kind as usize].take()) {
            self.events.cancel(id);
        }
    }

    pub fn schedule_heal_over_time(&mut self, ch: CharId) {
        match self.char(ch) {
            Some(c) if c.extras.heal_over_time > 0 && c.heal_event.is_none() => {}
            _ => return,
        }
        let pulse = self.pulse();
        let id = self
            .events
            .schedule(pulse, crate::time::rl_sec(5), WorldEvent::HealOverTime { ch });
        if let Some(c) = self.chars.get_mut(ch) {
            c.heal_event = Some(id);
        }
    }

    pub fn schedule_wait(&mut self, owner: EntityRef, trig: TrigId, delay: u64) -> EventId {
        let pulse = self.pulse();
        self.events
            .schedule(pulse, delay, WorldEvent::TriggerWait { owner, trig })
    }

    fn cancel_script_events(&mut self, target: EntityRef) {
        let waits: Vec<EventId> = self
            .script(target)
            .map(|sc| sc.triggers.iter().filter_map(|t| t.wait_event).collect())
            .unwrap_or_default();
        for ev in waits {
            self.events.cancel(ev);
        }
    }

    // extraction

    pub fn extract_char(&mut self, ch: CharId) {
        let Some(c) = self.char(ch) else {
            return;
        };
        let events: Vec<EventId> = c.mob_events.iter().flatten().copied().chain(c.heal_event).collect();
        let (uid, room) = (c.uid, c.in_room);
        let followers = c.followers.clone();
        let related = [c.fed_on_by, c.feeding_from, c.leading_mob, c.led_by];
        let vehicles = [c.leading_vehicle, c.sitting_on, c.driving];
        let mut items = c.carrying.clone();
        items.extend(c.equipment.iter().flatten().copied());

        for ev in events {
            self.events.cancel(ev);
        }
        self.cancel_script_events(EntityRef::Char(ch));

        self.stop_follower(ch);
        for f in followers {
            if let Some(fc) = self.chars.get_mut(f) {
                fc.master = None;
            }
        }
        for other in related.into_iter().flatten() {
            if let Some(o) = self.chars.get_mut(other) {
                for slot in [&mut o.fed_on_by, &mut o.feeding_from, &mut o.leading_mob, &mut o.led_by] {
                    if *slot == Some(ch) {
                        *slot = None;
                    }
                }
            }
        }
        for veh in vehicles.into_iter().flatten() {
            if let Some(v) = self.vehicles.get_mut(veh) {
                for slot in [&mut v.sitting_on, &mut v.driver, &mut v.led_by] {
                    if *slot == Some(ch) {
                        *slot = None;
                    }
                }
            }
        }

        for obj in items {
            match room {
                Some(r) => self.obj_to_room(obj, r),
                None => self.extract_obj(obj),
            }
        }

        let fighters: Vec<CharId> = self
            .chars
            .iter()
            .filter(|(_, o)| o.fighting == Some(ch))
            .map(|(id, _)| id)
            .collect();
        for f in fighters {
            self.stop_fighting(f);
        }

        self.char_from_room(ch);
        self.uids.unregister(uid);
        self.chars.remove(ch);
        log::debug!("extracted character {uid}");
    }

    pub fn extract_obj(&mut self, obj: ObjId) {
        let Some(o) = self.obj(obj) else {
            return;
        };
        let uid = o.uid;
        let contents = o.contents.clone();
        for inner in contents {
            self.extract_obj(inner);
        }
        self.cancel_script_events(EntityRef::Obj(obj));
        self.obj_from_location(obj);
        self.uids.unregister(uid);
        self.objs.remove(obj);
    }

    /// Removes a vehicle; its contents spill into its room.
    pub fn extract_vehicle(&mut self, veh: VehId) {
        let Some(v) = self.vehicle(veh) else {
            return;
        };
        let (uid, room, contents) = (v.uid, v.in_room, v.contents.clone());
        let riders = [v.sitting_on, v.driver, v.led_by];
        for obj in contents {
            match room {
                Some(r) => self.obj_to_room(obj, r),
                None => self.extract_obj(obj),
            }
        }
        for ch in riders.into_iter().flatten() {
            if let Some(c) = self.chars.get_mut(ch) {
                for slot in [&mut c.sitting_on, &mut c.driving, &mut c.leading_vehicle] {
                    if *slot == Some(veh) {
                        *slot = None;
                    }
                }
            }
        }
        self.cancel_script_events(EntityRef::Vehicle(veh));
        self.vehicle_from_room(veh);
        self.uids.unregister(uid);
        self.vehicles.remove(veh);
    }
}

/// Uppercases the first letter, the way every `act` line starts.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script_data::TriggerProto;
    use empire_types::AttachType;

    fn world() -> World {
        let mut w = World::new(GameConfig::default(), 7, 1_000_000);
        w.add_room(Room::new(100, "Plains"));
        w.add_room(Room::new(101, "Forest"));
        let mut guard = Character::new_mob(3000, "city guard", "the city guard", 10);
        guard.sex = empire_types::Sex::Female;
        w.mob_protos.insert(3000, guard);
        w.obj_protos.insert(
            50,
            Object::new(50, "bread loaf", "a loaf of bread", ItemType::Food),
        );
        w.add_trigger_proto(TriggerProto {
            vnum: 1,
            name: "greeter".into(),
            attach: AttachType::Mob,
            types: 1,
            narg: 100,
            arglist: String::new(),
            commands: Rc::from(vec!["say hi".to_string()]),
        });
        w
    }

    #[test]
    fn uid_round_trip_and_extraction() {
        let mut w = world();
        let mob = w.read_mobile(3000).expect("mob");
        w.char_to_room(mob, 100);
        let uid = w.uid_of(EntityRef::Char(mob)).expect("uid");
        assert_eq!(w.find_uid(uid), Some(EntityRef::Char(mob)));
        w.extract_char(mob);
        assert_eq!(w.find_uid(uid), None);
        assert!(w.room(100).is_some_and(|r| r.people.is_empty()));
    }

    #[test]
    fn room_and_empire_uids() {
        let mut w = world();
        w.add_empire(Empire::new(4, "Rome", "Roman"));
        assert_eq!(w.find_uid(Uid::room(100)), Some(EntityRef::Room(100)));
        assert_eq!(w.find_uid(Uid::room(999)), None);
        assert_eq!(w.find_uid(Uid::empire(4)), Some(EntityRef::Empire(4)));
    }

    #[test]
    fn players_cannot_hold_triggers() {
        let mut w = world();
        let pc = w.add_player(Character::new_player(5, "Ann", 10), 100);
        assert_eq!(
            w.attach_trigger(EntityRef::Char(pc), 1),
            Err(WorldError::PlayerScript)
        );
        let mob = w.read_mobile(3000).expect("mob");
        assert!(w.attach_trigger(EntityRef::Char(mob), 1).is_ok());
        assert!(w.attach_trigger(EntityRef::Char(mob), 2).is_err());
        assert!(w.detach_trigger(EntityRef::Char(mob), Some(1)));
        assert!(w.script(EntityRef::Char(mob)).is_none());
    }

    #[test]
    fn act_formats_pronouns() {
        let mut w = world();
        let mob = w.read_mobile(3000).expect("mob");
        w.char_to_room(mob, 100);
        let pc = w.add_player(Character::new_player(5, "Ann", 10), 100);
        let bread = w.read_object(50).expect("obj");
        w.act("$n eats $p and licks $s lips.", Some(mob), Some(bread), None, ActTo::Room);
        let out = &w.char(pc).expect("pc").output;
        assert_eq!(out, &vec!["The city guard eats a loaf of bread and licks her lips.".to_string()]);
    }

    #[test]
    fn extracting_a_carrier_drops_inventory() {
        let mut w = world();
        let mob = w.read_mobile(3000).expect("mob");
        w.char_to_room(mob, 101);
        let bread = w.read_object(50).expect("obj");
        w.obj_to_char(bread, mob);
        w.extract_char(mob);
        assert_eq!(w.obj(bread).and_then(Object::in_room), Some(101));
    }

    #[test]
    fn npc_death_leaves_corpse() {
        let mut w = world();
        let mob = w.read_mobile(3000).expect("mob");
        w.char_to_room(mob, 100);
        assert!(!w.damage(mob, 1000));
        assert!(w.char(mob).is_none());
        let room = w.room(100).expect("room");
        let corpse = w.obj(room.contents[0]).expect("corpse");
        assert_eq!(corpse.item_type, ItemType::Corpse);
        assert_eq!(corpse.timer, NPC_CORPSE_TIME);
    }

    #[test]
    fn script_errors_are_bounded() {
        let mut w = world();
        for i in 0..(SCRIPT_ERROR_HISTORY + 5) {
            w.record_script_error(format!("e{i}"));
        }
        assert_eq!(w.script_errors.len(), SCRIPT_ERROR_HISTORY);
        assert_eq!(w.script_errors.front().map(String::as_str), Some("e5"));
    }
}
