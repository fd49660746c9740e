use std::collections::{HashMap, HashSet};

use empire_types::{
    AffFlags, ApplyType, Attribute, BonusTraits, Condition, Injuries, MobFlags, MoveType,
    PlayerFlags, Position, Preferences, Sex, UNLIMITED, WearPos,
};
use strum::EnumCount;

use crate::entity::{CharId, EmpireVnum, MobVnum, ObjId, ObjVnum, RoomVnum, TrigVnum, VehId};
use crate::event::{EventId, MobEventKind};
use crate::script_data::ScriptData;
use crate::uid::Uid;

pub const LVL_MORTAL: i32 = 1;
pub const LVL_APPROVED: i32 = 2;
pub const LVL_GOD: i32 = 3;
pub const LVL_START_IMM: i32 = 4;
pub const LVL_BUILDER: i32 = LVL_START_IMM;
pub const LVL_IMPL: i32 = 6;
pub const LVL_TOP: i32 = 7;

/// Mobs at or above this level recognize anyone through a disguise.
pub const SEE_THROUGH_DISGUISE_LEVEL: i32 = 100;

/// Where a timed affect came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffectType {
    /// Applied by a script through `dg_affect`.
    Script,
    Stun,
    StunImmunity,
    WellFed,
    NatureBurn,
    Poison,
}

impl AffectType {
    const ALL: [Self; 6] = [
        Self::Script,
        Self::Stun,
        Self::StunImmunity,
        Self::WellFed,
        Self::NatureBurn,
        Self::Poison,
    ];

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Stun => "stun",
            Self::StunImmunity => "stun immunity",
            Self::WellFed => "well-fed",
            Self::NatureBurn => "nature burn",
            Self::Poison => "poison",
        }
    }

    /// Message shown when the last affect of this type runs out.
    pub fn wear_off_msg(self) -> Option<&'static str> {
        match self {
            Self::Script | Self::StunImmunity => None,
            Self::Stun => Some("You are no longer stunned."),
            Self::WellFed => Some("You are no longer well-fed."),
            Self::NatureBurn => Some("The nature burn subsides."),
            Self::Poison => Some("The poison wears off."),
        }
    }
}

/// A timed modifier. Duration counts real updates; negative never expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affect {
    pub atype: AffectType,
    pub cast_by: Option<Uid>,
    pub duration: i32,
    pub modifier: i32,
    pub location: ApplyType,
    pub bits: AffFlags,
}

/// A damage-over-time effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotEffect {
    pub atype: AffectType,
    pub cast_by: Option<Uid>,
    pub duration: i32,
    pub damage: i32,
    pub stack: i32,
    pub max_stack: i32,
}

/// Someone a mob is chasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PursuitEntry {
    pub idnum: u32,
    pub last_seen: u64,
    pub location: RoomVnum,
    /// What the target looked like when last seen.
    pub disguise: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cooldown {
    pub name: String,
    pub expires: u64,
}

/// Current and maximum pools plus the damage still owed to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Points {
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub moves: i32,
    pub max_move: i32,
    pub blood: i32,
    pub max_blood: i32,
    pub health_deficit: i32,
    pub mana_deficit: i32,
    pub move_deficit: i32,
}

/// Secondary stats that affects and gear can raise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extras {
    pub health_regen: i32,
    pub mana_regen: i32,
    pub move_regen: i32,
    pub block: i32,
    pub dodge: i32,
    pub to_hit: i32,
    pub resist_physical: i32,
    pub resist_magical: i32,
    pub heal_over_time: i32,
    pub inventory: i32,
    pub bonus_physical: i32,
    pub bonus_magical: i32,
    pub bonus_healing: i32,
    pub crafting: i32,
    pub age: i32,
}

/// A player or mobile.
#[derive(Debug, Clone)]
pub struct Character {
    pub uid: Uid,
    /// Player id number; mobs share 0.
    pub idnum: u32,
    /// Prototype vnum; -1 for players.
    pub vnum: MobVnum,
    pub is_npc: bool,
    pub keywords: String,
    pub short_descr: String,
    pub level: i32,
    pub access_level: i32,
    pub sex: Sex,
    pub position: Position,
    pub points: Points,
    pub extras: Extras,
    pub attributes: [i32; Attribute::COUNT],
    pub conditions: [i16; Condition::COUNT],
    pub last_cond_message: [u64; Condition::COUNT],
    pub affects: Vec<Affect>,
    pub dots: Vec<DotEffect>,
    pub base_aff: AffFlags,
    pub mob_flags: MobFlags,
    pub plr_flags: PlayerFlags,
    pub prefs: Preferences,
    pub bonus_traits: BonusTraits,
    pub injuries: Injuries,
    pub move_type: MoveType,
    pub size: i32,
    pub is_vampire: bool,
    pub blood_upkeep: i32,
    pub in_room: Option<RoomVnum>,
    pub home_room: Option<RoomVnum>,
    pub carrying: Vec<ObjId>,
    pub equipment: [Option<ObjId>; WearPos::COUNT],
    pub fighting: Option<CharId>,
    pub master: Option<CharId>,
    pub followers: Vec<CharId>,
    pub led_by: Option<CharId>,
    pub leading_mob: Option<CharId>,
    pub leading_vehicle: Option<VehId>,
    pub sitting_on: Option<VehId>,
    pub driving: Option<VehId>,
    pub riding: bool,
    pub fed_on_by: Option<CharId>,
    pub feeding_from: Option<CharId>,
    pub loyalty: Option<EmpireVnum>,
    pub faction: Option<String>,
    pub liked_factions: HashSet<String>,
    pub pursuit: Vec<PursuitEntry>,
    pub pursuit_leash: Option<RoomVnum>,
    pub mob_events: [Option<EventId>; MobEventKind::COUNT],
    pub heal_event: Option<EventId>,
    pub script: Option<ScriptData>,
    pub proto_script: Vec<TrigVnum>,
    /// Text sent to this character, one entry per message.
    pub output: Vec<String>,
    /// Commands forced on this character, in order.
    pub input: Vec<String>,
    /// Has a live connection.
    pub connected: bool,
    pub writing: bool,
    pub skills: HashMap<String, i32>,
    pub abilities: HashSet<String>,
    pub coins: i32,
    pub tagged_by: Vec<u32>,
    pub daily_cycle: u64,
    pub daily_bonus_exp: i32,
    pub daily_quests: i32,
    pub disguise: Option<String>,
    pub hostile_until: u64,
    pub gear_level: i32,
    pub cooldowns: Vec<Cooldown>,
    /// Unique items autostored out of the player's private home.
    pub home_storage: Vec<ObjVnum>,
    /// Pulse the mob last took damage; the reset event compares against it.
    pub last_damaged: u64,
    pub extracted: bool,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            uid: Uid(0),
            idnum: 0,
            vnum: -1,
            is_npc: false,
            keywords: String::new(),
            short_descr: String::new(),
            level: 1,
            access_level: LVL_MORTAL,
            sex: Sex::Neutral,
            position: Position::Standing,
            points: Points::default(),
            extras: Extras::default(),
            attributes: [1; Attribute::COUNT],
            conditions: [0; Condition::COUNT],
            last_cond_message: [0; Condition::COUNT],
            affects: Vec::new(),
            dots: Vec::new(),
            base_aff: AffFlags::empty(),
            mob_flags: MobFlags::empty(),
            plr_flags: PlayerFlags::empty(),
            prefs: Preferences::empty(),
            bonus_traits: BonusTraits::empty(),
            injuries: Injuries::empty(),
            move_type: MoveType::Walk,
            size: 2,
            is_vampire: false,
            blood_upkeep: 0,
            in_room: None,
            home_room: None,
            carrying: Vec::new(),
            equipment: [None; WearPos::COUNT],
            fighting: None,
            master: None,
            followers: Vec::new(),
            led_by: None,
            leading_mob: None,
            leading_vehicle: None,
            sitting_on: None,
            driving: None,
            riding: false,
            fed_on_by: None,
            feeding_from: None,
            loyalty: None,
            faction: None,
            liked_factions: HashSet::new(),
            pursuit: Vec::new(),
            pursuit_leash: None,
            mob_events: [None; MobEventKind::COUNT],
            heal_event: None,
            script: None,
            proto_script: Vec::new(),
            output: Vec::new(),
            input: Vec::new(),
            connected: false,
            writing: false,
            skills: HashMap::new(),
            abilities: HashSet::new(),
            coins: 0,
            tagged_by: Vec::new(),
            daily_cycle: 0,
            daily_bonus_exp: 0,
            daily_quests: 0,
            disguise: None,
            hostile_until: 0,
            gear_level: 0,
            cooldowns: Vec::new(),
            home_storage: Vec::new(),
            last_damaged: 0,
            extracted: false,
        }
    }
}

/// Hunger, thirst and drunkenness become noticeable at this value.
pub const CONDITION_THRESHOLD: i16 = 15 * 24;
pub const MAX_CONDITION: i16 = 750;

impl Character {
    /// A fresh player with full pools.
    pub fn new_player(idnum: u32, name: &str, level: i32) -> Self {
        let mut ch = Self {
            uid: Uid(idnum),
            idnum,
            keywords: name.to_string(),
            short_descr: name.to_string(),
            level,
            connected: true,
            ..Self::default()
        };
        ch.set_max_pools(100, 100, 100, 10);
        ch
    }

    /// A fresh mob instance; the world assigns its uid.
    pub fn new_mob(vnum: MobVnum, keywords: &str, short_descr: &str, level: i32) -> Self {
        let mut ch = Self {
            vnum,
            is_npc: true,
            keywords: keywords.to_string(),
            short_descr: short_descr.to_string(),
            level,
            mob_flags: MobFlags::ISNPC,
            conditions: [UNLIMITED; Condition::COUNT],
            ..Self::default()
        };
        ch.set_max_pools(level.max(1) * 10, level.max(1) * 5, 100, 10);
        ch
    }

    pub fn set_max_pools(&mut self, health: i32, mana: i32, moves: i32, blood: i32) {
        let p = &mut self.points;
        p.max_health = health;
        p.health = health;
        p.max_mana = mana;
        p.mana = mana;
        p.max_move = moves;
        p.moves = moves;
        p.max_blood = blood;
        p.blood = blood;
    }

    /// Display name as seen by others.
    pub fn name(&self) -> &str {
        if self.is_npc {
            &self.short_descr
        } else {
            self.disguise.as_deref().unwrap_or(&self.short_descr)
        }
    }

    /// Name used to address a player directly (the first keyword).
    pub fn pc_name(&self) -> &str {
        self.keywords.split_whitespace().next().unwrap_or("")
    }

    pub fn is_immortal(&self) -> bool {
        !self.is_npc && self.access_level >= LVL_START_IMM
    }

    pub fn is_god(&self) -> bool {
        !self.is_npc && self.access_level == LVL_GOD
    }

    pub fn nohassle(&self) -> bool {
        !self.is_npc && self.is_immortal() && self.prefs.contains(Preferences::NOHASSLE)
    }

    pub fn is_dead(&self) -> bool {
        self.position == Position::Dead
    }

    pub fn is_awake(&self) -> bool {
        self.position.is_awake()
    }

    pub fn mob_flagged(&self, bits: MobFlags) -> bool {
        self.is_npc && self.mob_flags.intersects(bits)
    }

    pub fn plr_flagged(&self, bits: PlayerFlags) -> bool {
        !self.is_npc && self.plr_flags.intersects(bits)
    }

    /// Innate bits plus every affect's bits.
    pub fn aff_flags(&self) -> AffFlags {
        self.affects
            .iter()
            .fold(self.base_aff, |acc, af| acc | af.bits)
    }

    pub fn aff_flagged(&self, bits: AffFlags) -> bool {
        self.aff_flags().intersects(bits)
    }

    pub fn is_injured(&self, bits: Injuries) -> bool {
        self.injuries.intersects(bits)
    }

    pub fn condition(&self, cond: Condition) -> i16 {
        self.conditions[cond as usize]
    }

    pub fn is_hungry(&self) -> bool {
        self.condition(Condition::Full) >= CONDITION_THRESHOLD
            && !self.bonus_traits.contains(BonusTraits::NO_HUNGER)
    }

    pub fn is_thirsty(&self) -> bool {
        self.condition(Condition::Thirst) >= CONDITION_THRESHOLD
            && !self.bonus_traits.contains(BonusTraits::NO_THIRST)
    }

    pub fn is_drunk(&self) -> bool {
        self.condition(Condition::Drunk) >= CONDITION_THRESHOLD
    }

    pub fn is_vampire(&self) -> bool {
        if self.is_npc {
            self.mob_flagged(MobFlags::VAMPIRE)
        } else {
            self.is_vampire || self.plr_flags.contains(PlayerFlags::VAMPIRE)
        }
    }

    pub fn is_blood_starved(&self, starvation_level: i32) -> bool {
        self.is_vampire() && self.points.blood <= starvation_level
    }

    pub fn attribute(&self, attr: Attribute) -> i32 {
        self.attributes[attr as usize]
    }

    pub fn skill(&self, name: &str) -> i32 {
        self.skills
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map_or(0, |(_, v)| *v)
    }

    pub fn has_ability(&self, name: &str) -> bool {
        self.abilities.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    pub fn carry_limit(&self) -> i32 {
        25 + self.extras.inventory
    }

    /// Keyword match against either the real or the disguised name.
    pub fn is_named(&self, word: &str) -> bool {
        is_name(word, &self.keywords) || self.disguise.as_deref().is_some_and(|d| is_name(word, d))
    }

    pub fn mob_event(&self, kind: MobEventKind) -> Option<EventId> {
        self.mob_events[kind as usize]
    }

    pub fn set_mob_event(&mut self, kind: MobEventKind, id: Option<EventId>) {
        self.mob_events[kind as usize] = id;
    }

    pub fn send(&mut self, msg: impl Into<String>) {
        self.output.push(msg.into());
    }

    pub fn set_health(&mut self, value: i32) {
        self.points.health = value.min(self.points.max_health);
    }

    pub fn set_mana(&mut self, value: i32) {
        self.points.mana = value.clamp(0, self.points.max_mana);
    }

    pub fn set_move(&mut self, value: i32) {
        self.points.moves = value.clamp(0, self.points.max_move);
    }

    pub fn set_blood(&mut self, value: i32) {
        self.points.blood = value.min(self.points.max_blood);
    }

    /// Restores health and recomputes position, the way a heal does.
    pub fn heal(&mut self, amount: i32) {
        self.set_health(self.points.health + amount);
        self.update_pos();
    }

    pub fn update_pos(&mut self) {
        self.position = Position::from_health(self.points.health, self.position);
    }

    /// Adds `af`, applying its modifier.
    pub fn affect_to_char(&mut self, af: Affect) {
        self.affect_modify(af.location, af.modifier, true);
        self.affects.push(af);
    }

    /// Removes the affect at `idx`, reverting its modifier.
    pub fn affect_remove(&mut self, idx: usize) -> Option<Affect> {
        if idx >= self.affects.len() {
            return None;
        }
        let af = self.affects.remove(idx);
        self.affect_modify(af.location, af.modifier, false);
        Some(af)
    }

    pub fn affect_from_char_by_apply(&mut self, atype: AffectType, apply: ApplyType) {
        while let Some(idx) = self
            .affects
            .iter()
            .position(|af| af.atype == atype && af.location == apply)
        {
            self.affect_remove(idx);
        }
    }

    pub fn affect_from_char_by_bits(&mut self, atype: AffectType, bits: AffFlags) {
        while let Some(idx) = self
            .affects
            .iter()
            .position(|af| af.atype == atype && af.bits.contains(bits))
        {
            self.affect_remove(idx);
        }
    }

    pub fn affected_by(&self, atype: AffectType) -> bool {
        self.affects.iter().any(|af| af.atype == atype) || self.dots.iter().any(|d| d.atype == atype)
    }

    /// Adds a damage-over-time effect, refreshing and stacking a matching one.
    pub fn apply_dot(&mut self, dot: DotEffect) {
        if let Some(existing) = self
            .dots
            .iter_mut()
            .find(|d| d.atype == dot.atype && d.damage == dot.damage)
        {
            existing.duration = existing.duration.max(dot.duration);
            if existing.stack < existing.max_stack.min(dot.max_stack) {
                existing.stack += 1;
            }
            return;
        }
        self.dots.insert(0, DotEffect { stack: 1, ..dot });
    }

    fn affect_modify(&mut self, location: ApplyType, modifier: i32, add: bool) {
        let m = if add { modifier } else { -modifier };
        if let Some(attr) = location.attribute() {
            self.attributes[attr as usize] += m;
            return;
        }
        let e = &mut self.extras;
        match location {
            ApplyType::HealthRegen => e.health_regen += m,
            ApplyType::MoveRegen => e.move_regen += m,
            ApplyType::ManaRegen => e.mana_regen += m,
            ApplyType::Age => e.age += m,
            ApplyType::MaxMove => self.points.max_move += m,
            ApplyType::ResistPhysical => e.resist_physical += m,
            ApplyType::Block => e.block += m,
            ApplyType::HealOverTime => e.heal_over_time += m,
            ApplyType::MaxHealth => self.points.max_health += m,
            ApplyType::MaxMana => self.points.max_mana += m,
            ApplyType::ToHit => e.to_hit += m,
            ApplyType::Dodge => e.dodge += m,
            ApplyType::Inventory => e.inventory += m,
            ApplyType::MaxBlood => self.points.max_blood += m,
            ApplyType::BonusPhysical => e.bonus_physical += m,
            ApplyType::BonusMagical => e.bonus_magical += m,
            ApplyType::BonusHealing => e.bonus_healing += m,
            ApplyType::ResistMagical => e.resist_magical += m,
            ApplyType::Crafting => e.crafting += m,
            _ => {}
        }
    }
}

/// Whether `word` abbreviates any keyword in `namelist`.
pub fn is_name(word: &str, namelist: &str) -> bool {
    let word = word.trim();
    !word.is_empty()
        && namelist.split_whitespace().any(|name| {
            name.len() >= word.len()
                && name.is_char_boundary(word.len())
                && name[..word.len()].eq_ignore_ascii_case(word)
        })
}
