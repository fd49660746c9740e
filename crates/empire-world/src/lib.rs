pub mod arena;
pub mod character;
pub mod config;
pub mod empire;
pub mod entity;
pub mod error;
pub mod event;
pub mod map;
pub mod object;
pub mod room;
pub mod script_data;
pub mod time;
pub mod uid;
pub mod value;
pub mod vars;
pub mod vehicle;
pub mod world;

pub use arena::{Arena, Handle, Sweep};
pub use character::{Affect, AffectType, Character, DotEffect, PursuitEntry};
pub use config::GameConfig;
pub use empire::{Empire, GameEvent, Instance, Relation};
pub use entity::{
    CharId, EmpireVnum, EntityRef, MobVnum, NOTHING, ObjId, ObjVnum, RoomVnum, TrigVnum, VehId,
    VehVnum,
};
pub use error::WorldError;
pub use event::{EventId, EventQueue, MobEventKind, Reschedule, WorldEvent};
pub use object::{ObjLocation, Object};
pub use room::{Exit, Room, Track};
pub use script_data::{ScriptData, TrigId, Trigger, TriggerProto};
pub use time::Clock;
pub use uid::{IdSpace, UID_CHAR, Uid, UidRegistry};
pub use value::Value;
pub use vars::{Var, VarList};
pub use vehicle::Vehicle;
pub use world::{ActArg, ActTo, World};
