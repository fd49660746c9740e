//! The running-trigger handle every script operation is given.

use empire_types::AttachType;
use empire_world::{EntityRef, TrigId, TrigVnum, Value, World};

use crate::log::script_log;

/// Identifies the trigger being executed and the entity running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exec {
    pub owner: EntityRef,
    pub trig: TrigId,
    /// Class the trigger runs as (room-template and adventure run as rooms).
    pub class: AttachType,
}

impl Exec {
    /// `None` when the owner or the trigger is gone.
    pub fn new(world: &World, owner: EntityRef, trig: TrigId) -> Option<Self> {
        let t = world.trigger(owner, trig)?;
        Some(Self {
            owner,
            trig,
            class: t.proto.attach.effective(),
        })
    }

    /// The owner's current global-variable context.
    pub fn context(&self, world: &World) -> i64 {
        world.script(self.owner).map_or(0, |sc| sc.context)
    }

    pub fn label(&self, world: &World) -> (String, TrigVnum) {
        world
            .trigger(self.owner, self.trig)
            .map_or_else(|| (String::new(), -1), |t| (t.name().to_string(), t.vnum()))
    }

    /// Logs `msg` tagged with this trigger's name and vnum.
    pub fn log(&self, world: &mut World, msg: &str) {
        let (name, vnum) = self.label(world);
        script_log(world, &format!("Trigger: {name}, VNum {vnum}. {msg}"));
    }

    /// Whether the trigger is still attached to a live owner.
    pub fn is_live(&self, world: &World) -> bool {
        world.trigger(self.owner, self.trig).is_some()
    }

    /// A local by name, else a global visible in the current context.
    pub fn lookup(&self, world: &World, name: &str) -> Option<Value> {
        if let Some(var) = world
            .trigger(self.owner, self.trig)
            .and_then(|t| t.vars.find_any(name))
        {
            return Some(var.value.clone());
        }
        let sc = world.script(self.owner)?;
        sc.global_vars
            .get(name, sc.context)
            .map(|var| var.value.clone())
    }

    pub fn local(&self, world: &World, name: &str) -> Option<Value> {
        world
            .trigger(self.owner, self.trig)
            .and_then(|t| t.vars.find_any(name))
            .map(|var| var.value.clone())
    }

    /// Sets a trigger-local variable in the current context.
    pub fn set_local(&self, world: &mut World, name: &str, value: Value) {
        let context = self.context(world);
        let result = match world.trigger_mut(self.owner, self.trig) {
            Some(t) => t.vars.set(name, value, context),
            None => return,
        };
        if let Err(err) = result {
            self.log(world, &err.to_string());
        }
    }
}
