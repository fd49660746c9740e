use std::collections::HashMap;
use std::rc::Rc;

use empire_types::AttachType;

use crate::entity::TrigVnum;
use crate::event::EventId;
use crate::vars::VarList;

/// Identity of one live trigger instance, unique for the life of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrigId(pub u64);

/// An immutable trigger template as loaded from the trigger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerProto {
    pub vnum: TrigVnum,
    pub name: String,
    pub attach: AttachType,
    /// Trigger-type bits for the attach class (`MobTriggers`, `ObjTriggers`, ...).
    pub types: u32,
    pub narg: i32,
    pub arglist: String,
    pub commands: Rc<[String]>,
}

/// A live trigger attached to one script container.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub id: TrigId,
    pub proto: Rc<TriggerProto>,
    /// Block nesting while running; 0 when idle.
    pub depth: i32,
    pub loops: i32,
    /// Line to resume at after a `wait`.
    pub curr_state: Option<usize>,
    pub wait_event: Option<EventId>,
    pub vars: VarList,
    /// `done` line -> the `while` line that owns it, filled in as loops are entered.
    pub loop_origins: HashMap<usize, usize>,
}

impl Trigger {
    pub fn new(id: TrigId, proto: Rc<TriggerProto>) -> Self {
        Self {
            id,
            proto,
            depth: 0,
            loops: 0,
            curr_state: None,
            wait_event: None,
            vars: VarList::new(),
            loop_origins: HashMap::new(),
        }
    }

    pub fn vnum(&self) -> TrigVnum {
        self.proto.vnum
    }

    pub fn name(&self) -> &str {
        &self.proto.name
    }

    pub fn has_type(&self, bits: u32) -> bool {
        self.proto.types & bits != 0
    }

    pub fn is_running(&self) -> bool {
        self.depth > 0
    }
}

/// The script container an entity owns once anything is attached.
#[derive(Debug, Clone, Default)]
pub struct ScriptData {
    pub triggers: Vec<Trigger>,
    /// Union of the attached triggers' type bits.
    pub types: u32,
    pub global_vars: VarList,
    pub context: i64,
}

impl ScriptData {
    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.types |= trigger.proto.types;
        self.triggers.push(trigger);
    }

    /// Removes the first trigger matching `vnum`.
    pub fn remove_trigger_vnum(&mut self, vnum: TrigVnum) -> Option<Trigger> {
        let pos = self.triggers.iter().position(|t| t.vnum() == vnum)?;
        let removed = self.triggers.remove(pos);
        self.recompute_types();
        Some(removed)
    }

    pub fn remove_all(&mut self) -> Vec<Trigger> {
        self.types = 0;
        std::mem::take(&mut self.triggers)
    }

    pub fn recompute_types(&mut self) {
        self.types = self
            .triggers
            .iter()
            .fold(0, |acc, t| acc | t.proto.types);
    }

    pub fn has_type(&self, bits: u32) -> bool {
        self.types & bits != 0
    }

    pub fn find(&self, id: TrigId) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: TrigId) -> Option<&mut Trigger> {
        self.triggers.iter_mut().find(|t| t.id == id)
    }

    /// Ids of triggers carrying any of `bits`, in list order.
    pub fn triggers_with(&self, bits: u32) -> Vec<TrigId> {
        self.triggers
            .iter()
            .filter(|t| t.has_type(bits))
            .map(|t| t.id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
