use std::collections::HashMap;

use crate::entity::{EmpireVnum, ObjVnum, RoomVnum};
use crate::script_data::ScriptData;

/// Diplomatic stance toward another empire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    War,
    Distrust,
    Peace,
    Truce,
    Ally,
}

#[derive(Debug, Clone)]
pub struct Empire {
    pub vnum: EmpireVnum,
    pub name: String,
    pub adjective: String,
    pub coins: i64,
    pub members: i32,
    pub relations: HashMap<EmpireVnum, Relation>,
    /// Stored item counts by (island, vnum).
    pub storage: HashMap<(i32, ObjVnum), i32>,
    pub unique_storage: Vec<ObjVnum>,
    pub main_island: Option<i32>,
    /// Has the locks technology; keeps hostile guards out of closed rooms.
    pub has_locks: bool,
    pub script: Option<ScriptData>,
}

impl Empire {
    pub fn new(vnum: EmpireVnum, name: &str, adjective: &str) -> Self {
        Self {
            vnum,
            name: name.to_string(),
            adjective: adjective.to_string(),
            coins: 0,
            members: 0,
            relations: HashMap::new(),
            storage: HashMap::new(),
            unique_storage: Vec::new(),
            main_island: None,
            has_locks: false,
            script: None,
        }
    }

    pub fn relation(&self, other: EmpireVnum) -> Option<Relation> {
        self.relations.get(&other).copied()
    }

    /// At war or distrustful.
    pub fn is_hostile(&self, other: EmpireVnum) -> bool {
        matches!(self.relation(other), Some(Relation::War | Relation::Distrust))
    }

    pub fn is_ally(&self, other: EmpireVnum) -> bool {
        other == self.vnum || self.relation(other) == Some(Relation::Ally)
    }

    pub fn add_storage(&mut self, island: i32, vnum: ObjVnum, amount: i32) {
        *self.storage.entry((island, vnum)).or_insert(0) += amount;
    }
}

/// A live copy of an adventure zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: i32,
    pub name: String,
    /// Map room the adventure hangs off.
    pub location: RoomVnum,
    pub start: RoomVnum,
    /// Level lock; 0 until something scales.
    pub level: i32,
    pub rooms: Vec<RoomVnum>,
}

/// A world-wide event players can join; at most one runs at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub id: i32,
    pub name: String,
    pub running: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostility() {
        let mut emp = Empire::new(1, "Rome", "Roman");
        emp.relations.insert(2, Relation::War);
        emp.relations.insert(3, Relation::Ally);
        assert!(emp.is_hostile(2));
        assert!(!emp.is_hostile(3));
        assert!(emp.is_ally(3));
        assert!(emp.is_ally(1));
    }

    #[test]
    fn storage_accumulates() {
        let mut emp = Empire::new(1, "Rome", "Roman");
        emp.add_storage(0, 100, 2);
        emp.add_storage(0, 100, 1);
        assert_eq!(emp.storage.get(&(0, 100)), Some(&3));
    }
}
