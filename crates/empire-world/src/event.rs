use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use strum::{EnumCount, EnumIter, FromRepr};

use crate::entity::{CharId, EntityRef};
use crate::script_data::TrigId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

/// What a handler tells the scheduler when it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reschedule {
    /// Run again this many pulses from now.
    After(u64),
    /// Drop the event.
    Done,
}

/// Per-mob AI categories. A mob holds at most one live event per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum MobEventKind {
    Aggro = 0,
    Movement = 1,
    Pursuit = 2,
    Scavenge = 3,
    Despawn = 4,
    Reset = 5,
}

impl MobEventKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Aggro => "aggro",
            Self::Movement => "movement",
            Self::Pursuit => "pursuit",
            Self::Scavenge => "scavenge",
            Self::Despawn => "despawn",
            Self::Reset => "reset",
        }
    }
}

/// Everything the world schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    /// Resume a trigger suspended by `wait`.
    TriggerWait { owner: EntityRef, trig: TrigId },
    MobAi { mob: CharId, kind: MobEventKind },
    HealOverTime { ch: CharId },
}

/// A discrete-event queue keyed by pulse.
///
/// Cancelling removes the payload; the stale heap entry is skipped when it
/// surfaces. Events due on the same pulse run in scheduling order.
#[derive(Debug)]
pub struct EventQueue<E> {
    heap: BinaryHeap<Reverse<(u64, u64)>>,
    payloads: HashMap<u64, (u64, E)>,
    next_seq: u64,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            payloads: HashMap::new(),
            next_seq: 1,
        }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` to fire `delay` pulses after `now` (at least one).
    pub fn schedule(&mut self, now: u64, delay: u64, payload: E) -> EventId {
        let id = self.next_seq;
        self.next_seq += 1;
        let due = now.saturating_add(delay.max(1));
        self.heap.push(Reverse((due, id)));
        self.payloads.insert(id, (due, payload));
        EventId(id)
    }

    /// Puts a popped event back under its old id.
    pub fn reinsert(&mut self, id: EventId, now: u64, delay: u64, payload: E) {
        let due = now.saturating_add(delay.max(1));
        self.heap.push(Reverse((due, id.0)));
        self.payloads.insert(id.0, (due, payload));
    }

    pub fn cancel(&mut self, id: EventId) -> Option<E> {
        self.payloads.remove(&id.0).map(|(_, payload)| payload)
    }

    pub fn is_scheduled(&self, id: EventId) -> bool {
        self.payloads.contains_key(&id.0)
    }

    /// Pulse at which the event fires.
    pub fn when(&self, id: EventId) -> Option<u64> {
        self.payloads.get(&id.0).map(|(due, _)| *due)
    }

    /// Removes and returns the earliest event due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(EventId, E)> {
        while let Some(&Reverse((due, id))) = self.heap.peek() {
            if due > now {
                return None;
            }
            self.heap.pop();
            match self.payloads.get(&id) {
                Some((live_due, _)) if *live_due == due => {
                    let (_, payload) = self.payloads.remove(&id)?;
                    return Some((EventId(id), payload));
                }
                // cancelled, or superseded by a reinsert
                _ => continue,
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}
