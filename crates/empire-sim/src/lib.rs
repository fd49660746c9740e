pub mod affects;
pub mod heartbeat;
pub mod limits;
pub mod mobact;
pub mod objects;
pub mod vehicles;

#[cfg(test)]
mod testing;

pub use heartbeat::{heartbeat, real_update, run_pulses};
pub use mobact::{
    add_pursuit, despawn_mob, reschedule_all_despawns, run_mob_event, schedule_all_mob_events,
    schedule_reset_mob,
};
