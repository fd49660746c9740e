pub mod builtins;
pub mod driver;
pub mod error;
pub mod exec;
pub mod expr;
pub mod fields;
pub mod interp;
pub mod log;
pub mod lookup;
pub mod subst;
pub mod text;
pub mod trigger_file;
pub mod triggers;
pub mod wait;

#[cfg(test)]
mod testing;

pub use driver::{DriverResult, Mode, script_driver};
pub use error::{ScriptError, TriggerFileError};
pub use exec::Exec;
pub use self::log::script_log;
pub use trigger_file::{load_triggers, parse_trigger_file};
pub use triggers::{
    PLAYER_SCRIPT_RADIUS, entry_mtrigger, greet_mtrigger, load_mtrigger, load_otrigger,
    random_triggers, reset_wtrigger, timer_otrigger, trigger_wait_resume,
};
