//! The script diagnostic sink.

use empire_types::Preferences;
use empire_world::character::LVL_BUILDER;
use empire_world::World;

/// Reports a script problem to the server log and to every connected
/// immortal who asked for script errors.
pub fn script_log(world: &mut World, msg: &str) {
    log::warn!(target: "script", "SCRIPT ERR: {msg}");
    let line = format!("[ SCRIPT ERR: {msg} ]");
    for ch in world.players() {
        if let Some(c) = world.char_mut(ch) {
            if c.connected
                && !c.writing
                && c.access_level >= LVL_BUILDER
                && c.prefs.contains(Preferences::SCRIPT_SYSLOG)
            {
                c.send(line.clone());
            }
        }
    }
    world.record_script_error(msg.to_string());
}
