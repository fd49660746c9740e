use serde::{Deserialize, Serialize};

/// Game tunables. Any key missing from a config source keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds a sleeping player needs to regenerate from empty.
    pub max_sleeping_regen_time: i32,
    /// Minutes before an unattended item is autostored.
    pub autostore_time: i32,
    /// Minutes, for rooms that keep items longer.
    pub long_autostore_time: i32,
    /// Minutes before a bound item on unowned land is junked.
    pub bound_item_junk_time: i32,
    pub npc_follower_limit: i32,
    pub blood_starvation_level: i32,
    /// Minutes a pursuit entry stays live.
    pub mob_pursuit_timeout: i32,
    /// Tiles a mob will chase before giving up.
    pub mob_pursuit_distance: i32,
    pub mob_despawn_radius: i32,
    /// Minutes between despawn checks.
    pub mob_despawn_interval: i32,
    pub stable_despawn_multiplier: i32,
    /// Spawned animals a stable holds before the extras wander off.
    pub max_stable_animals: i32,
    /// Bonus experience a player gets back each daily cycle.
    pub num_daily_skill_points: i32,
    pub hostile_flag_time: i32,
    pub max_script_depth: i32,
    pub min_loop_ceiling: i32,
    pub max_inventory_size: i32,
    pub aggro_interval_secs: i32,
    pub movement_interval_secs: i32,
    pub scavenge_interval_secs: i32,
    /// Longest line substitution may produce.
    pub output_budget: usize,
    /// Where new characters appear; `%startloc%` reports it.
    pub start_room: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_sleeping_regen_time: 300,
            autostore_time: 30,
            long_autostore_time: 1440,
            bound_item_junk_time: 60,
            npc_follower_limit: 2,
            blood_starvation_level: 15,
            mob_pursuit_timeout: 5,
            mob_pursuit_distance: 10,
            mob_despawn_radius: 10,
            mob_despawn_interval: 10,
            stable_despawn_multiplier: 4,
            max_stable_animals: 12,
            num_daily_skill_points: 10,
            hostile_flag_time: 5,
            max_script_depth: 10,
            min_loop_ceiling: 300,
            max_inventory_size: 25,
            aggro_interval_secs: 7,
            movement_interval_secs: 12,
            scavenge_interval_secs: 30,
            output_budget: 1023,
            start_room: 0,
        }
    }
}

impl GameConfig {
    /// Iterations a `while` may run before the trigger is aborted.
    pub fn loop_ceiling(&self, largest_inventory: i32) -> i32 {
        self.min_loop_ceiling.max(largest_inventory)
    }
}
