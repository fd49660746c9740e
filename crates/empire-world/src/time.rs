pub const PASSES_PER_SEC: u64 = 10;
pub const SECS_PER_REAL_MIN: u64 = 60;
pub const SECS_PER_REAL_HOUR: u64 = 60 * SECS_PER_REAL_MIN;
pub const SECS_PER_REAL_DAY: u64 = 24 * SECS_PER_REAL_HOUR;
pub const SECS_PER_REAL_UPDATE: u64 = 5;
pub const SECS_PER_MUD_HOUR: u64 = 75;
pub const REAL_UPDATES_PER_MUD_HOUR: u64 = SECS_PER_MUD_HOUR / SECS_PER_REAL_UPDATE;
pub const PULSES_PER_MUD_HOUR: u64 = SECS_PER_MUD_HOUR * PASSES_PER_SEC;
pub const PULSE_REAL_UPDATE: u64 = SECS_PER_REAL_UPDATE * PASSES_PER_SEC;

pub const HOURS_PER_DAY: u64 = 24;
pub const DAYS_PER_MONTH: u64 = 30;
pub const MONTHS_PER_YEAR: u64 = 12;

/// Converts seconds to pulses (`RL_SEC`).
pub const fn rl_sec(secs: u64) -> u64 {
    secs * PASSES_PER_SEC
}

/// The game clock. Wall time is simulated from the pulse counter so a run
/// is reproducible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    pub pulse: u64,
    /// Wall-clock seconds at pulse 0.
    pub epoch: u64,
}

impl Clock {
    pub fn new(epoch: u64) -> Self {
        Self { pulse: 0, epoch }
    }

    /// Simulated `time(0)`.
    pub fn now(&self) -> u64 {
        self.epoch + self.pulse / PASSES_PER_SEC
    }

    pub fn time_info(&self) -> TimeInfo {
        TimeInfo::from_mud_hours(self.pulse / PULSES_PER_MUD_HOUR)
    }
}

/// Calendar position in game time. Fields are zero-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeInfo {
    pub hours: u64,
    pub day: u64,
    pub month: u64,
    pub year: u64,
}

impl TimeInfo {
    pub fn from_mud_hours(total: u64) -> Self {
        let days = total / HOURS_PER_DAY;
        let months = days / DAYS_PER_MONTH;
        Self {
            hours: total % HOURS_PER_DAY,
            day: days % DAYS_PER_MONTH,
            month: months % MONTHS_PER_YEAR,
            year: months / MONTHS_PER_YEAR,
        }
    }
}
