//! The `wait` argument grammar.

use empire_world::time::{HOURS_PER_DAY, PASSES_PER_SEC, PULSES_PER_MUD_HOUR};
use winnow::ascii::{Caseless, dec_uint, space0, space1};
use winnow::combinator::{alt, opt, preceded};
use winnow::{ModalResult, Parser};
use winnow::token::any;

/// How long a `wait` suspends its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitSpec {
    /// A relative delay, already in pulses.
    Pulses(u64),
    /// The next time the game clock reads this many minutes past midnight.
    Until(u64),
}

impl WaitSpec {
    /// Pulses from `pulse` until the wait is over.
    pub fn delay(self, pulse: u64) -> u64 {
        match self {
            Self::Pulses(n) => n,
            Self::Until(minutes) => {
                let day = HOURS_PER_DAY * PULSES_PER_MUD_HOUR;
                let target = minutes.saturating_mul(PULSES_PER_MUD_HOUR) / 60;
                let now = pulse % day;
                if now >= target {
                    (day - now).saturating_add(target)
                } else {
                    target - now
                }
            }
        }
    }
}

/// `14:30` or the packed `1430`. Times too large to count in minutes are
/// rejected.
fn clock_time(input: &mut &str) -> ModalResult<u64> {
    (dec_uint::<_, u64, _>, opt(preceded(':', dec_uint::<_, u64, _>)))
        .verify_map(|(hours, minutes)| match minutes {
            Some(m) => hours.checked_mul(60)?.checked_add(m),
            None => (hours / 100).checked_mul(60)?.checked_add(hours % 100),
        })
        .parse_next(input)
}

fn until(input: &mut &str) -> ModalResult<WaitSpec> {
    preceded((Caseless("until"), space1), clock_time)
        .map(WaitSpec::Until)
        .parse_next(input)
}

/// `<n> t` is mud hours, `<n> s` seconds, and anything else after the
/// number leaves it in pulses.
fn relative(input: &mut &str) -> ModalResult<WaitSpec> {
    let n: u64 = dec_uint.parse_next(input)?;
    let unit: Option<char> = opt(preceded(space0, any)).parse_next(input)?;
    Ok(WaitSpec::Pulses(match unit {
        Some('t') => n.saturating_mul(PULSES_PER_MUD_HOUR),
        Some('s') => n.saturating_mul(PASSES_PER_SEC),
        _ => n,
    }))
}

/// Parses everything after the `wait` keyword. Trailing text is ignored.
pub fn parse_wait(arg: &str) -> Option<WaitSpec> {
    let mut input = arg.trim();
    alt((until, relative)).parse_next(&mut input).ok()
}
