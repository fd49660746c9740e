use rand_core::{RngCore, SeedableRng};
use rand_isaac::Isaac64Rng;

/// The world's random number generator: one ISAAC-64 stream shared by
/// scripts, ticks and mob AI so that a seed reproduces a whole run.
#[derive(Clone)]
pub struct MudRng {
    core: Isaac64Rng,
}

impl MudRng {
    pub fn new(seed: u64) -> Self {
        Self {
            core: Isaac64Rng::seed_from_u64(seed),
        }
    }

    /// `from <= number(from, to) <= to`. Reversed bounds are swapped, with a
    /// warning.
    pub fn number(&mut self, from: i32, to: i32) -> i32 {
        let (lo, hi) = if from > to {
            log::warn!("number({from}, {to}) has reversed bounds");
            (to, from)
        } else {
            (from, to)
        };
        let span = (hi as i64 - lo as i64 + 1) as u64;
        (lo as i64 + (self.core.next_u64() % span) as i64) as i32
    }

    /// Sum of `num` rolls of a `size`-sided die; 0 for a nonsense die.
    pub fn dice(&mut self, num: i32, size: i32) -> i32 {
        if size <= 0 || num <= 0 {
            log::warn!("dice({num}, {size}) attempted");
            return 0;
        }
        (0..num).map(|_| self.number(1, size)).sum()
    }

    /// True `percent` times in a hundred.
    pub fn chance(&mut self, percent: i32) -> bool {
        percent > 0 && self.number(1, 100) <= percent
    }

    /// Uniform index into a slice of `len` items, `None` when empty.
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.core.next_u64() % len as u64) as usize)
    }
}

impl std::fmt::Debug for MudRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MudRng").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_range() {
        let mut rng = MudRng::new(42);
        for _ in 0..1000 {
            let v = rng.number(3, 9);
            assert!((3..=9).contains(&v), "number(3, 9) = {v} out of range");
        }
    }

    struct Capture;

    static WARNINGS: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());

    impl log::Log for Capture {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.lock().expect("warnings").push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture;

    #[test]
    fn number_swaps_reversed_bounds() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Warn);
        let mut rng = MudRng::new(7);
        for _ in 0..200 {
            let v = rng.number(10, 1);
            assert!((1..=10).contains(&v));
        }
        let warned = WARNINGS
            .lock()
            .expect("warnings")
            .iter()
            .any(|w| w == "number(10, 1) has reversed bounds");
        assert!(warned);
    }

    #[test]
    fn number_degenerate_range() {
        let mut rng = MudRng::new(1);
        assert_eq!(rng.number(5, 5), 5);
        assert_eq!(rng.number(-3, -3), -3);
    }

    #[test]
    fn number_full_width_does_not_overflow() {
        let mut rng = MudRng::new(3);
        for _ in 0..100 {
            rng.number(i32::MIN, i32::MAX);
        }
    }

    #[test]
    fn dice_range() {
        let mut rng = MudRng::new(42);
        for _ in 0..1000 {
            let v = rng.dice(3, 6);
            assert!((3..=18).contains(&v), "dice(3, 6) = {v} out of range");
        }
    }

    #[test]
    fn dice_invalid_returns_zero() {
        let mut rng = MudRng::new(42);
        assert_eq!(rng.dice(0, 6), 0);
        assert_eq!(rng.dice(2, -1), 0);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = MudRng::new(99);
        for _ in 0..200 {
            assert!(!rng.chance(0));
            assert!(rng.chance(100));
        }
    }

    #[test]
    fn pick_empty() {
        let mut rng = MudRng::new(0);
        assert_eq!(rng.pick(0), None);
        for _ in 0..100 {
            assert!(rng.pick(4).is_some_and(|i| i < 4));
        }
    }

    #[test]
    fn determinism() {
        let mut rng1 = MudRng::new(999);
        let mut rng2 = MudRng::new(999);
        for _ in 0..100 {
            assert_eq!(rng1.number(0, 1000), rng2.number(0, 1000));
        }
    }
}
