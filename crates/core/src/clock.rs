//! Time sources for timing contexts.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use cpu_time::ThreadTime;

use crate::error::TimingError;

/// CPU and wall time elapsed since a clock's origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reading {
    pub cpu: Duration,
    pub wall: Duration,
}

impl Reading {
    /// Time between `start` and this reading, in whole microseconds.
    /// Returns `(cpu_us, wall_us)`; a clock that went backwards yields zero.
    pub fn micros_since(self, start: Reading) -> (u64, u64) {
        (
            duration_us(self.cpu.saturating_sub(start.cpu)),
            duration_us(self.wall.saturating_sub(start.wall)),
        )
    }
}

fn duration_us(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

/// Source of [`Reading`]s for a timing context.
///
/// A failing read is a host fault; callers treat it as fatal.
pub trait Clock {
    fn now(&self) -> Result<Reading, TimingError>;
}

/// CPU time of the calling thread plus a monotonic wall clock.
///
/// Timing trees are per thread, so the per-thread CPU clock is the one that
/// attributes work to the right tree.
pub struct ThreadClock {
    cpu_origin: ThreadTime,
    wall_origin: Instant,
}

impl ThreadClock {
    pub fn try_new() -> Result<Self, TimingError> {
        Ok(Self {
            cpu_origin: ThreadTime::try_now()?,
            wall_origin: Instant::now(),
        })
    }
}

impl std::fmt::Debug for ThreadClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadClock")
            .field("wall_origin", &self.wall_origin)
            .finish_non_exhaustive()
    }
}

impl Clock for ThreadClock {
    fn now(&self) -> Result<Reading, TimingError> {
        Ok(Reading {
            cpu: self.cpu_origin.try_elapsed()?,
            wall: self.wall_origin.elapsed(),
        })
    }
}

/// Hand-driven clock for deterministic measurements.
///
/// Clones share the same time, so a test can keep one handle and advance it
/// while a context owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Reading>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance CPU and wall time by the same amount.
    pub fn advance(&self, by: Duration) {
        self.advance_split(by, by);
    }

    pub fn advance_split(&self, cpu: Duration, wall: Duration) {
        let current = self.now.get();
        self.now.set(Reading {
            cpu: current.cpu + cpu,
            wall: current.wall + wall,
        });
    }

    pub fn reading(&self) -> Reading {
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Result<Reading, TimingError> {
        Ok(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance_split(Duration::from_millis(3), Duration::from_millis(5));
        let reading = clock.now().unwrap_or_default();
        assert_eq!(reading.cpu, Duration::from_millis(3));
        assert_eq!(reading.wall, Duration::from_millis(5));
    }

    #[test]
    fn micros_since_saturates() {
        let early = Reading {
            cpu: Duration::from_micros(10),
            wall: Duration::from_micros(30),
        };
        let late = Reading {
            cpu: Duration::from_micros(25),
            wall: Duration::from_micros(20),
        };
        assert_eq!(late.micros_since(early), (15, 0));
    }

    #[test]
    fn thread_clock_is_monotonic() {
        let Ok(clock) = ThreadClock::try_new() else {
            return;
        };
        let a = clock.now().unwrap_or_default();
        let mut acc = 0u64;
        for i in 0..100_000u64 {
            acc = acc.wrapping_add(i * i);
        }
        std::hint::black_box(acc);
        let b = clock.now().unwrap_or_default();
        assert!(b.cpu >= a.cpu);
        assert!(b.wall >= a.wall);
    }
}
