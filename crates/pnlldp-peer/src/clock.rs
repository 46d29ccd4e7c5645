use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Source of the 10 ms tick used for peer timestamps and the transmit timer.
///
/// The counter wraps; comparisons go through wrapping arithmetic.
pub trait Clock: Send + Sync {
    fn now_10ms(&self) -> u32;
}

/// Ticks since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct UptimeClock {
    start: Instant,
}

impl UptimeClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for UptimeClock {
    fn now_10ms(&self) -> u32 {
        // Truncation is the wrap.
        (self.start.elapsed().as_millis() / 10) as u32
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: AtomicU32,
}

impl ManualClock {
    pub fn new(start: u32) -> Self {
        Self {
            ticks: AtomicU32::new(start),
        }
    }

    pub fn set(&self, ticks: u32) {
        self.ticks.store(ticks, Ordering::SeqCst);
    }

    pub fn advance(&self, ticks: u32) {
        self.ticks.fetch_add(ticks, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_10ms(&self) -> u32 {
        self.ticks.load(Ordering::SeqCst)
    }
}
