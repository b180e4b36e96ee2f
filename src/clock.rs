//! Monotonic T-cycle clock
//!
//! The whole core is driven by a single free-running cycle counter. Nothing
//! ticks on its own: the timer, interrupt scheduler, serial port and PPU are
//! lazy "catch-up" peripherals that only compute how much state they missed
//! the next time they are read, written, or asked to reschedule an
//! interrupt. `Clock` just holds the counter and the double-speed flag that
//! everyone else scales their deltas by.

/// Monotonically increasing T-cycle counter shared by every peripheral.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    now: u64,
    double_speed: bool,
}

impl Clock {
    /// Sentinel meaning "no interrupt scheduled".
    pub const NEVER: u64 = u64::MAX;

    pub fn new() -> Self {
        Self {
            now: 0,
            double_speed: false,
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn add(&mut self, amount: u64) {
        self.now += amount;
    }

    pub fn is_double_speed(&self) -> bool {
        self.double_speed
    }

    pub fn set_double_speed(&mut self, double_speed: bool) {
        self.double_speed = double_speed;
    }

    pub fn reset(&mut self) {
        self.now = 0;
        self.double_speed = false;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
