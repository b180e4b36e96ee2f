//! Interrupt scheduler
//!
//! Tracks the next T-cycle at which each maskable interrupt source is due
//! to fire. `catch_up()` walks the clock forward, setting IF bits for any
//! source whose deadline has passed and rescheduling it. Only the timer
//! reschedules itself after firing (VBlank/LCD/Serial are one-shot from the
//! scheduler's point of view - nothing currently re-arms them); the others
//! are driven directly through `reschedule`.
//!
//! The IF register's top three bits always read back as 1, matching real
//! hardware.

use crate::clock::Clock;
use crate::timer::Timer;

/// Maskable interrupt sources tracked by the scheduler. Joypad (bit 4, jump
/// vector 0x60) is part of the IF/IE bit layout the CPU dispatches against
/// but is never scheduled here - nothing in this crate raises it lazily.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum InterruptSource {
    VBlank = 0,
    Lcd = 1,
    Timer = 2,
    Serial = 3,
}

const SOURCES: [InterruptSource; 4] = [
    InterruptSource::VBlank,
    InterruptSource::Lcd,
    InterruptSource::Timer,
    InterruptSource::Serial,
];

const INTERRUPT_MASKS: [u8; 4] = [0x01, 0x02, 0x04, 0x08];

/// Per-source deadlines plus the latched IF register.
#[derive(Debug, Clone)]
pub struct InterruptScheduler {
    if_reg: u8,
    deadlines: [u64; 4],
    closest_time: u64,
    closest_source: InterruptSource,
}

impl InterruptScheduler {
    pub fn new() -> Self {
        let mut scheduler = Self {
            if_reg: 0,
            deadlines: [Clock::NEVER; 4],
            closest_time: Clock::NEVER,
            closest_source: InterruptSource::VBlank,
        };
        scheduler.reset();
        scheduler
    }

    pub fn reset(&mut self) {
        self.if_reg = 0xE0;
        self.deadlines = [Clock::NEVER; 4];
        self.closest_time = Clock::NEVER;
        self.closest_source = InterruptSource::VBlank;
    }

    /// Arms `source` to fire at T-cycle `cycle`.
    pub fn reschedule(&mut self, source: InterruptSource, cycle: u64, clock: &Clock) {
        self.deadlines[source as usize] = cycle;
        self.recalc_closest(clock);
    }

    fn recalc_closest(&mut self, clock: &Clock) {
        let (idx, &min) = self
            .deadlines
            .iter()
            .enumerate()
            .min_by_key(|&(_, &t)| t)
            .expect("deadlines is non-empty");
        debug_assert!(min > clock.now());
        self.closest_source = SOURCES[idx];
        self.closest_time = min;
    }

    /// Walks the clock forward, latching IF bits for every source whose
    /// deadline has passed. Only the timer needs a peer to reschedule
    /// itself; VBlank/LCD/Serial have nothing to recompute here.
    pub fn catch_up(&mut self, clock: &Clock, timer: &mut Timer) {
        while self.closest_time < clock.now() {
            let source = self.closest_source;
            self.if_reg |= INTERRUPT_MASKS[source as usize];
            if source == InterruptSource::Timer {
                let next = timer.next_interrupt_time(clock);
                self.deadlines[InterruptSource::Timer as usize] = next;
            } else {
                // VBlank/LCD/Serial are never re-armed by this core, so once
                // fired their deadline goes to NEVER instead of sitting in
                // the past forever (which would refire every catch_up).
                self.deadlines[source as usize] = Clock::NEVER;
            }
            self.recalc_closest(clock);
        }
    }

    pub fn get_if(&mut self, clock: &Clock, timer: &mut Timer) -> u8 {
        self.catch_up(clock, timer);
        self.if_reg
    }

    pub fn set_if(&mut self, value: u8, clock: &Clock, timer: &mut Timer) {
        self.catch_up(clock, timer);
        self.if_reg = value | 0xE0;
    }

    pub fn all_deadlines(&self) -> &[u64; 4] {
        &self.deadlines
    }
}

impl Default for InterruptScheduler {
    fn default() -> Self {
        Self::new()
    }
}
