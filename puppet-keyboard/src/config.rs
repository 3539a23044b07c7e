//! Runtime settings consumed by the scanner.
//!
//! The engine reads every setting through [`Config`] at the moment it needs
//! it, so a change made between two ticks applies on the next one.

/// Behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Flag {
    /// Emit a report code when a modifier key is pressed.
    ReportModifiers = 1 << 0,
    /// Apply shift/alt/ctrl and the locks to emitted characters.
    UseModifiers = 1 << 1,
    /// Raise the overflow indicator when the event queue is full.
    OverflowRaisesInterrupt = 1 << 2,
    /// Enqueue even when the queue is full, dropping the oldest event.
    OverflowForcesEnqueue = 1 << 3,
}

/// Access to the settings store.
pub trait Config {
    fn is_set(&self, flag: Flag) -> bool;

    /// Delay between two scans, in milliseconds.
    fn scan_interval_ms(&self) -> u32;

    /// Dwell time after which a press becomes a hold, in units of 10 ms.
    fn hold_threshold_ten_ms(&self) -> u32;

    /// Latch the queue overflow indicator. It stays set until the owner of
    /// the store clears it.
    fn raise_overflow_interrupt(&mut self);
}

/// Default scan interval, in milliseconds.
pub const DEFAULT_SCAN_INTERVAL_MS: u32 = 10;
/// Default hold threshold, in units of 10 ms.
pub const DEFAULT_HOLD_THRESHOLD: u32 = 30;

/// Settings held in RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    flags: u8,
    scan_interval_ms: u32,
    hold_threshold: u32,
    overflow_pending: bool,
}

impl Settings {
    pub const fn new() -> Self {
        Self {
            flags: Flag::UseModifiers as u8 | Flag::OverflowRaisesInterrupt as u8,
            scan_interval_ms: DEFAULT_SCAN_INTERVAL_MS,
            hold_threshold: DEFAULT_HOLD_THRESHOLD,
            overflow_pending: false,
        }
    }

    pub fn set(&mut self, flag: Flag, on: bool) {
        if on {
            self.flags |= flag as u8;
        } else {
            self.flags &= !(flag as u8);
        }
    }

    pub fn set_scan_interval_ms(&mut self, ms: u32) {
        self.scan_interval_ms = ms;
    }

    pub fn set_hold_threshold_ten_ms(&mut self, ten_ms: u32) {
        self.hold_threshold = ten_ms;
    }

    /// Whether the overflow indicator is latched.
    pub fn overflow_pending(&self) -> bool {
        self.overflow_pending
    }

    pub fn clear_overflow(&mut self) {
        self.overflow_pending = false;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for Settings {
    fn is_set(&self, flag: Flag) -> bool {
        self.flags & flag as u8 != 0
    }

    fn scan_interval_ms(&self) -> u32 {
        self.scan_interval_ms
    }

    fn hold_threshold_ten_ms(&self) -> u32 {
        self.hold_threshold
    }

    fn raise_overflow_interrupt(&mut self) {
        self.overflow_pending = true;
    }
}
