//! Helpers for driving the engine against a simulated matrix.

#![allow(dead_code)]

use std::cell::RefCell;

use puppet_keyboard::{
    Config, Event, Flag, KeyListener, KeyPosition, KeyState, Keyboard, LockListener, LockState,
    ModifierId, Settings, DEFAULT_KEYMAP,
};

/// Position of the default-keymap key whose base character is `c`.
pub fn key(c: u8) -> KeyPosition {
    DEFAULT_KEYMAP
        .find(c)
        .unwrap_or_else(|| panic!("no key {:?}", c as char))
}

/// Position of the default-keymap modifier `id`.
pub fn modifier(id: ModifierId) -> KeyPosition {
    DEFAULT_KEYMAP.find_modifier(id).expect("modifier present")
}

/// Take everything the queue holds.
pub fn drain<C: Config, const S: usize, const Q: usize>(
    kb: &mut Keyboard<'_, C, S, Q>,
) -> Vec<Event> {
    std::iter::from_fn(|| kb.pop_event()).collect()
}

pub fn ev(key: u8, state: KeyState) -> Event {
    Event { key, state }
}

/// Key listener that records every call.
#[derive(Default)]
pub struct KeyLog {
    pub calls: RefCell<Vec<Event>>,
}

impl KeyListener for KeyLog {
    fn on_key(&self, key: u8, state: KeyState) {
        self.calls.borrow_mut().push(Event { key, state });
    }
}

/// Lock listener that records the edge flags and the lock values it read.
#[derive(Default)]
pub struct LockLog {
    pub calls: RefCell<Vec<(bool, bool, bool, bool)>>,
}

impl LockListener for LockLog {
    fn on_lock(&self, capslock_changed: bool, numlock_changed: bool, locks: &LockState) {
        self.calls.borrow_mut().push((
            capslock_changed,
            numlock_changed,
            locks.capslock(),
            locks.numlock(),
        ));
    }
}

/// Settings wrapper counting how often the overflow indicator is raised.
#[derive(Default)]
pub struct CountingConfig {
    pub settings: Settings,
    pub overflow_raised: usize,
}

impl Config for CountingConfig {
    fn is_set(&self, flag: Flag) -> bool {
        self.settings.is_set(flag)
    }

    fn scan_interval_ms(&self) -> u32 {
        self.settings.scan_interval_ms()
    }

    fn hold_threshold_ten_ms(&self) -> u32 {
        self.settings.hold_threshold_ten_ms()
    }

    fn raise_overflow_interrupt(&mut self) {
        self.overflow_raised += 1;
        self.settings.raise_overflow_interrupt();
    }
}
