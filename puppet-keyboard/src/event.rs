//! Events handed to consumers, and the listener interfaces that receive them.

use crate::locks::LockState;

/// Lifecycle state of a tracked keypress.
///
/// A press cycles Idle -> Pressed -> (Hold ->) Released -> Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyState {
    Idle = 0,
    Pressed = 1,
    Hold = 2,
    Released = 3,
}

impl KeyState {
    pub fn name(self) -> &'static str {
        match self {
            KeyState::Idle => "idle",
            KeyState::Pressed => "pressed",
            KeyState::Hold => "hold",
            KeyState::Released => "released",
        }
    }
}

/// A resolved key together with the state it entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub key: u8,
    pub state: KeyState,
}

/// Receives every key event, queued or not.
///
/// Listeners run on the scanner's call stack and must return quickly.
pub trait KeyListener {
    fn on_key(&self, key: u8, state: KeyState);
}

/// Receives capslock/numlock chord edges.
///
/// The flags say which lock was just toggled by a chord; the new values are
/// read from `locks`.
pub trait LockListener {
    fn on_lock(&self, capslock_changed: bool, numlock_changed: bool, locks: &LockState);
}

impl<F: Fn(u8, KeyState)> KeyListener for F {
    fn on_key(&self, key: u8, state: KeyState) {
        self(key, state)
    }
}

impl<F: Fn(bool, bool, &LockState)> LockListener for F {
    fn on_lock(&self, capslock_changed: bool, numlock_changed: bool, locks: &LockState) {
        self(capslock_changed, numlock_changed, locks)
    }
}
