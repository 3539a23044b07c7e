//! Input engine for a matrix keyboard with a few directly wired buttons.
//!
//! The engine scans the switch matrix, follows every active keypress through
//! Idle -> Pressed -> Hold/Released -> Idle, resolves the character a press
//! produces under the held modifiers and capslock/numlock, and fans events
//! out to a bounded queue and registered listeners.
//!
//! The crate is `no_std` and allocation-free so the same code runs in the
//! firmware and in host tools. Hardware, timing and settings are supplied by
//! the caller through [`pins::PinBank`], the `now_ms` argument of
//! [`Keyboard::tick`], and [`config::Config`].

#![no_std]

pub mod config;
pub mod error;
pub mod event;
pub mod keyboard;
pub mod keymap;
pub mod keys;
pub mod locks;
pub mod matrix;
pub mod pins;
pub mod resolve;
pub mod sink;
pub mod slots;

pub use config::{Config, Flag, Settings};
pub use error::Error;
pub use event::{Event, KeyListener, KeyState, LockListener};
pub use keyboard::{Keyboard, DEFAULT_QUEUE, DEFAULT_SLOTS};
pub use keymap::{KeyDefinition, KeyPosition, Keymap, ModifierId, DEFAULT_KEYMAP};
pub use locks::LockState;
pub use pins::{PinBank, SimulatedMatrix};
