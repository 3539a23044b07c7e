//! Pin access used by the scanner, and an in-memory switch matrix.

use crate::keymap::{KeyPosition, Keymap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// GPIO operations on logical pin indices.
///
/// Matrix columns are driven, rows and buttons are only read. A switch is
/// active low: a closed switch pulls its row (or button line) to [`Level::Low`].
pub trait PinBank {
    fn set_direction(&mut self, pin: u8, direction: Direction);
    fn set_pull(&mut self, pin: u8, pull: Pull);
    fn write(&mut self, pin: u8, level: Level);
    fn read(&mut self, pin: u8) -> Level;
}

/// A [`PinBank`] that simulates the switches of a keymap.
///
/// A closed matrix switch connects its row pin to its column pin, so a row
/// reads low while any column it is closed against is driven low. Buttons
/// read low while closed. Pin indices must be below 64.
#[derive(Debug, Clone)]
pub struct SimulatedMatrix<'a> {
    keymap: &'a Keymap<'a>,
    closed_cells: u64,
    closed_buttons: u64,
    outputs: u64,
    driven_low: u64,
    pulled_up: u64,
}

impl<'a> SimulatedMatrix<'a> {
    /// All switches open, all pins floating inputs.
    pub fn new(keymap: &'a Keymap<'a>) -> Self {
        Self {
            keymap,
            closed_cells: 0,
            closed_buttons: 0,
            outputs: 0,
            driven_low: 0,
            pulled_up: 0,
        }
    }

    pub fn press(&mut self, position: KeyPosition) {
        self.set(position, true);
    }

    pub fn release(&mut self, position: KeyPosition) {
        self.set(position, false);
    }

    pub fn set(&mut self, position: KeyPosition, closed: bool) {
        let (mask, bit) = match position {
            KeyPosition::Matrix(idx) => (&mut self.closed_cells, idx),
            KeyPosition::Button(idx) => (&mut self.closed_buttons, idx),
        };
        if closed {
            *mask |= 1u64 << bit;
        } else {
            *mask &= !(1u64 << bit);
        }
    }

    pub fn is_pressed(&self, position: KeyPosition) -> bool {
        match position {
            KeyPosition::Matrix(idx) => self.closed_cells & (1u64 << idx) != 0,
            KeyPosition::Button(idx) => self.closed_buttons & (1u64 << idx) != 0,
        }
    }

    pub fn release_all(&mut self) {
        self.closed_cells = 0;
        self.closed_buttons = 0;
    }

    /// Whether `pin` is a pulled-up input, the idle state of every scanned line.
    pub fn is_idle(&self, pin: u8) -> bool {
        let bit = 1u64 << pin;
        self.outputs & bit == 0 && self.pulled_up & bit != 0
    }

    fn is_driving_low(&self, pin: u8) -> bool {
        let bit = 1u64 << pin;
        self.outputs & bit != 0 && self.driven_low & bit != 0
    }

    fn row_pulled_low(&self, row: usize) -> bool {
        let cols = self.keymap.cols();
        self.keymap
            .col_pins()
            .iter()
            .enumerate()
            .filter(|&(_, &pin)| self.is_driving_low(pin))
            .any(|(col, _)| self.closed_cells & (1u64 << (row * cols + col)) != 0)
    }
}

fn set_bit(mask: &mut u64, pin: u8, on: bool) {
    if on {
        *mask |= 1u64 << pin;
    } else {
        *mask &= !(1u64 << pin);
    }
}

impl PinBank for SimulatedMatrix<'_> {
    fn set_direction(&mut self, pin: u8, direction: Direction) {
        set_bit(&mut self.outputs, pin, direction == Direction::Output);
    }

    fn set_pull(&mut self, pin: u8, pull: Pull) {
        set_bit(&mut self.pulled_up, pin, pull == Pull::Up);
    }

    fn write(&mut self, pin: u8, level: Level) {
        set_bit(&mut self.driven_low, pin, level == Level::Low);
    }

    fn read(&mut self, pin: u8) -> Level {
        if let Some(row) = self.keymap.row_pins().iter().position(|&p| p == pin) {
            if self.row_pulled_low(row) {
                return Level::Low;
            }
        }
        if let Some(btn) = self.keymap.button_pins().iter().position(|&p| p == pin) {
            if self.closed_buttons & (1u64 << btn) != 0 {
                return Level::Low;
            }
        }
        Level::High
    }
}
