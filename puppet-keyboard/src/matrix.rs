//! Switch matrix and button sampling.
//!
//! Columns are driven low one at a time while every row is read, so a key
//! can only pull its row low while its own column is selected. Between
//! columns the driven pin is put back to its idle state, a pulled-up input.

use crate::keymap::Keymap;
use crate::pins::{Direction, Level, PinBank, Pull};

/// One bit per matrix cell, row-major; set means pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatrixState(u64);

impl MatrixState {
    pub fn is_pressed(&self, index: usize) -> bool {
        self.0 & (1u64 << index) != 0
    }

    fn press(&mut self, index: usize) {
        self.0 |= 1u64 << index;
    }

    pub fn any(&self) -> bool {
        self.0 != 0
    }
}

/// Put every scanned line into its idle state.
pub fn init_pins(keymap: &Keymap<'_>, pins: &mut impl PinBank) {
    let lines = keymap
        .row_pins()
        .iter()
        .chain(keymap.col_pins())
        .chain(keymap.button_pins());
    for &pin in lines {
        release_line(pins, pin);
    }
}

/// Sample the whole matrix.
pub fn scan(keymap: &Keymap<'_>, pins: &mut impl PinBank) -> MatrixState {
    let mut state = MatrixState::default();
    let cols = keymap.cols();

    for (col, &col_pin) in keymap.col_pins().iter().enumerate() {
        pins.set_pull(col_pin, Pull::Up);
        pins.write(col_pin, Level::Low);
        pins.set_direction(col_pin, Direction::Output);

        for (row, &row_pin) in keymap.row_pins().iter().enumerate() {
            if pins.read(row_pin) == Level::Low {
                state.press(row * cols + col);
            }
        }

        release_line(pins, col_pin);
    }

    state
}

/// Sample a directly wired button.
pub fn read_button(keymap: &Keymap<'_>, pins: &mut impl PinBank, index: usize) -> bool {
    keymap
        .button_pins()
        .get(index)
        .is_some_and(|&pin| pins.read(pin) == Level::Low)
}

fn release_line(pins: &mut impl PinBank, pin: u8) {
    pins.write(pin, Level::High);
    pins.set_pull(pin, Pull::Up);
    pins.set_direction(pin, Direction::Input);
}
