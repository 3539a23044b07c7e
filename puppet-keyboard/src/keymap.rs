//! Key definitions and the physical layout they are scanned from.
//!
//! A [`Keymap`] ties every switch the scanner knows about (matrix cells and
//! directly wired buttons) to an immutable [`KeyDefinition`]. The keymap is
//! never mutated after construction, so a [`KeyPosition`] is a stable
//! identity for "the same physical key" across scans.

use crate::error::Error;
use crate::keys::{
    BACKSPACE, BTN_LEFT1, BTN_LEFT2, BTN_RIGHT1, BTN_RIGHT2, ENTER, ESCAPE, JOY_CENTER, JOY_DOWN,
    JOY_LEFT, JOY_RIGHT, JOY_UP, MOD_ALT, MOD_SHL, MOD_SHR, MOD_SYM, TAB,
};

/// Largest matrix the scanner can sample in one pass (one bit per cell).
pub const MAX_MATRIX_CELLS: usize = 64;
/// Largest number of directly wired buttons a keymap may carry.
pub const MAX_BUTTONS: usize = 64;

/// Modifier carried by a key definition.
///
/// The discriminant indexes the held-modifier table in [`crate::locks::ModifierState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ModifierId {
    /// Plain key, no modifier.
    None = 0,
    ShiftLeft = 1,
    ShiftRight = 2,
    Alt = 3,
    /// The Sym key, which acts as Ctrl.
    Sym = 4,
}

impl ModifierId {
    /// Number of entries (including `None`) in a table indexed by modifier.
    pub const COUNT: usize = 5;

    /// Code emitted for this modifier when modifier reporting is enabled.
    pub fn report_code(self) -> Option<u8> {
        match self {
            ModifierId::None => None,
            ModifierId::ShiftLeft => Some(MOD_SHL),
            ModifierId::ShiftRight => Some(MOD_SHR),
            ModifierId::Alt => Some(MOD_ALT),
            ModifierId::Sym => Some(MOD_SYM),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ModifierId::None => "",
            ModifierId::ShiftLeft => "LSft",
            ModifierId::ShiftRight => "RSft",
            ModifierId::Alt => "Alt",
            ModifierId::Sym => "Sym",
        }
    }
}

/// What a single switch produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDefinition {
    /// Character produced with no modifiers applied.
    pub base: Option<u8>,
    /// Character produced while Alt (or numlock) is active.
    pub alt: Option<u8>,
    /// Modifier this switch controls, if any.
    pub modifier: ModifierId,
}

impl KeyDefinition {
    /// A switch that produces nothing.
    pub const EMPTY: Self = Self {
        base: None,
        alt: None,
        modifier: ModifierId::None,
    };

    /// A character key with an Alt alternative.
    pub const fn key(base: u8, alt: u8) -> Self {
        Self {
            base: Some(base),
            alt: Some(alt),
            modifier: ModifierId::None,
        }
    }

    /// A key without an Alt alternative.
    pub const fn single(base: u8) -> Self {
        Self {
            base: Some(base),
            alt: None,
            modifier: ModifierId::None,
        }
    }

    /// A modifier key.
    pub const fn modifier(id: ModifierId) -> Self {
        Self {
            base: None,
            alt: None,
            modifier: id,
        }
    }

    pub fn is_modifier(&self) -> bool {
        self.modifier != ModifierId::None
    }
}

/// Stable identity of a physical switch within a [`Keymap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPosition {
    /// Matrix cell, `row * cols + col`.
    Matrix(u8),
    /// Directly wired button, by index.
    Button(u8),
}

/// Physical layout plus key definitions.
///
/// Pins are logical indices understood by the [`crate::pins::PinBank`] the
/// keymap is scanned with. Matrix definitions are stored row-major.
#[derive(Debug, Clone, Copy)]
pub struct Keymap<'a> {
    row_pins: &'a [u8],
    col_pins: &'a [u8],
    button_pins: &'a [u8],
    matrix: &'a [KeyDefinition],
    buttons: &'a [KeyDefinition],
}

impl<'a> Keymap<'a> {
    /// Build a keymap, checking that the tables agree with the pin lists.
    pub fn new(
        row_pins: &'a [u8],
        col_pins: &'a [u8],
        button_pins: &'a [u8],
        matrix: &'a [KeyDefinition],
        buttons: &'a [KeyDefinition],
    ) -> Result<Self, Error> {
        let cells = row_pins.len() * col_pins.len();
        if cells > MAX_MATRIX_CELLS {
            return Err(Error::MatrixTooLarge { cells });
        }
        if button_pins.len() > MAX_BUTTONS {
            return Err(Error::TooManyButtons {
                buttons: button_pins.len(),
            });
        }
        if matrix.len() != cells || buttons.len() != button_pins.len() {
            return Err(Error::KeymapShape);
        }
        Ok(Self {
            row_pins,
            col_pins,
            button_pins,
            matrix,
            buttons,
        })
    }

    pub fn rows(&self) -> usize {
        self.row_pins.len()
    }

    pub fn cols(&self) -> usize {
        self.col_pins.len()
    }

    pub fn row_pins(&self) -> &'a [u8] {
        self.row_pins
    }

    pub fn col_pins(&self) -> &'a [u8] {
        self.col_pins
    }

    pub fn button_pins(&self) -> &'a [u8] {
        self.button_pins
    }

    /// Position of the matrix cell at `row`, `col`.
    pub fn matrix_position(&self, row: usize, col: usize) -> KeyPosition {
        KeyPosition::Matrix((row * self.cols() + col) as u8)
    }

    /// Definition bound to a position.
    ///
    /// Positions handed out by this keymap are always in range; anything else
    /// resolves to [`KeyDefinition::EMPTY`].
    pub fn definition(&self, position: KeyPosition) -> &'a KeyDefinition {
        let def = match position {
            KeyPosition::Matrix(idx) => self.matrix.get(idx as usize),
            KeyPosition::Button(idx) => self.buttons.get(idx as usize),
        };
        def.unwrap_or(&KeyDefinition::EMPTY)
    }

    /// Every position in scan order: matrix row-major, then buttons.
    pub fn positions(&self) -> impl Iterator<Item = KeyPosition> + '_ {
        let matrix = (0..self.matrix.len()).map(|i| KeyPosition::Matrix(i as u8));
        let buttons = (0..self.buttons.len()).map(|i| KeyPosition::Button(i as u8));
        matrix.chain(buttons)
    }

    /// First position whose base character is `key`.
    pub fn find(&self, key: u8) -> Option<KeyPosition> {
        self.positions()
            .find(|&pos| self.definition(pos).base == Some(key))
    }

    /// First position carrying the modifier `id`.
    pub fn find_modifier(&self, id: ModifierId) -> Option<KeyPosition> {
        if id == ModifierId::None {
            return None;
        }
        self.positions()
            .find(|&pos| self.definition(pos).modifier == id)
    }
}

/// Characters produced by the side buttons, indexed
/// `[modifier column][button]`.
///
/// Modifier columns: 0 = none, 1 = alt, 2 = shift, 3 = ctrl.
/// Buttons: LEFT1, LEFT2, RIGHT1, RIGHT2 (see [`crate::keys::button_index`]).
pub static BUTTON_MAP: [[u8; 4]; 4] = [
    [ESCAPE, b'&', b'=', b'\\'],
    [b'*', b'%', b'[', b']'],
    [b'<', b'>', b'{', b'}'],
    [JOY_LEFT, JOY_DOWN, JOY_UP, JOY_RIGHT],
];

/// Number of matrix rows on the default keyboard.
pub const ROWS: usize = 7;
/// Number of matrix columns on the default keyboard.
pub const COLS: usize = 6;
/// Number of directly wired buttons on the default keyboard.
pub const BUTTONS: usize = 1;

/// Logical row pins of the default keyboard.
pub static ROW_PINS: [u8; ROWS] = [0, 1, 2, 3, 4, 5, 6];
/// Logical column pins of the default keyboard.
pub static COL_PINS: [u8; COLS] = [7, 8, 9, 10, 11, 12];
/// Logical button pins of the default keyboard.
pub static BUTTON_PINS: [u8; BUTTONS] = [13];

/// Shorthand aliases for readability.
const ___: KeyDefinition = KeyDefinition::EMPTY;
const SHL: KeyDefinition = KeyDefinition::modifier(ModifierId::ShiftLeft);
const SHR: KeyDefinition = KeyDefinition::modifier(ModifierId::ShiftRight);
const ALT: KeyDefinition = KeyDefinition::modifier(ModifierId::Alt);
const SYM: KeyDefinition = KeyDefinition::modifier(ModifierId::Sym);

const fn k(base: u8, alt: u8) -> KeyDefinition {
    KeyDefinition::key(base, alt)
}

const fn s(base: u8) -> KeyDefinition {
    KeyDefinition::single(base)
}

/// Matrix of the default keyboard.
///
/// The electrical rows and columns do not follow the printed key rows, so the
/// table reads scrambled. Column 0 carries the joystick click and three of
/// the side buttons.
pub static MATRIX: [KeyDefinition; ROWS * COLS] = [
    // Row 0
    s(JOY_CENTER), k(b'W', b'1'), k(b'G', b'/'), k(b'S', b'4'), k(b'L', b'"'), k(b'H', b':'),
    // Row 1
    ___,           k(b'Q', b'#'), k(b'R', b'3'), k(b'E', b'2'), k(b'O', b'+'), k(b'U', b'_'),
    // Row 2
    s(BTN_LEFT1),  k(b'~', b'0'), k(b'F', b'6'), SHL,           k(b'K', b'\''), k(b'J', b';'),
    // Row 3
    ___,           k(b' ', TAB),  k(b'C', b'9'), k(b'Z', b'7'), k(b'M', b'.'), k(b'N', b','),
    // Row 4
    s(BTN_LEFT2),  SYM,           k(b'T', b'('), k(b'D', b'5'), k(b'I', b'-'), k(b'Y', b')'),
    // Row 5
    s(BTN_RIGHT1), ALT,           k(b'V', b'?'), k(b'X', b'8'), k(b'$', b'`'), k(b'B', b'!'),
    // Row 6
    ___,           k(b'A', b'*'), SHR,           k(b'P', b'@'), s(BACKSPACE),  k(ENTER, b'|'),
];

/// Directly wired buttons of the default keyboard.
pub static BUTTON_KEYS: [KeyDefinition; BUTTONS] = [s(BTN_RIGHT2)];

/// The default keyboard layout.
pub static DEFAULT_KEYMAP: Keymap<'static> = Keymap {
    row_pins: &ROW_PINS,
    col_pins: &COL_PINS,
    button_pins: &BUTTON_PINS,
    matrix: &MATRIX,
    buttons: &BUTTON_KEYS,
};
