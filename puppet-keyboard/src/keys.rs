//! Key codes that are not plain ASCII.
//!
//! Keys travel through the engine as single bytes. Printable keys use their
//! ASCII value, control keys use the C0 range, and the hardware-specific
//! controls below occupy otherwise unused C0 slots. `0` never names a key.

/// Joystick up.
pub const JOY_UP: u8 = 0x01;
/// Joystick down.
pub const JOY_DOWN: u8 = 0x02;
/// Joystick left.
pub const JOY_LEFT: u8 = 0x03;
/// Joystick right.
pub const JOY_RIGHT: u8 = 0x04;
/// Joystick center click.
pub const JOY_CENTER: u8 = 0x05;

/// Upper-left side button.
pub const BTN_LEFT1: u8 = 0x06;
/// Upper-right side button.
pub const BTN_RIGHT1: u8 = 0x07;
/// Lower-left side button.
pub const BTN_LEFT2: u8 = 0x11;
/// Lower-right side button.
pub const BTN_RIGHT2: u8 = 0x12;

/// Reported for the Alt key when modifier reporting is on.
pub const MOD_ALT: u8 = 0x1A;
/// Reported for the left Shift key when modifier reporting is on.
pub const MOD_SHL: u8 = 0x1B;
/// Reported for the right Shift key when modifier reporting is on.
pub const MOD_SHR: u8 = 0x1C;
/// Reported for the Sym key when modifier reporting is on.
pub const MOD_SYM: u8 = 0x1D;

pub const BACKSPACE: u8 = b'\x08';
pub const TAB: u8 = b'\t';
pub const ENTER: u8 = b'\n';
/// Same byte as [`MOD_SHL`].
pub const ESCAPE: u8 = 0x1B;

/// Name of the modifier a report code stands for.
///
/// [`MOD_SHL`] shares its byte with [`ESCAPE`], so a caller only knows which
/// one it holds when modifier reporting is on.
pub fn report_name(key: u8) -> Option<&'static str> {
    let label = match key {
        MOD_ALT => "Alt",
        MOD_SHL => "LSft",
        MOD_SHR => "RSft",
        MOD_SYM => "Sym",
        _ => return None,
    };
    Some(label)
}

/// Index of a side button in the columns of [`crate::keymap::BUTTON_MAP`].
pub fn button_index(key: u8) -> Option<usize> {
    match key {
        BTN_LEFT1 => Some(0),
        BTN_LEFT2 => Some(1),
        BTN_RIGHT1 => Some(2),
        BTN_RIGHT2 => Some(3),
        _ => None,
    }
}

/// Short human readable label, for logs and layout dumps.
pub fn name(key: u8) -> Option<&'static str> {
    let label = match key {
        JOY_UP => "Up",
        JOY_DOWN => "Down",
        JOY_LEFT => "Left",
        JOY_RIGHT => "Right",
        JOY_CENTER => "Click",
        BTN_LEFT1 => "L1",
        BTN_RIGHT1 => "R1",
        BTN_LEFT2 => "L2",
        BTN_RIGHT2 => "R2",
        BACKSPACE => "Bksp",
        TAB => "Tab",
        ENTER => "Ent",
        ESCAPE => "Esc",
        b' ' => "Spc",
        _ => return None,
    };
    Some(label)
}
