//! Plain-text rendering of a keymap.
//! Each matrix cell shows `base/alt`, modifiers show their name.

use std::fmt::Write;

use puppet_keyboard::keymap::BUTTON_MAP;
use puppet_keyboard::{keys, KeyDefinition, KeyPosition, Keymap};

/// Width of one rendered cell, separator included.
const CELL: usize = 10;

/// Column headings of [`BUTTON_MAP`], in table order.
const BUTTON_COLUMNS: [&str; 4] = ["plain", "alt", "shift", "sym"];

/// Printable label for an emitted key code.
pub fn key_label(key: u8) -> String {
    if let Some(name) = keys::name(key) {
        return name.to_string();
    }
    if key.is_ascii_graphic() {
        return (key as char).to_string();
    }
    format!("0x{key:02X}")
}

/// Label for an emitted event. With modifier reporting on, the report
/// codes are shown as modifier names rather than the control keys they
/// share a byte with.
pub fn event_label(key: u8, report_modifiers: bool) -> String {
    match keys::report_name(key) {
        Some(name) if report_modifiers => name.to_string(),
        _ => key_label(key),
    }
}

fn cell_label(def: &KeyDefinition) -> String {
    if def.is_modifier() {
        return def.modifier.name().to_string();
    }
    match (def.base, def.alt) {
        (Some(base), Some(alt)) => format!("{}/{}", key_label(base), key_label(alt)),
        (Some(base), None) => key_label(base),
        _ => "-".to_string(),
    }
}

/// Render the matrix grid, the buttons, and the button lookup table.
pub fn render(keymap: &Keymap<'_>) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "matrix {}x{}, {} button(s)",
        keymap.rows(),
        keymap.cols(),
        keymap.button_pins().len()
    );

    out.push_str("     ");
    for col in 0..keymap.cols() {
        let _ = write!(out, "{:<CELL$}", format!("c{col}"));
    }
    out.push('\n');

    for row in 0..keymap.rows() {
        let _ = write!(out, "r{row:<4}");
        for col in 0..keymap.cols() {
            let def = keymap.definition(keymap.matrix_position(row, col));
            let _ = write!(out, "{:<CELL$}", cell_label(def));
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }

    for index in 0..keymap.button_pins().len() {
        let def = keymap.definition(KeyPosition::Button(index as u8));
        let _ = writeln!(out, "btn{index}  {}", cell_label(def));
    }

    out.push_str("\nbuttons  ");
    for button in [keys::BTN_LEFT1, keys::BTN_LEFT2, keys::BTN_RIGHT1, keys::BTN_RIGHT2] {
        let _ = write!(out, "{:<CELL$}", key_label(button));
    }
    out.push('\n');
    for (name, row) in BUTTON_COLUMNS.iter().zip(BUTTON_MAP.iter()) {
        let _ = write!(out, "{name:<9}");
        for &key in row {
            let _ = write!(out, "{:<CELL$}", key_label(key));
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use puppet_keyboard::DEFAULT_KEYMAP;

    #[test]
    fn test_key_labels() {
        assert_eq!(key_label(b'q'), "q");
        assert_eq!(key_label(keys::JOY_UP), "Up");
        assert_eq!(key_label(b' '), "Spc");
        assert_eq!(key_label(0x7F), "0x7F");
    }

    #[test]
    fn test_event_labels_follow_modifier_reporting() {
        assert_eq!(event_label(keys::MOD_SHL, false), "Esc");
        assert_eq!(event_label(keys::MOD_SHL, true), "LSft");
        assert_eq!(event_label(keys::MOD_ALT, true), "Alt");
        assert_eq!(event_label(b'a', true), "a");
    }

    #[test]
    fn test_render_default_keymap() {
        let text = render(&DEFAULT_KEYMAP);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "matrix 7x6, 1 button(s)");
        assert!(lines[2].starts_with("r0   Click"));
        assert!(lines[2].contains("W/1"));
        assert!(text.contains("LSft"));
        assert!(text.contains("btn0  R2"));
        assert!(text.contains("sym      Left"));
    }
}
