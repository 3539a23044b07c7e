//! Effective-key resolution: what a press emits under the current modifiers.

use crate::config::{Config, Flag};
use crate::keymap::{KeyDefinition, BUTTON_MAP};
use crate::keys::button_index;
use crate::locks::{LockState, ModifierState};

/// Modifier columns of [`BUTTON_MAP`].
const BUTTON_COL_PLAIN: usize = 0;
const BUTTON_COL_ALT: usize = 1;
const BUTTON_COL_SHIFT: usize = 2;
const BUTTON_COL_CTRL: usize = 3;

/// Modifiers that apply to the next resolved key, locks folded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveModifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl ActiveModifiers {
    /// Capslock counts as shift, numlock as alt.
    pub fn from_state(mods: &ModifierState, locks: &LockState) -> Self {
        Self {
            shift: mods.shift() || locks.capslock(),
            alt: mods.alt() || locks.numlock(),
            ctrl: mods.ctrl(),
        }
    }

    /// Column of [`BUTTON_MAP`] to use: ctrl beats shift beats alt.
    fn button_column(&self) -> usize {
        if self.ctrl {
            BUTTON_COL_CTRL
        } else if self.shift {
            BUTTON_COL_SHIFT
        } else if self.alt {
            BUTTON_COL_ALT
        } else {
            BUTTON_COL_PLAIN
        }
    }
}

/// Resolve the key a definition emits.
///
/// Modifier keys emit their report code only when `ReportModifiers` is set.
/// Other keys pass through untouched unless `UseModifiers` is set, in which
/// case side buttons are looked up in [`BUTTON_MAP`], alt selects the
/// alternate character, and uppercase letters are folded to lowercase or to
/// control codes.
pub fn resolve(def: &KeyDefinition, active: ActiveModifiers, config: &impl Config) -> Option<u8> {
    if def.is_modifier() {
        return if config.is_set(Flag::ReportModifiers) {
            def.modifier.report_code()
        } else {
            None
        };
    }

    let base = def.base?;
    if !config.is_set(Flag::UseModifiers) {
        return Some(base);
    }

    if let Some(button) = button_index(base) {
        return Some(BUTTON_MAP[active.button_column()][button]);
    }

    if active.alt {
        return def.alt;
    }

    if base.is_ascii_uppercase() {
        if active.ctrl {
            return Some(base - 0x40);
        }
        if !active.shift {
            return Some(base.to_ascii_lowercase());
        }
    }

    Some(base)
}
