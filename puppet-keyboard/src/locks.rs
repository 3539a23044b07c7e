//! Held modifiers and the capslock/numlock toggles driven by modifier chords.

use log::info;

use crate::keymap::ModifierId;

/// Which modifiers are currently held down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    held: [bool; ModifierId::COUNT],
}

impl ModifierState {
    pub const fn new() -> Self {
        Self {
            held: [false; ModifierId::COUNT],
        }
    }

    pub fn is_held(&self, id: ModifierId) -> bool {
        self.held[id as usize]
    }

    /// `ModifierId::None` is never recorded.
    pub fn set(&mut self, id: ModifierId, held: bool) {
        if id != ModifierId::None {
            self.held[id as usize] = held;
        }
    }

    pub fn shift(&self) -> bool {
        self.is_held(ModifierId::ShiftLeft) || self.is_held(ModifierId::ShiftRight)
    }

    pub fn alt(&self) -> bool {
        self.is_held(ModifierId::Alt)
    }

    /// Sym acts as Ctrl.
    pub fn ctrl(&self) -> bool {
        self.is_held(ModifierId::Sym)
    }
}

/// Which locks a chord evaluation just toggled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockEdges {
    pub capslock: bool,
    pub numlock: bool,
}

impl LockEdges {
    pub fn any(&self) -> bool {
        self.capslock || self.numlock
    }
}

/// Capslock/numlock values and their chord guards.
///
/// Once a chord has set or cleared a lock, its edge stays consumed until Alt
/// is released, so holding the chord does not toggle the lock on every press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockState {
    capslock: bool,
    numlock: bool,
    capslock_edge_consumed: bool,
    numlock_edge_consumed: bool,
}

impl LockState {
    pub const fn new() -> Self {
        Self {
            capslock: false,
            numlock: false,
            capslock_edge_consumed: false,
            numlock_edge_consumed: false,
        }
    }

    pub fn capslock(&self) -> bool {
        self.capslock
    }

    pub fn numlock(&self) -> bool {
        self.numlock
    }

    pub fn capslock_edge_consumed(&self) -> bool {
        self.capslock_edge_consumed
    }

    pub fn numlock_edge_consumed(&self) -> bool {
        self.numlock_edge_consumed
    }

    /// Evaluate the lock chords against the held modifiers.
    ///
    /// Run on every new press, after the pressed key's own modifier has been
    /// recorded. The rules are applied in a fixed order:
    ///
    /// 1. Right Shift + Alt sets capslock.
    /// 2. Left Shift + Alt sets numlock.
    /// 3. Either Shift clears capslock.
    /// 4. Either Shift clears numlock.
    /// 5. With Alt up, both edges are re-armed.
    ///
    /// Each rule only fires while its lock's edge is unconsumed, so rule 1
    /// wins over rule 3 when both apply.
    pub fn evaluate_chords(&mut self, mods: &ModifierState) -> LockEdges {
        let mut edges = LockEdges::default();
        let shl = mods.is_held(ModifierId::ShiftLeft);
        let shr = mods.is_held(ModifierId::ShiftRight);
        let alt = mods.alt();

        if !self.capslock_edge_consumed && shr && alt {
            self.capslock = true;
            self.capslock_edge_consumed = true;
            edges.capslock = true;
        }

        if !self.numlock_edge_consumed && shl && alt {
            self.numlock = true;
            self.numlock_edge_consumed = true;
            edges.numlock = true;
        }

        if !self.capslock_edge_consumed && (shl || shr) {
            self.capslock = false;
            self.capslock_edge_consumed = true;
            edges.capslock = true;
        }

        if !self.numlock_edge_consumed && (shl || shr) {
            self.numlock = false;
            self.numlock_edge_consumed = true;
            edges.numlock = true;
        }

        if !alt {
            self.capslock_edge_consumed = false;
            self.numlock_edge_consumed = false;
        }

        if edges.any() {
            info!(
                "locks: capslock={} numlock={} (changed caps={} num={})",
                self.capslock, self.numlock, edges.capslock, edges.numlock
            );
        }

        edges
    }
}
