//! Fixed-capacity table of the keypresses currently being tracked.

use crate::event::KeyState;
use crate::keymap::KeyPosition;

/// One ongoing keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedKeypress {
    /// Switch this slot follows; `None` while the slot is free.
    pub position: Option<KeyPosition>,
    /// Tick time (ms) at which the press was first seen.
    pub press_start_ms: u32,
    pub state: KeyState,
    /// Key resolved for this press, latched on first resolution.
    pub effective_key: Option<u8>,
}

impl TrackedKeypress {
    pub const FREE: Self = Self {
        position: None,
        press_start_ms: 0,
        state: KeyState::Idle,
        effective_key: None,
    };

    pub fn is_free(&self) -> bool {
        self.position.is_none()
    }

    /// Whether the press is currently down from a consumer's point of view.
    pub fn is_down(&self) -> bool {
        !self.is_free() && matches!(self.state, KeyState::Pressed | KeyState::Hold)
    }
}

/// Slot arena. Lookups are linear; the table is small and scanned every tick.
#[derive(Debug, Clone)]
pub struct SlotTable<const N: usize> {
    slots: [TrackedKeypress; N],
}

impl<const N: usize> SlotTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: [TrackedKeypress::FREE; N],
        }
    }

    /// Slot already following `position`.
    pub fn find(&self, position: KeyPosition) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.position == Some(position))
    }

    /// Bind the first free slot to `position`, in the Idle state.
    ///
    /// Returns `None` when every slot is taken.
    pub fn allocate(&mut self, position: KeyPosition) -> Option<usize> {
        let idx = self.slots.iter().position(TrackedKeypress::is_free)?;
        self.slots[idx] = TrackedKeypress {
            position: Some(position),
            ..TrackedKeypress::FREE
        };
        Some(idx)
    }

    pub fn get(&self, idx: usize) -> TrackedKeypress {
        self.slots[idx]
    }

    pub fn set(&mut self, idx: usize, slot: TrackedKeypress) {
        self.slots[idx] = slot;
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedKeypress> {
        self.slots.iter()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_free()).count()
    }

    pub fn clear(&mut self) {
        self.slots = [TrackedKeypress::FREE; N];
    }
}

impl<const N: usize> Default for SlotTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
