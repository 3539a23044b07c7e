//! The scanning engine: slot tracking, the keypress state machine, and the
//! public query surface.

use log::{debug, trace};

use crate::config::Config;
use crate::error::Error;
use crate::event::{Event, KeyListener, KeyState, LockListener};
use crate::keymap::{KeyDefinition, KeyPosition, Keymap, ModifierId};
use crate::locks::{LockState, ModifierState};
use crate::matrix;
use crate::pins::PinBank;
use crate::resolve::{resolve, ActiveModifiers};
use crate::sink::EventSink;
use crate::slots::{SlotTable, TrackedKeypress};

/// Keypresses tracked at once.
pub const DEFAULT_SLOTS: usize = 10;
/// Events the queue holds before the overflow policy applies.
pub const DEFAULT_QUEUE: usize = 31;

/// Keyboard input engine.
///
/// Owns everything the scanner mutates. Hardware is lent to each call, so
/// the same engine runs against real pins or a [`crate::pins::SimulatedMatrix`].
pub struct Keyboard<
    'a,
    C: Config,
    const SLOTS: usize = DEFAULT_SLOTS,
    const QUEUE: usize = DEFAULT_QUEUE,
> {
    keymap: &'a Keymap<'a>,
    config: C,
    slots: SlotTable<SLOTS>,
    modifiers: ModifierState,
    locks: LockState,
    sink: EventSink<'a, QUEUE>,
}

impl<'a, C: Config, const SLOTS: usize, const QUEUE: usize> Keyboard<'a, C, SLOTS, QUEUE> {
    pub fn new(keymap: &'a Keymap<'a>, config: C) -> Self {
        Self {
            keymap,
            config,
            slots: SlotTable::new(),
            modifiers: ModifierState::new(),
            locks: LockState::new(),
            sink: EventSink::new(),
        }
    }

    /// Configure the scanned lines. Call once before the first [`Self::tick`].
    pub fn init(&self, pins: &mut impl PinBank) {
        matrix::init_pins(self.keymap, pins);
    }

    /// Run one scan at time `now_ms` and return the delay, in milliseconds,
    /// until the next one should run.
    ///
    /// Matrix cells are processed row-major, then buttons in index order.
    pub fn tick(&mut self, pins: &mut impl PinBank, now_ms: u32) -> u32 {
        let interval = self.config.scan_interval_ms();

        let state = matrix::scan(self.keymap, pins);
        for idx in 0..self.keymap.rows() * self.keymap.cols() {
            self.sample(KeyPosition::Matrix(idx as u8), state.is_pressed(idx), now_ms);
        }

        for btn in 0..self.keymap.button_pins().len() {
            let pressed = matrix::read_button(self.keymap, pins, btn);
            self.sample(KeyPosition::Button(btn as u8), pressed, now_ms);
        }

        interval
    }

    /// Feed one sample to the slot following `position`, allocating a slot
    /// for a new press. A new press with no free slot is dropped.
    fn sample(&mut self, position: KeyPosition, pressed: bool, now_ms: u32) {
        if let Some(idx) = self.slots.find(position) {
            self.advance(idx, pressed, now_ms);
            return;
        }

        if !pressed {
            return;
        }

        match self.slots.allocate(position) {
            Some(idx) => {
                debug!("slot {idx} <- {position:?}");
                self.advance(idx, true, now_ms);
            }
            None => debug!("no free slot, ignoring {position:?}"),
        }
    }

    /// Step the state machine of slot `idx` with a fresh sample.
    fn advance(&mut self, idx: usize, pressed: bool, now_ms: u32) {
        let mut slot = self.slots.get(idx);
        let Some(position) = slot.position else {
            return;
        };
        let def = self.keymap.definition(position);

        match slot.state {
            KeyState::Idle => {
                if pressed {
                    self.modifiers.set(def.modifier, true);

                    let edges = self.locks.evaluate_chords(&self.modifiers);
                    if edges.any() {
                        self.sink.notify_locks(edges, &self.locks);
                    }

                    self.transition(&mut slot, def, KeyState::Pressed);
                    slot.press_start_ms = now_ms;
                }
            }
            KeyState::Pressed => {
                let held_ms = now_ms.wrapping_sub(slot.press_start_ms);
                let threshold_ms = self.config.hold_threshold_ten_ms().saturating_mul(10);
                if held_ms >= threshold_ms {
                    self.transition(&mut slot, def, KeyState::Hold);
                } else if !pressed {
                    self.transition(&mut slot, def, KeyState::Released);
                }
            }
            KeyState::Hold => {
                if !pressed {
                    self.transition(&mut slot, def, KeyState::Released);
                }
            }
            // Released slots are freed below in the tick they are entered.
            KeyState::Released => {}
        }

        if slot.state == KeyState::Released {
            self.modifiers.set(def.modifier, false);
            trace!("slot {idx} released -> idle");
            slot = TrackedKeypress::FREE;
        }

        self.slots.set(idx, slot);
    }

    /// Enter `next`, resolving the effective key if it is not latched yet,
    /// and emit it.
    fn transition(&mut self, slot: &mut TrackedKeypress, def: &KeyDefinition, next: KeyState) {
        trace!("{:?}: {:?} -> {:?}", slot.position, slot.state, next);
        slot.state = next;

        if slot.effective_key.is_none() {
            let active = ActiveModifiers::from_state(&self.modifiers, &self.locks);
            slot.effective_key = resolve(def, active, &self.config);
        }

        if let Some(key) = slot.effective_key {
            self.sink.emit(key, next, &mut self.config);
        }
    }

    /// Push a synthetic event through the queue and key listeners.
    pub fn inject_event(&mut self, key: u8, state: KeyState) {
        self.sink.emit(key, state, &mut self.config);
    }

    pub fn add_key_listener(&mut self, listener: &'a dyn KeyListener) -> Result<(), Error> {
        self.sink.add_key_listener(listener)
    }

    pub fn add_lock_listener(&mut self, listener: &'a dyn LockListener) -> Result<(), Error> {
        self.sink.add_lock_listener(listener)
    }

    /// Whether a tracked press that resolved to `key` is pressed or held.
    pub fn is_key_down(&self, key: u8) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.is_down() && slot.effective_key == Some(key))
    }

    pub fn is_modifier_on(&self, id: ModifierId) -> bool {
        self.modifiers.is_held(id)
    }

    pub fn capslock(&self) -> bool {
        self.locks.capslock()
    }

    pub fn numlock(&self) -> bool {
        self.locks.numlock()
    }

    pub fn locks(&self) -> &LockState {
        &self.locks
    }

    /// Oldest queued event, for the reporting side.
    pub fn pop_event(&mut self) -> Option<Event> {
        self.sink.pop()
    }

    pub fn queued(&self) -> usize {
        self.sink.len()
    }

    pub fn clear_queue(&mut self) {
        self.sink.clear();
    }

    pub fn slots(&self) -> impl Iterator<Item = &TrackedKeypress> {
        self.slots.iter()
    }

    pub fn keymap(&self) -> &'a Keymap<'a> {
        self.keymap
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    /// Forget every tracked press, held modifier, lock and queued event.
    /// Listeners stay registered.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.modifiers = ModifierState::new();
        self.locks = LockState::new();
        self.sink.clear();
    }
}
