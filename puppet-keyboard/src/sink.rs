//! Bounded event queue plus listener fan-out.

use heapless::{Deque, Vec};
use log::warn;

use crate::config::{Config, Flag};
use crate::error::Error;
use crate::event::{Event, KeyListener, KeyState, LockListener};
use crate::locks::{LockEdges, LockState};

/// Listener slots per registry.
pub const MAX_LISTENERS: usize = 8;

/// Events waiting for the reporting side, and the listeners notified of
/// every event as it happens.
pub struct EventSink<'a, const QUEUE: usize> {
    queue: Deque<Event, QUEUE>,
    key_listeners: Vec<&'a dyn KeyListener, MAX_LISTENERS>,
    lock_listeners: Vec<&'a dyn LockListener, MAX_LISTENERS>,
}

impl<'a, const QUEUE: usize> EventSink<'a, QUEUE> {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            key_listeners: Vec::new(),
            lock_listeners: Vec::new(),
        }
    }

    /// Queue an event and pass it to every key listener.
    ///
    /// When the queue is full, `OverflowRaisesInterrupt` latches the overflow
    /// indicator and `OverflowForcesEnqueue` drops the oldest queued event to
    /// make room; the two compose. Listeners are called either way.
    pub fn emit(&mut self, key: u8, state: KeyState, config: &mut impl Config) {
        let event = Event { key, state };

        if let Err(event) = self.queue.push_back(event) {
            warn!("event queue full, key {key:#04x} {}", state.name());

            if config.is_set(Flag::OverflowRaisesInterrupt) {
                config.raise_overflow_interrupt();
            }

            if config.is_set(Flag::OverflowForcesEnqueue) {
                self.queue.pop_front();
                // Room was just made.
                let _ = self.queue.push_back(event);
            }
        }

        for listener in &self.key_listeners {
            listener.on_key(key, state);
        }
    }

    /// Tell every lock listener which locks a chord just changed.
    pub fn notify_locks(&self, edges: LockEdges, locks: &LockState) {
        for listener in &self.lock_listeners {
            listener.on_lock(edges.capslock, edges.numlock, locks);
        }
    }

    /// Listeners are called in registration order and cannot be removed.
    pub fn add_key_listener(&mut self, listener: &'a dyn KeyListener) -> Result<(), Error> {
        self.key_listeners
            .push(listener)
            .map_err(|_| Error::ListenerCapacity)
    }

    pub fn add_lock_listener(&mut self, listener: &'a dyn LockListener) -> Result<(), Error> {
        self.lock_listeners
            .push(listener)
            .map_err(|_| Error::ListenerCapacity)
    }

    /// Oldest queued event.
    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Queued events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.queue.iter()
    }
}

impl<const QUEUE: usize> Default for EventSink<'_, QUEUE> {
    fn default() -> Self {
        Self::new()
    }
}
