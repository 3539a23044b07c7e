//! Drive the engine from a script against a simulated matrix.

use std::cell::{Cell, RefCell};

use anyhow::Result;
use puppet_keyboard::{Config, Flag, KeyState, Keyboard, Keymap, LockState, Settings, SimulatedMatrix};

use crate::layout::event_label;
use crate::script::{Action, Step};

/// What was left over once the script finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub end_ms: u64,
    pub queued: usize,
    pub overflow: bool,
    pub capslock: bool,
    pub numlock: bool,
}

/// Run `steps` through a fresh engine, writing one line per event and lock
/// change to `out`.
///
/// The queue is never drained, as if nothing were reading the keyboard, so
/// long scripts exercise the overflow policy. Replay time is kept in 64 bits
/// and handed to the engine truncated, which it tolerates since it only
/// compares timestamps by wrapping difference.
pub fn run(
    keymap: &Keymap<'_>,
    settings: Settings,
    steps: &[Step],
    out: &mut dyn FnMut(String),
) -> Result<Summary> {
    let now = Cell::new(0u64);
    let report_modifiers = settings.is_set(Flag::ReportModifiers);
    let lines = RefCell::new(Vec::new());

    let key_listener = |key: u8, state: KeyState| {
        lines
            .borrow_mut()
            .push(format!(
                "t={} {} {}",
                now.get(),
                event_label(key, report_modifiers),
                state.name()
            ));
    };
    let lock_listener = |caps_changed: bool, num_changed: bool, locks: &LockState| {
        let mut changed = Vec::new();
        if caps_changed {
            changed.push(format!("capslock={}", on_off(locks.capslock())));
        }
        if num_changed {
            changed.push(format!("numlock={}", on_off(locks.numlock())));
        }
        lines
            .borrow_mut()
            .push(format!("t={} locks {}", now.get(), changed.join(" ")));
    };

    let mut sim = SimulatedMatrix::new(keymap);
    let mut kb: Keyboard<Settings> = Keyboard::new(keymap, settings);
    kb.add_key_listener(&key_listener)?;
    kb.add_lock_listener(&lock_listener)?;
    kb.init(&mut sim);

    // Give the last step time to reach hold and release.
    let settle_ms =
        u64::from(settings.hold_threshold_ten_ms()) * 10 + u64::from(settings.scan_interval_ms());
    let end_ms = steps.last().map_or(0, |step| u64::from(step.time_ms)) + settle_ms;

    let mut pending = steps.iter().peekable();
    while now.get() <= end_ms {
        while let Some(step) = pending.next_if(|step| u64::from(step.time_ms) <= now.get()) {
            match step.action {
                Action::Press => sim.press(step.position),
                Action::Release => sim.release(step.position),
            }
        }

        let interval = kb.tick(&mut sim, now.get() as u32);
        for line in lines.borrow_mut().drain(..) {
            out(line);
        }
        now.set(now.get() + u64::from(interval.max(1)));
    }

    Ok(Summary {
        end_ms,
        queued: kb.queued(),
        overflow: kb.config().overflow_pending(),
        capslock: kb.capslock(),
        numlock: kb.numlock(),
    })
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
