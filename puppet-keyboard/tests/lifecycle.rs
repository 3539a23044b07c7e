//! Scanning, slot tracking and the press/hold/release lifecycle.

mod common;

use common::{drain, ev, key, modifier, CountingConfig, KeyLog, LockLog};
use puppet_keyboard::keys::{BTN_RIGHT2, MOD_ALT};
use puppet_keyboard::sink::MAX_LISTENERS;
use puppet_keyboard::{
    Error, Flag, KeyPosition, KeyState, Keyboard, ModifierId, Settings, SimulatedMatrix,
    DEFAULT_KEYMAP,
};

#[test]
fn press_and_release_emit_resolved_key() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(key(b'A'));
    kb.tick(&mut sim, 0);
    assert!(kb.is_key_down(b'a'));
    assert!(!kb.is_key_down(b'A'));

    kb.tick(&mut sim, 10);
    sim.release(key(b'A'));
    kb.tick(&mut sim, 20);

    assert!(!kb.is_key_down(b'a'));
    assert_eq!(
        drain(&mut kb),
        [ev(b'a', KeyState::Pressed), ev(b'a', KeyState::Released)]
    );
}

#[test]
fn released_slot_is_freed_in_the_same_tick() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(key(b'Q'));
    kb.tick(&mut sim, 0);
    assert_eq!(kb.slots().filter(|s| !s.is_free()).count(), 1);

    sim.release(key(b'Q'));
    kb.tick(&mut sim, 10);
    for slot in kb.slots() {
        assert!(slot.is_free());
        assert_eq!(slot.state, KeyState::Idle);
        assert_eq!(slot.effective_key, None);
    }
}

#[test]
fn hold_is_reached_by_dwell_time_alone() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(key(b'W'));
    kb.tick(&mut sim, 1000);
    kb.tick(&mut sim, 1290);
    assert_eq!(drain(&mut kb), [ev(b'w', KeyState::Pressed)]);

    // Released at the very tick the threshold is reached: still promoted.
    sim.release(key(b'W'));
    kb.tick(&mut sim, 1300);
    assert_eq!(drain(&mut kb), [ev(b'w', KeyState::Hold)]);
    assert!(kb.is_key_down(b'w'));

    kb.tick(&mut sim, 1310);
    assert_eq!(drain(&mut kb), [ev(b'w', KeyState::Released)]);
    assert!(!kb.is_key_down(b'w'));
}

#[test]
fn hold_threshold_is_read_every_tick() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(key(b'E'));
    kb.tick(&mut sim, 0);
    kb.tick(&mut sim, 50);
    kb.config_mut().set_hold_threshold_ten_ms(5);
    kb.tick(&mut sim, 50);

    assert_eq!(
        drain(&mut kb),
        [ev(b'e', KeyState::Pressed), ev(b'e', KeyState::Hold)]
    );
}

#[test]
fn holding_emits_nothing_between_transitions() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(key(b'R'));
    for now in (0..1000).step_by(10) {
        kb.tick(&mut sim, now);
    }
    assert_eq!(
        drain(&mut kb),
        [ev(b'r', KeyState::Pressed), ev(b'r', KeyState::Hold)]
    );
}

#[test]
fn full_slot_table_drops_new_presses_until_a_slot_frees() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb = Keyboard::<Settings, 2>::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(key(b'W'));
    sim.press(key(b'Q'));
    kb.tick(&mut sim, 0);
    drain(&mut kb);
    let before: Vec<_> = kb.slots().copied().collect();

    sim.press(key(b'E'));
    kb.tick(&mut sim, 10);
    assert!(drain(&mut kb).is_empty());
    assert_eq!(kb.slots().copied().collect::<Vec<_>>(), before);
    assert!(!kb.is_key_down(b'e'));

    // W sits in an earlier row, so its slot is free by the time E is sampled.
    sim.release(key(b'W'));
    kb.tick(&mut sim, 20);
    assert_eq!(
        drain(&mut kb),
        [ev(b'w', KeyState::Released), ev(b'e', KeyState::Pressed)]
    );
    assert!(kb.is_key_down(b'e'));
}

#[test]
fn dropped_press_is_lost_if_released_before_a_slot_frees() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb = Keyboard::<Settings, 1>::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(key(b'W'));
    kb.tick(&mut sim, 0);
    sim.press(key(b'G'));
    kb.tick(&mut sim, 10);
    sim.release(key(b'G'));
    kb.tick(&mut sim, 20);
    sim.release(key(b'W'));
    kb.tick(&mut sim, 30);
    kb.tick(&mut sim, 40);

    assert_eq!(
        drain(&mut kb),
        [ev(b'w', KeyState::Pressed), ev(b'w', KeyState::Released)]
    );
}

#[test]
fn matrix_is_processed_row_major_then_buttons() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    // Rows 6, 0, 1 and the button, pressed together.
    sim.press(KeyPosition::Button(0));
    sim.press(key(b'P'));
    sim.press(key(b'H'));
    sim.press(key(b'Q'));
    kb.tick(&mut sim, 0);

    let keys: Vec<u8> = drain(&mut kb).iter().map(|e| e.key).collect();
    assert_eq!(keys, [b'h', b'q', b'p', b'\\']);
}

#[test]
fn scan_interval_is_returned_and_reread() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    assert_eq!(kb.tick(&mut sim, 0), 10);
    kb.config_mut().set_scan_interval_ms(25);
    assert_eq!(kb.tick(&mut sim, 10), 25);
}

#[test]
fn scan_leaves_all_lines_idle() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(key(b'Z'));
    kb.tick(&mut sim, 0);
    let lines = DEFAULT_KEYMAP
        .row_pins()
        .iter()
        .chain(DEFAULT_KEYMAP.col_pins())
        .chain(DEFAULT_KEYMAP.button_pins());
    for &pin in lines {
        assert!(sim.is_idle(pin), "pin {pin}");
    }
}

#[test]
fn raw_button_code_passes_through_without_modifiers() {
    let mut settings = Settings::new();
    settings.set(Flag::UseModifiers, false);
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, settings);
    kb.init(&mut sim);

    sim.press(KeyPosition::Button(0));
    sim.press(key(b'A'));
    kb.tick(&mut sim, 0);
    assert_eq!(
        drain(&mut kb),
        [ev(b'A', KeyState::Pressed), ev(BTN_RIGHT2, KeyState::Pressed)]
    );
}

#[test]
fn modifier_keys_report_and_track_held_state() {
    let mut settings = Settings::new();
    settings.set(Flag::ReportModifiers, true);
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, settings);
    kb.init(&mut sim);

    sim.press(modifier(ModifierId::Alt));
    kb.tick(&mut sim, 0);
    assert!(kb.is_modifier_on(ModifierId::Alt));
    assert!(kb.is_key_down(MOD_ALT));

    sim.release(modifier(ModifierId::Alt));
    kb.tick(&mut sim, 10);
    assert!(!kb.is_modifier_on(ModifierId::Alt));
    assert_eq!(
        drain(&mut kb),
        [ev(MOD_ALT, KeyState::Pressed), ev(MOD_ALT, KeyState::Released)]
    );
}

#[test]
fn unreported_modifiers_emit_nothing_but_still_count() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(modifier(ModifierId::Sym));
    kb.tick(&mut sim, 0);
    kb.tick(&mut sim, 400);
    assert!(kb.is_modifier_on(ModifierId::Sym));
    assert!(drain(&mut kb).is_empty());
}

#[test]
fn listeners_see_every_event_in_order() {
    let log = KeyLog::default();
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.add_key_listener(&log).unwrap();
    kb.init(&mut sim);

    sim.press(key(b'S'));
    kb.tick(&mut sim, 0);
    sim.release(key(b'S'));
    kb.tick(&mut sim, 10);
    kb.inject_event(b'!', KeyState::Pressed);

    assert_eq!(
        *log.calls.borrow(),
        [
            ev(b's', KeyState::Pressed),
            ev(b's', KeyState::Released),
            ev(b'!', KeyState::Pressed),
        ]
    );
}

#[test]
fn forced_enqueue_displaces_oldest_without_indicator() {
    let mut config = CountingConfig::default();
    config.settings.set(Flag::OverflowRaisesInterrupt, false);
    config.settings.set(Flag::OverflowForcesEnqueue, true);
    let mut kb = Keyboard::<CountingConfig, 10, 3>::new(&DEFAULT_KEYMAP, config);

    for key in [b'1', b'2', b'3', b'4'] {
        kb.inject_event(key, KeyState::Pressed);
    }

    let keys: Vec<u8> = drain(&mut kb).iter().map(|e| e.key).collect();
    assert_eq!(keys, [b'2', b'3', b'4']);
    assert_eq!(kb.config().overflow_raised, 0);
    assert!(!kb.config().settings.overflow_pending());
}

#[test]
fn overflow_interrupt_drops_event_and_raises_once() {
    let mut config = CountingConfig::default();
    config.settings.set(Flag::OverflowRaisesInterrupt, true);
    config.settings.set(Flag::OverflowForcesEnqueue, false);
    let log = KeyLog::default();
    let mut kb = Keyboard::<CountingConfig, 10, 3>::new(&DEFAULT_KEYMAP, config);
    kb.add_key_listener(&log).unwrap();

    for key in [b'1', b'2', b'3', b'4'] {
        kb.inject_event(key, KeyState::Pressed);
    }

    assert_eq!(kb.config().overflow_raised, 1);
    assert!(kb.config().settings.overflow_pending());
    // The listener is not gated by the queue.
    assert_eq!(log.calls.borrow().len(), 4);
    let keys: Vec<u8> = drain(&mut kb).iter().map(|e| e.key).collect();
    assert_eq!(keys, [b'1', b'2', b'3']);
}

#[test]
fn reset_forgets_presses_and_queue() {
    let mut sim = SimulatedMatrix::new(&DEFAULT_KEYMAP);
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    kb.init(&mut sim);

    sim.press(modifier(ModifierId::ShiftLeft));
    sim.press(key(b'D'));
    kb.tick(&mut sim, 0);
    assert!(kb.queued() > 0);

    kb.reset();
    assert_eq!(kb.queued(), 0);
    assert!(!kb.is_modifier_on(ModifierId::ShiftLeft));
    assert!(kb.slots().all(|s| s.is_free()));

    // Still held, so the next scan starts new presses.
    kb.tick(&mut sim, 10);
    assert_eq!(drain(&mut kb), [ev(b'D', KeyState::Pressed)]);
}

#[test]
fn lock_listener_registration_fails_only_past_capacity() {
    let log = LockLog::default();
    let mut kb: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    for _ in 0..MAX_LISTENERS {
        assert_eq!(kb.add_lock_listener(&log), Ok(()));
    }
    assert_eq!(kb.add_lock_listener(&log), Err(Error::ListenerCapacity));
}
