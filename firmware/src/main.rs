//! Puppet keyboard firmware for ATmega32U4.
//!
//! Scans the default 7x6 matrix plus one side button through the shared
//! input engine. The on-board LED follows capslock, and the host interrupt
//! line is held low while events are queued or the overflow indicator is set.

#![no_std]
#![no_main]
#![feature(asm_experimental_arch)]

mod pins;

use avr_device::atmega32u4::Peripherals;
use puppet_keyboard::{Keyboard, LockState, Settings, DEFAULT_KEYMAP};

use pins::AvrPins;

/// On-board LED, PD6.
const LED: u8 = 1 << 6;
/// Host interrupt line, PD4, active low.
const HOST_INT: u8 = 1 << 4;

/// Panic handler: on AVR we just loop forever.
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

#[no_mangle]
pub extern "C" fn main() -> ! {
    let dp = unsafe { Peripherals::steal() };

    // Disable clock prescaler (CLKPR)
    dp.CPU.clkpr.write(|w| w.clkpce().set_bit());
    dp.CPU.clkpr.write(|w| unsafe { w.bits(0) });

    // LED off, interrupt line released
    dp.PORTD
        .portd
        .modify(|r, w| unsafe { w.bits((r.bits() & !LED) | HOST_INT) });
    dp.PORTD
        .ddrd
        .modify(|r, w| unsafe { w.bits(r.bits() | LED | HOST_INT) });

    let capslock_led = |caps_changed: bool, _num_changed: bool, locks: &LockState| {
        if caps_changed {
            set_portd(&dp, LED, locks.capslock());
        }
    };

    let mut pins = AvrPins::new(&dp);
    let mut keyboard: Keyboard<Settings> = Keyboard::new(&DEFAULT_KEYMAP, Settings::new());
    keyboard.add_lock_listener(&capslock_led).ok();
    keyboard.init(&mut pins);

    let mut now_ms: u32 = 0;
    loop {
        let interval = keyboard.tick(&mut pins, now_ms);

        let pending = keyboard.queued() > 0 || keyboard.config().overflow_pending();
        set_portd(&dp, HOST_INT, !pending);

        delay_ms(interval);
        now_ms = now_ms.wrapping_add(interval);
    }
}

fn set_portd(dp: &Peripherals, mask: u8, high: bool) {
    dp.PORTD.portd.modify(|r, w| unsafe {
        w.bits(if high { r.bits() | mask } else { r.bits() & !mask })
    });
}

/// Busy-wait delay in milliseconds (approximate, at 16MHz).
fn delay_ms(ms: u32) {
    for _ in 0..ms {
        // ~1ms at 16MHz: 16000 cycles / 4 cycles per loop iteration
        for _ in 0..4000u16 {
            unsafe { core::arch::asm!("nop") };
        }
    }
}
