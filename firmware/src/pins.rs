//! Logical pin indices of the default keymap mapped onto ATmega32U4 ports.
//!
//! Pin mapping:
//!   Rows    0-6:  PF0, PF1, PF4, PF5, PF6, PF7, PB6
//!   Columns 7-12: PB0, PB1, PB2, PB3, PD2, PD3
//!   Button  13:   PD7
//!
//! On AVR the pull-up and the output level share the PORTx bit, so a
//! pulled-up input and an input written high are the same thing.

use avr_device::atmega32u4::Peripherals;
use puppet_keyboard::pins::{Direction, Level, PinBank, Pull};

#[derive(Clone, Copy)]
enum Port {
    B,
    D,
    F,
}

const PIN_MAP: [(Port, u8); 14] = [
    (Port::F, 0),
    (Port::F, 1),
    (Port::F, 4),
    (Port::F, 5),
    (Port::F, 6),
    (Port::F, 7),
    (Port::B, 6),
    (Port::B, 0),
    (Port::B, 1),
    (Port::B, 2),
    (Port::B, 3),
    (Port::D, 2),
    (Port::D, 3),
    (Port::D, 7),
];

/// [`PinBank`] over the GPIO registers.
pub struct AvrPins<'p> {
    dp: &'p Peripherals,
}

impl<'p> AvrPins<'p> {
    pub fn new(dp: &'p Peripherals) -> Self {
        Self { dp }
    }

    fn set_ddr(&self, port: Port, mask: u8, output: bool) {
        let update = |bits: u8| if output { bits | mask } else { bits & !mask };
        match port {
            Port::B => self.dp.PORTB.ddrb.modify(|r, w| unsafe { w.bits(update(r.bits())) }),
            Port::D => self.dp.PORTD.ddrd.modify(|r, w| unsafe { w.bits(update(r.bits())) }),
            Port::F => self.dp.PORTF.ddrf.modify(|r, w| unsafe { w.bits(update(r.bits())) }),
        }
    }

    fn set_port(&self, port: Port, mask: u8, high: bool) {
        let update = |bits: u8| if high { bits | mask } else { bits & !mask };
        match port {
            Port::B => self.dp.PORTB.portb.modify(|r, w| unsafe { w.bits(update(r.bits())) }),
            Port::D => self.dp.PORTD.portd.modify(|r, w| unsafe { w.bits(update(r.bits())) }),
            Port::F => self.dp.PORTF.portf.modify(|r, w| unsafe { w.bits(update(r.bits())) }),
        }
    }

    fn read_pin(&self, port: Port, mask: u8) -> bool {
        let bits = match port {
            Port::B => self.dp.PORTB.pinb.read().bits(),
            Port::D => self.dp.PORTD.pind.read().bits(),
            Port::F => self.dp.PORTF.pinf.read().bits(),
        };
        bits & mask != 0
    }
}

/// Unknown pins are ignored and read high.
impl PinBank for AvrPins<'_> {
    fn set_direction(&mut self, pin: u8, direction: Direction) {
        if let Some(&(port, bit)) = PIN_MAP.get(pin as usize) {
            self.set_ddr(port, 1 << bit, direction == Direction::Output);
            if direction == Direction::Output {
                settle();
            }
        }
    }

    fn set_pull(&mut self, pin: u8, pull: Pull) {
        if let Some(&(port, bit)) = PIN_MAP.get(pin as usize) {
            self.set_port(port, 1 << bit, pull == Pull::Up);
        }
    }

    fn write(&mut self, pin: u8, level: Level) {
        if let Some(&(port, bit)) = PIN_MAP.get(pin as usize) {
            self.set_port(port, 1 << bit, level == Level::High);
        }
    }

    fn read(&mut self, pin: u8) -> Level {
        match PIN_MAP.get(pin as usize) {
            Some(&(port, bit)) if !self.read_pin(port, 1 << bit) => Level::Low,
            _ => Level::High,
        }
    }
}

/// Let a freshly driven column settle before the rows are read.
fn settle() {
    for _ in 0..20u8 {
        unsafe { core::arch::asm!("nop") };
    }
}
