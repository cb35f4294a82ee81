//! Host-side stand-ins for the peripherals, shared by the unit tests

use crate::hal::pwm::tccr0a_bits;
use crate::hal::{Channel, Duty, PwmTimer};
use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial;
use std::cell::RefCell;
use std::rc::Rc;

/// Timer0 output compare registers as the PWM routine leaves them
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer0Registers {
    pub tccr0a: u8,
    pub ocr0a: u8,
    pub ocr0b: u8,
}

#[derive(Default)]
struct TimerState {
    registers: Timer0Registers,
    history: Vec<(Duty, Channel)>,
}

/// Records what a `PwmTimer` was asked to do. Clones share state, so a test
/// keeps one handle and gives the other to the driver.
#[derive(Clone, Default)]
pub struct FakeTimer {
    state: Rc<RefCell<TimerState>>,
}

impl FakeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registers(&self) -> Timer0Registers {
        self.state.borrow().registers
    }

    pub fn reconfigurations(&self) -> usize {
        self.state.borrow().history.len()
    }

    pub fn history(&self) -> Vec<(Duty, Channel)> {
        self.state.borrow().history.clone()
    }

    /// Connected compare output and its threshold, `None` for constant low.
    pub fn output(&self) -> Option<(Channel, Duty)> {
        let regs = self.registers();
        if regs.tccr0a & 0b1000_0000 != 0 {
            Some((Channel::A, Duty::from_sample(regs.ocr0a)))
        } else if regs.tccr0a & 0b0010_0000 != 0 {
            Some((Channel::B, Duty::from_sample(regs.ocr0b)))
        } else {
            None
        }
    }
}

impl PwmTimer for FakeTimer {
    fn reconfigure(&mut self, duty: Duty, channel: Channel) {
        let mut state = self.state.borrow_mut();
        match channel {
            Channel::A => state.registers.ocr0a = duty.compare(),
            Channel::B => state.registers.ocr0b = duty.compare(),
        }
        state.registers.tccr0a = tccr0a_bits(duty, channel);
        state.history.push((duty, channel));
    }
}

/// Serial transmitter that reports busy on every other byte.
#[derive(Default)]
pub struct FakeSerial {
    pub sent: Vec<u8>,
    busy: bool,
}

impl FakeSerial {
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.sent).unwrap()
    }
}

impl serial::Write<u8> for FakeSerial {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.busy = !self.busy;
        if self.busy {
            return Err(nb::Error::WouldBlock);
        }
        self.sent.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

/// Shared write log for a set of output pins. Every pin handed out by
/// [`PinLog::pin`] appends `(name, level)` in call order.
#[derive(Clone, Default)]
pub struct PinLog {
    writes: Rc<RefCell<Vec<(&'static str, bool)>>>,
}

impl PinLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self, name: &'static str) -> RecordingPin {
        RecordingPin {
            name,
            log: self.clone(),
        }
    }

    pub fn writes(&self) -> Vec<(&'static str, bool)> {
        self.writes.borrow().clone()
    }

    /// Replays the log from all-low and reports whether two pins were ever
    /// high at the same time.
    pub fn ever_both_high(&self) -> bool {
        let mut high: Vec<&'static str> = Vec::new();
        for &(name, level) in self.writes.borrow().iter() {
            high.retain(|&pin| pin != name);
            if level {
                high.push(name);
            }
            if high.len() > 1 {
                return true;
            }
        }
        false
    }
}

pub struct RecordingPin {
    name: &'static str,
    log: PinLog,
}

impl OutputPin for RecordingPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.writes.borrow_mut().push((self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.writes.borrow_mut().push((self.name, true));
        Ok(())
    }
}
