//! PWM (Pulse Width Modulation) HAL implementation
//!
//! Timer/Counter0 runs in fast PWM mode counting 0..=0xFF with no prescaler,
//! which gives the highest PWM frequency the 8-bit timer can produce
//! (62.5kHz @ 16MHz). OC0A (PD6) and OC0B (PD5) are the two outputs, and at
//! most one of them is connected to the timer at a time.

use crate::config::PWM_TOP;

#[cfg(target_arch = "avr")]
use avr_device::atmega328p::TC0;

// TCCR0A compare output bits, non-inverting: set at BOTTOM, clear on match
const COM0A_CLEAR: u8 = 0b1000_0000;
const COM0B_CLEAR: u8 = 0b0010_0000;
// WGM01 | WGM00, fast PWM with TOP = 0xFF
const WGM_FAST_PWM: u8 = 0b0000_0011;

/// Timer clock select values (TCCR0B CS0[2:0]) the PWM routine uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
}

/// Output compare channel of Timer0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// OC0A on PD6
    A,
    /// OC0B on PD5
    B,
}

/// Compare threshold for an 8-bit fast PWM period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duty(u8);

impl Duty {
    /// Constant low output
    pub const OFF: Duty = Duty(0);
    /// Constant high output
    pub const FULL: Duty = Duty(PWM_TOP);

    /// `round(fraction * 255)`, with the fraction clamped to 0.0..=1.0.
    pub fn from_fraction(fraction: f32) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.max(0.0).min(1.0)
        };
        // no `f32::round` in core
        Duty((fraction * PWM_TOP as f32 + 0.5) as u8)
    }

    /// An 8-bit ADC sample already spans the full compare range.
    pub const fn from_sample(sample: u8) -> Self {
        Duty(sample)
    }

    #[inline]
    pub const fn compare(self) -> u8 {
        self.0
    }

    /// Duty cycle rounded to whole percent, for log output.
    pub fn percent(self) -> u8 {
        let top = PWM_TOP as u16;
        ((self.0 as u16 * 100 + top / 2) / top) as u8
    }
}

/// TCCR0A value for a duty cycle on a channel.
///
/// Fast PWM with OCR0x = 0 still emits a one-tick spike every period, so a
/// zero duty disconnects the output and leaves the pin at its PORTD level,
/// which init sets low. The inactive channel is always disconnected.
pub const fn tccr0a_bits(duty: Duty, channel: Channel) -> u8 {
    if duty.compare() == 0 {
        return WGM_FAST_PWM;
    }
    match channel {
        Channel::A => COM0A_CLEAR | WGM_FAST_PWM,
        Channel::B => COM0B_CLEAR | WGM_FAST_PWM,
    }
}

/// Something that can reprogram a PWM output.
pub trait PwmTimer {
    /// Apply `duty` on `channel`, disconnecting the other channel.
    ///
    /// Calling it again with the same arguments leaves the output unchanged.
    fn reconfigure(&mut self, duty: Duty, channel: Channel);
}

/// Timer0 fast PWM driver
#[cfg(target_arch = "avr")]
pub struct Timer0Pwm {
    tc0: TC0,
}

#[cfg(target_arch = "avr")]
impl Timer0Pwm {
    /// Take Timer0 in a stopped state with both outputs disconnected.
    pub fn new(tc0: TC0) -> Self {
        unsafe {
            tc0.timsk0.write(|w| w.bits(0));
            tc0.tccr0b.write(|w| w.bits(Prescaler::Stop as u8));
            tc0.tccr0a.write(|w| w.bits(WGM_FAST_PWM));
            tc0.tcnt0.write(|w| w.bits(0));
        }
        Self { tc0 }
    }

    /// Current (TCCR0A, OCR0A, OCR0B), used by the hardware self test.
    pub fn registers(&self) -> (u8, u8, u8) {
        (
            self.tc0.tccr0a.read().bits(),
            self.tc0.ocr0a.read().bits(),
            self.tc0.ocr0b.read().bits(),
        )
    }

    pub fn is_running(&self) -> bool {
        self.tc0.tccr0b.read().bits() & 0x07 != Prescaler::Stop as u8
    }
}

#[cfg(target_arch = "avr")]
impl PwmTimer for Timer0Pwm {
    fn reconfigure(&mut self, duty: Duty, channel: Channel) {
        unsafe {
            // Stop the clock so the compare value is never torn mid-period
            self.tc0.tccr0b.write(|w| w.bits(Prescaler::Stop as u8));
            self.tc0.tcnt0.write(|w| w.bits(0));

            match channel {
                Channel::A => self.tc0.ocr0a.write(|w| w.bits(duty.compare())),
                Channel::B => self.tc0.ocr0b.write(|w| w.bits(duty.compare())),
            }
            self.tc0.tccr0a.write(|w| w.bits(tccr0a_bits(duty, channel)));

            // Restart with 1x clock divider for highest PWM frequency
            self.tc0.tccr0b.write(|w| w.bits(Prescaler::Direct as u8));
        }
    }
}
