//! USART0 transmitter for diagnostic output
//!
//! Transmit only and polled: log lines are written from the main loop and
//! the interrupt handlers never touch the UART.

#[cfg(target_arch = "avr")]
use avr_device::atmega328p::USART0;
use core::convert::Infallible;
use embedded_hal::serial;

// UCSR0A
#[cfg(target_arch = "avr")]
const UDRE0: u8 = 1 << 5;
// UCSR0B
#[cfg(target_arch = "avr")]
const TXEN0: u8 = 1 << 3;
// UCSR0C, asynchronous 8N1
#[cfg(target_arch = "avr")]
const FRAME_8N1: u8 = 0b0000_0110;

/// UBRR value for normal speed asynchronous mode.
pub const fn ubrr_for(cpu_hz: u32, baud: u32) -> u16 {
    (cpu_hz / (16 * baud) - 1) as u16
}

#[cfg(target_arch = "avr")]
pub struct Uart {
    usart: USART0,
}

#[cfg(target_arch = "avr")]
impl Uart {
    pub fn new(usart: USART0, cpu_hz: u32, baud: u32) -> Self {
        unsafe {
            usart.ubrr0.write(|w| w.bits(ubrr_for(cpu_hz, baud)));
            usart.ucsr0a.write(|w| w.bits(0));
            usart.ucsr0c.write(|w| w.bits(FRAME_8N1));
            usart.ucsr0b.write(|w| w.bits(TXEN0));
        }
        Self { usart }
    }
}

#[cfg(target_arch = "avr")]
impl serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.usart.ucsr0a.read().bits() & UDRE0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        unsafe {
            self.usart.udr0.write(|w| w.bits(byte));
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        if self.usart.ucsr0a.read().bits() & UDRE0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    }
}

/// Transmitter for builds without serial logging. Accepts and drops
/// every byte.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl serial::Write<u8> for Silent {
    type Error = Infallible;

    fn write(&mut self, _byte: u8) -> nb::Result<(), Self::Error> {
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ubrr_for_9600_at_16mhz() {
        assert_eq!(ubrr_for(16_000_000, 9600), 103);
    }

    #[test]
    fn ubrr_for_57600_at_16mhz() {
        assert_eq!(ubrr_for(16_000_000, 57600), 16);
    }

    #[test]
    fn silent_never_blocks() {
        let mut tx = Silent;
        for byte in b"duty 25%" {
            assert!(serial::Write::write(&mut tx, *byte).is_ok());
        }
    }
}
