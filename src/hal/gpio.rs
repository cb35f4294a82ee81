use avr_device::atmega328p::{PORTB, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::OutputPin;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

#[derive(Debug)]
pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

macro_rules! impl_port {
    ($PORT:ident, $ddr:ident, $port:ident) => {
        impl<const P: u8> Pin<$PORT, P, Input> {
            /// Pins come out of reset as inputs. Borrowing the port proves
            /// the caller owns it.
            pub fn new(_port: &$PORT) -> Self {
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }
        }

        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                // Set DDRx bit, PORTx keeps its current level
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            #[inline]
            fn set_high(&mut self) -> Result<(), Self::Error> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Ok(())
            }

            #[inline]
            fn set_low(&mut self) -> Result<(), Self::Error> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Ok(())
            }
        }
    };
}

impl_port!(PORTB, ddrb, portb);
impl_port!(PORTD, ddrd, portd);

// Arduino Uno pin definitions
pub mod board {
    use super::*;

    // Timer0 compare outputs, driven by the timer once connected
    pub type PwmA = Pin<PORTD, 6, Output>;
    pub type PwmB = Pin<PORTD, 5, Output>;

    // H-bridge direction selectors
    pub type DirForward = Pin<PORTB, 0, Output>;
    pub type DirBackward = Pin<PORTB, 1, Output>;
}
