//! One-shot peripheral bring-up
//!
//! Runs to completion before the main loop. Everything here is a register
//! write, so there is no failure path.

use crate::hal::gpio::board::{PwmA, PwmB};
use crate::hal::{Edge, ExtInt, Input, Line, Pin, Timer0Pwm};
use avr_device::atmega328p::{Peripherals, PORTD};

#[cfg(feature = "potentiometer")]
use crate::drivers::HBridgeMotor;
#[cfg(feature = "potentiometer")]
use crate::hal::gpio::board::{DirBackward, DirForward};
#[cfg(feature = "potentiometer")]
use crate::hal::{Adc, AdcChannel, AdcPrescaler};
#[cfg(feature = "potentiometer")]
use avr_device::atmega328p::PORTB;

#[cfg(not(feature = "potentiometer"))]
use crate::drivers::DualChannelMotor;

#[cfg(feature = "serial-log")]
use crate::config::{CPU_FREQ_HZ, UART_BAUD};
#[cfg(feature = "serial-log")]
use crate::hal::Uart;
#[cfg(not(feature = "serial-log"))]
use crate::hal::uart::Silent;

#[cfg(not(feature = "potentiometer"))]
pub type Motor = DualChannelMotor<Timer0Pwm>;
#[cfg(feature = "potentiometer")]
pub type Motor = HBridgeMotor<Timer0Pwm, DirForward, DirBackward>;

#[cfg(feature = "serial-log")]
pub type Tx = Uart;
#[cfg(not(feature = "serial-log"))]
pub type Tx = Silent;

/// Everything the main loop needs after bring-up
pub struct Board {
    pub motor: Motor,
    pub tx: Tx,
    /// Kept so the lines stay configured; only the handlers use them
    pub exint: ExtInt,
    #[cfg(feature = "potentiometer")]
    pub adc: Adc,
}

/// Configure all peripherals and enable interrupts globally.
pub fn init(dp: Peripherals) -> Board {
    // All outputs low before any pin becomes an output
    unsafe {
        dp.PORTD.portd.write(|w| w.bits(0));
        dp.PORTB.portb.write(|w| w.bits(0));
    }

    // Timer0 compare outputs. The timer connects them itself, the pins only
    // need to be outputs
    let _pwm_a: PwmA = Pin::<PORTD, 6, Input>::new(&dp.PORTD).into_output();
    let _pwm_b: PwmB = Pin::<PORTD, 5, Input>::new(&dp.PORTD).into_output();
    let pwm = Timer0Pwm::new(dp.TC0);

    #[cfg(not(feature = "potentiometer"))]
    let motor = DualChannelMotor::new(pwm);

    #[cfg(feature = "potentiometer")]
    let motor = {
        let forward: DirForward = Pin::<PORTB, 0, Input>::new(&dp.PORTB).into_output();
        let backward: DirBackward = Pin::<PORTB, 1, Input>::new(&dp.PORTB).into_output();
        HBridgeMotor::new(pwm, forward, backward)
    };

    // Buttons pull INT0/INT1 low when pressed
    let mut exint = ExtInt::new(dp.EXINT);
    exint.configure(Edge::Falling, Edge::Falling);
    exint.enable(Line::Int0);
    exint.enable(Line::Int1);

    #[cfg(feature = "potentiometer")]
    let adc = {
        let mut adc = Adc::new(dp.ADC);
        adc.start_free_running(AdcChannel::Adc0, AdcPrescaler::Div128);
        adc
    };

    #[cfg(feature = "serial-log")]
    let tx = Uart::new(dp.USART0, CPU_FREQ_HZ, UART_BAUD);
    #[cfg(not(feature = "serial-log"))]
    let tx = Silent;

    // Enable interrupts globally
    unsafe { avr_device::interrupt::enable() };

    Board {
        motor,
        tx,
        exint,
        #[cfg(feature = "potentiometer")]
        adc,
    }
}
