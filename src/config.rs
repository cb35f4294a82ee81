//! Configuration constants for the motor speed controller

use crate::logger::LogLevel;

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate for diagnostic output
pub const UART_BAUD: u32 = 9600;

/// Number of entries in the duty cycle table
pub const DUTY_STEPS: usize = 4;

/// Duty cycle levels stepped through by button A, as fractions of a period
pub const DUTY_CYCLE_VALUES: [f32; DUTY_STEPS] = [0.0, 0.25, 0.625, 0.875];

/// Timer0 counts up to this value in fast PWM mode
pub const PWM_TOP: u8 = 0xFF;

/// Which input drives the duty cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    /// Button A steps through `DUTY_CYCLE_VALUES`, direction picks the PWM channel
    ButtonDutyCycle,
    /// ADC0 sets the duty cycle, direction drives the H-bridge selector pins
    PotentiometerDutyCycleWithHBridge,
}

#[cfg(not(feature = "potentiometer"))]
pub const MODE: ControlMode = ControlMode::ButtonDutyCycle;
#[cfg(feature = "potentiometer")]
pub const MODE: ControlMode = ControlMode::PotentiometerDutyCycleWithHBridge;

#[cfg(not(feature = "debug"))]
pub const LOG_LEVEL: LogLevel = LogLevel::Info;
#[cfg(feature = "debug")]
pub const LOG_LEVEL: LogLevel = LogLevel::Debug;

/*
Arduino Uno pin map used by this firmware:
  PD2 (2)  INT0  button A, duty step
  PD3 (3)  INT1  button B, direction
  PD5 (5)  OC0B  PWM, backward
  PD6 (6)  OC0A  PWM, forward / H-bridge enable
  PB0 (8)        H-bridge forward select
  PB1 (9)        H-bridge backward select
  PC0 (A0) ADC0  potentiometer
  PD1 (1)  TXD   serial log, driven by USART0 once TXEN0 is set
*/
