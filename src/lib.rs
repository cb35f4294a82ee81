//! PWM motor speed controller for the ATmega328P
//!
//! Button A (INT0) steps the duty cycle through a fixed table, button B
//! (INT1) reverses the motor. Built with the `potentiometer` feature, ADC0
//! sets the duty cycle instead and the direction goes out on two H-bridge
//! selector pins.
//!
//! Interrupt handlers only raise flags in [`events::EVENTS`]; the main loop
//! drains them through [`application::SpeedController`].

#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod drivers;
pub mod events;
pub mod hal;
pub mod logger;

#[cfg(target_arch = "avr")]
pub mod init;
#[cfg(target_arch = "avr")]
pub mod testing;

#[cfg(test)]
mod mock;
