pub mod adc;
pub mod exint;
#[cfg(target_arch = "avr")]
pub mod gpio;
pub mod pwm;
pub mod uart;

// Re-export commonly used types
pub use adc::{AdcChannel, AdcPrescaler};
pub use exint::{Edge, Line};
pub use pwm::{Channel, Duty, PwmTimer};

#[cfg(target_arch = "avr")]
pub use adc::Adc;
#[cfg(target_arch = "avr")]
pub use exint::ExtInt;
#[cfg(target_arch = "avr")]
pub use gpio::{board, Input, Output, Pin};
#[cfg(target_arch = "avr")]
pub use pwm::Timer0Pwm;
#[cfg(target_arch = "avr")]
pub use uart::Uart;
