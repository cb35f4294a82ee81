#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use avr_device::atmega328p::Peripherals;
    use motor_speed_controller::application::SpeedController;
    use motor_speed_controller::config::{self, ControlMode};
    use motor_speed_controller::drivers::SerialConsole;
    use motor_speed_controller::events::EVENTS;
    use motor_speed_controller::init;
    use motor_speed_controller::log;
    use motor_speed_controller::logger::{LogLevel, Logger};

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();
        let board = init::init(dp);

        let mut logger = Logger::new(SerialConsole::new(board.tx), config::LOG_LEVEL);
        log!(logger, LogLevel::Info, "motor speed controller v{}", env!("CARGO_PKG_VERSION")).ok();

        // Adjustments from the ADC arrive continuously, only show them when debugging
        let duty_level = match config::MODE {
            ControlMode::ButtonDutyCycle => {
                log!(logger, LogLevel::Info, "mode: button duty cycle").ok();
                LogLevel::Info
            }
            ControlMode::PotentiometerDutyCycleWithHBridge => {
                log!(logger, LogLevel::Info, "mode: potentiometer + H-bridge").ok();
                LogLevel::Debug
            }
        };

        let mut controller = SpeedController::new(board.motor, config::MODE);
        if let Err(e) = controller.start() {
            match e {}
        }
        log!(logger, LogLevel::Info, "duty {}%, {}", controller.duty().percent(), controller.direction().as_str()).ok();

        loop {
            let serviced = match controller.service(&EVENTS) {
                Ok(serviced) => serviced,
                Err(e) => match e {},
            };

            if serviced.direction_changed {
                log!(logger, LogLevel::Info, "direction {}", controller.direction().as_str()).ok();
            }
            if serviced.duty_changed {
                let duty = controller.duty();
                log!(logger, duty_level, "duty {}% ({}/255)", duty.percent(), duty.compare()).ok();
            }
            if serviced.press_ignored {
                log!(logger, LogLevel::Warn, "duty button has no effect in potentiometer mode").ok();
            }
        }
    }

    #[avr_device::interrupt(atmega328p)]
    fn INT0() {
        EVENTS.button_pressed.raise();
    }

    #[avr_device::interrupt(atmega328p)]
    fn INT1() {
        EVENTS.direction_change.raise();
    }

    #[cfg(feature = "potentiometer")]
    #[avr_device::interrupt(atmega328p)]
    fn ADC() {
        use motor_speed_controller::hal::adc::high_byte;

        // Reading the 16-bit data register takes ADCL then ADCH
        let raw = unsafe { (*avr_device::atmega328p::ADC::ptr()).adc.read().bits() };
        EVENTS.adc.record(high_byte(raw));
    }
}

// The firmware is AVR-only; host builds exist to run the library tests.
#[cfg(not(target_arch = "avr"))]
fn main() {}
