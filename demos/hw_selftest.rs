#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
mod selftest {
    use panic_halt as _;

    use avr_device::atmega328p::Peripherals;
    use motor_speed_controller::config::{CPU_FREQ_HZ, UART_BAUD};
    use motor_speed_controller::drivers::SerialConsole;
    use motor_speed_controller::hal::{Adc, ExtInt, Timer0Pwm, Uart};
    use motor_speed_controller::testing::{
        AdcFreeRunningTest, ExtIntTest, Hardware, TestCase, TestRunner, Timer0PwmTest,
    };

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        let uart = Uart::new(dp.USART0, CPU_FREQ_HZ, UART_BAUD);
        let mut runner = TestRunner::new(SerialConsole::new(uart));

        // Interrupts stay disabled for the whole run
        let mut hw = Hardware {
            pwm: Timer0Pwm::new(dp.TC0),
            exint: ExtInt::new(dp.EXINT),
            adc: Adc::new(dp.ADC),
        };

        let peripheral_tests: [&dyn TestCase; 3] =
            [&Timer0PwmTest, &ExtIntTest, &AdcFreeRunningTest];

        runner.run_suite("Peripheral Tests", &peripheral_tests, &mut hw).ok();

        loop {
            avr_device::asm::sleep();
        }
    }
}

// Only meaningful on the target
#[cfg(not(target_arch = "avr"))]
fn main() {}
