//! On-target hardware self test
//!
//! Runs with interrupts disabled and reports over the serial console. The
//! `hw_selftest` demo drives it.

use crate::config::DUTY_CYCLE_VALUES;
use crate::drivers::SerialConsole;
use crate::hal::adc::{AdcChannel, AdcPrescaler};
use crate::hal::{Adc, Channel, Duty, Edge, ExtInt, Line, PwmTimer, Timer0Pwm};
use embedded_hal::serial;

/// Peripherals handed to every test case
pub struct Hardware {
    pub pwm: Timer0Pwm,
    pub exint: ExtInt,
    pub adc: Adc,
}

pub struct TestRunner<W> {
    console: SerialConsole<W>,
    total_tests: u32,
    passed_tests: u32,
    current_suite: &'static str,
}

pub trait TestCase {
    fn run(&self, hw: &mut Hardware) -> TestResult;
    fn name(&self) -> &'static str;
}

#[derive(PartialEq)]
pub enum TestResult {
    Pass,
    Fail(TestError),
}

#[derive(PartialEq)]
pub enum TestError {
    AssertionFailed(&'static str),
    Timeout,
}

impl TestError {
    fn describe(&self) -> &'static str {
        match self {
            TestError::AssertionFailed(what) => *what,
            TestError::Timeout => "timeout",
        }
    }
}

impl<W: serial::Write<u8>> TestRunner<W> {
    pub fn new(console: SerialConsole<W>) -> Self {
        Self {
            console,
            total_tests: 0,
            passed_tests: 0,
            current_suite: "",
        }
    }

    pub fn run_suite(
        &mut self,
        name: &'static str,
        tests: &[&dyn TestCase],
        hw: &mut Hardware,
    ) -> Result<(), W::Error> {
        self.current_suite = name;
        ufmt::uwrite!(self.console, "\r\n=== Test Suite: {} ===\r\n", name)?;

        for test in tests {
            self.total_tests += 1;
            ufmt::uwrite!(self.console, "Running {}: ", test.name())?;

            match test.run(hw) {
                TestResult::Pass => {
                    self.passed_tests += 1;
                    self.console.write_line("PASS")?;
                }
                TestResult::Fail(err) => {
                    ufmt::uwrite!(self.console, "FAIL - {}\r\n", err.describe())?;
                }
            }
        }

        self.print_summary()
    }

    fn print_summary(&mut self) -> Result<(), W::Error> {
        ufmt::uwrite!(
            self.console,
            "\r\nTest Summary for {}:\r\nPassed: {}/{}\r\n",
            self.current_suite,
            self.passed_tests,
            self.total_tests
        )
    }
}

macro_rules! check_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return TestResult::Fail(TestError::AssertionFailed(concat!(
                stringify!($left),
                " != ",
                stringify!($right)
            )));
        }
    };
}

macro_rules! check_timeout {
    ($cond:expr, $spins:expr) => {
        let mut spins: u32 = $spins;
        while !$cond {
            if spins == 0 {
                return TestResult::Fail(TestError::Timeout);
            }
            spins -= 1;
            avr_device::asm::nop();
        }
    };
}

pub struct Timer0PwmTest;
impl TestCase for Timer0PwmTest {
    fn name(&self) -> &'static str {
        "Timer0 fast PWM"
    }

    fn run(&self, hw: &mut Hardware) -> TestResult {
        let duty = Duty::from_fraction(DUTY_CYCLE_VALUES[2]);

        hw.pwm.reconfigure(duty, Channel::B);
        check_eq!(hw.pwm.is_running(), true);
        let (tccr0a, _, ocr0b) = hw.pwm.registers();
        check_eq!(tccr0a, 0b0010_0011);
        check_eq!(ocr0b, duty.compare());

        // same arguments, same registers
        hw.pwm.reconfigure(duty, Channel::B);
        check_eq!(hw.pwm.registers().0, tccr0a);

        hw.pwm.reconfigure(Duty::FULL, Channel::A);
        let (tccr0a, ocr0a, _) = hw.pwm.registers();
        check_eq!(tccr0a, 0b1000_0011);
        check_eq!(ocr0a, 0xFF);

        // motor off: both outputs disconnected
        hw.pwm.reconfigure(Duty::OFF, Channel::A);
        check_eq!(hw.pwm.registers().0, 0b0000_0011);

        TestResult::Pass
    }
}

pub struct ExtIntTest;
impl TestCase for ExtIntTest {
    fn name(&self) -> &'static str {
        "External interrupts"
    }

    fn run(&self, hw: &mut Hardware) -> TestResult {
        hw.exint.configure(Edge::Falling, Edge::Falling);
        check_eq!(hw.exint.registers(), (0x0A, 0x00));

        hw.exint.enable(Line::Int0);
        hw.exint.enable(Line::Int1);
        check_eq!(hw.exint.registers().1, 0x03);

        hw.exint.disable(Line::Int0);
        hw.exint.disable(Line::Int1);
        check_eq!(hw.exint.registers().1, 0x00);

        TestResult::Pass
    }
}

pub struct AdcFreeRunningTest;
impl TestCase for AdcFreeRunningTest {
    fn name(&self) -> &'static str {
        "ADC free running"
    }

    fn run(&self, hw: &mut Hardware) -> TestResult {
        // Interrupts are off, so ADIF stays set after each conversion
        hw.adc.start_free_running(AdcChannel::Adc0, AdcPrescaler::Div128);
        check_timeout!(hw.adc.conversion_complete(), 100_000);

        // A second conversion proves the auto trigger restarted it
        hw.adc.clear_complete();
        check_timeout!(hw.adc.conversion_complete(), 100_000);
        hw.adc.stop_free_running();

        TestResult::Pass
    }
}
