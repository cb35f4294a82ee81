//! Duty cycle and direction state machine
//!
//! The controller is the only writer of the duty cycle cursor and the
//! direction. Each call to [`SpeedController::service`] takes the pending
//! event flags in a fixed order (direction first, then the duty cycle
//! source of the build mode) and reprograms the motor output accordingly.

use crate::config::{ControlMode, DUTY_CYCLE_VALUES, DUTY_STEPS};
use crate::drivers::{Direction, MotorDriver};
use crate::events::Events;
use crate::hal::Duty;

/// What one pass over the event flags did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Serviced {
    pub direction_changed: bool,
    pub duty_changed: bool,
    /// Button A fired in potentiometer mode, where it has no function
    pub press_ignored: bool,
}

impl Serviced {
    pub fn any(&self) -> bool {
        self.direction_changed || self.duty_changed || self.press_ignored
    }
}

pub struct SpeedController<M> {
    motor: M,
    mode: ControlMode,
    direction: Direction,
    next_index: usize,
    last_index: usize,
    duty: Duty,
}

impl<M: MotorDriver> SpeedController<M> {
    /// Forward, motor off, cursor at the first table entry. Nothing is
    /// written to the motor until [`start`](Self::start).
    pub fn new(motor: M, mode: ControlMode) -> Self {
        Self {
            motor,
            mode,
            direction: Direction::Forward,
            next_index: 0,
            last_index: 0,
            duty: Duty::OFF,
        }
    }

    /// Apply the initial output once before entering the main loop.
    ///
    /// Button mode applies the first table entry and advances the cursor,
    /// so the first press selects the second entry.
    pub fn start(&mut self) -> Result<(), M::Error> {
        match self.mode {
            ControlMode::ButtonDutyCycle => self.step_duty(),
            ControlMode::PotentiometerDutyCycleWithHBridge => {
                self.duty = Duty::OFF;
                self.motor.drive(self.duty, self.direction)
            }
        }
    }

    /// One main loop iteration.
    pub fn service(&mut self, events: &Events) -> Result<Serviced, M::Error> {
        let mut serviced = Serviced::default();

        if events.direction_change.take() {
            self.reverse()?;
            serviced.direction_changed = true;
        }

        match self.mode {
            ControlMode::ButtonDutyCycle => {
                if events.button_pressed.take() {
                    self.step_duty()?;
                    serviced.duty_changed = true;
                }
            }
            ControlMode::PotentiometerDutyCycleWithHBridge => {
                if let Some(sample) = events.adc.take() {
                    self.apply_sample(sample)?;
                    serviced.duty_changed = true;
                }
                // keep the flag from staying latched
                serviced.press_ignored = events.button_pressed.take();
            }
        }

        Ok(serviced)
    }

    /// Flip the direction without changing speed.
    pub fn reverse(&mut self) -> Result<(), M::Error> {
        self.direction = self.direction.reversed();
        match self.mode {
            ControlMode::ButtonDutyCycle => {
                self.duty = Duty::from_fraction(DUTY_CYCLE_VALUES[self.last_index]);
                self.motor.drive(self.duty, self.direction)
            }
            ControlMode::PotentiometerDutyCycleWithHBridge => {
                self.motor.select_direction(self.direction)
            }
        }
    }

    /// Apply the entry under the cursor, then advance it.
    pub fn step_duty(&mut self) -> Result<(), M::Error> {
        self.last_index = self.next_index;
        self.duty = Duty::from_fraction(DUTY_CYCLE_VALUES[self.next_index]);
        self.motor.drive(self.duty, self.direction)?;
        self.next_index = (self.next_index + 1) % DUTY_STEPS;
        Ok(())
    }

    /// Use a raw 8-bit ADC sample as the compare threshold.
    pub fn apply_sample(&mut self, sample: u8) -> Result<(), M::Error> {
        self.duty = Duty::from_sample(sample);
        self.motor.drive(self.duty, self.direction)
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Duty cycle currently applied to the motor
    #[inline]
    pub fn duty(&self) -> Duty {
        self.duty
    }

    #[inline]
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    #[inline]
    pub fn last_index(&self) -> usize {
        self.last_index
    }
}
