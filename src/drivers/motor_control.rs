//! DC motor output stages
//!
//! Two wirings are supported. Without a driver bridge each direction has its
//! own PWM pin, so reversing means moving the PWM to the other compare
//! channel. With an H-bridge the PWM stays on OC0A and two selector pins
//! pick the polarity.

use crate::hal::{Channel, Duty, PwmTimer};
use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;

/// Motor rotation direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

pub trait MotorDriver {
    type Error;

    /// Run the motor at `duty` in `direction`.
    fn drive(&mut self, duty: Duty, direction: Direction) -> Result<(), Self::Error>;

    /// Switch direction and keep the current duty cycle.
    fn select_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;
}

/// One PWM pin per direction: OC0A forward, OC0B backward.
pub struct DualChannelMotor<T> {
    pwm: T,
    duty: Duty,
}

impl<T: PwmTimer> DualChannelMotor<T> {
    pub fn new(pwm: T) -> Self {
        Self {
            pwm,
            duty: Duty::OFF,
        }
    }

    pub fn channel_for(direction: Direction) -> Channel {
        match direction {
            Direction::Forward => Channel::A,
            Direction::Backward => Channel::B,
        }
    }
}

impl<T: PwmTimer> MotorDriver for DualChannelMotor<T> {
    type Error = Infallible;

    fn drive(&mut self, duty: Duty, direction: Direction) -> Result<(), Self::Error> {
        self.duty = duty;
        self.pwm.reconfigure(duty, Self::channel_for(direction));
        Ok(())
    }

    fn select_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        let duty = self.duty;
        self.drive(duty, direction)
    }
}

/// PWM on OC0A into an H-bridge enable, polarity from two selector pins.
pub struct HBridgeMotor<T, F, B> {
    pwm: T,
    forward: F,
    backward: B,
}

impl<T, F, B, E> HBridgeMotor<T, F, B>
where
    T: PwmTimer,
    F: OutputPin<Error = E>,
    B: OutputPin<Error = E>,
{
    pub fn new(pwm: T, forward: F, backward: B) -> Self {
        Self {
            pwm,
            forward,
            backward,
        }
    }
}

impl<T, F, B, E> MotorDriver for HBridgeMotor<T, F, B>
where
    T: PwmTimer,
    F: OutputPin<Error = E>,
    B: OutputPin<Error = E>,
{
    type Error = E;

    fn drive(&mut self, duty: Duty, direction: Direction) -> Result<(), Self::Error> {
        self.select_direction(direction)?;
        self.pwm.reconfigure(duty, Channel::A);
        Ok(())
    }

    fn select_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        // Release one side before asserting the other, never both high
        match direction {
            Direction::Forward => {
                self.backward.set_low()?;
                self.forward.set_high()
            }
            Direction::Backward => {
                self.forward.set_low()?;
                self.backward.set_high()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FakeTimer, PinLog};
    use embedded_hal_mock::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

    #[test]
    fn reversed_is_an_involution() {
        assert_eq!(Direction::Forward.reversed(), Direction::Backward);
        assert_eq!(Direction::Forward.reversed().reversed(), Direction::Forward);
        assert_eq!(Direction::default(), Direction::Forward);
    }

    #[test]
    fn dual_channel_picks_channel_by_direction() {
        let timer = FakeTimer::new();
        let mut motor = DualChannelMotor::new(timer.clone());
        let duty = Duty::from_fraction(0.25);

        motor.drive(duty, Direction::Forward).unwrap();
        assert_eq!(timer.output(), Some((Channel::A, duty)));

        motor.drive(duty, Direction::Backward).unwrap();
        assert_eq!(timer.output(), Some((Channel::B, duty)));
    }

    #[test]
    fn dual_channel_direction_change_keeps_duty() {
        let timer = FakeTimer::new();
        let mut motor = DualChannelMotor::new(timer.clone());
        let duty = Duty::from_fraction(0.625);

        motor.drive(duty, Direction::Forward).unwrap();
        motor.select_direction(Direction::Backward).unwrap();

        assert_eq!(timer.output(), Some((Channel::B, duty)));
    }

    #[test]
    fn dual_channel_zero_duty_is_constant_low() {
        let timer = FakeTimer::new();
        let mut motor = DualChannelMotor::new(timer.clone());

        motor.drive(Duty::FULL, Direction::Forward).unwrap();
        motor.drive(Duty::OFF, Direction::Forward).unwrap();

        assert_eq!(timer.output(), None);
    }

    #[test]
    fn reconfiguring_twice_is_idempotent() {
        let timer = FakeTimer::new();
        let mut motor = DualChannelMotor::new(timer.clone());
        let duty = Duty::from_fraction(0.875);

        motor.drive(duty, Direction::Backward).unwrap();
        let first = timer.registers();
        motor.drive(duty, Direction::Backward).unwrap();

        assert_eq!(timer.registers(), first);
        assert_eq!(timer.reconfigurations(), 2);
    }

    #[test]
    fn h_bridge_releases_old_side_before_asserting_new() {
        let pins = PinLog::new();
        let timer = FakeTimer::new();
        let mut motor = HBridgeMotor::new(timer.clone(), pins.pin("fwd"), pins.pin("bwd"));

        motor.drive(Duty::from_sample(100), Direction::Forward).unwrap();
        assert_eq!(pins.writes(), [("bwd", false), ("fwd", true)]);
        assert_eq!(timer.output(), Some((Channel::A, Duty::from_sample(100))));

        motor.select_direction(Direction::Backward).unwrap();
        assert_eq!(pins.writes()[2..], [("fwd", false), ("bwd", true)]);

        motor.select_direction(Direction::Forward).unwrap();
        assert_eq!(pins.writes()[4..], [("bwd", false), ("fwd", true)]);

        assert!(!pins.ever_both_high());
    }

    #[test]
    fn h_bridge_repeated_direction_never_overlaps() {
        let pins = PinLog::new();
        let mut motor = HBridgeMotor::new(FakeTimer::new(), pins.pin("fwd"), pins.pin("bwd"));

        for direction in [Direction::Backward, Direction::Backward, Direction::Forward] {
            motor.drive(Duty::FULL, direction).unwrap();
        }

        assert_eq!(pins.writes().len(), 6);
        assert_eq!(pins.writes().last(), Some(&("fwd", true)));
        assert!(!pins.ever_both_high());
    }

    #[test]
    fn h_bridge_direction_change_leaves_pwm_alone() {
        let mut forward = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut backward = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let timer = FakeTimer::new();
        let mut motor = HBridgeMotor::new(timer.clone(), forward.clone(), backward.clone());

        motor.drive(Duty::from_sample(42), Direction::Forward).unwrap();
        motor.select_direction(Direction::Backward).unwrap();

        assert_eq!(timer.reconfigurations(), 1);
        assert_eq!(timer.output(), Some((Channel::A, Duty::from_sample(42))));
        forward.done();
        backward.done();
    }
}
