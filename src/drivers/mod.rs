pub mod motor_control;
pub mod serial_console;

pub use motor_control::{Direction, DualChannelMotor, HBridgeMotor, MotorDriver};
pub use serial_console::SerialConsole;
