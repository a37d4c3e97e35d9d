//! Electrical side of the robot: ESC-limited motors, the shared battery bus
//! and lumped motor heating.

pub mod battery;
pub mod motor;
pub mod thermal;

pub use battery::Battery;
pub use motor::{DriveMotors, MotorConstant, WeaponMotors};
pub use thermal::{LumpedThermalMass, MotorThermal};
