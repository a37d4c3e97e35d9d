//! Shared types for the combat robot simulator: configuration, modeling
//! coefficients, integrator state, output records and the kernel error type.

pub mod catalog;
pub mod coefficients;
pub mod config;
pub mod error;
pub mod records;
pub mod traits;
pub mod units;

pub use coefficients::{Coefficients, AMBIENT_TEMPERATURE_C, GRAVITY};
pub use config::{ArmorConfig, BaseMasses, BatteryConfig, DriveConfig, RobotConfig, WeaponConfig};
pub use error::{KernelError, Result};
pub use records::{SimulationTrace, StaticResult, TracePoint};
pub use traits::*;
