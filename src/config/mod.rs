//! Configuration module for pump-motion.
//!
//! Provides types describing the motor geometry, the board's timing budget,
//! and the driver's microstep mode table, loadable from TOML files (with the
//! `std` feature) or built from the compiled-in presets.

mod board;
mod driver;
#[cfg(feature = "std")]
mod loader;
mod motor;
mod system;
pub mod units;
mod validation;

pub use board::BoardConfig;
pub use driver::{DriverConfig, ModeConfig, MAX_MICROSTEP_MODES};
pub use motor::MotorConfig;
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Revolutions, Rpm, Steps, StepsPerSec};
