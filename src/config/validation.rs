//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Motor geometry values are positive
/// - Board pulse rate is positive
/// - Driver mode table is non-empty and ordered coarsest to finest with
///   unique resolutions
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    if config.motor.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.motor.steps_per_revolution,
        )));
    }

    if config.motor.gearing <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidGearing(
            config.motor.gearing,
        )));
    }

    if config.board.max_pulse_rate.value() <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidPulseRate(
            config.board.max_pulse_rate.value(),
        )));
    }

    if config.driver.is_empty() {
        return Err(Error::Config(ConfigError::EmptyModeTable));
    }

    // Strictly increasing resolutions guarantee strictly decreasing rpm
    // limits once the table is built.
    let mut previous = 0u16;
    for mode in config.driver.modes.iter() {
        if mode.resolution <= previous {
            return Err(Error::Config(ConfigError::UnorderedResolution(
                mode.resolution,
            )));
        }
        previous = mode.resolution;
    }

    Ok(())
}
