//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use pump_motion::load_config;
///
/// let config = load_config("pump.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_TOML: &str = r#"
[motor]
name = "WM114ST"
steps_per_revolution = 200
gearing = 1.0

[board]
max_pulse_rate = 1000.0

[[driver.modes]]
resolution = 1
select = [false, false, false]

[[driver.modes]]
resolution = 4
select = [false, true, false]

[[driver.modes]]
resolution = 16
select = [false, false, true]
"#;

    #[test]
    fn test_parse_reference_config() {
        let config = parse_config(REFERENCE_TOML).unwrap();
        assert_eq!(config.motor.name.as_str(), "WM114ST");
        assert_eq!(config.driver.len(), 3);
        assert_eq!(config.driver.modes[2].resolution, 16);
    }

    #[test]
    fn test_default_gearing() {
        let toml = r#"
[motor]
name = "bare"
steps_per_revolution = 200

[board]
max_pulse_rate = 500.0

[[driver.modes]]
resolution = 1
select = [false, false, false]
"#;
        let config = parse_config(toml).unwrap();
        assert!((config.motor.gearing - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_table_fails_validation() {
        let toml = r#"
[motor]
name = "bad"
steps_per_revolution = 200

[board]
max_pulse_rate = 500.0

[[driver.modes]]
resolution = 16
select = [false, false, true]

[[driver.modes]]
resolution = 1
select = [false, false, false]
"#;
        assert!(parse_config(toml).is_err());
    }
}
