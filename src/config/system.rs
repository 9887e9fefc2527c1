//! Top-level system configuration.

use serde::Deserialize;

use super::board::BoardConfig;
use super::driver::DriverConfig;
use super::motor::MotorConfig;

/// Complete pump configuration: motor geometry, board timing budget, and the
/// driver's microstep mode table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemConfig {
    /// Motor geometry.
    pub motor: MotorConfig,

    /// Board timing budget.
    pub board: BoardConfig,

    /// Driver microstep table.
    pub driver: DriverConfig,
}

impl SystemConfig {
    /// Assemble a configuration from its parts.
    pub fn new(motor: MotorConfig, board: BoardConfig, driver: DriverConfig) -> Self {
        Self {
            motor,
            board,
            driver,
        }
    }

    /// The reference hardware: WM114ST pumphead on a Photon board with a
    /// DRV8825 driver.
    pub fn photon_drv8825_wm114st() -> Self {
        Self::new(
            MotorConfig::wm114st(),
            BoardConfig::photon(),
            DriverConfig::drv8825(),
        )
    }
}
