//! Board timing configuration.

use serde::Deserialize;

use super::units::StepsPerSec;

/// Controller-board timing budget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardConfig {
    /// Maximum steps/s the board can reliably emit, i.e. how often the
    /// control loop's `update()` can be called.
    pub max_pulse_rate: StepsPerSec,
}

impl BoardConfig {
    /// Particle Photon stepper carrier board (1 kHz sustainable pulse rate).
    pub const fn photon() -> Self {
        Self {
            max_pulse_rate: StepsPerSec::new(1000.0),
        }
    }
}
