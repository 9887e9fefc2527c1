//! Motor geometry configuration.

use heapless::String;
use serde::Deserialize;

/// Stepper motor geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotorConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Base steps per revolution (typically 200 for 1.8° motors).
    pub steps_per_revolution: u16,

    /// Gearing between motor and output shaft (1.0 = direct drive).
    #[serde(default = "default_gearing")]
    pub gearing: f32,
}

fn default_gearing() -> f32 {
    1.0
}

impl MotorConfig {
    /// Watson-Marlow 114ST pumphead: 200 steps per revolution, direct drive.
    pub fn wm114st() -> Self {
        Self {
            name: String::try_from("WM114ST").unwrap_or_default(),
            steps_per_revolution: 200,
            gearing: 1.0,
        }
    }

    /// Motor steps per output revolution before microstepping.
    #[inline]
    pub fn base_steps_per_revolution(&self) -> f32 {
        self.steps_per_revolution as f32 * self.gearing
    }
}
