//! Microstep mode table with derived RPM limits.
//!
//! Built once from configuration; owns the resolution/select-line entries and
//! the per-mode speed ceiling the board's pulse budget allows.

use heapless::Vec;

use crate::config::{SystemConfig, MAX_MICROSTEP_MODES};
use crate::error::Result;

/// One active microstep mode: resolution, driver select levels, and the
/// highest rpm the control loop can sustain at that resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MicrostepMode {
    /// Step resolution multiplier (1 = full step).
    pub resolution: u16,

    /// Levels for the driver's three mode-select lines.
    pub select: [bool; 3],

    /// RPM ceiling for this resolution, derived from the board pulse budget.
    pub rpm_limit: f32,
}

/// Driver microstep table, ordered coarsest (index 0) to finest.
///
/// Because resolutions strictly increase along the table while the pulse
/// budget is fixed, `rpm_limit` strictly decreases along the table.
#[derive(Debug, Clone, PartialEq)]
pub struct MicrostepTable {
    modes: Vec<MicrostepMode, MAX_MICROSTEP_MODES>,
}

impl MicrostepTable {
    /// Build the table from configuration, deriving each mode's rpm limit:
    /// `max_pulse_rate * 60 / (steps_per_rev * gearing * resolution)`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration fails validation
    /// (empty or unordered table, non-positive geometry).
    pub fn from_config(config: &SystemConfig) -> Result<Self> {
        crate::config::validate_config(config)?;

        let base = config.motor.steps_per_revolution as f32 * config.motor.gearing;
        let pulse_budget = config.board.max_pulse_rate.value();

        let mut modes = Vec::new();
        for entry in config.driver.modes.iter() {
            let rpm_limit = pulse_budget * 60.0 / (base * entry.resolution as f32);
            // Capacity matches the config table, push cannot fail.
            let _ = modes.push(MicrostepMode {
                resolution: entry.resolution,
                select: entry.select,
                rpm_limit,
            });
        }

        Ok(Self { modes })
    }

    /// Number of modes.
    #[inline]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Whether the table is empty (never true for a validated table).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Get a mode by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&MicrostepMode> {
        self.modes.get(index)
    }

    /// Iterate over the modes, coarsest first.
    pub fn iter(&self) -> impl Iterator<Item = &MicrostepMode> {
        self.modes.iter()
    }

    /// The overall speed ceiling: full-step mode has the highest limit.
    #[inline]
    pub fn max_rpm(&self) -> f32 {
        self.modes.first().map(|m| m.rpm_limit).unwrap_or(0.0)
    }

    /// Finest mode that can still sustain `rpm`.
    ///
    /// Scans finest to coarsest and returns the first index whose limit is
    /// at or above the request; if even full-step cannot sustain it, returns
    /// index 0 (maximum headroom rather than failure).
    pub fn select_for_rpm(&self, rpm: f32) -> usize {
        self.modes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, mode)| rpm <= mode.rpm_limit)
            .map(|(index, _)| index)
            .unwrap_or(0)
    }

    /// Look up the index of an exact resolution.
    pub fn index_of_resolution(&self, resolution: u16) -> Option<usize> {
        self.modes
            .iter()
            .position(|mode| mode.resolution == resolution)
    }

    /// Apply the speed limit of the mode at `index`.
    ///
    /// Returns the rpm actually usable and whether it had to be clamped.
    pub fn clamp_rpm(&self, index: usize, rpm: f32) -> (f32, bool) {
        match self.modes.get(index) {
            Some(mode) if rpm > mode.rpm_limit => (mode.rpm_limit, true),
            _ => (rpm, false),
        }
    }
}
