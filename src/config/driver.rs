//! Driver chip configuration: selectable microstep modes.

use heapless::Vec;
use serde::Deserialize;

/// Maximum number of microstep modes a driver table can hold.
pub const MAX_MICROSTEP_MODES: usize = 8;

/// One selectable microstep mode of the driver chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ModeConfig {
    /// Step resolution multiplier (1 = full step).
    pub resolution: u16,

    /// Levels for the driver's three mode-select lines (MS1/MS2/MS3).
    pub select: [bool; 3],
}

/// Driver chip description: the ordered microstep mode table.
///
/// Entries run from coarsest (resolution 1) to finest; validation rejects
/// anything else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverConfig {
    /// Selectable modes, coarsest first.
    pub modes: Vec<ModeConfig, MAX_MICROSTEP_MODES>,
}

impl DriverConfig {
    /// TI DRV8825 mode table (full step through 1/32).
    pub fn drv8825() -> Self {
        let mut modes = Vec::new();
        let table = [
            (1u16, [false, false, false]),
            (2, [true, false, false]),
            (4, [false, true, false]),
            (8, [true, true, false]),
            (16, [false, false, true]),
            (32, [true, false, true]),
        ];
        for (resolution, select) in table {
            let _ = modes.push(ModeConfig { resolution, select });
        }
        Self { modes }
    }

    /// Number of selectable modes.
    #[inline]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Whether the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drv8825_table() {
        let driver = DriverConfig::drv8825();
        assert_eq!(driver.len(), 6);
        assert_eq!(driver.modes[0].resolution, 1);
        assert_eq!(driver.modes[5].resolution, 32);
        assert_eq!(driver.modes[4].select, [false, false, true]);
    }
}
