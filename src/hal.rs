//! Hardware collaborator seams.
//!
//! The controller core never touches hardware directly; it drives these
//! traits. Implementations wrap whatever pulse generator, clock source, and
//! ADC the target board provides.

use embedded_hal::digital::OutputPin;

use crate::config::units::{Steps, StepsPerSec};

/// Low-level pulse-generation primitive.
///
/// The implementation owns step/dir/enable timing; the controller only sets
/// targets and polls progress. Every method must return promptly — the
/// controller calls these from its non-blocking tick.
pub trait MotionDriver {
    /// Set the signed steady pulse rate.
    fn set_speed(&mut self, speed: StepsPerSec);

    /// Set an absolute move target for a bounded rotation.
    fn move_to(&mut self, target: Steps);

    /// Overwrite the position counter (used to re-zero before a bounded
    /// rotation).
    fn set_current_position(&mut self, position: Steps);

    /// Signed distance remaining to the move target.
    fn distance_to_go(&self) -> Steps;

    /// Emit at most one step toward the move target, honoring the set speed.
    fn run_speed_to_position(&mut self);

    /// Emit at most one step at the set steady speed.
    fn run_speed(&mut self);

    /// Apply microstep select-line levels.
    fn set_microstep(&mut self, select: [bool; 3]);

    /// Energize the driver outputs.
    fn enable_outputs(&mut self);

    /// De-energize the driver outputs.
    fn disable_outputs(&mut self);
}

/// Monotonic millisecond clock.
///
/// Used only for elapsed-time comparisons (debounce and cooldown windows);
/// wrap-around is not modeled, the source must be monotonic.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// Manual-mode analog speed input.
pub trait SpeedDial {
    /// Current dial position as a fraction of full scale (0.0 ..= 1.0).
    fn read_fraction(&mut self) -> f32;
}

/// The driver chip's three microstep select lines as embedded-hal pins.
///
/// Helper for [`MotionDriver`] implementations; applies a level triple from
/// the microstep table to real GPIO.
#[derive(Debug)]
pub struct SelectPins<MS1, MS2, MS3>
where
    MS1: OutputPin,
    MS2: OutputPin,
    MS3: OutputPin,
{
    ms1: MS1,
    ms2: MS2,
    ms3: MS3,
}

impl<MS1, MS2, MS3> SelectPins<MS1, MS2, MS3>
where
    MS1: OutputPin,
    MS2: OutputPin,
    MS3: OutputPin,
{
    /// Wrap the three select-line pins.
    pub fn new(ms1: MS1, ms2: MS2, ms3: MS3) -> Self {
        Self { ms1, ms2, ms3 }
    }

    /// Drive the select lines to the given levels.
    ///
    /// Returns `Err(())` if any pin write fails; the lines may then be in a
    /// mixed state and should be re-applied.
    pub fn apply(&mut self, select: [bool; 3]) -> core::result::Result<(), ()> {
        set_level(&mut self.ms1, select[0])?;
        set_level(&mut self.ms2, select[1])?;
        set_level(&mut self.ms3, select[2])?;
        Ok(())
    }

    /// Release the pins.
    pub fn free(self) -> (MS1, MS2, MS3) {
        (self.ms1, self.ms2, self.ms3)
    }
}

fn set_level<P: OutputPin>(pin: &mut P, high: bool) -> core::result::Result<(), ()> {
    if high {
        pin.set_high().map_err(|_| ())
    } else {
        pin.set_low().map_err(|_| ())
    }
}
