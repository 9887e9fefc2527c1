//! Pure unit conversions between logical speed (rpm) and physical pulse
//! quantities (steps/s, step counts), parameterized by motor geometry and the
//! active microstep resolution.

use crate::config::units::{Revolutions, Rpm, Steps, StepsPerSec};
use crate::config::MotorConfig;
use crate::controller::state::Direction;

/// Stateless converter derived from motor geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converter {
    steps_per_revolution: f32,
    gearing: f32,
}

impl Converter {
    /// Derive the converter from motor geometry.
    pub fn from_motor(motor: &MotorConfig) -> Self {
        Self {
            steps_per_revolution: motor.steps_per_revolution as f32,
            gearing: motor.gearing,
        }
    }

    /// Signed pulse rate for a target speed under the given resolution.
    ///
    /// `sign(direction) * rpm / 60 * steps_per_rev * gearing * resolution`
    pub fn speed(&self, rpm: Rpm, resolution: u16, direction: Direction) -> StepsPerSec {
        StepsPerSec(
            direction.sign() * rpm.value() / 60.0
                * self.steps_per_revolution
                * self.gearing
                * resolution as f32,
        )
    }

    /// Signed step target for a bounded rotation.
    ///
    /// Fractional revolutions truncate to a whole step count (the sub-step
    /// remainder is dropped); this is a known precision boundary of the step
    /// domain, not a rounding choice.
    pub fn rotation_target(
        &self,
        revolutions: Revolutions,
        resolution: u16,
        direction: Direction,
    ) -> Steps {
        let steps = direction.sign()
            * revolutions.value()
            * self.steps_per_revolution
            * self.gearing
            * resolution as f32;
        Steps(steps as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotorConfig;

    fn wm114st() -> Converter {
        Converter::from_motor(&MotorConfig::wm114st())
    }

    #[test]
    fn test_speed_conversion() {
        let converter = wm114st();
        // 60 rpm = 1 rev/s = 200 steps/s at full step
        let speed = converter.speed(Rpm(60.0), 1, Direction::Cw);
        assert!((speed.value() - 200.0).abs() < 0.001);

        // direction flips the sign
        let speed = converter.speed(Rpm(60.0), 1, Direction::Ccw);
        assert!((speed.value() + 200.0).abs() < 0.001);

        // resolution multiplies the pulse rate
        let speed = converter.speed(Rpm(60.0), 16, Direction::Cw);
        assert!((speed.value() - 3200.0).abs() < 0.01);
    }

    #[test]
    fn test_rotation_target() {
        let converter = wm114st();
        // 2.5 rev * 200 steps * 16 = 8000
        let target = converter.rotation_target(Revolutions(2.5), 16, Direction::Cw);
        assert_eq!(target, Steps(8000));

        let target = converter.rotation_target(Revolutions(2.5), 16, Direction::Ccw);
        assert_eq!(target, Steps(-8000));
    }

    #[test]
    fn test_rotation_target_truncates() {
        let converter = wm114st();
        // 0.333 rev * 200 steps = 66.6 -> 66
        let target = converter.rotation_target(Revolutions(0.333), 1, Direction::Cw);
        assert_eq!(target, Steps(66));

        let target = converter.rotation_target(Revolutions(0.333), 1, Direction::Ccw);
        assert_eq!(target, Steps(-66));
    }

    #[test]
    fn test_gearing_scales_both() {
        let motor = MotorConfig {
            name: heapless::String::try_from("geared").unwrap(),
            steps_per_revolution: 200,
            gearing: 2.0,
        };
        let converter = Converter::from_motor(&motor);

        let speed = converter.speed(Rpm(60.0), 1, Direction::Cw);
        assert!((speed.value() - 400.0).abs() < 0.001);

        let target = converter.rotation_target(Revolutions(1.0), 1, Direction::Cw);
        assert_eq!(target, Steps(400));
    }
}
