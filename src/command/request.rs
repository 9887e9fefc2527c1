//! Command-line tokenizing and request parsing.
//!
//! One line of text becomes one [`Request`] (or one [`CommandError`]); the
//! tokenizer walks an immutable input slice and whatever it has not consumed
//! is the caller's free-text message.

use crate::error::CommandError;

/// Root name the transport registers the command handler under.
pub const CMD_ROOT: &str = "pump";

// Operation words of the line protocol.
pub(crate) const CMD_LOCK: &str = "lock";
pub(crate) const CMD_UNLOCK: &str = "unlock";
pub(crate) const CMD_START: &str = "start";
pub(crate) const CMD_STOP: &str = "stop";
pub(crate) const CMD_HOLD: &str = "hold";
pub(crate) const CMD_MANUAL: &str = "manual";
pub(crate) const CMD_ROTATE: &str = "rotate";
pub(crate) const CMD_CALIBRATE: &str = "calibrate";
pub(crate) const CMD_DIRECTION: &str = "direction";
pub(crate) const CMD_MICROSTEP: &str = "ms";
pub(crate) const CMD_SPEED: &str = "speed";

const DIR_CW: &str = "cw";
const DIR_CC: &str = "cc";
const DIR_SWITCH: &str = "switch";
const MS_AUTO: &str = "auto";
const UNITS_RPM: &str = "rpm";
const UNITS_FPM: &str = "fpm";

/// Recognized calibration sub-variable.
pub const CAL_STEP_FLOW: &str = "step-flow";

/// Space-delimited tokenizer over an immutable line.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// Start tokenizing a line.
    pub fn new(line: &'a str) -> Self {
        Self { rest: line.trim() }
    }

    /// Consume and return the next token, if any.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            self.rest = rest;
            return None;
        }
        match rest.find(' ') {
            Some(split) => {
                let (token, tail) = rest.split_at(split);
                self.rest = tail;
                Some(token)
            }
            None => {
                self.rest = "";
                Some(rest)
            }
        }
    }

    /// Everything not yet consumed, as the opaque trailing message.
    pub fn remainder(&self) -> &'a str {
        self.rest.trim_start()
    }
}

/// Direction argument of the `direction` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    /// Clockwise.
    Cw,
    /// Counter-clockwise.
    Cc,
    /// Flip the current direction.
    Switch,
}

/// Argument of the `ms` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicrostepArg {
    /// Automatic selection against the target speed.
    Auto,
    /// Pin a specific resolution.
    Mode(u16),
}

/// Units token of the `speed` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnits {
    /// Revolutions per minute.
    Rpm,
    /// Flow per minute; reserved, parses but has no effect without
    /// step-flow calibration.
    Fpm,
}

/// One parsed command operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request<'a> {
    /// Reject every other command until unlocked.
    Lock,
    /// Clear the lock.
    Unlock,
    /// Run continuously.
    Start,
    /// Power down outputs.
    Stop,
    /// Hold position under torque.
    Hold,
    /// Follow the analog speed input.
    Manual,
    /// Run a bounded number of revolutions.
    Rotate(f32),
    /// Calibration operation (sub-variable validated at dispatch).
    Calibrate {
        /// Calibration sub-variable name.
        variable: &'a str,
        /// Raw value token.
        value: &'a str,
    },
    /// Change direction.
    Direction(DirectionArg),
    /// Change microstep selection.
    Microstep(MicrostepArg),
    /// Change target speed.
    Speed {
        /// Requested speed value.
        value: f32,
        /// Units the value was given in.
        units: SpeedUnits,
    },
}

impl<'a> Request<'a> {
    /// Parse the operation named by `op`, consuming its positional arguments
    /// from `tokens`.
    ///
    /// # Errors
    ///
    /// Returns the matching rejection error; the caller echoes the offending
    /// line back and mutates nothing.
    pub fn parse(op: &'a str, tokens: &mut Tokenizer<'a>) -> Result<Self, CommandError> {
        match op {
            CMD_LOCK => Ok(Request::Lock),
            CMD_UNLOCK => Ok(Request::Unlock),
            CMD_START => Ok(Request::Start),
            CMD_STOP => Ok(Request::Stop),
            CMD_HOLD => Ok(Request::Hold),
            CMD_MANUAL => Ok(Request::Manual),
            CMD_ROTATE => {
                let token = tokens.next().ok_or(CommandError::InvalidValue)?;
                let revolutions: f32 =
                    token.parse().map_err(|_| CommandError::InvalidValue)?;
                if !revolutions.is_finite() {
                    return Err(CommandError::InvalidValue);
                }
                Ok(Request::Rotate(revolutions))
            }
            CMD_CALIBRATE => {
                let variable = tokens.next().ok_or(CommandError::UnknownCalibration)?;
                let value = tokens.next().unwrap_or("");
                Ok(Request::Calibrate { variable, value })
            }
            CMD_DIRECTION => match tokens.next() {
                Some(DIR_CW) => Ok(Request::Direction(DirectionArg::Cw)),
                Some(DIR_CC) => Ok(Request::Direction(DirectionArg::Cc)),
                Some(DIR_SWITCH) => Ok(Request::Direction(DirectionArg::Switch)),
                _ => Err(CommandError::UnknownDirection),
            },
            CMD_MICROSTEP => match tokens.next() {
                Some(MS_AUTO) => Ok(Request::Microstep(MicrostepArg::Auto)),
                Some(token) => token
                    .parse::<u16>()
                    .map(|mode| Request::Microstep(MicrostepArg::Mode(mode)))
                    .map_err(|_| CommandError::UnknownMicrostep),
                None => Err(CommandError::UnknownMicrostep),
            },
            CMD_SPEED => {
                let value_token = tokens.next().ok_or(CommandError::UnknownSpeed)?;
                let units = match tokens.next() {
                    Some(UNITS_RPM) => SpeedUnits::Rpm,
                    Some(UNITS_FPM) => SpeedUnits::Fpm,
                    _ => return Err(CommandError::UnknownSpeed),
                };
                let value: f32 = value_token
                    .parse()
                    .map_err(|_| CommandError::UnknownSpeed)?;
                if !value.is_finite() || value < 0.0 {
                    return Err(CommandError::UnknownSpeed);
                }
                Ok(Request::Speed { value, units })
            }
            _ => Err(CommandError::UnknownCommand),
        }
    }

    /// Whether this operation bypasses the lock gate.
    pub fn bypasses_lock(op: &str) -> bool {
        op == CMD_LOCK || op == CMD_UNLOCK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_line(line: &str) -> (Result<Request<'_>, CommandError>, &str) {
        let mut tokens = Tokenizer::new(line);
        let op = tokens.next().unwrap_or("");
        let request = Request::parse(op, &mut tokens);
        (request, tokens.remainder())
    }

    #[test]
    fn test_tokenizer_splits_and_keeps_remainder() {
        let mut tokens = Tokenizer::new("speed 12.5 rpm for the morning run");
        assert_eq!(tokens.next(), Some("speed"));
        assert_eq!(tokens.next(), Some("12.5"));
        assert_eq!(tokens.next(), Some("rpm"));
        assert_eq!(tokens.remainder(), "for the morning run");
    }

    #[test]
    fn test_tokenizer_collapses_extra_spaces() {
        let mut tokens = Tokenizer::new("  rotate   2.5  note");
        assert_eq!(tokens.next(), Some("rotate"));
        assert_eq!(tokens.next(), Some("2.5"));
        assert_eq!(tokens.remainder(), "note");
    }

    #[test]
    fn test_parse_bare_operations() {
        assert_eq!(parse_line("start").0, Ok(Request::Start));
        assert_eq!(parse_line("stop").0, Ok(Request::Stop));
        assert_eq!(parse_line("hold").0, Ok(Request::Hold));
        assert_eq!(parse_line("manual").0, Ok(Request::Manual));
        assert_eq!(parse_line("lock").0, Ok(Request::Lock));
        assert_eq!(parse_line("unlock").0, Ok(Request::Unlock));
    }

    #[test]
    fn test_parse_rotate() {
        assert_eq!(parse_line("rotate 2.5").0, Ok(Request::Rotate(2.5)));
        assert_eq!(parse_line("rotate").0, Err(CommandError::InvalidValue));
        assert_eq!(parse_line("rotate lots").0, Err(CommandError::InvalidValue));
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(
            parse_line("direction cw").0,
            Ok(Request::Direction(DirectionArg::Cw))
        );
        assert_eq!(
            parse_line("direction switch").0,
            Ok(Request::Direction(DirectionArg::Switch))
        );
        assert_eq!(
            parse_line("direction up").0,
            Err(CommandError::UnknownDirection)
        );
        assert_eq!(
            parse_line("direction").0,
            Err(CommandError::UnknownDirection)
        );
    }

    #[test]
    fn test_parse_microstep() {
        assert_eq!(
            parse_line("ms auto").0,
            Ok(Request::Microstep(MicrostepArg::Auto))
        );
        assert_eq!(
            parse_line("ms 16").0,
            Ok(Request::Microstep(MicrostepArg::Mode(16)))
        );
        assert_eq!(parse_line("ms finest").0, Err(CommandError::UnknownMicrostep));
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!(
            parse_line("speed 100 rpm").0,
            Ok(Request::Speed {
                value: 100.0,
                units: SpeedUnits::Rpm
            })
        );
        assert_eq!(
            parse_line("speed 3 fpm").0,
            Ok(Request::Speed {
                value: 3.0,
                units: SpeedUnits::Fpm
            })
        );
        assert_eq!(
            parse_line("speed 100 mph").0,
            Err(CommandError::UnknownSpeed)
        );
        assert_eq!(
            parse_line("speed fast rpm").0,
            Err(CommandError::UnknownSpeed)
        );
        assert_eq!(
            parse_line("speed -5 rpm").0,
            Err(CommandError::UnknownSpeed)
        );
    }

    #[test]
    fn test_parse_calibrate() {
        let (request, _) = parse_line("calibrate step-flow 0.05");
        assert_eq!(
            request,
            Ok(Request::Calibrate {
                variable: "step-flow",
                value: "0.05"
            })
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse_line("dance").0, Err(CommandError::UnknownCommand));
    }

    #[test]
    fn test_lock_bypass() {
        assert!(Request::bypasses_lock("lock"));
        assert!(Request::bypasses_lock("unlock"));
        assert!(!Request::bypasses_lock("start"));
    }
}
