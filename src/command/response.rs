//! Structured command responses.
//!
//! Every handled line produces exactly one response: a numeric return code
//! (0 success, negative errors, positive warnings), a key/value payload
//! describing the resulting state, and the caller's trailing message.

use heapless::String;

use crate::controller::events::{EventReport, ReportKind};
use crate::error::CommandError;

/// Error label: operation name matched nothing.
pub const ERROR_COMMAND: &str = "unknown command";
/// Error label: controller is locked.
pub const ERROR_LOCKED: &str = "locked";
/// Error label: unrecognized calibration sub-variable.
pub const ERROR_CALIBRATE: &str = "unknown calibrate";
/// Error label: unrecognized direction token.
pub const ERROR_DIRECTION: &str = "unknown direction";
/// Error label: resolution not in the driver table.
pub const ERROR_MICROSTEP: &str = "unknown microstepping";
/// Error label: bad speed units or value.
pub const ERROR_SPEED: &str = "unknown speed";
/// Error label: missing or unparseable numeric value.
pub const ERROR_VALUE: &str = "invalid value";
/// Warning label: requested speed exceeded the active mode's limit.
pub const WARN_SPEED_MAX: &str = "> max rpm";

/// Numeric return code of a handled command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReturnCode {
    /// Command applied exactly as requested.
    Success,
    /// Generic rejection.
    Error,
    /// Operation name matched no command.
    UnknownCommand,
    /// Controller locked.
    Locked,
    /// Unrecognized calibration sub-variable.
    UnknownCalibration,
    /// Unrecognized direction token.
    UnknownDirection,
    /// Resolution not in the driver table.
    UnknownMicrostep,
    /// Bad speed units or value.
    UnknownSpeed,
    /// Generic warning: applied, but not exactly as requested.
    Warning,
    /// Speed clamped to the active microstep mode's limit.
    SpeedLimited,
}

impl ReturnCode {
    /// Numeric wire value (0 success, negative errors, positive warnings).
    pub const fn value(self) -> i8 {
        match self {
            ReturnCode::Success => 0,
            ReturnCode::Error => -1,
            ReturnCode::UnknownCommand => -2,
            ReturnCode::Locked => -3,
            ReturnCode::UnknownCalibration => -4,
            ReturnCode::UnknownDirection => -5,
            ReturnCode::UnknownMicrostep => -6,
            ReturnCode::UnknownSpeed => -7,
            ReturnCode::Warning => 1,
            ReturnCode::SpeedLimited => 2,
        }
    }

    /// Whether the command was rejected (state unchanged).
    #[inline]
    pub const fn is_error(self) -> bool {
        self.value() < 0
    }

    /// Whether the command was applied, but not exactly as requested.
    #[inline]
    pub const fn is_warning(self) -> bool {
        self.value() > 0
    }
}

impl From<CommandError> for ReturnCode {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::UnknownCommand => ReturnCode::UnknownCommand,
            CommandError::Locked => ReturnCode::Locked,
            CommandError::UnknownCalibration => ReturnCode::UnknownCalibration,
            CommandError::UnknownDirection => ReturnCode::UnknownDirection,
            CommandError::UnknownMicrostep => ReturnCode::UnknownMicrostep,
            CommandError::UnknownSpeed => ReturnCode::UnknownSpeed,
            CommandError::InvalidValue => ReturnCode::Error,
        }
    }
}

/// Stable label for a rejection error, echoed in the response payload.
pub fn error_label(error: CommandError) -> &'static str {
    match error {
        CommandError::UnknownCommand => ERROR_COMMAND,
        CommandError::Locked => ERROR_LOCKED,
        CommandError::UnknownCalibration => ERROR_CALIBRATE,
        CommandError::UnknownDirection => ERROR_DIRECTION,
        CommandError::UnknownMicrostep => ERROR_MICROSTEP,
        CommandError::UnknownSpeed => ERROR_SPEED,
        CommandError::InvalidValue => ERROR_VALUE,
    }
}

/// Structured result of one handled command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse {
    /// Response classification tag.
    pub kind: ReportKind,
    /// Numeric return code.
    pub code: ReturnCode,
    /// Key of the payload (what was changed), or the error label.
    pub variable: String<25>,
    /// Resulting value, rendered for display.
    pub value: String<20>,
    /// Units of the value, if any.
    pub units: String<20>,
    /// Trailing free-text message, or the offending line on errors.
    pub message: String<63>,
}

impl CommandResponse {
    /// A success response keyed by `variable`.
    pub fn success(variable: &str) -> Self {
        Self {
            kind: ReportKind::Event,
            code: ReturnCode::Success,
            variable: String::try_from(variable).unwrap_or_default(),
            value: String::new(),
            units: String::new(),
            message: String::new(),
        }
    }

    /// A rejection response: error kind, stable label, offending line echoed
    /// in the message (truncated to the field width).
    pub fn rejection(error: CommandError, line: &str) -> Self {
        let mut message = String::new();
        for c in line.chars() {
            if message.push(c).is_err() {
                break;
            }
        }
        Self {
            kind: ReportKind::Error,
            code: error.into(),
            variable: String::try_from(error_label(error)).unwrap_or_default(),
            value: String::new(),
            units: String::new(),
            message,
        }
    }

    /// Attach a rendered value.
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = String::try_from(value).unwrap_or_default();
        self
    }

    /// Attach units.
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = String::try_from(units).unwrap_or_default();
        self
    }

    /// Attach the trailing free-text message.
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = String::try_from(message).unwrap_or_default();
        self
    }

    /// Change the classification tag.
    pub fn with_kind(mut self, kind: ReportKind) -> Self {
        self.kind = kind;
        self
    }

    /// Downgrade a success to the speed-limited warning, replacing the
    /// payload with the clamped value.
    pub fn limited(mut self, value: &str) -> Self {
        self.code = ReturnCode::SpeedLimited;
        self.variable = String::try_from(WARN_SPEED_MAX).unwrap_or_default();
        self.value = String::try_from(value).unwrap_or_default();
        self
    }

    /// Render as an event report for the observer sink.
    pub fn to_report(&self) -> EventReport {
        EventReport {
            kind: self.kind,
            variable: self.variable.clone(),
            value: self.value.clone(),
            units: self.units.clone(),
            message: self.message.clone(),
        }
    }
}
