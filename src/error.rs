//! Error types for pump-motion.
//!
//! Provides unified error handling across configuration, command parsing,
//! and state storage.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all pump-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Command rejection (state left unchanged)
    Command(CommandError),
    /// Non-volatile storage primitive error
    Store(StoreError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Steps per revolution must be > 0
    InvalidStepsPerRevolution(u16),
    /// Gearing must be > 0 (1.0 = direct drive)
    InvalidGearing(f32),
    /// Board pulse rate must be > 0
    InvalidPulseRate(f32),
    /// Driver mode table has no entries
    EmptyModeTable,
    /// Driver mode table exceeds the supported number of entries
    ModeTableOverflow,
    /// Mode resolutions must be unique and increase from coarsest to finest
    UnorderedResolution(u16),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Command rejection errors.
///
/// Every variant means the command mutated nothing; the offending token is
/// carried for echoing back to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Operation name matched no known command
    UnknownCommand,
    /// Controller is locked and the command is not lock/unlock
    Locked,
    /// Calibration sub-variable is not recognized
    UnknownCalibration,
    /// Direction token is not cw/cc/switch
    UnknownDirection,
    /// Requested microstep resolution is not in the driver table
    UnknownMicrostep,
    /// Speed units or value token is missing, unparseable, or negative
    UnknownSpeed,
    /// Numeric value token is missing or unparseable
    InvalidValue,
}

/// State storage primitive errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Read from non-volatile storage failed
    Read,
    /// Write to non-volatile storage failed
    Write,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
            Error::Store(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidGearing(v) => write!(f, "Invalid gearing: {}. Must be > 0", v),
            ConfigError::InvalidPulseRate(v) => {
                write!(f, "Invalid board pulse rate: {}. Must be > 0", v)
            }
            ConfigError::EmptyModeTable => write!(f, "Driver microstep mode table is empty"),
            ConfigError::ModeTableOverflow => {
                write!(f, "Driver microstep mode table has too many entries")
            }
            ConfigError::UnorderedResolution(v) => {
                write!(
                    f,
                    "Microstep resolution {} out of order. Table must go coarsest to finest",
                    v
                )
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand => write!(f, "unknown command"),
            CommandError::Locked => write!(f, "locked"),
            CommandError::UnknownCalibration => write!(f, "unknown calibrate"),
            CommandError::UnknownDirection => write!(f, "unknown direction"),
            CommandError::UnknownMicrostep => write!(f, "unknown microstepping"),
            CommandError::UnknownSpeed => write!(f, "unknown speed"),
            CommandError::InvalidValue => write!(f, "invalid value"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read => write!(f, "storage read failed"),
            StoreError::Write => write!(f, "storage write failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}
