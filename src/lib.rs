//! # pump-motion
//!
//! Stepper-driven metering pump control: a textual command protocol, an
//! operating-mode state machine, microstep/speed selection, and a versioned
//! state-persistence contract.
//!
//! ## Features
//!
//! - **Command protocol**: one text line in, one mutation (or rejection) and
//!   one structured response out
//! - **Microstep selection**: automatic finest-mode-that-fits selection with
//!   derived per-mode rpm limits
//! - **Durable state**: version-tagged record persisted after every commit,
//!   self-healing on layout mismatch
//! - **Non-blocking tick**: bounded rotations and manual-dial debounce run
//!   cooperatively from a periodic `update()`
//! - **no_std compatible**: core library works without the standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pump_motion::{PumpControllerBuilder, SystemConfig};
//!
//! let mut pump = PumpControllerBuilder::new()
//!     .config(SystemConfig::photon_drv8825_wm114st())
//!     .driver(stepper)
//!     .store(eeprom)
//!     .clock(millis)
//!     .dial(adc)
//!     .sink(webhook)
//!     .build()?;
//!
//! // From the command transport:
//! let response = pump.handle_command("speed 12.5 rpm morning run");
//!
//! // From the scheduler loop:
//! pump.update();
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod hal;
pub mod persist;
pub mod stepping;

// Re-exports for ergonomic API
pub use command::{CommandResponse, Request, ReturnCode, Tokenizer};
pub use config::{BoardConfig, DriverConfig, MotorConfig, SystemConfig, validate_config};
pub use controller::{
    Direction, EventReport, EventSink, NullSink, OperatingState, PumpController,
    PumpControllerBuilder, ReportKind, SpeedOutcome, Status, STATE_VERSION,
};
pub use error::{CommandError, ConfigError, Error, Result, StoreError};
pub use hal::{Clock, MotionDriver, SelectPins, SpeedDial};
pub use persist::{StateStore, RECORD_LEN};
pub use stepping::{Converter, MicrostepMode, MicrostepTable};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{Revolutions, Rpm, Steps, StepsPerSec};
