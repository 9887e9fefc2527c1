//! Controller module for pump-motion.
//!
//! Provides the operating-mode state machine, its persisted state record,
//! and the event-reporting seam.

mod builder;
#[allow(clippy::module_inception)]
mod controller;
pub mod events;
pub mod state;

pub use builder::PumpControllerBuilder;
pub use controller::{
    PumpController, SpeedOutcome, MANUAL_DEBOUNCE_MS, MANUAL_STATUS_UPDATE_DELAY_MS,
};
pub use events::{EventReport, EventSink, NullSink, ReportKind};
pub use state::{Direction, OperatingState, Status, STATE_VERSION};
