//! Builder pattern for PumpController.

use crate::config::SystemConfig;
use crate::error::{ConfigError, Error, Result};
use crate::hal::{Clock, MotionDriver, SpeedDial};
use crate::persist::StateStore;

use super::controller::PumpController;
use super::events::EventSink;

/// Builder wiring the hardware collaborators and configuration into a
/// [`PumpController`].
pub struct PumpControllerBuilder<DRV, STORE, CLK, DIAL, SINK>
where
    DRV: MotionDriver,
    STORE: StateStore,
    CLK: Clock,
    DIAL: SpeedDial,
    SINK: EventSink,
{
    driver: Option<DRV>,
    store: Option<STORE>,
    clock: Option<CLK>,
    dial: Option<DIAL>,
    sink: Option<SINK>,
    config: Option<SystemConfig>,
    reset: bool,
}

impl<DRV, STORE, CLK, DIAL, SINK> Default for PumpControllerBuilder<DRV, STORE, CLK, DIAL, SINK>
where
    DRV: MotionDriver,
    STORE: StateStore,
    CLK: Clock,
    DIAL: SpeedDial,
    SINK: EventSink,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<DRV, STORE, CLK, DIAL, SINK> PumpControllerBuilder<DRV, STORE, CLK, DIAL, SINK>
where
    DRV: MotionDriver,
    STORE: StateStore,
    CLK: Clock,
    DIAL: SpeedDial,
    SINK: EventSink,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            driver: None,
            store: None,
            clock: None,
            dial: None,
            sink: None,
            config: None,
            reset: false,
        }
    }

    /// Set the pulse-generation primitive.
    pub fn driver(mut self, driver: DRV) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Set the non-volatile state store.
    pub fn store(mut self, store: STORE) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the monotonic clock source.
    pub fn clock(mut self, clock: CLK) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the manual-mode analog speed input.
    pub fn dial(mut self, dial: DIAL) -> Self {
        self.dial = Some(dial);
        self
    }

    /// Set the event observer.
    pub fn sink(mut self, sink: SINK) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the system configuration.
    pub fn config(mut self, config: SystemConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Skip restoring persisted state; start from the compiled-in defaults.
    pub fn reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Build the controller.
    ///
    /// # Errors
    ///
    /// Returns an error if a required collaborator is missing or the
    /// configuration fails validation.
    pub fn build(self) -> Result<PumpController<DRV, STORE, CLK, DIAL, SINK>> {
        let driver = self.driver.ok_or_else(|| required("driver"))?;
        let store = self.store.ok_or_else(|| required("store"))?;
        let clock = self.clock.ok_or_else(|| required("clock"))?;
        let dial = self.dial.ok_or_else(|| required("dial"))?;
        let sink = self.sink.ok_or_else(|| required("sink"))?;
        let config = self.config.ok_or_else(|| required("config"))?;

        PumpController::new(&config, driver, store, clock, dial, sink, self.reset)
    }
}

fn required(field: &str) -> Error {
    let mut msg: heapless::String<128> = heapless::String::new();
    let _ = msg.push_str(field);
    let _ = msg.push_str(" is required");
    Error::Config(ConfigError::ParseError(msg))
}
