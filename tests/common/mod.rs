//! Shared test doubles: a recording motion driver, an in-memory state store,
//! a manually advanced clock, a settable dial, and a capturing event sink.
//!
//! Each double hands the test a shared handle so driver/store activity can be
//! asserted while the controller owns the collaborator.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use pump_motion::config::units::{Steps, StepsPerSec};
use pump_motion::persist::RECORD_LEN;
use pump_motion::{
    BoardConfig, Clock, DriverConfig, EventReport, EventSink, MotionDriver, MotorConfig,
    PumpController, PumpControllerBuilder, SpeedDial, StateStore, StoreError, SystemConfig,
};

/// Observable state of the recording driver.
#[derive(Debug, Default)]
pub struct DriverState {
    pub speed: f32,
    pub target: i64,
    pub position: i64,
    pub enabled: bool,
    pub select: [bool; 3],
    /// Counts every set_speed/set_microstep/enable/disable call.
    pub sync_calls: usize,
    pub run_speed_calls: usize,
    pub run_to_position_calls: usize,
}

/// Motion driver double with a shared observation handle.
#[derive(Clone, Default)]
pub struct SharedDriver(pub Rc<RefCell<DriverState>>);

impl MotionDriver for SharedDriver {
    fn set_speed(&mut self, speed: StepsPerSec) {
        let mut driver = self.0.borrow_mut();
        driver.speed = speed.value();
        driver.sync_calls += 1;
    }

    fn move_to(&mut self, target: Steps) {
        self.0.borrow_mut().target = target.value();
    }

    fn set_current_position(&mut self, position: Steps) {
        self.0.borrow_mut().position = position.value();
    }

    fn distance_to_go(&self) -> Steps {
        let driver = self.0.borrow();
        Steps::new(driver.target - driver.position)
    }

    fn run_speed_to_position(&mut self) {
        let mut driver = self.0.borrow_mut();
        driver.run_to_position_calls += 1;
        if driver.target > driver.position {
            driver.position += 1;
        } else if driver.target < driver.position {
            driver.position -= 1;
        }
    }

    fn run_speed(&mut self) {
        self.0.borrow_mut().run_speed_calls += 1;
    }

    fn set_microstep(&mut self, select: [bool; 3]) {
        let mut driver = self.0.borrow_mut();
        driver.select = select;
        driver.sync_calls += 1;
    }

    fn enable_outputs(&mut self) {
        let mut driver = self.0.borrow_mut();
        driver.enabled = true;
        driver.sync_calls += 1;
    }

    fn disable_outputs(&mut self) {
        let mut driver = self.0.borrow_mut();
        driver.enabled = false;
        driver.sync_calls += 1;
    }
}

/// Observable state of the in-memory store.
#[derive(Debug)]
pub struct StoreState {
    pub record: [u8; RECORD_LEN],
    pub writes: usize,
    pub fail_reads: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            record: [0u8; RECORD_LEN],
            writes: 0,
            fail_reads: false,
        }
    }
}

/// State store double with a shared observation handle.
#[derive(Clone, Default)]
pub struct SharedStore(pub Rc<RefCell<StoreState>>);

impl StateStore for SharedStore {
    fn read(&mut self, buf: &mut [u8; RECORD_LEN]) -> Result<(), StoreError> {
        let store = self.0.borrow();
        if store.fail_reads {
            return Err(StoreError::Read);
        }
        buf.copy_from_slice(&store.record);
        Ok(())
    }

    fn write(&mut self, buf: &[u8; RECORD_LEN]) -> Result<(), StoreError> {
        let mut store = self.0.borrow_mut();
        store.record.copy_from_slice(buf);
        store.writes += 1;
        Ok(())
    }
}

/// Manually advanced millisecond clock.
#[derive(Clone, Default)]
pub struct SharedClock(pub Rc<RefCell<u64>>);

impl SharedClock {
    pub fn advance(&self, ms: u64) {
        *self.0.borrow_mut() += ms;
    }
}

impl Clock for SharedClock {
    fn now_ms(&self) -> u64 {
        *self.0.borrow()
    }
}

/// Settable analog dial.
#[derive(Clone, Default)]
pub struct SharedDial(pub Rc<RefCell<f32>>);

impl SharedDial {
    pub fn set(&self, fraction: f32) {
        *self.0.borrow_mut() = fraction;
    }
}

impl SpeedDial for SharedDial {
    fn read_fraction(&mut self) -> f32 {
        *self.0.borrow()
    }
}

/// Capturing event sink.
#[derive(Clone, Default)]
pub struct SharedSink(pub Rc<RefCell<Vec<EventReport>>>);

impl SharedSink {
    pub fn count_of(&self, variable: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|report| report.variable.as_str() == variable)
            .count()
    }
}

impl EventSink for SharedSink {
    fn publish(&mut self, report: &EventReport) {
        self.0.borrow_mut().push(report.clone());
    }
}

pub type TestController =
    PumpController<SharedDriver, SharedStore, SharedClock, SharedDial, SharedSink>;

/// All shared handles for one controller under test.
#[derive(Clone, Default)]
pub struct Rig {
    pub driver: SharedDriver,
    pub store: SharedStore,
    pub clock: SharedClock,
    pub dial: SharedDial,
    pub sink: SharedSink,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&self, config: SystemConfig) -> TestController {
        self.build_with_reset(config, false)
    }

    pub fn build_with_reset(&self, config: SystemConfig, reset: bool) -> TestController {
        PumpControllerBuilder::new()
            .config(config)
            .driver(self.driver.clone())
            .store(self.store.clone())
            .clock(self.clock.clone())
            .dial(self.dial.clone())
            .sink(self.sink.clone())
            .reset(reset)
            .build()
            .expect("controller should build")
    }
}

/// Reference hardware: WM114ST (200 steps) + Photon (1000 steps/s) + DRV8825.
/// RPM limits: 300, 150, 75, 37.5, 18.75, 9.375.
pub fn reference_config() -> SystemConfig {
    SystemConfig::photon_drv8825_wm114st()
}

/// Scenario hardware: 60 steps/rev and a 1 kHz budget give round rpm limits
/// {1: 1000, 4: 250, 16: 62.5}.
pub fn scenario_config() -> SystemConfig {
    let motor = MotorConfig {
        name: heapless::String::try_from("scenario").unwrap(),
        steps_per_revolution: 60,
        gearing: 1.0,
    };
    let driver = DriverConfig {
        modes: heapless::Vec::from_slice(&[
            pump_motion::config::ModeConfig {
                resolution: 1,
                select: [false, false, false],
            },
            pump_motion::config::ModeConfig {
                resolution: 4,
                select: [false, true, false],
            },
            pump_motion::config::ModeConfig {
                resolution: 16,
                select: [false, false, true],
            },
        ])
        .unwrap(),
    };
    SystemConfig::new(motor, BoardConfig::photon(), driver)
}
