//! Pump controller: owns the operating state, decides legal transitions, and
//! drives the motion primitive.
//!
//! Every mutation funnels through one commit path: update the in-memory
//! record, recompute select lines and pulse rate, sync the motion primitive,
//! persist, and report. A mutator asked for the value already committed is a
//! complete no-op — no driver calls, no storage write, no event.

use core::fmt::Write;

use libm::roundf;

use crate::command::{
    CommandResponse, DirectionArg, MicrostepArg, Request, SpeedUnits, Tokenizer, CAL_STEP_FLOW,
};
use crate::config::units::{Revolutions, Rpm, Steps, StepsPerSec};
use crate::config::SystemConfig;
use crate::error::{CommandError, Result};
use crate::hal::{Clock, MotionDriver, SpeedDial};
use crate::persist::{self, StateStore};
use crate::stepping::{Converter, MicrostepTable};

use super::events::{EventReport, EventSink, ReportKind};
use super::state::{Direction, OperatingState, Status};

/// How long the manual dial must read the same value before it is accepted.
pub const MANUAL_DEBOUNCE_MS: u64 = 50;

/// Cooldown after a manual speed change before storage/driver sync resumes,
/// so knob turning does not thrash the display and the EEPROM.
pub const MANUAL_STATUS_UPDATE_DELAY_MS: u64 = 2000;

/// Result of a speed-affecting mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedOutcome {
    /// The rpm actually committed.
    pub rpm: f32,
    /// Whether the request exceeded the active mode's limit and was clamped.
    pub clamped: bool,
}

/// The motion/state controller.
///
/// Generic over its hardware collaborators:
/// - `DRV`: pulse-generation primitive
/// - `STORE`: raw non-volatile storage
/// - `CLK`: monotonic millisecond clock
/// - `DIAL`: manual-mode analog speed input
/// - `SINK`: event observer
pub struct PumpController<DRV, STORE, CLK, DIAL, SINK>
where
    DRV: MotionDriver,
    STORE: StateStore,
    CLK: Clock,
    DIAL: SpeedDial,
    SINK: EventSink,
{
    driver: DRV,
    store: STORE,
    clock: CLK,
    dial: DIAL,
    sink: SINK,
    table: MicrostepTable,
    converter: Converter,
    state: OperatingState,
    recovered: bool,
    /// While set, storage/driver sync is held back until this instant.
    defer_sync_until: Option<u64>,
    last_manual_rpm: Option<f32>,
    last_manual_read_ms: u64,
}

impl<DRV, STORE, CLK, DIAL, SINK> PumpController<DRV, STORE, CLK, DIAL, SINK>
where
    DRV: MotionDriver,
    STORE: StateStore,
    CLK: Clock,
    DIAL: SpeedDial,
    SINK: EventSink,
{
    /// Construct the controller, restoring persisted state unless `reset`.
    ///
    /// A restored `Rotate` status resolves to `Off`: the move target does not
    /// survive a restart, so resuming it verbatim would complete spuriously
    /// on the first tick. The microstep selection is re-validated against the
    /// table and the rpm re-clamped before the first driver sync.
    pub(crate) fn new(
        config: &SystemConfig,
        driver: DRV,
        store: STORE,
        clock: CLK,
        dial: DIAL,
        sink: SINK,
        reset: bool,
    ) -> Result<Self> {
        let table = MicrostepTable::from_config(config)?;
        let converter = Converter::from_motor(&config.motor);

        let mut controller = Self {
            driver,
            store,
            clock,
            dial,
            sink,
            table,
            converter,
            state: OperatingState::default(),
            recovered: false,
            defer_sync_until: None,
            last_manual_rpm: None,
            last_manual_read_ms: 0,
        };

        if !reset {
            let (state, recovered) =
                persist::load(&mut controller.store, OperatingState::default());
            controller.state = state;
            controller.recovered = recovered;
        }

        if controller.state.status == Status::Rotate {
            controller.state.status = Status::Off;
        }

        // Re-validate the stored selection against this table.
        let index = match controller.state.ms_index {
            Some(index) if (index as usize) < controller.table.len() && !controller.state.ms_auto => {
                index as usize
            }
            _ => controller.table.select_for_rpm(controller.state.rpm),
        };
        let (rpm, _) = controller.table.clamp_rpm(index, controller.state.rpm);
        controller.state.ms_index = Some(index as u8);
        controller.state.ms_resolution = controller
            .table
            .get(index)
            .map(|mode| mode.resolution)
            .unwrap_or(1);
        controller.state.rpm = rpm;

        let _ = persist::save(&mut controller.store, &controller.state);
        controller.sync_driver();

        Ok(controller)
    }

    /// Read view of the operating state.
    #[inline]
    pub fn state(&self) -> &OperatingState {
        &self.state
    }

    /// Whether startup restored a stored record (as opposed to defaults).
    #[inline]
    pub fn recovered(&self) -> bool {
        self.recovered
    }

    /// The microstep table in use.
    #[inline]
    pub fn table(&self) -> &MicrostepTable {
        &self.table
    }

    /// Overall speed ceiling (full-step limit).
    #[inline]
    pub fn max_rpm(&self) -> f32 {
        self.table.max_rpm()
    }

    // ---- commit path -------------------------------------------------------

    /// Commit a candidate state: refresh the resolution cache, and if the
    /// candidate differs from the current state, store it, persist, and sync
    /// the motion primitive. Returns whether anything changed.
    fn commit(&mut self, mut next: OperatingState) -> bool {
        if let Some(index) = next.ms_index {
            if let Some(mode) = self.table.get(index as usize) {
                next.ms_resolution = mode.resolution;
            }
        }
        if next == self.state {
            return false;
        }
        self.state = next;
        self.apply();
        true
    }

    /// Persist and sync the driver, unless held back by the manual cooldown.
    fn apply(&mut self) {
        if self.defer_sync_until.is_some() {
            return;
        }
        let _ = persist::save(&mut self.store, &self.state);
        self.sync_driver();
    }

    /// Push select lines, pulse rate, and enable state to the primitive.
    fn sync_driver(&mut self) {
        if let Some(index) = self.state.ms_index {
            if let Some(mode) = self.table.get(index as usize) {
                self.driver.set_microstep(mode.select);
            }
        }

        let speed = self.converter.speed(
            Rpm(self.state.rpm),
            self.state.ms_resolution,
            self.state.direction,
        );

        match self.state.status {
            Status::On | Status::Rotate => {
                self.driver.set_speed(speed);
                self.driver.enable_outputs();
            }
            Status::Manual if self.state.rpm > 0.0 => {
                self.driver.set_speed(speed);
                self.driver.enable_outputs();
            }
            Status::Hold => {
                self.driver.set_speed(StepsPerSec::ZERO);
                self.driver.enable_outputs();
            }
            _ => {
                self.driver.set_speed(StepsPerSec::ZERO);
                self.driver.disable_outputs();
            }
        }
    }

    fn report(&mut self, report: EventReport) {
        self.sink.publish(&report);
    }

    // ---- state-change operations ------------------------------------------

    /// Run continuously at the committed speed.
    pub fn start(&mut self) -> bool {
        self.change_status(Status::On)
    }

    /// Power down the outputs. The primitive is driven to zero speed
    /// regardless of the stored rpm.
    pub fn stop(&mut self) -> bool {
        self.change_status(Status::Off)
    }

    /// Keep outputs energized at zero speed (holding torque).
    pub fn hold(&mut self) -> bool {
        self.change_status(Status::Hold)
    }

    /// Follow the analog speed input.
    pub fn manual(&mut self) -> bool {
        self.last_manual_rpm = None;
        self.change_status(Status::Manual)
    }

    fn change_status(&mut self, status: Status) -> bool {
        let mut next = self.state;
        next.status = status;
        let changed = self.commit(next);
        if changed {
            self.report(EventReport::event("status").with_value(status.short_label()));
        }
        changed
    }

    /// Run a bounded number of revolutions, then stop autonomously.
    ///
    /// Resets the primitive's position counter, issues the absolute move, and
    /// enters `Rotate`. Returns the signed step target.
    pub fn rotate(&mut self, revolutions: Revolutions) -> Steps {
        let target = self.converter.rotation_target(
            revolutions,
            self.state.ms_resolution,
            self.state.direction,
        );
        self.driver.set_current_position(Steps::ZERO);
        self.driver.move_to(target);
        self.change_status(Status::Rotate);
        target
    }

    /// Change direction. No-op when the direction is already set.
    ///
    /// Changing direction during a bounded rotation abandons the move: the
    /// status is forced to `Off` in the same commit, not on a later tick.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.direction == direction {
            return false;
        }
        let mut next = self.state;
        next.direction = direction;
        if next.status == Status::Rotate {
            next.status = Status::Off;
        }
        let changed = self.commit(next);
        if changed {
            self.report(EventReport::event("dir").with_value(direction.short_label()));
        }
        changed
    }

    /// Set the target speed in rpm.
    ///
    /// Reselects the microstep mode (automatic mode tracks the request, a
    /// pinned mode stays pinned) and clamps to the active mode's limit.
    pub fn set_speed_rpm(&mut self, rpm: f32) -> SpeedOutcome {
        let rpm = if rpm < 0.0 { 0.0 } else { rpm };
        let index = if self.state.ms_auto {
            self.table.select_for_rpm(rpm)
        } else {
            self.state.ms_index.map(|i| i as usize).unwrap_or(0)
        };
        let (applied, clamped) = self.table.clamp_rpm(index, rpm);

        let mut next = self.state;
        next.ms_index = Some(index as u8);
        next.rpm = applied;
        if self.commit(next) {
            let value = render_rpm(applied);
            self.report(
                EventReport::event("speed")
                    .with_value(value.as_str())
                    .with_units("rpm"),
            );
        }

        SpeedOutcome {
            rpm: applied,
            clamped,
        }
    }

    /// Switch microstep selection to automatic mode.
    ///
    /// Not a flag flip: the selection is re-run against the current rpm
    /// immediately, and the rpm re-clamped under the chosen mode.
    pub fn set_microstep_auto(&mut self) -> SpeedOutcome {
        let index = self.table.select_for_rpm(self.state.rpm);
        let (applied, clamped) = self.table.clamp_rpm(index, self.state.rpm);

        let mut next = self.state;
        next.ms_auto = true;
        next.ms_index = Some(index as u8);
        next.rpm = applied;
        if self.commit(next) {
            self.report_microstep();
        }

        SpeedOutcome {
            rpm: applied,
            clamped,
        }
    }

    /// Pin a specific microstep resolution.
    ///
    /// A coarser mode may newly violate the speed limit, so the current rpm
    /// is re-clamped under the new mode.
    ///
    /// # Errors
    ///
    /// `UnknownMicrostep` if the resolution is not in the table; state is
    /// left untouched.
    pub fn set_microstep_mode(
        &mut self,
        resolution: u16,
    ) -> core::result::Result<SpeedOutcome, CommandError> {
        let index = self
            .table
            .index_of_resolution(resolution)
            .ok_or(CommandError::UnknownMicrostep)?;
        let (applied, clamped) = self.table.clamp_rpm(index, self.state.rpm);

        let mut next = self.state;
        next.ms_auto = false;
        next.ms_index = Some(index as u8);
        next.rpm = applied;
        if self.commit(next) {
            self.report_microstep();
        }

        Ok(SpeedOutcome {
            rpm: applied,
            clamped,
        })
    }

    fn report_microstep(&mut self) {
        let label = self.state.microstep_short_label();
        self.report(EventReport::event("ms").with_value(label.as_str()));
    }

    /// Reject every command except lock/unlock until unlocked.
    ///
    /// Persists the flag; does not touch motion state.
    pub fn lock(&mut self) -> bool {
        self.set_locked(true)
    }

    /// Clear the lock.
    pub fn unlock(&mut self) -> bool {
        self.set_locked(false)
    }

    fn set_locked(&mut self, locked: bool) -> bool {
        if self.state.locked == locked {
            return false;
        }
        self.state.locked = locked;
        let _ = persist::save(&mut self.store, &self.state);
        self.report(
            EventReport::event("lock").with_value(if locked { "locked" } else { "unlocked" }),
        );
        true
    }

    // ---- tick --------------------------------------------------------------

    /// One scheduler tick. Never blocks.
    ///
    /// Flushes an expired deferred status update, then either advances a
    /// bounded rotation (committing the autonomous `Off` transition when the
    /// target is reached), samples the manual dial, or runs at the committed
    /// steady speed.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();

        if let Some(at) = self.defer_sync_until {
            if now >= at {
                self.defer_sync_until = None;
                self.apply();
            }
        }

        if self.state.status == Status::Rotate {
            if self.driver.distance_to_go() == Steps::ZERO {
                self.change_status(Status::Off);
                self.report(EventReport::event("rot end"));
            } else {
                self.driver.run_speed_to_position();
            }
        } else {
            if self.state.status == Status::Manual {
                self.poll_manual_dial(now);
            }
            self.driver.run_speed();
        }
    }

    /// Sample the analog dial, debounce it, and apply a confirmed change as a
    /// speed mutation with storage sync deferred by the cooldown window.
    fn poll_manual_dial(&mut self, now: u64) {
        let fraction = self.dial.read_fraction().clamp(0.0, 1.0);
        let rpm = roundf(fraction * self.table.max_rpm());

        match self.last_manual_rpm {
            Some(last) if last == rpm => {
                if now.saturating_sub(self.last_manual_read_ms) > MANUAL_DEBOUNCE_MS
                    && rpm != self.state.rpm
                {
                    self.defer_sync_until = Some(now + MANUAL_STATUS_UPDATE_DELAY_MS);
                    self.set_speed_rpm(rpm);
                }
            }
            _ => {
                self.last_manual_rpm = Some(rpm);
                self.last_manual_read_ms = now;
            }
        }
    }

    // ---- command protocol --------------------------------------------------

    /// Handle one command line: parse, dispatch exactly one mutation (or
    /// rejection), and return the structured response. The response is also
    /// published through the event sink.
    pub fn handle_command(&mut self, line: &str) -> CommandResponse {
        let mut tokens = Tokenizer::new(line);
        let op = tokens.next().unwrap_or("");

        let response = if !Request::bypasses_lock(op) && self.state.locked {
            CommandResponse::rejection(CommandError::Locked, line)
        } else {
            match Request::parse(op, &mut tokens) {
                Ok(request) => self.dispatch(request, tokens.remainder(), line),
                Err(error) => CommandResponse::rejection(error, line),
            }
        };

        self.report(response.to_report());
        response
    }

    fn dispatch(&mut self, request: Request<'_>, message: &str, line: &str) -> CommandResponse {
        match request {
            Request::Lock => {
                self.lock();
                CommandResponse::success("lock")
                    .with_value("locked")
                    .with_message(message)
            }
            Request::Unlock => {
                self.unlock();
                CommandResponse::success("lock")
                    .with_value("unlocked")
                    .with_message(message)
            }
            Request::Start => {
                self.start();
                self.status_response(message)
            }
            Request::Stop => {
                self.stop();
                self.status_response(message)
            }
            Request::Hold => {
                self.hold();
                self.status_response(message)
            }
            Request::Manual => {
                self.manual();
                self.status_response(message)
            }
            Request::Rotate(revolutions) => {
                self.rotate(Revolutions(revolutions));
                let mut value: heapless::String<20> = heapless::String::new();
                let _ = write!(value, "{}", revolutions);
                CommandResponse::success("rotate")
                    .with_value(value.as_str())
                    .with_units("rotations")
                    .with_message(message)
            }
            Request::Calibrate { variable, value } => {
                if variable == CAL_STEP_FLOW {
                    CommandResponse::success(CAL_STEP_FLOW)
                        .with_kind(ReportKind::Calibrate)
                        .with_value(value)
                        .with_units("volume/step")
                        .with_message(message)
                } else {
                    CommandResponse::rejection(CommandError::UnknownCalibration, line)
                }
            }
            Request::Direction(arg) => {
                let direction = match arg {
                    DirectionArg::Cw => Direction::Cw,
                    DirectionArg::Cc => Direction::Ccw,
                    DirectionArg::Switch => self.state.direction.toggled(),
                };
                self.set_direction(direction);
                CommandResponse::success("dir")
                    .with_value(direction.short_label())
                    .with_units("cw/cc")
                    .with_message(message)
            }
            Request::Microstep(MicrostepArg::Auto) => {
                let outcome = self.set_microstep_auto();
                self.microstep_response(outcome, message)
            }
            Request::Microstep(MicrostepArg::Mode(resolution)) => {
                match self.set_microstep_mode(resolution) {
                    Ok(outcome) => self.microstep_response(outcome, message),
                    Err(error) => CommandResponse::rejection(error, line),
                }
            }
            Request::Speed { value, units } => match units {
                SpeedUnits::Rpm => {
                    let outcome = self.set_speed_rpm(value);
                    let rendered = render_rpm(outcome.rpm);
                    let response = CommandResponse::success("speed")
                        .with_value(rendered.as_str())
                        .with_units("rpm")
                        .with_message(message);
                    if outcome.clamped {
                        response.limited(rendered.as_str())
                    } else {
                        response
                    }
                }
                SpeedUnits::Fpm => {
                    // Reserved until step-flow calibration exists; accepted
                    // with no effect.
                    let mut rendered: heapless::String<20> = heapless::String::new();
                    let _ = write!(rendered, "{}", value);
                    CommandResponse::success("speed")
                        .with_value(rendered.as_str())
                        .with_units("fpm")
                        .with_message(message)
                }
            },
        }
    }

    fn status_response(&self, message: &str) -> CommandResponse {
        CommandResponse::success("status")
            .with_value(self.state.status.short_label())
            .with_message(message)
    }

    fn microstep_response(&self, outcome: SpeedOutcome, message: &str) -> CommandResponse {
        let label = self.state.microstep_short_label();
        let response = CommandResponse::success("ms")
            .with_value(label.as_str())
            .with_message(message);
        if outcome.clamped {
            response.limited(render_rpm(outcome.rpm).as_str()).with_units("rpm")
        } else {
            response
        }
    }
}

fn render_rpm(rpm: f32) -> heapless::String<20> {
    let mut text = heapless::String::new();
    let _ = write!(text, "{:.2}", rpm);
    text
}
