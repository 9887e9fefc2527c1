//! State persistence gateway.
//!
//! Encodes the operating state as a fixed-size, version-tagged record and
//! writes it through a raw storage primitive. The version tag is checked
//! before anything else is decoded; storage carrying a foreign tag is
//! replaced with the default record rather than interpreted.

use crate::controller::state::{Direction, OperatingState, Status, STATE_VERSION};
use crate::error::StoreError;

/// Encoded record length in bytes.
pub const RECORD_LEN: usize = 16;

/// Sentinel for an unset microstep index.
const MS_INDEX_UNSET: u8 = 0xFF;

/// Raw non-volatile storage primitive.
///
/// Implementations wrap EEPROM, flash-backed emulation, or a test buffer;
/// they read and write the whole record at a fixed location.
pub trait StateStore {
    /// Read the stored record.
    fn read(&mut self, buf: &mut [u8; RECORD_LEN]) -> core::result::Result<(), StoreError>;

    /// Overwrite the stored record.
    fn write(&mut self, buf: &[u8; RECORD_LEN]) -> core::result::Result<(), StoreError>;
}

/// Write the full state record, version tag included.
///
/// Called after every committed mutation; never speculatively, never batched.
pub fn save<S: StateStore>(
    store: &mut S,
    state: &OperatingState,
) -> core::result::Result<(), StoreError> {
    store.write(&encode(state))
}

/// Load the stored state.
///
/// Returns `(state, true)` when the stored record carries the expected
/// version tag. On a version mismatch, an undecodable record, or a read
/// failure, returns `(default, false)` and immediately rewrites storage with
/// the default so a stale layout is never left behind.
pub fn load<S: StateStore>(store: &mut S, default: OperatingState) -> (OperatingState, bool) {
    let mut buf = [0u8; RECORD_LEN];
    let decoded = match store.read(&mut buf) {
        Ok(()) => decode(&buf),
        Err(_) => None,
    };

    match decoded {
        Some(state) => (state, true),
        None => {
            // Self-healing: replace the incompatible record.
            let _ = save(store, &default);
            (default, false)
        }
    }
}

/// Encode a state record.
///
/// Layout (little-endian):
/// `version: u16 | direction: u8 | status: u8 | ms_auto: u8 | ms_index: u8 |
///  ms_resolution: u16 | rpm: f32 | locked: u8 | reserved[3]`
pub fn encode(state: &OperatingState) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];
    buf[0..2].copy_from_slice(&STATE_VERSION.to_le_bytes());
    buf[2] = direction_code(state.direction);
    buf[3] = status_code(state.status);
    buf[4] = state.ms_auto as u8;
    buf[5] = state.ms_index.unwrap_or(MS_INDEX_UNSET);
    buf[6..8].copy_from_slice(&state.ms_resolution.to_le_bytes());
    buf[8..12].copy_from_slice(&state.rpm.to_le_bytes());
    buf[12] = state.locked as u8;
    buf
}

/// Decode a state record, or `None` if the version tag is foreign or any
/// field is out of range.
pub fn decode(buf: &[u8; RECORD_LEN]) -> Option<OperatingState> {
    let version = u16::from_le_bytes([buf[0], buf[1]]);
    if version != STATE_VERSION {
        return None;
    }

    let direction = direction_from_code(buf[2])?;
    let status = status_from_code(buf[3])?;
    let ms_auto = match buf[4] {
        0 => false,
        1 => true,
        _ => return None,
    };
    let ms_index = match buf[5] {
        MS_INDEX_UNSET => None,
        index => Some(index),
    };
    let ms_resolution = u16::from_le_bytes([buf[6], buf[7]]);
    let rpm = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    if !rpm.is_finite() || rpm < 0.0 {
        return None;
    }
    let locked = match buf[12] {
        0 => false,
        1 => true,
        _ => return None,
    };

    Some(OperatingState {
        direction,
        status,
        ms_auto,
        ms_index,
        ms_resolution,
        rpm,
        locked,
    })
}

fn direction_code(direction: Direction) -> u8 {
    match direction {
        Direction::Cw => 1,
        Direction::Ccw => 2,
    }
}

fn direction_from_code(code: u8) -> Option<Direction> {
    match code {
        1 => Some(Direction::Cw),
        2 => Some(Direction::Ccw),
        _ => None,
    }
}

fn status_code(status: Status) -> u8 {
    match status {
        Status::On => 1,
        Status::Off => 2,
        Status::Hold => 3,
        Status::Manual => 4,
        Status::Rotate => 5,
        Status::Trigger => 6,
    }
}

fn status_from_code(code: u8) -> Option<Status> {
    match code {
        1 => Some(Status::On),
        2 => Some(Status::Off),
        3 => Some(Status::Hold),
        4 => Some(Status::Manual),
        5 => Some(Status::Rotate),
        6 => Some(Status::Trigger),
        _ => None,
    }
}
