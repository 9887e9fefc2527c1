//! Operating state: direction, status, microstep selection, speed, lock.
//!
//! This is the persisted record; the controller owns the single live copy
//! and collaborators only ever see a read view.

use core::fmt::Write;

/// Direction of pump rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise.
    Cw,
    /// Counter-clockwise.
    Ccw,
}

impl Direction {
    /// Sign multiplier applied to pulse rates and step targets.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Cw => 1.0,
            Direction::Ccw => -1.0,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Direction::Cw => Direction::Ccw,
            Direction::Ccw => Direction::Cw,
        }
    }

    /// Short display code.
    pub fn short_label(self) -> &'static str {
        match self {
            Direction::Cw => "cw",
            Direction::Ccw => "cc",
        }
    }

    /// Long display description.
    pub fn long_label(self) -> &'static str {
        match self {
            Direction::Cw => "clockwise",
            Direction::Ccw => "counter-clockwise",
        }
    }
}

/// Operating mode of the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Running continuously at the committed speed.
    On,
    /// Outputs disabled, no motion.
    Off,
    /// Outputs enabled at zero speed (holding torque).
    Hold,
    /// Executing a bounded number of rotations.
    Rotate,
    /// Speed follows the external analog input.
    Manual,
    /// Reserved: motion gated by an external trigger signal.
    Trigger,
}

impl Status {
    /// Short display code.
    pub fn short_label(self) -> &'static str {
        match self {
            Status::On => "on",
            Status::Off => "off",
            Status::Hold => "hold",
            Status::Rotate => "rot",
            Status::Manual => "man",
            Status::Trigger => "trig",
        }
    }

    /// Long display description.
    pub fn long_label(self) -> &'static str {
        match self {
            Status::On => "running",
            Status::Off => "off",
            Status::Hold => "holding position",
            Status::Rotate => "executing number of rotations",
            Status::Manual => "manual mode",
            Status::Trigger => "triggered by external signal",
        }
    }
}

/// Persisted-record layout version. Bump on any structural change to
/// [`OperatingState`]; storage with a different tag is never deserialized.
pub const STATE_VERSION: u16 = 3;

/// The pump's complete operating state.
///
/// Invariants maintained by the controller's commit path:
/// - `ms_resolution` always mirrors the table entry at `ms_index` when the
///   index is set (denormalized cache, never independently settable).
/// - `rpm` never exceeds the rpm limit of the active microstep mode.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OperatingState {
    /// Direction of travel.
    pub direction: Direction,

    /// Operating mode.
    pub status: Status,

    /// Whether microstep selection follows the speed automatically.
    pub ms_auto: bool,

    /// Index into the microstep table; `None` until first selection.
    pub ms_index: Option<u8>,

    /// Resolution of the active mode, cached for display convenience.
    pub ms_resolution: u16,

    /// Target speed in revolutions per minute (non-negative).
    pub rpm: f32,

    /// Whether mutating commands other than lock/unlock are rejected.
    pub locked: bool,
}

impl Default for OperatingState {
    fn default() -> Self {
        Self {
            direction: Direction::Cw,
            status: Status::Off,
            ms_auto: true,
            ms_index: None,
            ms_resolution: 1,
            rpm: 0.0,
            locked: false,
        }
    }
}

impl OperatingState {
    /// Short microstep display text: `"16A"` in automatic mode, `"16"` pinned.
    pub fn microstep_short_label(&self) -> heapless::String<8> {
        let mut text = heapless::String::new();
        if self.ms_auto {
            let _ = write!(text, "{}A", self.ms_resolution);
        } else {
            let _ = write!(text, "{}", self.ms_resolution);
        }
        text
    }

    /// Long microstep display text: `"16 (auto)"` in automatic mode.
    pub fn microstep_long_label(&self) -> heapless::String<12> {
        let mut text = heapless::String::new();
        if self.ms_auto {
            let _ = write!(text, "{} (auto)", self.ms_resolution);
        } else {
            let _ = write!(text, "{}", self.ms_resolution);
        }
        text
    }
}
