//! Microstep selection and unit conversion.
//!
//! The table owns the driver's selectable resolutions and their derived rpm
//! limits; the converter maps between rpm and pulse quantities.

mod convert;
mod table;

pub use convert::Converter;
pub use table::{MicrostepMode, MicrostepTable};
