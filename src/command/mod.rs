//! Text command protocol: tokenizer, request parsing, structured responses.
//!
//! Protocol shape: `<operation> [<value>] [<units>] [message text]`. Errors
//! always mean nothing was mutated; warnings mean the mutation happened with
//! a different value than requested.

mod request;
mod response;

pub use request::{
    DirectionArg, MicrostepArg, Request, SpeedUnits, Tokenizer, CAL_STEP_FLOW, CMD_ROOT,
};
pub use response::{
    error_label, CommandResponse, ReturnCode, ERROR_CALIBRATE, ERROR_COMMAND, ERROR_DIRECTION,
    ERROR_LOCKED, ERROR_MICROSTEP, ERROR_SPEED, ERROR_VALUE, WARN_SPEED_MAX,
};
