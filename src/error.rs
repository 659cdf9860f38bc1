//! Unified error types for the washroom firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! startup path's error handling uniform.  All variants are `Copy` so they
//! can be passed around and logged without allocation.
//!
//! Note that sensor acquisition never returns these to its callers: pin
//! faults are absorbed per reading (see [`crate::sensors`]).  They surface
//! only during initialisation and from the [`PinPort`](crate::app::ports::PinPort)
//! boundary itself.

use core::fmt;

use crate::pins::GpioNum;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The pin interface failed.
    Pin(PinError),
    /// Configuration is invalid.
    Config(&'static str),
    /// Startup wiring failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin(e) => write!(f, "pin: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Pin errors
// ---------------------------------------------------------------------------

/// Hardware-fault conditions raised by the pin interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// The interface has released its pins (or access was revoked).
    Unavailable,
    /// The pin was never claimed with `configure`.
    NotConfigured(GpioNum),
    /// A write was attempted on a pin configured as input.
    NotAnOutput(GpioNum),
    /// The underlying driver rejected the call (ESP-IDF error code).
    Driver(i32),
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "pin interface unavailable"),
            Self::NotConfigured(pin) => write!(f, "GPIO {pin} not configured"),
            Self::NotAnOutput(pin) => write!(f, "GPIO {pin} is not an output"),
            Self::Driver(rc) => write!(f, "GPIO driver error (rc={rc})"),
        }
    }
}

impl core::error::Error for PinError {}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
