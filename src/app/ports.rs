//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   GpioAdapter ──▶ PinPort ──▶ SensorHub (domain) ──▶ SensorPort ──▶ HTTP adapter
//! ```
//!
//! Driven adapters (pin drivers, mocks) implement [`PinPort`].  The
//! [`SensorHub`](crate::sensors::SensorHub) consumes it via generics, so the
//! acquisition logic never touches hardware directly.  Driving adapters (the
//! HTTP endpoint, console telemetry) consume [`SensorPort`].

use embedded_hal::digital::PinState;

use crate::error::PinError;
use crate::pins::GpioNum;
use crate::sensors::snapshot::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Pin vocabulary
// ───────────────────────────────────────────────────────────────

/// Digital level on a pin.  There is deliberately no "unknown" level: a
/// reading that cannot be taken is a [`PinError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl From<PinState> for Level {
    fn from(state: PinState) -> Self {
        match state {
            PinState::Low => Self::Low,
            PinState::High => Self::High,
        }
    }
}

impl From<Level> for PinState {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => PinState::Low,
            Level::High => PinState::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Internal bias resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    None,
    Down,
}

// ───────────────────────────────────────────────────────────────
// Pin port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Hardware-access capability consumed by the acquisition engine.
///
/// Exactly one live implementation exists per process; it is owned by the
/// [`SensorHub`](crate::sensors::SensorHub) rather than held in a global.
pub trait PinPort {
    type Releaser: PinRelease;

    /// Claim `pin` with the given direction and pull.  Idempotent.
    fn configure(
        &mut self,
        pin: GpioNum,
        direction: Direction,
        pull: Pull,
    ) -> Result<(), PinError>;

    /// Instantaneous level of a claimed pin.
    fn read(&mut self, pin: GpioNum) -> Result<Level, PinError>;

    /// Drive a claimed output pin.
    fn write(&mut self, pin: GpioNum, level: Level) -> Result<(), PinError>;

    /// Monotonic microseconds.  Unaffected by wall-clock adjustments.
    fn now_us(&self) -> u64;

    /// Block the calling thread for `us` microseconds.
    fn delay_us(&mut self, us: u32);

    /// Handle that releases this port's pins without borrowing the port.
    fn releaser(&self) -> Self::Releaser;

    /// Release every claimed pin.  Safe to call more than once; only the
    /// first call has an effect.
    fn release(&mut self) {
        self.releaser().release_pins();
    }
}

/// Releases the pins of a [`PinPort`] from outside its owner.
///
/// Shutdown paths run while an acquisition cycle may hold the port (a
/// panic raised mid-cycle), so releasing must not need `&mut` access to
/// it.  After `release_pins` every operation on the port fails with
/// [`PinError::Unavailable`].
pub trait PinRelease: Send + Sync + 'static {
    /// Idempotent.
    fn release_pins(&self);
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driving side: domain → endpoint / telemetry)
// ───────────────────────────────────────────────────────────────

/// Read-side port: outer adapters call this to obtain one fresh snapshot.
///
/// Implementations serialize acquisition cycles internally, so `&self` is
/// enough and the port can be shared between request handlers.
pub trait SensorPort {
    /// Run one acquisition cycle.  Never fails; faults degrade to defaults.
    fn read_snapshot(&self) -> SensorSnapshot;
}
