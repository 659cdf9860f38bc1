//! Application service: the shared, serialized entry point to the hub.
//!
//! The HTTP server may dispatch requests from more than one task, but a
//! physical sensor has no parallel-read semantics: two interleaved trigger
//! pulses corrupt each other's echo timing.  [`AcquisitionService`] owns the
//! [`SensorHub`] behind a mutex so at most one acquisition cycle is in
//! flight at any time.
//!
//! ```text
//!  HTTP handler ──┐
//!                 ├──▶ AcquisitionService (Mutex) ──▶ SensorHub ──▶ PinPort
//!  telemetry    ──┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::info;

use crate::sensors::SensorHub;
use crate::sensors::snapshot::SensorSnapshot;

use super::ports::{PinPort, PinRelease, SensorPort};

pub struct AcquisitionService<P: PinPort> {
    hub: Mutex<SensorHub<P>>,
    releaser: P::Releaser,
}

impl<P: PinPort> AcquisitionService<P> {
    pub fn new(hub: SensorHub<P>) -> Self {
        Self {
            releaser: hub.releaser(),
            hub: Mutex::new(hub),
        }
    }

    /// Release the pins without taking the hub lock.
    ///
    /// Safe to call while an acquisition cycle holds the hub, including
    /// from a panic raised inside that cycle; the cycle's remaining pin
    /// operations fail and degrade to safe defaults.
    pub fn release(&self) {
        self.releaser.release_pins();
        info!("release: pins released");
    }

    /// Run `f` with exclusive access to the hub.
    pub fn with_hub<T>(&self, f: impl FnOnce(&mut SensorHub<P>) -> T) -> T {
        f(&mut self.lock())
    }

    // A panic mid-cycle leaves no half-written state in the hub, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, SensorHub<P>> {
        self.hub.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: PinPort> SensorPort for AcquisitionService<P> {
    fn read_snapshot(&self) -> SensorSnapshot {
        self.lock().read_snapshot()
    }
}
