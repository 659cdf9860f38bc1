//! GPIO adapter: the live [`PinPort`] implementation.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: raw `gpio_config` / `gpio_get_level` / `gpio_set_level`
//! calls, `gpio_reset_pin` on release, and `Ets` / `FreeRtos` for delays.
//! On host/test: input levels come from a static bitmask that tests drive
//! with [`sim_set_input`]; output levels are recorded the same way and can
//! be observed with [`sim_output_level`].
//!
//! The adapter tracks its own claims so the port contract (unclaimed pin,
//! write to an input, use after release) is enforced identically on both
//! targets.
//!
//! The claimed-pin mask and the released flag live in a shared, lock-free
//! claim set.  A [`GpioReleaser`] holds the same set, so the pins can
//! be reset from a panic hook while the adapter itself is borrowed by an
//! in-flight acquisition cycle.  Dropping the adapter releases as well.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use heapless::Vec;
use log::{info, warn};

use crate::app::ports::{Direction, Level, PinPort, PinRelease, Pull};
use crate::error::PinError;
use crate::pins::GpioNum;

use super::time::MonotonicClock;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Upper bound on simultaneously claimed pins.
const MAX_CLAIMS: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Claim {
    pin: GpioNum,
    direction: Direction,
}

#[derive(Debug, Default)]
struct ClaimSet {
    released: AtomicBool,
    /// Bit `n` set while GPIO `n` is claimed.
    mask: AtomicU64,
}

impl ClaimSet {
    fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

/// Lock-free release handle for a [`GpioAdapter`].
#[derive(Debug, Clone)]
pub struct GpioReleaser {
    claims: Arc<ClaimSet>,
}

impl PinRelease for GpioReleaser {
    fn release_pins(&self) {
        if self.claims.released.swap(true, Ordering::AcqRel) {
            return;
        }
        let mask = self.claims.mask.swap(0, Ordering::AcqRel);
        for pin in (0..64).filter(|p| mask & (1u64 << p) != 0) {
            if let Err(e) = platform::reset(pin) {
                warn!("gpio: reset of GPIO {} failed: {}", pin, e);
            }
        }
        info!("gpio: {} pin claim(s) released", mask.count_ones());
    }
}

pub struct GpioAdapter {
    claims: Vec<Claim, MAX_CLAIMS>,
    shared: Arc<ClaimSet>,
    clock: MonotonicClock,
}

impl Default for GpioAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAdapter {
    pub fn new() -> Self {
        Self {
            claims: Vec::new(),
            shared: Arc::new(ClaimSet::default()),
            clock: MonotonicClock::new(),
        }
    }

    fn claim(&self, pin: GpioNum) -> Result<Claim, PinError> {
        if self.shared.is_released() {
            return Err(PinError::Unavailable);
        }
        self.claims
            .iter()
            .find(|c| c.pin == pin)
            .copied()
            .ok_or(PinError::NotConfigured(pin))
    }

    fn record(&mut self, pin: GpioNum, direction: Direction) -> Result<(), PinError> {
        if let Some(existing) = self.claims.iter_mut().find(|c| c.pin == pin) {
            existing.direction = direction;
            return Ok(());
        }
        self.claims
            .push(Claim { pin, direction })
            .map_err(|_| PinError::Unavailable)?;
        self.shared.mask.fetch_or(1u64 << pin, Ordering::AcqRel);
        // A release that swapped the mask before our bit landed missed it.
        if self.shared.is_released() {
            if let Err(e) = platform::reset(pin) {
                warn!("gpio: reset of GPIO {} failed: {}", pin, e);
            }
            return Err(PinError::Unavailable);
        }
        Ok(())
    }
}

impl PinPort for GpioAdapter {
    type Releaser = GpioReleaser;

    fn configure(
        &mut self,
        pin: GpioNum,
        direction: Direction,
        pull: Pull,
    ) -> Result<(), PinError> {
        if self.shared.is_released() {
            return Err(PinError::Unavailable);
        }
        platform::configure(pin, direction, pull)?;
        self.record(pin, direction)
    }

    fn read(&mut self, pin: GpioNum) -> Result<Level, PinError> {
        let claim = self.claim(pin)?;
        Ok(platform::read(claim.pin, claim.direction))
    }

    fn write(&mut self, pin: GpioNum, level: Level) -> Result<(), PinError> {
        let claim = self.claim(pin)?;
        if claim.direction != Direction::Output {
            return Err(PinError::NotAnOutput(pin));
        }
        platform::write(pin, level)
    }

    fn now_us(&self) -> u64 {
        self.clock.uptime_us()
    }

    fn delay_us(&mut self, us: u32) {
        platform::delay_us(us);
    }

    fn releaser(&self) -> GpioReleaser {
        GpioReleaser {
            claims: Arc::clone(&self.shared),
        }
    }
}

impl Drop for GpioAdapter {
    fn drop(&mut self) {
        self.release();
    }
}

// ── ESP-IDF backend ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod platform {
    use super::*;
    use esp_idf_hal::delay::{Ets, FreeRtos};

    fn check(ret: esp_err_t) -> Result<(), PinError> {
        if ret != ESP_OK as i32 {
            return Err(PinError::Driver(ret));
        }
        Ok(())
    }

    pub(super) fn configure(
        pin: GpioNum,
        direction: Direction,
        pull: Pull,
    ) -> Result<(), PinError> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            // Outputs keep the input path enabled so their level reads back.
            mode: match direction {
                Direction::Input => gpio_mode_t_GPIO_MODE_INPUT,
                Direction::Output => gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
            },
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: match pull {
                Pull::None => gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
                Pull::Down => gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            },
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
            ..Default::default()
        };
        // SAFETY: cfg is a fully initialised config for a single valid pin.
        check(unsafe { gpio_config(&cfg) })
    }

    pub(super) fn read(pin: GpioNum, _direction: Direction) -> Level {
        // SAFETY: pin was configured with its input path enabled.
        Level::from(unsafe { gpio_get_level(pin) } != 0)
    }

    pub(super) fn write(pin: GpioNum, level: Level) -> Result<(), PinError> {
        // SAFETY: pin was configured as an output.
        check(unsafe { gpio_set_level(pin, u32::from(level.is_high())) })
    }

    pub(super) fn reset(pin: GpioNum) -> Result<(), PinError> {
        // SAFETY: returns the pin to its boot default (input, no pulls).
        check(unsafe { gpio_reset_pin(pin) })
    }

    pub(super) fn delay_us(us: u32) {
        // Busy-wait for sub-millisecond delays; yield to the scheduler
        // for anything longer.
        if us < 1_000 {
            Ets::delay_us(us);
        } else {
            FreeRtos::delay_ms(us / 1_000);
            Ets::delay_us(us % 1_000);
        }
    }
}

// ── Host simulation backend ───────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_INPUTS: core::sync::atomic::AtomicU64 = core::sync::atomic::AtomicU64::new(0);

#[cfg(not(target_os = "espidf"))]
static SIM_OUTPUTS: core::sync::atomic::AtomicU64 = core::sync::atomic::AtomicU64::new(0);

/// Drive the simulated level of an input pin.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_input(pin: GpioNum, high: bool) {
    use core::sync::atomic::Ordering;
    let bit = 1u64 << pin;
    if high {
        SIM_INPUTS.fetch_or(bit, Ordering::Relaxed);
    } else {
        SIM_INPUTS.fetch_and(!bit, Ordering::Relaxed);
    }
}

/// Last level written to a simulated output pin.
#[cfg(not(target_os = "espidf"))]
pub fn sim_output_level(pin: GpioNum) -> bool {
    SIM_OUTPUTS.load(core::sync::atomic::Ordering::Relaxed) & (1u64 << pin) != 0
}

#[cfg(not(target_os = "espidf"))]
mod platform {
    use core::sync::atomic::Ordering;

    use super::*;

    pub(super) fn configure(
        pin: GpioNum,
        _direction: Direction,
        _pull: Pull,
    ) -> Result<(), PinError> {
        if !(0..64).contains(&pin) {
            return Err(PinError::Driver(-1));
        }
        Ok(())
    }

    pub(super) fn read(pin: GpioNum, direction: Direction) -> Level {
        let bank = match direction {
            Direction::Input => &SIM_INPUTS,
            Direction::Output => &SIM_OUTPUTS,
        };
        Level::from(bank.load(Ordering::Relaxed) & (1u64 << pin) != 0)
    }

    pub(super) fn write(pin: GpioNum, level: Level) -> Result<(), PinError> {
        let bit = 1u64 << pin;
        if level.is_high() {
            SIM_OUTPUTS.fetch_or(bit, Ordering::Relaxed);
        } else {
            SIM_OUTPUTS.fetch_and(!bit, Ordering::Relaxed);
        }
        Ok(())
    }

    pub(super) fn reset(pin: GpioNum) -> Result<(), PinError> {
        SIM_OUTPUTS.fetch_and(!(1u64 << pin), Ordering::Relaxed);
        Ok(())
    }

    pub(super) fn delay_us(us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(u64::from(us)));
    }
}
