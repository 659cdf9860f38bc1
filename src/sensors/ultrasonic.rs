//! HC-SR04 ultrasonic ranging, used as the soap dispenser level gauge.
//!
//! One ranging cycle:
//!
//! ```text
//! TRIG  ___|‾‾10µs‾‾|__________________________________
//! ECHO  _____________________|‾‾‾‾‾ round trip ‾‾‾‾|____
//!                  ^ deadline = now + 100 ms (shared by both waits)
//! ```
//!
//! The echo is timed by polling in software.  A single deadline bounds
//! the wait for the rising edge *and* the wait for the falling edge; it is
//! not reset between the two, so an echo stuck HIGH from a previous cycle
//! and a sensor that never answers both end in [`Distance::TimedOut`].
//!
//! The start timestamp is taken after the last LOW sample rather than the
//! first HIGH one, which overestimates the pulse by at most one poll period.

use log::{debug, warn};

use crate::app::ports::{Level, PinPort};
use crate::error::PinError;
use crate::pins::GpioNum;

/// Trigger pulse width required by the HC-SR04 family.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Upper bound on one complete measurement after the trigger pulse.
pub const ECHO_TIMEOUT_US: u64 = 100_000;

/// Speed of sound in air at ~20 °C.
pub const SPEED_OF_SOUND_CM_PER_S: f64 = 34_300.0;

/// Sentinel reported for [`Distance::TimedOut`] in serialized snapshots.
pub const TIMED_OUT_SENTINEL: f64 = -1.0;

/// Result of one ranging cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    /// Distance to the reflecting surface, ≥ 0, rounded to 2 decimals.
    Centimeters(f64),
    /// No complete echo within [`ECHO_TIMEOUT_US`]: sensor absent,
    /// miswired, or target out of range.
    TimedOut,
}

impl Distance {
    /// Collapse to the wire value: centimetres, or -1 when timed out.
    pub fn as_level(self) -> f64 {
        match self {
            Self::Centimeters(cm) => cm,
            Self::TimedOut => TIMED_OUT_SENTINEL,
        }
    }
}

/// Convert an echo pulse width to centimetres (round trip halved).
pub fn echo_to_cm(elapsed_us: u64) -> f64 {
    let elapsed_s = elapsed_us as f64 / 1_000_000.0;
    round_2dp(elapsed_s * SPEED_OF_SOUND_CM_PER_S / 2.0)
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct UltrasonicSensor {
    trigger: GpioNum,
    echo: GpioNum,
}

impl UltrasonicSensor {
    pub fn new(trigger: GpioNum, echo: GpioNum) -> Self {
        Self { trigger, echo }
    }

    /// Run one ranging cycle.  Pin faults are logged and reported as
    /// [`Distance::TimedOut`]; nothing propagates to the caller.
    pub fn measure(&self, pins: &mut impl PinPort) -> Distance {
        match self.try_measure(pins) {
            Ok(Distance::TimedOut) => {
                debug!("ultrasonic: no echo within {} ms", ECHO_TIMEOUT_US / 1000);
                Distance::TimedOut
            }
            Ok(d) => d,
            Err(e) => {
                warn!("ultrasonic sensor error: {}", e);
                Distance::TimedOut
            }
        }
    }

    fn try_measure(&self, pins: &mut impl PinPort) -> Result<Distance, PinError> {
        pins.write(self.trigger, Level::High)?;
        pins.delay_us(TRIGGER_PULSE_US);
        pins.write(self.trigger, Level::Low)?;

        let deadline = pins.now_us() + ECHO_TIMEOUT_US;

        // Rising edge.
        let mut start = pins.now_us();
        while pins.read(self.echo)? == Level::Low {
            start = pins.now_us();
            if start > deadline {
                return Ok(Distance::TimedOut);
            }
        }

        // Falling edge, same deadline.
        let mut end = start;
        while pins.read(self.echo)? == Level::High {
            end = pins.now_us();
            if end > deadline {
                return Ok(Distance::TimedOut);
            }
        }

        Ok(Distance::Centimeters(echo_to_cm(end.saturating_sub(start))))
    }
}
