//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns the pin interface and every sensor driver and produces a
//! [`SensorSnapshot`] per acquisition cycle.

pub mod gas;
pub mod motion;
pub mod snapshot;
pub mod ultrasonic;

use log::info;

use crate::app::ports::{Level, PinPort};
use crate::config::SystemConfig;
use crate::error::PinError;
use crate::pins::PinRole;
use gas::{AirQuality, GasSensor};
use motion::MotionSensor;
use snapshot::SensorSnapshot;
use ultrasonic::{Distance, UltrasonicSensor};

/// The acquisition engine: owns the pins and every sensor driver.
///
/// Only obtainable through [`SensorHub::init`], so no reading can be taken
/// before the pins are claimed and the trigger line has settled.
pub struct SensorHub<P: PinPort> {
    pins: P,
    gas: GasSensor,
    motion: MotionSensor,
    ultrasonic: UltrasonicSensor,
}

impl<P: PinPort> SensorHub<P> {
    /// Claim every pin role, force the trigger LOW and hold it for the
    /// configured settle delay.
    ///
    /// On failure the pins claimed so far are released before returning.
    pub fn init(mut pins: P, config: &SystemConfig) -> Result<Self, PinError> {
        if let Err(e) = Self::claim(&mut pins) {
            pins.release();
            return Err(e);
        }

        info!(
            "sensors: pins claimed, trigger settling for {} ms",
            config.settle_delay_ms
        );
        pins.delay_us(config.settle_delay_ms.saturating_mul(1000));

        Ok(Self {
            pins,
            gas: GasSensor::new(PinRole::GasSensorInput.gpio()),
            motion: MotionSensor::new(PinRole::MotionSensorInput.gpio()),
            ultrasonic: UltrasonicSensor::new(
                PinRole::UltrasonicTrigger.gpio(),
                PinRole::UltrasonicEcho.gpio(),
            ),
        })
    }

    fn claim(pins: &mut P) -> Result<(), PinError> {
        for role in PinRole::ALL {
            pins.configure(role.gpio(), role.direction(), role.pull())?;
        }
        pins.write(PinRole::UltrasonicTrigger.gpio(), Level::Low)
    }

    pub fn detect_gas(&mut self) -> AirQuality {
        self.gas.read(&mut self.pins)
    }

    pub fn detect_motion(&mut self) -> bool {
        self.motion.read(&mut self.pins)
    }

    pub fn measure_distance(&mut self) -> Distance {
        self.ultrasonic.measure(&mut self.pins)
    }

    /// Read every sensor and return a unified snapshot.
    ///
    /// Individual read failures are logged and replaced by that sensor's
    /// safe default; a single flaky sensor never blanks the whole snapshot.
    pub fn read_snapshot(&mut self) -> SensorSnapshot {
        let air = self.detect_gas();
        let soap = self.measure_distance();
        let motion = self.detect_motion();
        SensorSnapshot::new(air, soap, motion)
    }

    /// Handle that releases the pins without access to the hub.
    pub fn releaser(&self) -> P::Releaser {
        self.pins.releaser()
    }
}
