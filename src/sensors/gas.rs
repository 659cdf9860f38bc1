//! MQ-135 air quality sensor, digital output only.
//!
//! The module's comparator output is active-low: the line drops LOW once
//! the gas concentration crosses the on-board potentiometer threshold.
//! There is no analog reading, so the domain value is a two-point scale.
//!
//! A pin fault reads as normal air.

use log::warn;

use crate::app::ports::{Level, PinPort};
use crate::pins::GpioNum;

/// Odor level reported for normal air.
pub const ODOR_LEVEL_NORMAL: u8 = 20;
/// Odor level reported when the sensor flags bad air.
pub const ODOR_LEVEL_BAD: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirQuality {
    Normal,
    Bad,
}

impl AirQuality {
    pub const fn odor_level(self) -> u8 {
        match self {
            Self::Normal => ODOR_LEVEL_NORMAL,
            Self::Bad => ODOR_LEVEL_BAD,
        }
    }
}

pub struct GasSensor {
    gpio: GpioNum,
}

impl GasSensor {
    pub fn new(gpio: GpioNum) -> Self {
        Self { gpio }
    }

    pub fn read(&self, pins: &mut impl PinPort) -> AirQuality {
        match pins.read(self.gpio) {
            Ok(Level::High) => AirQuality::Normal,
            Ok(Level::Low) => AirQuality::Bad,
            Err(e) => {
                warn!("gas sensor error: {}, assuming normal air", e);
                AirQuality::Normal
            }
        }
    }
}
