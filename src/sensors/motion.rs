//! HC-SR501 passive-infrared occupancy sensor.
//!
//! Output is HIGH while motion is sensed (plus the module's hold time).
//! The input uses the internal pull-down, so an unplugged sensor reads
//! "no motion" rather than floating.

use log::warn;

use crate::app::ports::PinPort;
use crate::pins::GpioNum;

pub struct MotionSensor {
    gpio: GpioNum,
}

impl MotionSensor {
    pub fn new(gpio: GpioNum) -> Self {
        Self { gpio }
    }

    /// `true` while motion is present.  Faults read as no motion.
    pub fn read(&self, pins: &mut impl PinPort) -> bool {
        match pins.read(self.gpio) {
            Ok(level) => level.is_high(),
            Err(e) => {
                warn!("PIR sensor error: {}", e);
                false
            }
        }
    }
}
