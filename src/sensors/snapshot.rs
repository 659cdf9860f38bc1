//! The aggregate result of one acquisition cycle.

use serde::{Deserialize, Serialize};

use super::gas::AirQuality;
use super::ultrasonic::Distance;

/// A point-in-time reading of every sensor on the board.
///
/// Always fully populated: each field carries either a real reading or the
/// sensor's safe default.  Fields are private so the value ranges below
/// hold for every instance built through [`SensorSnapshot::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    /// 20 (normal air) or 100 (bad air).
    odor_level: u8,
    /// Distance to the soap surface in cm, or -1 when the ranging timed out.
    soap_level: f64,
    motion_detected: bool,
}

impl SensorSnapshot {
    pub fn new(air: AirQuality, soap: Distance, motion_detected: bool) -> Self {
        Self {
            odor_level: air.odor_level(),
            soap_level: soap.as_level(),
            motion_detected,
        }
    }

    pub fn odor_level(&self) -> u8 {
        self.odor_level
    }

    pub fn soap_level(&self) -> f64 {
        self.soap_level
    }

    pub fn motion_detected(&self) -> bool {
        self.motion_detected
    }
}
