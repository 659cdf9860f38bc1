//! GPIO pin assignments for the washroom sensor board.
//!
//! Single source of truth: every sensor references this module rather than
//! hard-coding pin numbers.  The map is fixed at build time; nothing in the
//! firmware reassigns a role at runtime.

use crate::app::ports::{Direction, Pull};

/// Raw ESP-IDF GPIO number.
pub type GpioNum = i32;

// ---------------------------------------------------------------------------
// Sensors: Digital
// ---------------------------------------------------------------------------

/// MQ-135 digital output. Active-low: LOW = bad air.
pub const GAS_SENSOR_GPIO: GpioNum = 4;

/// HC-SR501 PIR output. HIGH = motion. Internal pull-down keeps a
/// disconnected sensor reading "no motion".
pub const MOTION_SENSOR_GPIO: GpioNum = 5;

// ---------------------------------------------------------------------------
// Sensors: Ultrasonic (HC-SR04 soap level gauge)
// ---------------------------------------------------------------------------

/// Trigger output. A 10 µs HIGH pulse starts one ranging cycle.
pub const ULTRASONIC_TRIGGER_GPIO: GpioNum = 6;

/// Echo input. HIGH for the round-trip time of the acoustic burst.
pub const ULTRASONIC_ECHO_GPIO: GpioNum = 7;

/// The fixed identity of every pin the acquisition engine claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRole {
    GasSensorInput,
    MotionSensorInput,
    UltrasonicTrigger,
    UltrasonicEcho,
}

impl PinRole {
    /// Every role, in the order pins are claimed at startup.
    pub const ALL: [PinRole; 4] = [
        PinRole::GasSensorInput,
        PinRole::MotionSensorInput,
        PinRole::UltrasonicTrigger,
        PinRole::UltrasonicEcho,
    ];

    pub const fn gpio(self) -> GpioNum {
        match self {
            Self::GasSensorInput => GAS_SENSOR_GPIO,
            Self::MotionSensorInput => MOTION_SENSOR_GPIO,
            Self::UltrasonicTrigger => ULTRASONIC_TRIGGER_GPIO,
            Self::UltrasonicEcho => ULTRASONIC_ECHO_GPIO,
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            Self::UltrasonicTrigger => Direction::Output,
            _ => Direction::Input,
        }
    }

    pub const fn pull(self) -> Pull {
        match self {
            Self::MotionSensorInput => Pull::Down,
            _ => Pull::None,
        }
    }
}
