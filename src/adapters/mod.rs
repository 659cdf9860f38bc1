//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter | Implements / consumes | Connects to              |
//! |---------|-----------------------|--------------------------|
//! | `gpio`  | PinPort               | ESP32 GPIO, `Ets` delays |
//! | `http`  | consumes SensorPort   | `EspHttpServer`          |
//! | `time`  | monotonic clock       | ESP32 high-res timer     |
//! | `wifi`  | network bring-up      | ESP-IDF WiFi STA         |

pub mod gpio;
pub mod http;
pub mod time;
pub mod wifi;
