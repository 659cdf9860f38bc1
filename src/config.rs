//! System configuration parameters
//!
//! Two layers:
//! - [`Provisioning`]: values baked in at compile time from `cfg.toml`
//!   (WiFi credentials, port).  Absent file = defaults.
//! - [`SystemConfig`]: the runtime parameter set handed to the sensor hub
//!   and the HTTP adapter.
//!
//! Pin numbers, the trigger pulse width and the echo deadline are protocol
//! constants and live in [`crate::pins`] / [`crate::sensors::ultrasonic`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum time the trigger line is held LOW after power-up before the
/// first ranging cycle.
pub const MIN_SETTLE_DELAY_MS: u32 = 2_000;

/// Build-time provisioning read from the `[washroom]` table of `cfg.toml`.
#[toml_cfg::toml_config]
pub struct Provisioning {
    #[default("")]
    wifi_ssid: &'static str,

    #[default("")]
    wifi_password: &'static str,

    #[default(5000)]
    http_port: u16,

    #[default(0)]
    telemetry_interval_secs: u32,
}

impl Provisioning {
    pub fn wifi_ssid(&self) -> &'static str {
        self.wifi_ssid
    }

    pub fn wifi_password(&self) -> &'static str {
        self.wifi_password
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// TCP port the query endpoint listens on (all interfaces).
    pub http_port: u16,
    /// Trigger settle time before the first measurement (milliseconds).
    pub settle_delay_ms: u32,
    /// Console telemetry period (seconds). 0 disables it.
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            http_port: 5000,
            settle_delay_ms: MIN_SETTLE_DELAY_MS,
            telemetry_interval_secs: 0,
        }
    }
}

impl SystemConfig {
    /// Overlay the compile-time provisioning onto the defaults.
    pub fn from_provisioning(p: &Provisioning) -> Self {
        Self {
            http_port: p.http_port,
            telemetry_interval_secs: p.telemetry_interval_secs,
            ..Self::default()
        }
    }

    /// Reject values that would break the ranging protocol or the server.
    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(Error::Config("http_port must be non-zero"));
        }
        if self.settle_delay_ms < MIN_SETTLE_DELAY_MS {
            return Err(Error::Config("settle_delay_ms must be at least 2000"));
        }
        Ok(())
    }
}
