//! WiFi station-mode bring-up.
//!
//! The query endpoint is only reachable once the node has joined the
//! washroom network.  Credentials come from build-time provisioning and
//! are validated here before the radio is touched.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`connect`] drives `esp_idf_svc::wifi`
//!   through a `BlockingWifi` wrapper and waits for an IP.
//! - **all other targets**: validation only; the host has its own network.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() {
        return Err(ConnectivityError::NoCredentials);
    }
    if ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

/// Validate a credential pair as a unit.
pub fn validate_credentials(ssid: &str, password: &str) -> Result<(), ConnectivityError> {
    validate_ssid(ssid)?;
    validate_password(password)
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF station bring-up
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn connect(
    modem: esp_idf_svc::hal::modem::Modem,
    sysloop: &esp_idf_svc::eventloop::EspSystemEventLoop,
    nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
    ssid: &str,
    password: &str,
) -> anyhow::Result<esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>> {
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::info;

    validate_credentials(ssid, password)?;

    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(modem, sysloop.clone(), Some(nvs))?,
        sysloop.clone(),
    )?;

    let auth_method = if password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: ssid
            .try_into()
            .map_err(|_| ConnectivityError::InvalidSsid)?,
        password: password
            .try_into()
            .map_err(|_| ConnectivityError::InvalidPassword)?,
        auth_method,
        ..Default::default()
    }))?;

    wifi.start()?;
    info!("WiFi: connecting to '{}'", ssid);
    wifi.connect()?;
    wifi.wait_netif_up()?;

    let ip = wifi.wifi().sta_netif().get_ip_info()?;
    info!("WiFi: connected, IP {}", ip.ip);
    Ok(wifi)
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
