//! Washroom sensor node, main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │   WiFi (STA)        EspHttpServer: GET /sensor-data          │
//! │                            │                                 │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                            ▼                                 │
//! │   ┌──────────────────────────────────────────────────────┐   │
//! │   │ AcquisitionService (Mutex) ─▶ SensorHub              │   │
//! │   │   gas · motion · ultrasonic                          │   │
//! │   └──────────────────────────────────────────────────────┘   │
//! │                            │                                 │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                            ▼                                 │
//! │   GpioAdapter (PinPort)   ShutdownHook (release once)        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::info;

use washroom::adapters::gpio::GpioAdapter;
use washroom::adapters::time::MonotonicClock;
use washroom::adapters::{http, wifi};
use washroom::app::ports::SensorPort;
use washroom::app::service::AcquisitionService;
use washroom::config::{PROVISIONING, SystemConfig};
use washroom::sensors::SensorHub;
use washroom::shutdown::{self, ShutdownHook};

/// Main-loop tick.  The loop only drives console telemetry; requests are
/// served from the HTTP server's own task.
const TICK: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Washroom node v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::from_provisioning(&PROVISIONING);
    config.validate()?;
    info!(
        "Config: port={} settle={}ms telemetry={}s",
        config.http_port, config.settle_delay_ms, config.telemetry_interval_secs
    );

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 3. Acquisition engine ─────────────────────────────────
    let hub = SensorHub::init(GpioAdapter::new(), &config)?;
    let service = Arc::new(AcquisitionService::new(hub));

    // ── 4. Release-once shutdown hook ─────────────────────────
    let hook = {
        let service = Arc::clone(&service);
        ShutdownHook::new(move || {
            service.release();
            true
        })
    };
    shutdown::install(&hook)?;
    let _release_on_exit = hook.guard();

    // ── 5. Network + endpoint ─────────────────────────────────
    let _wifi = wifi::connect(
        peripherals.modem,
        &sysloop,
        nvs,
        PROVISIONING.wifi_ssid(),
        PROVISIONING.wifi_password(),
    )?;
    let _server = http::serve(Arc::clone(&service), config.http_port)?;

    // ── 6. Console telemetry loop ─────────────────────────────
    let clock = MonotonicClock::new();
    let interval = u64::from(config.telemetry_interval_secs);
    let mut last_report = 0u64;
    loop {
        std::thread::sleep(TICK);
        if interval == 0 {
            continue;
        }
        let now = clock.uptime_secs();
        if now.saturating_sub(last_report) >= interval {
            last_report = now;
            let s = service.read_snapshot();
            info!(
                "Telemetry: odor={} soap={:.2}cm motion={}",
                s.odor_level(),
                s.soap_level(),
                s.motion_detected()
            );
        }
    }
}
