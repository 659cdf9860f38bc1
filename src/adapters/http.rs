//! HTTP query endpoint.
//!
//! `GET /sensor-data` runs one acquisition cycle and returns the snapshot as
//! JSON.  Any origin may call it.  `OPTIONS /sensor-data` answers the CORS
//! preflight.
//!
//! Request handling is split in two: [`handle_get`] and [`preflight`] build
//! a plain [`Response`] from a [`SensorPort`] and are exercised on the host;
//! [`serve`] (ESP-IDF only) binds them to `EspHttpServer`.

use log::{debug, error};

use crate::app::ports::SensorPort;
use crate::sensors::snapshot::SensorSnapshot;

pub const SENSOR_DATA_PATH: &str = "/sensor-data";

const ALLOW_ORIGIN: (&str, &str) = ("Access-Control-Allow-Origin", "*");
const ALLOW_METHODS: (&str, &str) = ("Access-Control-Allow-Methods", "GET, OPTIONS");
const ALLOW_HEADERS: (&str, &str) = ("Access-Control-Allow-Headers", "Content-Type");
const JSON_CONTENT: (&str, &str) = ("Content-Type", "application/json");

pub type Headers = &'static [(&'static str, &'static str)];

const GET_HEADERS: Headers = &[JSON_CONTENT, ALLOW_ORIGIN];
const ERROR_HEADERS: Headers = &[ALLOW_ORIGIN];
const PREFLIGHT_HEADERS: Headers = &[ALLOW_ORIGIN, ALLOW_METHODS, ALLOW_HEADERS];

/// A fully rendered response, independent of the server implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

pub fn render_snapshot(snapshot: &SensorSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

/// Serve one `GET /sensor-data`: a fresh acquisition cycle, never cached.
pub fn handle_get(port: &impl SensorPort) -> Response {
    let snapshot = port.read_snapshot();
    debug!("http: GET {} -> {:?}", SENSOR_DATA_PATH, snapshot);
    match render_snapshot(&snapshot) {
        Ok(body) => Response { status: 200, headers: GET_HEADERS, body },
        Err(e) => {
            error!("http: snapshot serialization failed: {}", e);
            Response {
                status: 500,
                headers: ERROR_HEADERS,
                body: String::new(),
            }
        }
    }
}

/// Answer a CORS preflight for the sensor path.
pub fn preflight() -> Response {
    Response {
        status: 204,
        headers: PREFLIGHT_HEADERS,
        body: String::new(),
    }
}

/// Start the HTTP server on `port` (all interfaces).  The server stops when
/// the returned handle is dropped.
#[cfg(target_os = "espidf")]
pub fn serve<S>(port: std::sync::Arc<S>, http_port: u16) -> anyhow::Result<esp_idf_svc::http::server::EspHttpServer<'static>>
where
    S: SensorPort + Send + Sync + 'static,
{
    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::io::Write;
    use log::info;

    let mut server = EspHttpServer::new(&Configuration {
        http_port,
        ..Default::default()
    })?;

    server.fn_handler(SENSOR_DATA_PATH, Method::Get, move |req| {
        let response = handle_get(port.as_ref());
        let mut resp = req.into_response(response.status, None, response.headers)?;
        resp.write_all(response.body.as_bytes())?;
        Ok::<(), anyhow::Error>(())
    })?;

    server.fn_handler(SENSOR_DATA_PATH, Method::Options, |req| {
        let response = preflight();
        req.into_response(response.status, None, response.headers)?;
        Ok::<(), anyhow::Error>(())
    })?;

    info!("http: listening on 0.0.0.0:{}{}", http_port, SENSOR_DATA_PATH);
    Ok(server)
}
