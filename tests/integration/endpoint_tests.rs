//! Query endpoint over the full acquisition stack.

use std::sync::Arc;

use washroom::adapters::http::{SENSOR_DATA_PATH, handle_get, preflight};
use washroom::app::ports::{Level, SensorPort};
use washroom::app::service::AcquisitionService;
use washroom::config::SystemConfig;
use washroom::pins::PinRole;
use washroom::sensors::SensorHub;
use washroom::sensors::snapshot::SensorSnapshot;

use crate::mock_pins::{Echo, MockPins};

fn service() -> (AcquisitionService<MockPins>, MockPins) {
    let pins = MockPins::new();
    let hub = SensorHub::init(pins.clone(), &SystemConfig::default()).unwrap();
    (AcquisitionService::new(hub), pins)
}

#[test]
fn path_is_sensor_data() {
    assert_eq!(SENSOR_DATA_PATH, "/sensor-data");
}

#[test]
fn get_reports_live_readings() {
    let (svc, pins) = service();
    pins.set_gas(Level::Low);
    pins.set_motion(Level::High);

    let r = handle_get(&svc);
    assert_eq!(r.status, 200);
    assert_eq!(r.header("Access-Control-Allow-Origin"), Some("*"));

    let v: serde_json::Value = serde_json::from_str(&r.body).unwrap();
    assert_eq!(v["odorLevel"], 100);
    assert_eq!(v["motionDetected"], true);
    let soap = v["soapLevel"].as_f64().unwrap();
    assert!((soap - 50.0).abs() < 0.5);
}

#[test]
fn each_request_triggers_a_new_cycle() {
    let (svc, pins) = service();
    handle_get(&svc);
    pins.set_echo(Echo::NeverHigh);
    let r = handle_get(&svc);
    assert_eq!(pins.trigger_pulses(), 2);
    let back: SensorSnapshot = serde_json::from_str(&r.body).unwrap();
    assert_eq!(back.soap_level(), -1.0);
}

#[test]
fn sensor_faults_never_become_http_errors() {
    let (svc, pins) = service();
    for role in PinRole::ALL {
        pins.set_fault(role.gpio(), true);
    }
    let r = handle_get(&svc);
    assert_eq!(r.status, 200);
    let back: SensorSnapshot = serde_json::from_str(&r.body).unwrap();
    assert_eq!(back.odor_level(), 20);
    assert_eq!(back.soap_level(), -1.0);
    assert!(!back.motion_detected());
}

#[test]
fn preflight_carries_cors_policy() {
    let r = preflight();
    assert_eq!(r.status, 204);
    assert_eq!(r.header("access-control-allow-origin"), Some("*"));
}

#[test]
fn concurrent_requests_are_serialized() {
    let (svc, pins) = service();
    let svc = Arc::new(svc);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let svc = Arc::clone(&svc);
            std::thread::spawn(move || {
                (0..5).map(|_| svc.read_snapshot()).collect::<Vec<_>>()
            })
        })
        .collect();
    for h in handles {
        for s in h.join().unwrap() {
            assert!((s.soap_level() - 50.0).abs() < 0.5, "corrupted echo: {s:?}");
        }
    }
    assert_eq!(pins.trigger_pulses(), 20);
}
