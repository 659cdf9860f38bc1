//! Acquisition engine tests: init sequence, per-sensor semantics, echo
//! timing and fault degradation.

use washroom::app::ports::{Direction, Level, PinPort, PinRelease, Pull};
use washroom::config::SystemConfig;
use washroom::error::PinError;
use washroom::pins::PinRole;
use washroom::sensors::SensorHub;
use washroom::sensors::gas::AirQuality;
use washroom::sensors::ultrasonic::{Distance, ECHO_TIMEOUT_US};

use crate::mock_pins::{Echo, FAULT_RC, MockPins};

const ECHO: i32 = PinRole::UltrasonicEcho.gpio();
const TRIGGER: i32 = PinRole::UltrasonicTrigger.gpio();
const GAS: i32 = PinRole::GasSensorInput.gpio();
const MOTION: i32 = PinRole::MotionSensorInput.gpio();

fn hub() -> (SensorHub<MockPins>, MockPins) {
    let pins = MockPins::new();
    let hub = SensorHub::init(pins.clone(), &SystemConfig::default()).unwrap();
    (hub, pins)
}

fn assert_cm(d: Distance, expected: f64) {
    match d {
        Distance::Centimeters(cm) => assert!(
            (cm - expected).abs() < 0.5,
            "expected ~{expected} cm, got {cm}"
        ),
        Distance::TimedOut => panic!("expected ~{expected} cm, got timeout"),
    }
}

// ── Init ──────────────────────────────────────────────────────

#[test]
fn init_claims_every_role() {
    let (_hub, pins) = hub();
    assert_eq!(pins.configured(GAS), Some((Direction::Input, Pull::None)));
    assert_eq!(pins.configured(MOTION), Some((Direction::Input, Pull::Down)));
    assert_eq!(pins.configured(TRIGGER), Some((Direction::Output, Pull::None)));
    assert_eq!(pins.configured(ECHO), Some((Direction::Input, Pull::None)));
}

#[test]
fn init_drives_trigger_low_and_settles() {
    let (_hub, pins) = hub();
    assert_eq!(pins.output(TRIGGER), Some(Level::Low));
    assert!(pins.now() >= 2_000_000);
    assert_eq!(pins.trigger_pulses(), 0);
}

#[test]
fn init_failure_releases_claimed_pins() {
    let pins = MockPins::new();
    pins.set_fault(ECHO, true);
    let result = SensorHub::init(pins.clone(), &SystemConfig::default());
    assert_eq!(result.err(), Some(PinError::Driver(FAULT_RC)));
    assert_eq!(pins.release_calls(), 1);
}

// ── Ultrasonic ────────────────────────────────────────────────

#[test]
fn fifty_centimetre_echo() {
    let (mut hub, pins) = hub();
    pins.set_echo(Echo::Pulse {
        rise_us: 1_000,
        width_us: 2_915,
    });
    assert_cm(hub.measure_distance(), 50.0);
    assert_eq!(pins.trigger_pulses(), 1);
    assert_eq!(pins.output(TRIGGER), Some(Level::Low));
}

#[test]
fn distance_tracks_echo_width() {
    let (mut hub, pins) = hub();
    for cm in [5.0, 20.0, 120.0, 300.0] {
        pins.set_echo(Echo::at_cm(cm));
        assert_cm(hub.measure_distance(), cm);
    }
}

#[test]
fn echo_never_high_times_out_after_deadline() {
    let (mut hub, pins) = hub();
    pins.set_echo(Echo::NeverHigh);
    let t0 = pins.now();
    assert_eq!(hub.measure_distance(), Distance::TimedOut);
    let elapsed = pins.now() - t0;
    assert!(elapsed >= ECHO_TIMEOUT_US, "gave up early: {elapsed} µs");
    assert!(elapsed < ECHO_TIMEOUT_US + 100, "overran: {elapsed} µs");
}

#[test]
fn echo_stuck_high_times_out_after_deadline() {
    let (mut hub, pins) = hub();
    pins.set_echo(Echo::StuckHigh);
    let t0 = pins.now();
    assert_eq!(hub.measure_distance(), Distance::TimedOut);
    let elapsed = pins.now() - t0;
    assert!(elapsed >= ECHO_TIMEOUT_US);
    assert!(elapsed < ECHO_TIMEOUT_US + 100);
}

#[test]
fn deadline_is_shared_by_both_edges() {
    let (mut hub, pins) = hub();
    // Rises in time, but falls after the single 100 ms deadline.
    pins.set_echo(Echo::Pulse {
        rise_us: 60_000,
        width_us: 60_000,
    });
    assert_eq!(hub.measure_distance(), Distance::TimedOut);

    // Same rise, falling inside the deadline.
    pins.set_echo(Echo::Pulse {
        rise_us: 60_000,
        width_us: 30_000,
    });
    assert_cm(hub.measure_distance(), 514.5);
}

#[test]
fn echo_fault_reads_as_timeout() {
    let (mut hub, pins) = hub();
    pins.set_fault(ECHO, true);
    assert_eq!(hub.measure_distance(), Distance::TimedOut);
}

#[test]
fn trigger_fault_reads_as_timeout() {
    let (mut hub, pins) = hub();
    pins.set_fault(TRIGGER, true);
    assert_eq!(hub.measure_distance(), Distance::TimedOut);
    assert_eq!(pins.trigger_pulses(), 0);
}

// ── Gas / motion ──────────────────────────────────────────────

#[test]
fn gas_is_active_low() {
    let (mut hub, pins) = hub();
    pins.set_gas(Level::High);
    assert_eq!(hub.detect_gas(), AirQuality::Normal);
    pins.set_gas(Level::Low);
    assert_eq!(hub.detect_gas(), AirQuality::Bad);
}

#[test]
fn gas_fault_reads_as_normal() {
    let (mut hub, pins) = hub();
    pins.set_gas(Level::Low);
    pins.set_fault(GAS, true);
    assert_eq!(hub.detect_gas(), AirQuality::Normal);
}

#[test]
fn motion_follows_pin() {
    let (mut hub, pins) = hub();
    assert!(!hub.detect_motion());
    pins.set_motion(Level::High);
    assert!(hub.detect_motion());
    pins.set_fault(MOTION, true);
    assert!(!hub.detect_motion());
}

// ── Snapshot ──────────────────────────────────────────────────

#[test]
fn snapshot_combines_all_sensors() {
    let (mut hub, pins) = hub();
    pins.set_gas(Level::Low);
    pins.set_motion(Level::High);
    let s = hub.read_snapshot();
    assert_eq!(s.odor_level(), 100);
    assert!((s.soap_level() - 50.0).abs() < 0.5);
    assert!(s.motion_detected());
}

#[test]
fn snapshot_survives_every_fault_at_once() {
    let (mut hub, pins) = hub();
    pins.set_gas(Level::Low);
    pins.set_motion(Level::High);
    for role in PinRole::ALL {
        pins.set_fault(role.gpio(), true);
    }
    for _ in 0..3 {
        let s = hub.read_snapshot();
        assert_eq!(s.odor_level(), 20);
        assert_eq!(s.soap_level(), -1.0);
        assert!(!s.motion_detected());
    }
}

#[test]
fn released_hub_degrades_to_defaults() {
    let (mut hub, pins) = hub();
    pins.set_motion(Level::High);
    hub.releaser().release_pins();
    assert!(pins.is_released());
    let s = hub.read_snapshot();
    assert_eq!(s.odor_level(), 20);
    assert_eq!(s.soap_level(), -1.0);
    assert!(!s.motion_detected());
}

#[test]
fn mock_rejects_unclaimed_pins() {
    let mut pins = MockPins::new();
    assert_eq!(pins.read(GAS), Err(PinError::NotConfigured(GAS)));
}
