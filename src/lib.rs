//! Washroom sensor node firmware library.
//!
//! Exposes the acquisition engine, its ports and the host-testable halves
//! of the adapters. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod shutdown;

pub mod adapters;
