//! Application core: port traits and the shared acquisition service.

pub mod ports;
pub mod service;
