//! Application layer: port traits and the command-handling service.
//!
//! Hardware is reached only through the traits in [`ports`], so the whole
//! pipeline runs on the host with mock adapters.

pub mod ports;
pub mod service;
