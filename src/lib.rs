//! ShockRF firmware library.
//!
//! Exposes the RF command pipeline for integration testing and for the
//! gateway / serial collaborators. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod radio;

pub use error::{Error, Result};
