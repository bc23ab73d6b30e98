//! GPIO assignments for the transmitter board.
//!
//! Defaults only; [`RfConfig`](crate::config::RfConfig) can move either
//! pin at runtime.

// ---------------------------------------------------------------------------
// 433 MHz ASK transmitter module
// ---------------------------------------------------------------------------

/// Data input of the transmitter module, driven by RMT channel 0.
pub const RF_TX_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Emergency stop
// ---------------------------------------------------------------------------

/// Latching e-stop button to GND. Internal pull-up, LOW = pressed.
pub const ESTOP_GPIO: i32 = 13;

/// Highest GPIO number on the ESP32-S3.
pub const MAX_GPIO: i32 = 48;
