//! Integration test driver for `tests/integration/`.
//!
//! Each `mod` below exercises one part of the radio pipeline against the
//! mock clock and sinks in `mock_radio`. Everything runs on the host; the
//! loop is stepped by hand through `TransmitLoop::run_cycle`.

mod admission_tests;
mod keepalive_tests;
mod loop_tests;
mod mock_radio;
