//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter | Implements | Connects to                       |
//! |---------|------------|-----------------------------------|
//! | `rmt`   | PulseSink  | RMT channel (or host simulation)  |
//! | `time`  | Clock      | ESP32 high-resolution timer       |

pub mod rmt;
pub mod time;
