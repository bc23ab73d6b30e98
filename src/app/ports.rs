//! Port traits: the boundary between the radio core and the hardware.
//!
//! ```text
//!   RadioHandle ──▶ CommandTable ──▶ TransmitLoop ──▶ PulseSink ──▶ RMT
//!                                        ▲
//!                                      Clock
//! ```
//!
//! Driven adapters (RMT channel, system timer) implement these traits.
//! The transmission loop consumes them via generics / trait objects, so
//! the pipeline never touches a peripheral directly and runs unchanged on
//! the host with mocks.

use crate::error::TransmitError;
use crate::radio::pulse::Pulse;

// ───────────────────────────────────────────────────────────────
// Pulse sink (driven adapter: loop → radio hardware)
// ───────────────────────────────────────────────────────────────

/// Submit an ordered sequence of timed high/low intervals and block until
/// the last one has left the antenna.
///
/// Owned exclusively by the transmission loop. Implementations must not
/// call back into the command table.
pub trait PulseSink {
    fn transmit(&mut self, pulses: &[Pulse]) -> Result<(), TransmitError>;
}

impl<S: PulseSink + ?Sized> PulseSink for Box<S> {
    fn transmit(&mut self, pulses: &[Pulse]) -> Result<(), TransmitError> {
        (**self).transmit(pulses)
    }
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: system timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock shared by producers and the loop.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}
