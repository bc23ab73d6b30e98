//! The RF command pipeline.
//!
//! ```text
//!  types ─▶ protocols (encoders) ─▶ registry ─▶ transmitter (admission)
//!                                                   │
//!                                  table ◀──────────┘
//!                                    │
//!                                 tx_loop ─▶ keepalive
//! ```

pub mod checksum;
pub mod encoder;
pub mod keepalive;
pub mod protocols;
pub mod pulse;
pub mod registry;
pub mod table;
pub mod transmitter;
pub mod tx_loop;
pub mod types;

pub use encoder::ProtocolEncoder;
pub use pulse::{Pulse, PulseTrain};
pub use registry::EncoderRegistry;
pub use transmitter::{RadioHandle, RadioStats, RfTransmitter};
pub use tx_loop::{CycleReport, TransmitLoop};
pub use types::{CommandKind, ShockerCommand, ShockerModel};
