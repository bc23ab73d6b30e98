//! Unified error types for the RF transmitter firmware.
//!
//! A single `Error` enum that every subsystem can convert into, with small
//! `Copy` sub-enums per layer.  Producers only ever see the admission
//! outcome; transmit errors stay inside the transmission loop.

use core::fmt;

use crate::radio::types::{CommandKind, ShockerModel};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A command could not be turned into a pulse train.
    Encode(EncodeError),
    /// A command was refused by admission.
    Admission(AdmissionError),
    /// The radio peripheral rejected a burst.
    Transmit(TransmitError),
    /// Peripheral or task initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be decoded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "encode: {e}"),
            Self::Admission(e) => write!(f, "admission: {e}"),
            Self::Transmit(e) => write!(f, "transmit: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Encoding errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// No encoder is registered for this model.
    NoEncoder(ShockerModel),
    /// The protocol has no code for this command kind.
    UnsupportedCommand {
        model: ShockerModel,
        kind: CommandKind,
    },
    /// Intensity exceeds the protocol maximum.
    IntensityOutOfRange { intensity: u8, max: u8 },
    /// Shocker id does not fit the protocol's address field.
    ShockerIdOutOfRange { shocker_id: u16, bits: u32 },
    /// The frame does not fit a pulse train buffer.
    FrameTooLong,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEncoder(model) => write!(f, "no encoder registered for {model}"),
            Self::UnsupportedCommand { model, kind } => {
                write!(f, "{model} does not support {kind}")
            }
            Self::IntensityOutOfRange { intensity, max } => {
                write!(f, "intensity {intensity} above maximum {max}")
            }
            Self::ShockerIdOutOfRange { shocker_id, bits } => {
                write!(f, "shocker id {shocker_id} does not fit {bits} bits")
            }
            Self::FrameTooLong => write!(f, "frame exceeds pulse train capacity"),
        }
    }
}

impl core::error::Error for EncodeError {}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

// ---------------------------------------------------------------------------
// Admission errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    /// `duration_ms` was zero.
    ZeroDuration,
    /// Encoding failed; the table was not touched.
    Encode(EncodeError),
    /// Every slot of the active-command table holds a different device.
    TableFull,
    /// The emergency stop is engaged.
    EmergencyStop,
}

impl fmt::Display for AdmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDuration => write!(f, "zero duration"),
            Self::Encode(e) => write!(f, "{e}"),
            Self::TableFull => write!(f, "active-command table full"),
            Self::EmergencyStop => write!(f, "emergency stop engaged"),
        }
    }
}

impl core::error::Error for AdmissionError {}

impl From<EncodeError> for AdmissionError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

impl From<AdmissionError> for Error {
    fn from(e: AdmissionError) -> Self {
        Self::Admission(e)
    }
}

// ---------------------------------------------------------------------------
// Transmission errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitError {
    /// The peripheral is still busy with a previous transmission.
    Busy,
    /// A pulse duration cannot be represented by the peripheral.
    InvalidPulse,
    /// Driver returned an error code.
    Driver(i32),
}

impl fmt::Display for TransmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "transmitter busy"),
            Self::InvalidPulse => write!(f, "pulse not representable"),
            Self::Driver(rc) => write!(f, "driver error (rc={rc})"),
        }
    }
}

impl core::error::Error for TransmitError {}

impl From<TransmitError> for Error {
    fn from(e: TransmitError) -> Self {
        Self::Transmit(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
