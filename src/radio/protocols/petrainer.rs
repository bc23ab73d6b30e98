//! Petrainer (PET998 family, stock remote) encoder.
//!
//! Frame: `[0x80 | method] [id_hi] [id_lo] [intensity] [method_check]`,
//! 40 data bits framed by a start and a long end symbol (42 symbols).
//! The check byte is not computed over the payload; it is a fixed
//! constant per method.

use crate::error::EncodeError;
use crate::radio::encoder::{ProtocolEncoder, check_ranges, method_code};
use crate::radio::pulse::{Pulse, PulseTrain, SymbolTiming};
use crate::radio::types::{CommandKind, ShockerModel};

const TIMING: SymbolTiming = SymbolTiming {
    start: Pulse::new(750, 750),
    one: Pulse::new(200, 1500),
    zero: Pulse::new(200, 750),
    end: Some(Pulse::new(200, 7000)),
};

/// `(method bits, check byte)` indexed by [`CommandKind`].
const METHODS: [Option<(u8, u8)>; CommandKind::COUNT] = [
    None,             // Stop
    Some((1, 0x7E)),  // Shock
    Some((2, 0xBE)),  // Vibrate
    Some((4, 0xDE)),  // Sound
    None,             // Light
];

pub const MAX_INTENSITY: u8 = 100;

pub struct Petrainer;

impl Petrainer {
    /// The five payload bytes, before symbol encoding.
    pub fn payload(shocker_id: u16, kind: CommandKind, intensity: u8) -> Result<[u8; 5], EncodeError> {
        check_ranges(&Petrainer, shocker_id, intensity)?;
        let (method, check) = method_code(&METHODS, ShockerModel::Petrainer, kind)?;
        let [id_hi, id_lo] = shocker_id.to_be_bytes();
        Ok([0x80 | method, id_hi, id_lo, intensity, check])
    }
}

impl ProtocolEncoder for Petrainer {
    fn model(&self) -> ShockerModel {
        ShockerModel::Petrainer
    }

    fn max_intensity(&self) -> u8 {
        MAX_INTENSITY
    }

    fn encode(
        &self,
        shocker_id: u16,
        kind: CommandKind,
        intensity: u8,
    ) -> Result<PulseTrain, EncodeError> {
        let payload = Self::payload(shocker_id, kind, intensity)?;
        TIMING.encode_bytes(&payload)
    }
}
