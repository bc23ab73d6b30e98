//! Petrainer 998DR encoder.
//!
//! Layout (40 bits, MSB first):
//! `[channel:4][type:4][id:16][intensity:8][rev_inv(type):4][rev_inv(channel):4]`

use crate::error::EncodeError;
use crate::radio::checksum::reverse_inverse_nibble;
use crate::radio::encoder::{ProtocolEncoder, check_ranges, method_code};
use crate::radio::pulse::{Pulse, PulseTrain, SymbolTiming};
use crate::radio::types::{CommandKind, ShockerModel};

// The long end space is required by receivers that expect a quiet gap
// between repeated frames.
const TIMING: SymbolTiming = SymbolTiming {
    start: Pulse::new(1500, 750),
    one: Pulse::new(750, 250),
    zero: Pulse::new(250, 750),
    end: Some(Pulse::new(250, 3750)),
};

/// One-hot type nibble indexed by [`CommandKind`].
const TYPES: [Option<u8>; CommandKind::COUNT] = [
    None,
    Some(0b0001),
    Some(0b0010),
    Some(0b0100),
    Some(0b1000),
];

/// Channel 1. Channel 2 would be `0b1111`.
const CHANNEL: u8 = 0b1000;

pub struct Petrainer998DR;

impl Petrainer998DR {
    pub fn payload(shocker_id: u16, kind: CommandKind, intensity: u8) -> Result<u64, EncodeError> {
        check_ranges(&Petrainer998DR, shocker_id, intensity)?;
        let ty = method_code(&TYPES, ShockerModel::Petrainer998DR, kind)?;
        Ok(u64::from(CHANNEL) << 36
            | u64::from(ty) << 32
            | u64::from(shocker_id) << 16
            | u64::from(intensity) << 8
            | u64::from(reverse_inverse_nibble(ty)) << 4
            | u64::from(reverse_inverse_nibble(CHANNEL)))
    }
}

impl ProtocolEncoder for Petrainer998DR {
    fn model(&self) -> ShockerModel {
        ShockerModel::Petrainer998DR
    }

    fn max_intensity(&self) -> u8 {
        100
    }

    fn encode(
        &self,
        shocker_id: u16,
        kind: CommandKind,
        intensity: u8,
    ) -> Result<PulseTrain, EncodeError> {
        TIMING.encode_bits(Self::payload(shocker_id, kind, intensity)?, 40)
    }
}
