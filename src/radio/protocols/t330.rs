//! T330 encoder.
//!
//! Layout (41 bits, MSB first):
//! `[channel:4][type_hi:4][id:16][intensity:8][type_lo:4][channel:4][0]`

use crate::error::EncodeError;
use crate::radio::encoder::{ProtocolEncoder, check_ranges, method_code};
use crate::radio::pulse::{Pulse, PulseTrain, SymbolTiming};
use crate::radio::types::{CommandKind, ShockerModel};

const TIMING: SymbolTiming = SymbolTiming {
    start: Pulse::new(960, 790),
    one: Pulse::new(220, 980),
    zero: Pulse::new(220, 580),
    end: Some(Pulse::new(220, 135)),
};

const TYPES: [Option<u8>; CommandKind::COUNT] = [
    None,
    Some(0b0110_0001),
    Some(0b0111_0010),
    Some(0b1000_0100),
    None,
];

/// Channel 1.
const CHANNEL: u8 = 0b0000;

pub struct T330;

impl T330 {
    pub fn payload(shocker_id: u16, kind: CommandKind, intensity: u8) -> Result<u64, EncodeError> {
        check_ranges(&T330, shocker_id, intensity)?;
        let ty = method_code(&TYPES, ShockerModel::T330, kind)?;
        // The stock remote always sends 0 with the beep command.
        let intensity = if kind == CommandKind::Sound { 0 } else { intensity };
        let payload = u64::from(CHANNEL) << 36
            | u64::from(ty & 0xF0) << 28
            | u64::from(shocker_id) << 16
            | u64::from(intensity) << 8
            | u64::from(ty & 0x0F) << 4
            | u64::from(CHANNEL);
        Ok(payload << 1)
    }
}

impl ProtocolEncoder for T330 {
    fn model(&self) -> ShockerModel {
        ShockerModel::T330
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
        TIMING.encode_bits(Self::payload(shocker_id, kind, intensity)?, 41)
    }
}
