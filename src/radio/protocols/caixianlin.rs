//! CaiXianlin encoder.
//!
//! Layout (42 bits, MSB first):
//! `[id:16][channel:4][type:4][intensity:8][sum8:8][00]`
//!
//! There is no end symbol; the two trailing zero bits act as postamble.

use crate::error::EncodeError;
use crate::radio::checksum::sum8;
use crate::radio::encoder::{ProtocolEncoder, check_ranges, method_code};
use crate::radio::pulse::{Pulse, PulseTrain, SymbolTiming};
use crate::radio::types::{CommandKind, ShockerModel};

const TIMING: SymbolTiming = SymbolTiming {
    start: Pulse::new(1400, 800),
    one: Pulse::new(800, 300),
    zero: Pulse::new(300, 800),
    end: None,
};

const TYPES: [Option<u8>; CommandKind::COUNT] = [None, Some(1), Some(2), Some(3), None];

const CHANNEL: u8 = 0;

pub struct CaiXianlin;

impl CaiXianlin {
    pub fn payload(shocker_id: u16, kind: CommandKind, intensity: u8) -> Result<u64, EncodeError> {
        check_ranges(&CaiXianlin, shocker_id, intensity)?;
        let ty = method_code(&TYPES, ShockerModel::CaiXianlin, kind)?;
        let head = u32::from(shocker_id) << 16
            | u32::from(CHANNEL & 0xF) << 12
            | u32::from(ty & 0xF) << 8
            | u32::from(intensity);
        Ok((u64::from(head) << 8 | u64::from(sum8(head))) << 2)
    }
}

impl ProtocolEncoder for CaiXianlin {
    fn model(&self) -> ShockerModel {
        ShockerModel::CaiXianlin
    }

    fn max_intensity(&self) -> u8 {
        99
    }

    fn encode(
        &self,
        shocker_id: u16,
        kind: CommandKind,
        intensity: u8,
    ) -> Result<PulseTrain, EncodeError> {
        TIMING.encode_bits(Self::payload(shocker_id, kind, intensity)?, 42)
    }
}
