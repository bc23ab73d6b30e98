//! D80 encoder.
//!
//! Layout (40 bits, MSB first):
//! `[0x04][id:16][type:2][channel:2][intensity:4][sum8:8]`
//!
//! The protocol only carries 4 intensity bits. Callers still speak 0–100;
//! non-zero values are scaled down with a floor of 1, like the stock remote.

use crate::error::EncodeError;
use crate::radio::checksum::sum8;
use crate::radio::encoder::{ProtocolEncoder, check_ranges, method_code};
use crate::radio::pulse::{Pulse, PulseTrain, SymbolTiming};
use crate::radio::types::{CommandKind, ShockerModel};

const TIMING: SymbolTiming = SymbolTiming {
    start: Pulse::new(1900, 4000),
    one: Pulse::new(900, 300),
    zero: Pulse::new(300, 900),
    end: Some(Pulse::new(200, 2200)),
};

const TYPES: [Option<u8>; CommandKind::COUNT] = [None, Some(1), Some(2), Some(3), None];

const CHANNEL: u8 = 1;

const LEAD: u32 = 0x0400_0000;

pub struct D80;

impl D80 {
    /// Map 0–100 onto the 4-bit field.
    pub const fn scale_intensity(intensity: u8) -> u8 {
        if intensity == 0 {
            return 0;
        }
        let scaled = (intensity as u16 * 15 / 100) as u8;
        if scaled == 0 { 1 } else { scaled }
    }

    pub fn payload(shocker_id: u16, kind: CommandKind, intensity: u8) -> Result<u64, EncodeError> {
        check_ranges(&D80, shocker_id, intensity)?;
        let ty = method_code(&TYPES, ShockerModel::D80, kind)?;
        let level = if kind == CommandKind::Sound {
            0
        } else {
            Self::scale_intensity(intensity)
        };
        let head = LEAD
            | u32::from(shocker_id) << 8
            | u32::from(ty & 0x3) << 6
            | u32::from(CHANNEL & 0x3) << 4
            | u32::from(level & 0xF);
        Ok(u64::from(head) << 8 | u64::from(sum8(head)))
    }
}

impl ProtocolEncoder for D80 {
    fn model(&self) -> ShockerModel {
        ShockerModel::D80
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
