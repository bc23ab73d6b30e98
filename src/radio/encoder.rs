//! Protocol encoder contract.
//!
//! An encoder is a stateless, deterministic function from
//! `(shocker_id, kind, intensity)` to a [`PulseTrain`].  Encoders never
//! perform I/O and never produce partial output: either the full frame is
//! returned or an [`EncodeError`].

use crate::error::EncodeError;

use super::pulse::PulseTrain;
use super::types::{CommandKind, ShockerModel};

pub trait ProtocolEncoder: Sync {
    /// The model this encoder speaks.
    fn model(&self) -> ShockerModel;

    /// Highest accepted intensity (inclusive).
    fn max_intensity(&self) -> u8;

    /// Width of the protocol's shocker id field.
    fn shocker_id_bits(&self) -> u32 {
        16
    }

    /// Encode one complete frame.
    fn encode(
        &self,
        shocker_id: u16,
        kind: CommandKind,
        intensity: u8,
    ) -> Result<PulseTrain, EncodeError>;

    /// Zero-intensity frame used for keep-alive.
    fn zero_sequence(&self, shocker_id: u16) -> Result<PulseTrain, EncodeError> {
        self.encode(shocker_id, CommandKind::Vibrate, 0)
    }
}

/// Range checks shared by every encoder, run before any bit is laid out.
pub fn check_ranges<E: ProtocolEncoder + ?Sized>(
    encoder: &E,
    shocker_id: u16,
    intensity: u8,
) -> Result<(), EncodeError> {
    let bits = encoder.shocker_id_bits();
    if bits < 16 && u32::from(shocker_id) >> bits != 0 {
        return Err(EncodeError::ShockerIdOutOfRange { shocker_id, bits });
    }
    let max = encoder.max_intensity();
    if intensity > max {
        return Err(EncodeError::IntensityOutOfRange { intensity, max });
    }
    Ok(())
}

/// Look up a per-method code, mapping a hole in the table to
/// [`EncodeError::UnsupportedCommand`].
pub fn method_code<T: Copy>(
    table: &[Option<T>; CommandKind::COUNT],
    model: ShockerModel,
    kind: CommandKind,
) -> Result<T, EncodeError> {
    table[kind.index()].ok_or(EncodeError::UnsupportedCommand { model, kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::pulse::{Pulse, SymbolTiming};

    struct TwelveBit;

    impl ProtocolEncoder for TwelveBit {
        fn model(&self) -> ShockerModel {
            ShockerModel::Petrainer
        }
        fn max_intensity(&self) -> u8 {
            15
        }
        fn shocker_id_bits(&self) -> u32 {
            12
        }
        fn encode(
            &self,
            shocker_id: u16,
            _kind: CommandKind,
            intensity: u8,
        ) -> Result<PulseTrain, EncodeError> {
            check_ranges(self, shocker_id, intensity)?;
            let timing = SymbolTiming {
                start: Pulse::new(1, 1),
                one: Pulse::new(2, 1),
                zero: Pulse::new(1, 2),
                end: None,
            };
            timing.encode_bits(u64::from(shocker_id) << 4 | u64::from(intensity), 16)
        }
    }

    #[test]
    fn id_wider_than_field_is_rejected() {
        assert_eq!(
            TwelveBit.encode(0x1000, CommandKind::Shock, 1),
            Err(EncodeError::ShockerIdOutOfRange {
                shocker_id: 0x1000,
                bits: 12
            })
        );
        assert!(TwelveBit.encode(0x0FFF, CommandKind::Shock, 1).is_ok());
    }

    #[test]
    fn intensity_above_max_is_rejected() {
        assert_eq!(
            TwelveBit.encode(1, CommandKind::Shock, 16),
            Err(EncodeError::IntensityOutOfRange {
                intensity: 16,
                max: 15
            })
        );
    }

    #[test]
    fn default_zero_sequence_is_vibrate_zero() {
        assert_eq!(
            TwelveBit.zero_sequence(7).unwrap(),
            TwelveBit.encode(7, CommandKind::Vibrate, 0).unwrap()
        );
    }

    #[test]
    fn method_code_reports_missing_entries() {
        const TABLE: [Option<u8>; CommandKind::COUNT] = [None, Some(1), Some(2), None, None];
        assert_eq!(method_code(&TABLE, ShockerModel::D80, CommandKind::Vibrate), Ok(2));
        assert_eq!(
            method_code(&TABLE, ShockerModel::D80, CommandKind::Sound),
            Err(EncodeError::UnsupportedCommand {
                model: ShockerModel::D80,
                kind: CommandKind::Sound
            })
        );
    }
}
