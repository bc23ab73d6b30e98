//! Model → encoder lookup.

use crate::error::EncodeError;

use super::encoder::ProtocolEncoder;
use super::protocols::{CaiXianlin, D80, Petrainer, Petrainer998DR, T330};
use super::pulse::PulseTrain;
use super::types::{CommandKind, ShockerModel};

/// Fixed table of encoders indexed by [`ShockerModel`] discriminant.
///
/// Adding a protocol means implementing [`ProtocolEncoder`] and calling
/// [`register`](Self::register); admission and the loop are untouched.
#[derive(Clone, Copy)]
pub struct EncoderRegistry {
    slots: [Option<&'static dyn ProtocolEncoder>; ShockerModel::COUNT],
}

impl EncoderRegistry {
    /// A registry with no encoders. Every lookup fails.
    pub const fn empty() -> Self {
        Self {
            slots: [None; ShockerModel::COUNT],
        }
    }

    /// All protocols shipped with the firmware.
    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        reg.register(&CaiXianlin);
        reg.register(&Petrainer);
        reg.register(&Petrainer998DR);
        reg.register(&T330);
        reg.register(&D80);
        reg
    }

    /// Install `encoder` for its model, replacing any previous one.
    pub fn register(&mut self, encoder: &'static dyn ProtocolEncoder) {
        self.slots[encoder.model().index()] = Some(encoder);
    }

    pub fn get(&self, model: ShockerModel) -> Result<&'static dyn ProtocolEncoder, EncodeError> {
        self.slots[model.index()].ok_or(EncodeError::NoEncoder(model))
    }

    pub fn encode(
        &self,
        model: ShockerModel,
        shocker_id: u16,
        kind: CommandKind,
        intensity: u8,
    ) -> Result<PulseTrain, EncodeError> {
        self.get(model)?.encode(shocker_id, kind, intensity)
    }

    pub fn zero_sequence(
        &self,
        model: ShockerModel,
        shocker_id: u16,
    ) -> Result<PulseTrain, EncodeError> {
        self.get(model)?.zero_sequence(shocker_id)
    }
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl core::fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut list = f.debug_list();
        for model in ShockerModel::ALL {
            if self.slots[model.index()].is_some() {
                list.entry(&model);
            }
        }
        list.finish()
    }
}
