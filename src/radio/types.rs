//! Command vocabulary shared by the encoders, admission, and the app layer.

use serde::{Deserialize, Serialize};

/// RF protocol family implemented by a receiver.
///
/// The discriminant doubles as the index into the
/// [`EncoderRegistry`](super::registry::EncoderRegistry) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShockerModel {
    CaiXianlin = 0,
    Petrainer = 1,
    Petrainer998DR = 2,
    T330 = 3,
    D80 = 4,
}

impl ShockerModel {
    /// Number of model variants (size of every model-indexed table).
    pub const COUNT: usize = 5;

    pub const ALL: [ShockerModel; Self::COUNT] = [
        Self::CaiXianlin,
        Self::Petrainer,
        Self::Petrainer998DR,
        Self::T330,
        Self::D80,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::CaiXianlin => "caixianlin",
            Self::Petrainer => "petrainer",
            Self::Petrainer998DR => "petrainer998dr",
            Self::T330 => "t330",
            Self::D80 => "d80",
        }
    }
}

impl core::fmt::Display for ShockerModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Action requested from the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CommandKind {
    /// Cancel everything pending and leave the receiver quiet.
    /// Never reaches an encoder; see [`CommandHandler`](crate::app::service::CommandHandler).
    Stop = 0,
    Shock = 1,
    Vibrate = 2,
    Sound = 3,
    Light = 4,
}

impl CommandKind {
    /// Number of kinds (size of every per-method constant table).
    pub const COUNT: usize = 5;

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Stop => "stop",
            Self::Shock => "shock",
            Self::Vibrate => "vibrate",
            Self::Sound => "sound",
            Self::Light => "light",
        };
        f.write_str(name)
    }
}

/// A fully decoded command as delivered by the network / serial layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShockerCommand {
    pub model: ShockerModel,
    pub shocker_id: u16,
    pub kind: CommandKind,
    pub intensity: u8,
    pub duration_ms: u32,
}

impl ShockerCommand {
    pub const fn new(
        model: ShockerModel,
        shocker_id: u16,
        kind: CommandKind,
        intensity: u8,
        duration_ms: u32,
    ) -> Self {
        Self {
            model,
            shocker_id,
            kind,
            intensity,
            duration_ms,
        }
    }
}
