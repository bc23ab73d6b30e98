//! Pulse symbols and fixed-capacity pulse trains.
//!
//! A [`Pulse`] is one mark/space pair: the carrier is keyed on for
//! `high_ticks`, then off for `low_ticks`.  Ticks are RMT ticks, configured
//! for 1 µs resolution by the RMT adapter.
//!
//! ```text
//!   ┌────────┐
//!   │  high  │   low
//! ──┘        └──────────
//! ```

use core::ops::Deref;

use heapless::Vec;

use crate::error::EncodeError;

/// Longest frame any supported protocol produces (CaiXianlin / T330 are 43).
pub const MAX_TRAIN_SYMBOLS: usize = 48;

/// One mark/space symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pulse {
    pub high_ticks: u16,
    pub low_ticks: u16,
}

impl Pulse {
    pub const fn new(high_ticks: u16, low_ticks: u16) -> Self {
        Self {
            high_ticks,
            low_ticks,
        }
    }

    /// Total symbol length in ticks.
    pub const fn ticks(self) -> u32 {
        self.high_ticks as u32 + self.low_ticks as u32
    }
}

/// An immutable, restartable sequence of pulses for one frame.
///
/// Built only by the encoders; the loop copies it into its burst buffer
/// every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PulseTrain {
    pulses: Vec<Pulse, MAX_TRAIN_SYMBOLS>,
}

impl PulseTrain {
    pub fn as_slice(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Transmission time in ticks (µs at the default RMT clock).
    pub fn duration_ticks(&self) -> u64 {
        self.pulses.iter().map(|p| u64::from(p.ticks())).sum()
    }
}

impl Deref for PulseTrain {
    type Target = [Pulse];

    fn deref(&self) -> &[Pulse] {
        &self.pulses
    }
}

/// Per-protocol symbol timing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolTiming {
    pub start: Pulse,
    pub one: Pulse,
    pub zero: Pulse,
    /// Some protocols end on the last data bit.
    pub end: Option<Pulse>,
}

impl SymbolTiming {
    /// Encode the low `bit_count` bits of `data`, most significant first,
    /// framed by the start and end symbols.
    pub fn encode_bits(&self, data: u64, bit_count: u32) -> Result<PulseTrain, EncodeError> {
        debug_assert!(bit_count <= 64);
        let mut train = self.begin()?;
        for pos in (0..bit_count).rev() {
            let bit = (data >> pos) & 1 == 1;
            push(&mut train, if bit { self.one } else { self.zero })?;
        }
        self.finish(train)
    }

    /// Encode a byte payload, each byte most significant bit first.
    pub fn encode_bytes(&self, payload: &[u8]) -> Result<PulseTrain, EncodeError> {
        let mut train = self.begin()?;
        for byte in payload {
            for pos in (0..8).rev() {
                let bit = (byte >> pos) & 1 == 1;
                push(&mut train, if bit { self.one } else { self.zero })?;
            }
        }
        self.finish(train)
    }

    fn begin(&self) -> Result<PulseTrain, EncodeError> {
        let mut train = PulseTrain::default();
        push(&mut train, self.start)?;
        Ok(train)
    }

    fn finish(&self, mut train: PulseTrain) -> Result<PulseTrain, EncodeError> {
        if let Some(end) = self.end {
            push(&mut train, end)?;
        }
        Ok(train)
    }
}

fn push(train: &mut PulseTrain, pulse: Pulse) -> Result<(), EncodeError> {
    train
        .pulses
        .push(pulse)
        .map_err(|_| EncodeError::FrameTooLong)
}
