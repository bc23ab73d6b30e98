//! Mock clock and pulse sinks for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use shockrf::app::ports::{Clock, PulseSink};
use shockrf::config::RfConfig;
use shockrf::error::TransmitError;
use shockrf::radio::{EncoderRegistry, Pulse, PulseTrain, RadioHandle, TransmitLoop};
use shockrf::radio::{CommandKind, ShockerModel};

// ── Clock ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock(AtomicU64);

#[allow(dead_code)]
impl ManualClock {
    pub fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Recording sink ────────────────────────────────────────────

/// Keeps a copy of every burst. Clones share the record.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub bursts: Arc<Mutex<Vec<Vec<Pulse>>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self) -> usize {
        self.bursts.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Vec<Pulse>> {
        self.bursts.lock().unwrap().last().cloned()
    }
}

impl PulseSink for RecordingSink {
    fn transmit(&mut self, pulses: &[Pulse]) -> Result<(), TransmitError> {
        self.bursts.lock().unwrap().push(pulses.to_vec());
        Ok(())
    }
}

// ── Gated sink ────────────────────────────────────────────────

/// Blocks inside `transmit` until the test releases it, so a burst can be
/// held "on air" while other threads act.
pub struct GatedSink {
    pub entered: Sender<usize>,
    pub release: Receiver<()>,
}

impl PulseSink for GatedSink {
    fn transmit(&mut self, pulses: &[Pulse]) -> Result<(), TransmitError> {
        let _ = self.entered.send(pulses.len());
        self.release.recv().map_err(|_| TransmitError::Busy)
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub struct Rig {
    pub clock: Arc<ManualClock>,
    pub handle: RadioHandle,
    pub sink: RecordingSink,
    pub tx: TransmitLoop<RecordingSink>,
}

pub fn rig(config: &RfConfig) -> Rig {
    let clock = Arc::new(ManualClock::default());
    let handle = RadioHandle::new(EncoderRegistry::builtin(), clock.clone());
    handle.set_keepalive_enabled(config.keepalive_enabled);
    let sink = RecordingSink::default();
    let tx = TransmitLoop::new(&handle, sink.clone(), config);
    Rig {
        clock,
        handle,
        sink,
        tx,
    }
}

#[allow(dead_code)]
pub fn train(model: ShockerModel, id: u16, kind: CommandKind, intensity: u8) -> PulseTrain {
    EncoderRegistry::builtin()
        .encode(model, id, kind, intensity)
        .unwrap()
}

#[allow(dead_code)]
pub fn zero_train(model: ShockerModel, id: u16) -> PulseTrain {
    EncoderRegistry::builtin().zero_sequence(model, id).unwrap()
}

/// Whether `train` appears as a contiguous run inside `burst`.
pub fn contains_train(burst: &[Pulse], train: &[Pulse]) -> bool {
    burst.windows(train.len()).any(|w| w == train)
}
