//! Command admission and the transmitter lifecycle.
//!
//! ```text
//!  producers ──▶ RadioHandle ──encode──▶ CommandTable ◀── TransmitLoop ──▶ PulseSink
//!  (Clone, many)                         (Mutex+Condvar)   (one thread)
//! ```
//!
//! [`RadioHandle`] is the only thing producers hold. Admission encodes
//! outside the lock, then upserts and wakes the loop. [`RfTransmitter`]
//! owns the worker thread and stops it on drop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::JoinHandle;

use serde::Serialize;

use crate::app::ports::{Clock, PulseSink};
use crate::config::RfConfig;
use crate::drivers::task_pin::{Core, spawn_on_core};
use crate::error::{AdmissionError, Error, Result};

use super::registry::EncoderRegistry;
use super::table::{ActiveEntry, CommandTable};
use super::tx_loop::TransmitLoop;
use super::types::{CommandKind, ShockerModel};

/// Upper bound on symbols per radio write (eight 43-symbol frames).
pub const MAX_BURST_SYMBOLS: usize = 344;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub admitted: AtomicU32,
    pub rejected: AtomicU32,
    pub bursts: AtomicU32,
    pub transmit_failures: AtomicU32,
    pub keepalives: AtomicU32,
}

impl Counters {
    pub fn bump(counter: &AtomicU32, by: u32) {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}

/// Point-in-time copy of the pipeline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RadioStats {
    pub admitted: u32,
    pub rejected: u32,
    pub bursts: u32,
    pub transmit_failures: u32,
    pub keepalives: u32,
}

pub(crate) struct Shared {
    pub table: CommandTable,
    pub registry: EncoderRegistry,
    pub clock: Arc<dyn Clock>,
    pub keepalive_enabled: AtomicBool,
    pub counters: Counters,
}

// ---------------------------------------------------------------------------
// Producer handle
// ---------------------------------------------------------------------------

/// Cloneable producer-side handle to the radio pipeline.
#[derive(Clone)]
pub struct RadioHandle {
    pub(crate) shared: Arc<Shared>,
}

impl RadioHandle {
    /// Build the shared state without a worker. [`TransmitLoop::new`] can
    /// then be driven by hand, which is how the host tests step cycles.
    pub fn new(registry: EncoderRegistry, clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::new(Shared {
                table: CommandTable::new(),
                registry,
                clock,
                keepalive_enabled: AtomicBool::new(true),
                counters: Counters::default(),
            }),
        }
    }

    /// Admit a command. `false` means nothing changed.
    pub fn send_command(
        &self,
        model: ShockerModel,
        shocker_id: u16,
        kind: CommandKind,
        intensity: u8,
        duration_ms: u32,
    ) -> bool {
        self.try_send_command(model, shocker_id, kind, intensity, duration_ms)
            .is_ok()
    }

    pub fn try_send_command(
        &self,
        model: ShockerModel,
        shocker_id: u16,
        kind: CommandKind,
        intensity: u8,
        duration_ms: u32,
    ) -> core::result::Result<(), AdmissionError> {
        let res = self.admit(model, shocker_id, kind, intensity, duration_ms);
        let c = &self.shared.counters;
        match res {
            Ok(()) => {
                Counters::bump(&c.admitted, 1);
                log::debug!(
                    "RFTX: {model} #{shocker_id} {kind} {intensity} for {duration_ms}ms"
                );
            }
            Err(e) => {
                Counters::bump(&c.rejected, 1);
                log::warn!("RFTX: rejected {model} #{shocker_id} {kind}: {e}");
            }
        }
        res
    }

    fn admit(
        &self,
        model: ShockerModel,
        shocker_id: u16,
        kind: CommandKind,
        intensity: u8,
        duration_ms: u32,
    ) -> core::result::Result<(), AdmissionError> {
        if duration_ms == 0 {
            return Err(AdmissionError::ZeroDuration);
        }
        let encoder = self.shared.registry.get(model)?;
        let train = encoder.encode(shocker_id, kind, intensity)?;
        let zero_train = encoder.zero_sequence(shocker_id)?;
        let expires_at_ms = self
            .shared
            .clock
            .now_ms()
            .saturating_add(u64::from(duration_ms));

        self.shared.table.upsert(ActiveEntry {
            shocker_id,
            model,
            train,
            zero_train,
            expires_at_ms,
        })
    }

    /// Drop every pending command. Keep-alive devices stay known. Does not
    /// wait for a burst already on air.
    pub fn clear_pending_commands(&self) {
        let removed = self.shared.table.clear();
        log::info!("RFTX: cleared {removed} pending command(s)");
    }

    /// Emergency halt: drop every pending command, send each one's zero
    /// frame once and forget all keep-alive devices.
    pub fn clear_pending_commands_and_keepalive(&self) {
        let removed = self.shared.table.halt();
        log::warn!("RFTX: halted {removed} pending command(s), keep-alive reset");
    }

    /// Takes effect from the next cycle.
    pub fn set_keepalive_enabled(&self, enabled: bool) {
        let was = self.shared.keepalive_enabled.swap(enabled, Ordering::Relaxed);
        if was != enabled {
            log::info!(
                "RFTX: keep-alive {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }

    pub fn keepalive_enabled(&self) -> bool {
        self.shared.keepalive_enabled.load(Ordering::Relaxed)
    }

    pub fn active_commands(&self) -> usize {
        self.shared.table.len()
    }

    pub fn is_active(&self, shocker_id: u16) -> bool {
        self.shared.table.contains(shocker_id)
    }

    pub fn stats(&self) -> RadioStats {
        let c = &self.shared.counters;
        RadioStats {
            admitted: c.admitted.load(Ordering::Relaxed),
            rejected: c.rejected.load(Ordering::Relaxed),
            bursts: c.bursts.load(Ordering::Relaxed),
            transmit_failures: c.transmit_failures.load(Ordering::Relaxed),
            keepalives: c.keepalives.load(Ordering::Relaxed),
        }
    }
}

impl core::fmt::Debug for RadioHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RadioHandle")
            .field("registry", &self.shared.registry)
            .field("active", &self.shared.table.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Worker lifecycle
// ---------------------------------------------------------------------------

/// The running transmitter: shared state plus the pinned worker thread.
pub struct RfTransmitter {
    handle: RadioHandle,
    worker: Option<JoinHandle<()>>,
}

impl RfTransmitter {
    /// Validate `config`, then spawn the transmission loop on the
    /// application core. The sink moves into the worker.
    pub fn start<S>(
        registry: EncoderRegistry,
        sink: S,
        clock: Arc<dyn Clock>,
        config: &RfConfig,
    ) -> Result<Self>
    where
        S: PulseSink + Send + 'static,
    {
        config.validate()?;
        let handle = RadioHandle::new(registry, clock);
        handle.set_keepalive_enabled(config.keepalive_enabled);

        let tx_loop = TransmitLoop::new(&handle, sink, config);
        let worker = spawn_on_core(
            Core::App,
            config.tx_task_priority,
            config.tx_task_stack_kb,
            "rf-tx\0",
            move || tx_loop.run(),
        )
        .map_err(|e| {
            log::error!("RFTX: failed to spawn transmission task: {e}");
            Error::Init("rf-tx task spawn")
        })?;

        log::info!("RFTX: transmitter started (registry {:?})", handle.shared.registry);
        Ok(Self {
            handle,
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> RadioHandle {
        self.handle.clone()
    }

    /// Stop the worker and wait for it. Pending commands are dropped.
    pub fn shutdown(mut self) {
        self.stop_worker();
    }

    fn stop_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.handle.shared.table.shutdown();
            if worker.join().is_err() {
                log::error!("RFTX: transmission task panicked");
            }
            log::info!("RFTX: transmitter stopped");
        }
    }
}

impl Drop for RfTransmitter {
    fn drop(&mut self) {
        self.stop_worker();
    }
}
