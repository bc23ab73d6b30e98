//! The transmission loop.
//!
//! Sole owner of the [`PulseSink`]. Each cycle takes one snapshot of the
//! command table, concatenates every live train (plus due keep-alives) into
//! one burst, and hands it to the sink in a single blocking call. Commands
//! repeat until they expire; there is no one-shot queue.
//!
//! A command that expires, or is dropped by an emergency halt, gets its
//! zero train sent once as a terminator so the receiver stops at once.
//! Burst order is terminators, commands, keep-alives; anything that does
//! not fit waits for the next cycle.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use heapless::Vec;

use crate::app::ports::PulseSink;
use crate::config::RfConfig;

use super::keepalive::{KeepAliveScheduler, MAX_KEEPALIVE_DEVICES};
use super::pulse::{Pulse, PulseTrain};
use super::table::{MAX_ACTIVE_COMMANDS, WaitOutcome};
use super::transmitter::{Counters, MAX_BURST_SYMBOLS, RadioHandle, Shared};

/// Pause after a failed write before retrying.
const FAILURE_BACKOFF_MS: u64 = 10;

/// Terminator frames waiting for room in a burst.
const MAX_PENDING_STOPS: usize = 2 * MAX_ACTIVE_COMMANDS;

/// What one cycle did. Returned by [`TransmitLoop::run_cycle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Commands whose train made it into the burst.
    pub commands: usize,
    /// Commands pushed to the next cycle for lack of room.
    pub deferred: usize,
    /// One-shot zero frames for expired or halted commands.
    pub terminators: usize,
    pub keepalives: usize,
    /// Entries purged at the start of the cycle.
    pub expired: usize,
    /// Burst length handed to the sink.
    pub symbols: usize,
    /// The sink accepted the burst.
    pub transmitted: bool,
}

pub struct TransmitLoop<S: PulseSink> {
    shared: Arc<Shared>,
    sink: S,
    keepalive: KeepAliveScheduler,
    burst: Vec<Pulse, MAX_BURST_SYMBOLS>,
    max_burst_symbols: usize,
    idle_wait_ms: u64,
    /// First command deferred last cycle; it goes first next time.
    resume_from: Option<u16>,
    pending_stops: Vec<(u16, PulseTrain), MAX_PENDING_STOPS>,
    halt_epoch: u32,
    consecutive_failures: u32,
}

impl<S: PulseSink> TransmitLoop<S> {
    pub fn new(handle: &RadioHandle, sink: S, config: &RfConfig) -> Self {
        let shared = Arc::clone(&handle.shared);
        let halt_epoch = shared.table.halt_epoch();
        Self {
            shared,
            sink,
            keepalive: KeepAliveScheduler::new(
                config.keepalive_interval_ms,
                config.keepalive_transmit_ms,
            ),
            burst: Vec::new(),
            max_burst_symbols: usize::from(config.max_burst_symbols).min(MAX_BURST_SYMBOLS),
            idle_wait_ms: u64::from(config.idle_wait_ms.max(1)),
            resume_from: None,
            pending_stops: Vec::new(),
            halt_epoch,
            consecutive_failures: 0,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn keepalive(&self) -> &KeepAliveScheduler {
        &self.keepalive
    }

    /// Terminator frames not yet on air.
    pub fn pending_stops(&self) -> usize {
        self.pending_stops.len()
    }

    /// Run until the table is shut down.
    pub fn run(mut self) {
        log::info!(
            "RFTX: loop running (burst {} symbols, idle wait {}ms)",
            self.max_burst_symbols,
            self.idle_wait_ms
        );
        while !self.shared.table.is_shutdown() {
            let report = self.run_cycle();
            if report.transmitted {
                continue;
            }
            let timeout_ms = if report.symbols > 0 {
                FAILURE_BACKOFF_MS
            } else {
                self.idle_timeout_ms(self.shared.clock.now_ms())
            };
            if self.shared.table.wait_for_work(Duration::from_millis(timeout_ms))
                == WaitOutcome::Shutdown
            {
                break;
            }
        }
        log::info!("RFTX: loop exited");
    }

    /// One snapshot → burst → transmit pass.
    pub fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        let now = self.shared.clock.now_ms();
        let snap = self.shared.table.begin_cycle(now);

        if snap.halt_epoch != self.halt_epoch {
            self.halt_epoch = snap.halt_epoch;
            if !self.keepalive.is_empty() {
                log::debug!("RFTX: halt observed, forgetting {} keep-alive device(s)", self.keepalive.len());
            }
            self.keepalive.forget_all();
            self.resume_from = None;
        }
        for (id, zero_train) in snap.halted {
            self.queue_stop(id, zero_train);
        }
        report.expired = snap.expired.len();
        for (id, zero_train) in snap.expired {
            log::trace!("RFTX: #{id} expired");
            self.queue_stop(id, zero_train.clone());
            self.keepalive.track(id, zero_train, now);
        }
        // A fresh command supersedes the terminator.
        self.pending_stops
            .retain(|(id, _)| !snap.active.iter().any(|(sid, _)| sid == id));

        self.burst.clear();
        let limit = self.max_burst_symbols;

        let mut stops_sent: Vec<u16, MAX_PENDING_STOPS> = Vec::new();
        for (id, zero_train) in &self.pending_stops {
            if append(&mut self.burst, limit, zero_train) {
                log::trace!("RFTX: terminator #{id}");
                let pushed = stops_sent.push(*id);
                debug_assert!(pushed.is_ok());
            }
        }
        report.terminators = stops_sent.len();

        // Round-robin from the first train that did not fit last time.
        let n = snap.active.len();
        let start = self
            .resume_from
            .and_then(|id| snap.active.iter().position(|(sid, _)| *sid == id))
            .unwrap_or(0);
        self.resume_from = None;
        for k in 0..n {
            let (id, train) = &snap.active[(start + k) % n];
            if append(&mut self.burst, limit, train) {
                report.commands += 1;
            } else {
                report.deferred += 1;
                self.resume_from.get_or_insert(*id);
            }
        }

        let mut keepalives_sent: Vec<u16, MAX_KEEPALIVE_DEVICES> = Vec::new();
        if self.shared.keepalive_enabled.load(Ordering::Relaxed) {
            let active: Vec<u16, MAX_ACTIVE_COMMANDS> =
                snap.active.iter().map(|(id, _)| *id).collect();
            for (id, zero_train) in self.keepalive.due(now, &active) {
                // Later, smaller trains may still fit.
                if !append(&mut self.burst, limit, zero_train) {
                    continue;
                }
                log::trace!("RFTX: keep-alive #{id}");
                let pushed = keepalives_sent.push(id);
                debug_assert!(pushed.is_ok());
            }
            report.keepalives = keepalives_sent.len();
        }

        if self.burst.is_empty() {
            if !self.pending_stops.is_empty() {
                log::warn!(
                    "RFTX: {} terminator(s) exceed the burst limit, dropped",
                    self.pending_stops.len()
                );
                self.pending_stops.clear();
            }
            return report;
        }
        report.symbols = self.burst.len();
        self.transmit(&mut report);
        if report.transmitted {
            self.pending_stops.retain(|(id, _)| !stops_sent.contains(id));
            for id in keepalives_sent {
                self.keepalive.mark_sent(id);
            }
        }
        report
    }

    /// Queue `id`'s zero train to go out once, replacing an older one.
    fn queue_stop(&mut self, id: u16, zero_train: PulseTrain) {
        if let Some(slot) = self.pending_stops.iter_mut().find(|(sid, _)| *sid == id) {
            slot.1 = zero_train;
            return;
        }
        if self.pending_stops.is_full() {
            let (dropped, _) = self.pending_stops.remove(0);
            log::warn!("RFTX: terminator backlog full, #{dropped} gets no stop frame");
        }
        let pushed = self.pending_stops.push((id, zero_train));
        debug_assert!(pushed.is_ok());
    }

    fn transmit(&mut self, report: &mut CycleReport) {
        let counters = &self.shared.counters;
        match self.sink.transmit(&self.burst) {
            Ok(()) => {
                if self.consecutive_failures > 0 {
                    log::info!(
                        "RFTX: radio recovered after {} failed burst(s)",
                        self.consecutive_failures
                    );
                }
                self.consecutive_failures = 0;
                report.transmitted = true;
                Counters::bump(&counters.bursts, 1);
                Counters::bump(&counters.keepalives, report.keepalives as u32);
                log::trace!(
                    "RFTX: burst {} symbols ({} stop, {} cmd, {} keep-alive)",
                    report.symbols,
                    report.terminators,
                    report.commands,
                    report.keepalives
                );
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                Counters::bump(&counters.transmit_failures, 1);
                log::warn!(
                    "RFTX: burst of {} symbols failed: {e} (consecutive: {})",
                    report.symbols,
                    self.consecutive_failures
                );
            }
        }
    }

    /// How long the loop may sleep when it has nothing to send.
    pub fn idle_timeout_ms(&self, now_ms: u64) -> u64 {
        let keepalive = if self.shared.keepalive_enabled.load(Ordering::Relaxed) {
            self.keepalive.ms_until_next(now_ms)
        } else {
            None
        };
        keepalive
            .map_or(self.idle_wait_ms, |ms| ms.min(self.idle_wait_ms))
            .max(1)
    }
}

/// Append `train` whole if it fits under `limit`.
fn append(burst: &mut Vec<Pulse, MAX_BURST_SYMBOLS>, limit: usize, train: &[Pulse]) -> bool {
    if burst.len() + train.len() > limit {
        return false;
    }
    burst.extend_from_slice(train).is_ok()
}
