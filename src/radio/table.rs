//! Active-command table shared by producers and the transmission loop.
//!
//! At most one entry per shocker id, insertion ordered, bounded by
//! [`MAX_ACTIVE_COMMANDS`]. All access goes through the methods below; the
//! lock is never held across encoding or a radio write.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use heapless::Vec;

use crate::error::AdmissionError;

use super::pulse::PulseTrain;
use super::types::ShockerModel;

/// Distinct devices that can be driven at once.
pub const MAX_ACTIVE_COMMANDS: usize = 16;

/// One admitted command, ready to transmit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEntry {
    pub shocker_id: u16,
    pub model: ShockerModel,
    pub train: PulseTrain,
    /// Vibrate-at-zero frame, handed to keep-alive when this entry expires.
    pub zero_train: PulseTrain,
    pub expires_at_ms: u64,
}

/// What the loop takes away from one locked pass over the table.
#[derive(Debug, Default)]
pub struct CycleSnapshot {
    /// Trains of live entries, in table order.
    pub active: Vec<(u16, PulseTrain), MAX_ACTIVE_COMMANDS>,
    /// Entries purged this pass, with their zero trains.
    pub expired: Vec<(u16, PulseTrain), MAX_ACTIVE_COMMANDS>,
    /// Entries dropped by [`CommandTable::halt`] since the last pass.
    pub halted: Vec<(u16, PulseTrain), MAX_ACTIVE_COMMANDS>,
    /// Bumped by every halt; a change tells the loop to forget keep-alive devices.
    pub halt_epoch: u32,
}

/// Why [`CommandTable::wait_for_work`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Something was admitted or cleared.
    Work,
    Timeout,
    Shutdown,
}

#[derive(Debug, Default)]
struct TableState {
    entries: Vec<ActiveEntry, MAX_ACTIVE_COMMANDS>,
    halted: Vec<(u16, PulseTrain), MAX_ACTIVE_COMMANDS>,
    halt_epoch: u32,
    wake_pending: bool,
    shutdown: bool,
}

#[derive(Debug, Default)]
pub struct CommandTable {
    state: Mutex<TableState>,
    wake: Condvar,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        // No invariant spans a panic point, so a poisoned table is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `entry`, or replace the entry with the same id in place.
    pub fn upsert(&self, entry: ActiveEntry) -> Result<(), AdmissionError> {
        {
            let mut state = self.lock();
            if let Some(slot) = state
                .entries
                .iter_mut()
                .find(|e| e.shocker_id == entry.shocker_id)
            {
                *slot = entry;
            } else {
                state
                    .entries
                    .push(entry)
                    .map_err(|_| AdmissionError::TableFull)?;
            }
            state.wake_pending = true;
        }
        self.wake.notify_one();
        Ok(())
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let removed = {
            let mut state = self.lock();
            let removed = state.entries.len();
            state.entries.clear();
            state.wake_pending = true;
            removed
        };
        self.wake.notify_one();
        removed
    }

    /// Drop every entry, queue each one's zero train for a single final
    /// transmission, and bump the halt epoch. Returns how many were removed.
    pub fn halt(&self) -> usize {
        let removed = {
            let mut state = self.lock();
            let entries = core::mem::take(&mut state.entries);
            let removed = entries.len();
            for e in entries {
                if let Some(slot) = state.halted.iter_mut().find(|(id, _)| *id == e.shocker_id) {
                    slot.1 = e.zero_train;
                } else if state.halted.push((e.shocker_id, e.zero_train)).is_err() {
                    log::warn!("RFTX: halt queue full, #{} gets no stop frame", e.shocker_id);
                }
            }
            state.halt_epoch = state.halt_epoch.wrapping_add(1);
            state.wake_pending = true;
            removed
        };
        self.wake.notify_one();
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn contains(&self, shocker_id: u16) -> bool {
        self.lock().entries.iter().any(|e| e.shocker_id == shocker_id)
    }

    pub fn get(&self, shocker_id: u16) -> Option<ActiveEntry> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.shocker_id == shocker_id)
            .cloned()
    }

    pub fn halt_epoch(&self) -> u32 {
        self.lock().halt_epoch
    }

    /// Purge everything with `expires_at_ms <= now_ms` and copy out what is left.
    pub fn begin_cycle(&self, now_ms: u64) -> CycleSnapshot {
        let mut snap = CycleSnapshot::default();
        let mut state = self.lock();
        snap.halt_epoch = state.halt_epoch;
        snap.halted = core::mem::take(&mut state.halted);
        // Everything signalled so far is covered by this pass.
        state.wake_pending = false;

        let mut i = 0;
        while i < state.entries.len() {
            if state.entries[i].expires_at_ms <= now_ms {
                // `remove` keeps the survivors in order.
                let gone = state.entries.remove(i);
                // Both vecs have the table's capacity.
                let pushed = snap.expired.push((gone.shocker_id, gone.zero_train));
                debug_assert!(pushed.is_ok());
            } else {
                let e = &state.entries[i];
                let pushed = snap.active.push((e.shocker_id, e.train.clone()));
                debug_assert!(pushed.is_ok());
                i += 1;
            }
        }
        snap
    }

    /// Block until something is admitted or cleared, the timeout elapses,
    /// or the table is shut down.
    pub fn wait_for_work(&self, timeout: Duration) -> WaitOutcome {
        let state = self.lock();
        let (mut state, _) = self
            .wake
            .wait_timeout_while(state, timeout, |s| !s.wake_pending && !s.shutdown)
            .unwrap_or_else(PoisonError::into_inner);
        if state.shutdown {
            WaitOutcome::Shutdown
        } else if state.wake_pending {
            state.wake_pending = false;
            WaitOutcome::Work
        } else {
            WaitOutcome::Timeout
        }
    }

    pub fn shutdown(&self) {
        self.lock().shutdown = true;
        self.wake.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::pulse::{Pulse, SymbolTiming};

    fn train(tag: u64) -> PulseTrain {
        SymbolTiming {
            start: Pulse::new(1, 1),
            one: Pulse::new(2, 1),
            zero: Pulse::new(1, 2),
            end: None,
        }
        .encode_bits(tag, 8)
        .unwrap()
    }

    fn entry(id: u16, tag: u64, expires_at_ms: u64) -> ActiveEntry {
        ActiveEntry {
            shocker_id: id,
            model: ShockerModel::Petrainer,
            train: train(tag),
            zero_train: train(0),
            expires_at_ms,
        }
    }

    #[test]
    fn upsert_replaces_in_place() {
        let table = CommandTable::new();
        table.upsert(entry(1, 1, 100)).unwrap();
        table.upsert(entry(2, 2, 100)).unwrap();
        table.upsert(entry(1, 3, 500)).unwrap();

        let snap = table.begin_cycle(0);
        let ids: std::vec::Vec<u16> = snap.active.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, [1, 2]);
        assert_eq!(snap.active[0].1, train(3));
        assert_eq!(table.get(1).unwrap().expires_at_ms, 500);
    }

    #[test]
    fn full_table_rejects_new_ids_but_accepts_replacements() {
        let table = CommandTable::new();
        for id in 0..MAX_ACTIVE_COMMANDS as u16 {
            table.upsert(entry(id, 1, 100)).unwrap();
        }
        assert_eq!(table.upsert(entry(999, 1, 100)), Err(AdmissionError::TableFull));
        assert!(table.upsert(entry(3, 2, 100)).is_ok());
        assert_eq!(table.len(), MAX_ACTIVE_COMMANDS);
    }

    #[test]
    fn expiry_is_inclusive_and_reports_zero_trains() {
        let table = CommandTable::new();
        table.upsert(entry(1, 1, 100)).unwrap();
        table.upsert(entry(2, 2, 101)).unwrap();

        let snap = table.begin_cycle(100);
        assert_eq!(snap.expired.len(), 1);
        assert_eq!(snap.expired[0], (1, train(0)));
        assert_eq!(snap.active.len(), 1);
        assert!(!table.contains(1));
        assert!(table.contains(2));
    }

    #[test]
    fn clear_empties_without_touching_halt_state() {
        let table = CommandTable::new();
        table.upsert(entry(1, 1, 100)).unwrap();
        let before = table.halt_epoch();
        assert_eq!(table.clear(), 1);
        assert!(table.is_empty());
        assert_eq!(table.halt_epoch(), before);
        assert!(table.begin_cycle(0).halted.is_empty());
    }

    #[test]
    fn halt_hands_zero_trains_to_the_next_pass_once() {
        let table = CommandTable::new();
        table.upsert(entry(1, 1, 100)).unwrap();
        table.upsert(entry(2, 2, 100)).unwrap();
        assert_eq!(table.halt(), 2);
        assert!(table.is_empty());

        let snap = table.begin_cycle(0);
        assert_eq!(snap.halt_epoch, 1);
        let ids: std::vec::Vec<u16> = snap.halted.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, [1, 2]);
        assert_eq!(snap.halted[0].1, train(0));

        assert!(table.begin_cycle(0).halted.is_empty());
    }

    #[test]
    fn wait_reports_pending_work_then_times_out() {
        let table = CommandTable::new();
        table.upsert(entry(1, 1, 100)).unwrap();
        assert_eq!(table.wait_for_work(Duration::from_millis(1)), WaitOutcome::Work);
        assert_eq!(table.wait_for_work(Duration::from_millis(1)), WaitOutcome::Timeout);
        table.shutdown();
        assert_eq!(table.wait_for_work(Duration::from_secs(5)), WaitOutcome::Shutdown);
    }
}
