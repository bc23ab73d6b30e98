//! Fuzz target: admission and loop cycles.
//!
//! Interprets the input as a script of admissions, clears, and clock
//! steps, driving one `TransmitLoop` by hand. Checks that bursts never
//! exceed the configured size and that the table never overflows.
//!
//! cargo fuzz run fuzz_admission

#![no_main]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use libfuzzer_sys::fuzz_target;
use shockrf::app::ports::{Clock, PulseSink};
use shockrf::config::RfConfig;
use shockrf::error::TransmitError;
use shockrf::radio::table::MAX_ACTIVE_COMMANDS;
use shockrf::radio::{CommandKind, EncoderRegistry, Pulse, RadioHandle, ShockerModel, TransmitLoop};

struct FuzzClock(AtomicU64);

impl Clock for FuzzClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

struct Bounded(usize);

impl PulseSink for Bounded {
    fn transmit(&mut self, pulses: &[Pulse]) -> Result<(), TransmitError> {
        assert!(!pulses.is_empty() && pulses.len() <= self.0);
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let config = RfConfig {
        keepalive_interval_ms: 200,
        keepalive_transmit_ms: 50,
        ..RfConfig::default()
    };
    let clock = Arc::new(FuzzClock(AtomicU64::new(0)));
    let handle = RadioHandle::new(EncoderRegistry::builtin(), clock.clone());
    let mut tx = TransmitLoop::new(
        &handle,
        Bounded(usize::from(config.max_burst_symbols)),
        &config,
    );

    for chunk in data.chunks(4) {
        match chunk {
            [0, ..] => handle.clear_pending_commands(),
            [2, ..] => handle.clear_pending_commands_and_keepalive(),
            [1, step, ..] => {
                clock.0.fetch_add(u64::from(*step) * 4, Ordering::Relaxed);
                tx.run_cycle();
            }
            [sel, id, intensity, dur] => {
                let model = ShockerModel::ALL[usize::from(*sel) % ShockerModel::COUNT];
                let kind = if sel & 0x80 == 0 {
                    CommandKind::Vibrate
                } else {
                    CommandKind::Shock
                };
                handle.send_command(model, u16::from(*id), kind, *intensity, u32::from(*dur) * 8);
            }
            _ => {}
        }
        assert!(handle.active_commands() <= MAX_ACTIVE_COMMANDS);
        assert!(tx.pending_stops() <= 2 * MAX_ACTIVE_COMMANDS);
    }
});
