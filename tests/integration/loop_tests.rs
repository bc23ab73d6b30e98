//! Transmission loop behaviour, stepped one cycle at a time.

use std::sync::mpsc;
use std::sync::Arc;

use shockrf::config::RfConfig;
use shockrf::radio::pulse::Pulse;
use shockrf::radio::{CommandKind, EncoderRegistry, RadioHandle, ShockerModel, TransmitLoop};

use crate::mock_radio::{GatedSink, ManualClock, contains_train, rig, train, zero_train};

const PETRAINER_START: Pulse = Pulse::new(750, 750);
const PETRAINER_ONE: Pulse = Pulse::new(200, 1500);
const PETRAINER_ZERO: Pulse = Pulse::new(200, 750);
const PETRAINER_END: Pulse = Pulse::new(200, 7000);

#[test]
fn reference_frame_goes_on_air() {
    let mut r = rig(&RfConfig::default());
    assert!(r
        .handle
        .send_command(ShockerModel::Petrainer, 0x1234, CommandKind::Shock, 50, 1_000));
    let report = r.tx.run_cycle();
    assert!(report.transmitted);

    let mut expected = vec![PETRAINER_START];
    for byte in [0x81u8, 0x12, 0x34, 0x32, 0x7E] {
        for bit in (0..8).rev() {
            expected.push(if byte >> bit & 1 == 1 {
                PETRAINER_ONE
            } else {
                PETRAINER_ZERO
            });
        }
    }
    expected.push(PETRAINER_END);
    assert_eq!(r.sink.last().unwrap(), expected);
}

#[test]
fn commands_repeat_until_expiry() {
    let mut r = rig(&RfConfig::default());
    r.handle
        .send_command(ShockerModel::D80, 5, CommandKind::Vibrate, 40, 300);
    for t in [0, 100, 299] {
        r.clock.set(t);
        assert_eq!(r.tx.run_cycle().commands, 1, "at {t}ms");
    }
    r.clock.set(300);
    let report = r.tx.run_cycle();
    assert_eq!(report.expired, 1);
    assert_eq!((report.commands, report.terminators), (0, 1));
    let zero = zero_train(ShockerModel::D80, 5);
    assert_eq!(report.symbols, zero.len());
    assert_eq!(r.sink.last().unwrap(), zero.as_slice());

    r.clock.set(301);
    assert_eq!(r.tx.run_cycle().symbols, 0);
    assert_eq!(r.sink.count(), 4);
}

#[test]
fn replacement_never_blends() {
    let mut r = rig(&RfConfig::default());
    let old = train(ShockerModel::Petrainer, 7, CommandKind::Vibrate, 10);
    let new = train(ShockerModel::Petrainer, 7, CommandKind::Shock, 60);

    r.handle
        .send_command(ShockerModel::Petrainer, 7, CommandKind::Vibrate, 10, 5_000);
    r.tx.run_cycle();
    r.handle
        .send_command(ShockerModel::Petrainer, 7, CommandKind::Shock, 60, 5_000);
    r.tx.run_cycle();

    let bursts = r.sink.bursts.lock().unwrap();
    assert_eq!(bursts[0], old.as_slice());
    assert_eq!(bursts[1], new.as_slice());
}

#[test]
fn two_devices_share_every_burst() {
    let mut r = rig(&RfConfig::default());
    r.handle
        .send_command(ShockerModel::CaiXianlin, 1, CommandKind::Shock, 30, 1_000);
    r.handle
        .send_command(ShockerModel::Petrainer998DR, 2, CommandKind::Vibrate, 30, 1_000);
    let a = train(ShockerModel::CaiXianlin, 1, CommandKind::Shock, 30);
    let b = train(ShockerModel::Petrainer998DR, 2, CommandKind::Vibrate, 30);

    for _ in 0..5 {
        r.tx.run_cycle();
        let burst = r.sink.last().unwrap();
        assert!(contains_train(&burst, &a));
        assert!(contains_train(&burst, &b));
    }
}

#[test]
fn deferred_device_is_served_next_cycle() {
    let cfg = RfConfig {
        max_burst_symbols: 86, // two 43-symbol frames
        ..RfConfig::default()
    };
    let mut r = rig(&cfg);
    let trains: Vec<_> = (1..=3)
        .map(|id| {
            r.handle
                .send_command(ShockerModel::T330, id, CommandKind::Vibrate, 10, 1_000);
            train(ShockerModel::T330, id, CommandKind::Vibrate, 10)
        })
        .collect();

    let mut seen = [0u32; 3];
    for _ in 0..6 {
        r.tx.run_cycle();
        let burst = r.sink.last().unwrap();
        assert!(burst.len() <= 86);
        for (i, t) in trains.iter().enumerate() {
            if contains_train(&burst, t) {
                seen[i] += 1;
            }
        }
    }
    assert!(seen.iter().all(|&n| n >= 3), "uneven service: {seen:?}");
}

#[test]
fn clear_does_not_wait_for_the_burst_on_air() {
    let clock = Arc::new(ManualClock::default());
    let handle = RadioHandle::new(EncoderRegistry::builtin(), clock);
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let sink = GatedSink {
        entered: entered_tx,
        release: release_rx,
    };
    let mut tx = TransmitLoop::new(&handle, sink, &RfConfig::default());

    handle.send_command(ShockerModel::Petrainer, 1, CommandKind::Shock, 10, 60_000);
    let worker = std::thread::spawn(move || {
        let first = tx.run_cycle();
        let second = tx.run_cycle();
        (first, second)
    });

    // Burst is blocked inside the sink; clearing must still complete.
    assert_eq!(entered_rx.recv().unwrap(), 42);
    handle.clear_pending_commands();
    assert_eq!(handle.active_commands(), 0);

    release_tx.send(()).unwrap();
    let (first, second) = worker.join().unwrap();
    assert!(first.transmitted);
    assert_eq!(second.symbols, 0);
}
