//! Keep-alive injection through the full loop.

use shockrf::app::service::CommandHandler;
use shockrf::config::RfConfig;
use shockrf::radio::{CommandKind, ShockerCommand, ShockerModel};

use crate::mock_radio::{Rig, contains_train, rig, zero_train};

fn keepalive_rig() -> Rig {
    rig(&RfConfig {
        keepalive_interval_ms: 1_000,
        keepalive_transmit_ms: 100,
        ..RfConfig::default()
    })
}

/// Admit a 100 ms command at t=0 and let it expire at t=100.
fn expire_one(r: &mut Rig, id: u16) {
    r.handle
        .send_command(ShockerModel::Petrainer, id, CommandKind::Shock, 10, 100);
    r.tx.run_cycle();
    r.clock.set(100);
    assert_eq!(r.tx.run_cycle().expired, 1);
}

#[test]
fn expired_device_gets_zero_frames_after_interval() {
    let mut r = keepalive_rig();
    expire_one(&mut r, 9);
    let zero = zero_train(ShockerModel::Petrainer, 9);

    r.clock.set(1_099);
    assert_eq!(r.tx.run_cycle().keepalives, 0);

    r.clock.set(1_100);
    let report = r.tx.run_cycle();
    assert_eq!(report.keepalives, 1);
    assert_eq!(r.sink.last().unwrap(), zero.as_slice());

    r.clock.set(1_199);
    assert_eq!(r.tx.run_cycle().keepalives, 1);
    r.clock.set(1_200);
    assert_eq!(r.tx.run_cycle().keepalives, 0);
    assert_eq!(r.handle.stats().keepalives, 2);
}

#[test]
fn disabled_keepalive_sends_nothing() {
    let mut r = keepalive_rig();
    expire_one(&mut r, 9);
    r.handle.set_keepalive_enabled(false);
    r.clock.set(1_100);
    assert_eq!(r.tx.run_cycle().symbols, 0);
    assert!(r.tx.keepalive().contains(9));
}

#[test]
fn expiry_cycle_carries_one_zero_frame() {
    let mut r = keepalive_rig();
    expire_one(&mut r, 9);
    let zero = zero_train(ShockerModel::Petrainer, 9);
    assert_eq!(r.sink.last().unwrap(), zero.as_slice());
    r.clock.set(101);
    assert_eq!(r.tx.run_cycle().symbols, 0);
    assert_eq!(r.handle.stats().keepalives, 0);
}

#[test]
fn halt_forgets_known_devices() {
    let mut r = keepalive_rig();
    expire_one(&mut r, 9);
    r.handle.clear_pending_commands_and_keepalive();
    r.clock.set(1_100);
    assert_eq!(r.tx.run_cycle().keepalives, 0);
    assert!(r.tx.keepalive().is_empty());
}

#[test]
fn plain_clear_keeps_known_devices() {
    let mut r = keepalive_rig();
    expire_one(&mut r, 9);
    r.handle
        .send_command(ShockerModel::Petrainer, 4, CommandKind::Shock, 10, 5_000);
    r.handle.clear_pending_commands();
    r.clock.set(1_100);
    assert_eq!(r.tx.run_cycle().keepalives, 1);
    assert!(r.tx.keepalive().contains(9));
}

#[test]
fn stop_on_another_device_keeps_known_devices() {
    let mut r = keepalive_rig();
    expire_one(&mut r, 9);
    let handler = CommandHandler::new(r.handle.clone());
    handler
        .handle_command(&ShockerCommand::new(ShockerModel::Petrainer, 4, CommandKind::Stop, 0, 0))
        .unwrap();
    r.tx.run_cycle();
    assert!(r.tx.keepalive().contains(9));

    r.clock.set(1_100);
    assert_eq!(r.tx.run_cycle().keepalives, 1);
}

#[test]
fn full_burst_defers_keepalive_instead_of_dropping_it() {
    let mut r = rig(&RfConfig {
        max_burst_symbols: 84, // two 42-symbol frames
        keepalive_interval_ms: 1_000,
        keepalive_transmit_ms: 100,
        ..RfConfig::default()
    });
    expire_one(&mut r, 9);
    for id in [1, 2] {
        r.handle
            .send_command(ShockerModel::Petrainer, id, CommandKind::Vibrate, 5, 1_200);
    }

    let zero = zero_train(ShockerModel::Petrainer, 9);
    let mut sent = 0;
    for t in (1_000..=1_400).step_by(10) {
        r.clock.set(t);
        let report = r.tx.run_cycle();
        if report.keepalives > 0 {
            assert!(contains_train(&r.sink.last().unwrap(), &zero));
        }
        sent += report.keepalives;
    }
    assert!(sent >= 1, "keep-alive for #9 never went out");
}

#[test]
fn active_device_is_not_double_sent() {
    let mut r = keepalive_rig();
    expire_one(&mut r, 9);
    r.clock.set(1_050);
    r.handle
        .send_command(ShockerModel::Petrainer, 9, CommandKind::Vibrate, 5, 500);
    r.clock.set(1_100);
    let report = r.tx.run_cycle();
    assert_eq!((report.commands, report.keepalives), (1, 0));
    let zero = zero_train(ShockerModel::Petrainer, 9);
    assert!(!contains_train(&r.sink.last().unwrap(), &zero));
}
