//! Fuzz target: every protocol encoder.
//!
//! Any `(model, id, kind, intensity)` must either produce a complete frame
//! of the protocol's length or a typed error. Never a panic.
//!
//! cargo fuzz run fuzz_encoders

#![no_main]

use libfuzzer_sys::fuzz_target;
use shockrf::radio::pulse::MAX_TRAIN_SYMBOLS;
use shockrf::radio::{CommandKind, EncoderRegistry, ShockerModel};

const KINDS: [CommandKind; CommandKind::COUNT] = [
    CommandKind::Stop,
    CommandKind::Shock,
    CommandKind::Vibrate,
    CommandKind::Sound,
    CommandKind::Light,
];

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }
    let model = ShockerModel::ALL[usize::from(data[0]) % ShockerModel::COUNT];
    let kind = KINDS[usize::from(data[1]) % CommandKind::COUNT];
    let id = u16::from_be_bytes([data[2], data[3]]);
    let intensity = data[4];

    let reg = EncoderRegistry::builtin();
    if let Ok(train) = reg.encode(model, id, kind, intensity) {
        assert!(!train.is_empty() && train.len() <= MAX_TRAIN_SYMBOLS);
        assert!(train.iter().all(|p| p.high_ticks > 0 && p.low_ticks > 0));
        assert_eq!(Ok(&train), reg.encode(model, id, kind, intensity).as_ref());
    }
    let zero = reg.zero_sequence(model, id).expect("zero frame must always encode");
    assert!(!zero.is_empty());
});
