//! Admission through `RadioHandle` and `CommandHandler`.

use shockrf::app::service::CommandHandler;
use shockrf::config::RfConfig;
use shockrf::error::{AdmissionError, EncodeError};
use shockrf::radio::{CommandKind, ShockerCommand, ShockerModel};

use crate::mock_radio::rig;

#[test]
fn every_model_admits_a_vibrate() {
    let r = rig(&RfConfig::default());
    for (i, model) in ShockerModel::ALL.into_iter().enumerate() {
        assert!(
            r.handle
                .send_command(model, 100 + i as u16, CommandKind::Vibrate, 20, 1_000),
            "{model} rejected a plain vibrate"
        );
    }
    assert_eq!(r.handle.active_commands(), ShockerModel::ALL.len());
    assert_eq!(r.handle.stats().admitted, 5);
}

#[test]
fn intensity_limits_follow_the_protocol() {
    let r = rig(&RfConfig::default());
    assert_eq!(
        r.handle
            .try_send_command(ShockerModel::CaiXianlin, 1, CommandKind::Shock, 100, 500),
        Err(AdmissionError::Encode(EncodeError::IntensityOutOfRange {
            intensity: 100,
            max: 99
        }))
    );
    assert!(r
        .handle
        .send_command(ShockerModel::Petrainer, 1, CommandKind::Shock, 100, 500));
}

#[test]
fn light_only_on_998dr() {
    let r = rig(&RfConfig::default());
    for model in ShockerModel::ALL {
        let ok = r.handle.send_command(model, 1, CommandKind::Light, 0, 500);
        assert_eq!(ok, model == ShockerModel::Petrainer998DR, "{model}");
    }
}

#[test]
fn table_full_rejects_new_ids() {
    let r = rig(&RfConfig::default());
    for id in 0..16 {
        assert!(r
            .handle
            .send_command(ShockerModel::D80, id, CommandKind::Vibrate, 1, 60_000));
    }
    assert_eq!(
        r.handle
            .try_send_command(ShockerModel::D80, 99, CommandKind::Vibrate, 1, 60_000),
        Err(AdmissionError::TableFull)
    );
    // Replacing an existing id still works.
    assert!(r
        .handle
        .send_command(ShockerModel::D80, 3, CommandKind::Shock, 1, 60_000));
}

#[test]
fn handler_batch_and_stop() {
    let r = rig(&RfConfig::default());
    let handler = CommandHandler::new(r.handle.clone());
    let list = [
        ShockerCommand::new(ShockerModel::T330, 1, CommandKind::Shock, 10, 2_000),
        ShockerCommand::new(ShockerModel::T330, 2, CommandKind::Sound, 0, 2_000),
        ShockerCommand::new(ShockerModel::T330, 3, CommandKind::Vibrate, 0, 0),
    ];
    assert_eq!(handler.handle_command_list(&list), 2);

    handler
        .handle_command(&ShockerCommand::new(
            ShockerModel::T330,
            1,
            CommandKind::Stop,
            0,
            0,
        ))
        .unwrap();
    assert_eq!(r.handle.active_commands(), 1);
    assert!(r.handle.is_active(1));
}
