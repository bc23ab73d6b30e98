//! Command handling service.
//!
//! [`CommandHandler`] sits between the gateway / serial collaborators and
//! the radio. It owns the rules that are not about waveforms:
//!
//! - `Stop` means "clear everything, then a short zero-intensity vibrate"
//!   so the receiver ends on a harmless frame.
//! - While the emergency stop is engaged every command is refused.
//!
//! ```text
//!  gateway ──▶ ┌────────────────┐
//!  serial  ──▶ │ CommandHandler │ ──▶ RadioHandle
//!  e-stop  ──▶ └────────────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::drivers::estop::EStopEvent;
use crate::error::AdmissionError;
use crate::radio::transmitter::RadioHandle;
use crate::radio::types::{CommandKind, ShockerCommand};

/// How long the vibrate-at-zero after a `Stop` is kept on air.
pub const STOP_VIBRATE_DURATION_MS: u32 = 300;

#[derive(Clone, Debug)]
pub struct CommandHandler {
    radio: RadioHandle,
    estopped: Arc<AtomicBool>,
}

impl CommandHandler {
    pub fn new(radio: RadioHandle) -> Self {
        Self {
            radio,
            estopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn radio(&self) -> &RadioHandle {
        &self.radio
    }

    pub fn handle_command(&self, cmd: &ShockerCommand) -> Result<(), AdmissionError> {
        if self.is_emergency_stopped() {
            warn!(
                "Command: {} #{} {} refused, emergency stop engaged",
                cmd.model, cmd.shocker_id, cmd.kind
            );
            return Err(AdmissionError::EmergencyStop);
        }

        if cmd.kind == CommandKind::Stop {
            info!("Command: stop requested for {} #{}", cmd.model, cmd.shocker_id);
            self.radio.clear_pending_commands();
            return self.radio.try_send_command(
                cmd.model,
                cmd.shocker_id,
                CommandKind::Vibrate,
                0,
                STOP_VIBRATE_DURATION_MS,
            );
        }

        self.radio.try_send_command(
            cmd.model,
            cmd.shocker_id,
            cmd.kind,
            cmd.intensity,
            cmd.duration_ms,
        )
    }

    /// Admit a batch in order. Returns how many were accepted.
    pub fn handle_command_list(&self, cmds: &[ShockerCommand]) -> usize {
        let accepted = cmds
            .iter()
            .filter(|cmd| self.handle_command(cmd).is_ok())
            .count();
        if accepted < cmds.len() {
            warn!("Command: {}/{} commands accepted", accepted, cmds.len());
        }
        accepted
    }

    /// Engaging halts the radio and forgets keep-alive devices; releasing
    /// only re-opens admission.
    pub fn set_emergency_stop(&self, engaged: bool) {
        let was = self.estopped.swap(engaged, Ordering::SeqCst);
        if engaged && !was {
            warn!("Command: emergency stop engaged, halting radio");
            self.radio.clear_pending_commands_and_keepalive();
        } else if !engaged && was {
            info!("Command: emergency stop released");
        }
    }

    /// The controlling client went away: nothing it started keeps running.
    pub fn on_controller_disconnected(&self) {
        info!("Command: controller disconnected, halting radio");
        self.radio.clear_pending_commands_and_keepalive();
    }

    pub fn on_estop_event(&self, event: EStopEvent) {
        self.set_emergency_stop(event == EStopEvent::Engaged);
    }

    pub fn is_emergency_stopped(&self) -> bool {
        self.estopped.load(Ordering::SeqCst)
    }

    pub fn set_keepalive_enabled(&self, enabled: bool) {
        self.radio.set_keepalive_enabled(enabled);
    }
}
