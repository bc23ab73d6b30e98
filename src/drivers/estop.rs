//! Emergency-stop button monitor.
//!
//! ## Hardware
//!
//! Active-low switch to GND with the internal pull-up enabled. The pin is
//! polled from the main loop; no ISR.
//!
//! ## State machine
//!
//! | From              | Condition                                   | To                |
//! |-------------------|---------------------------------------------|-------------------|
//! | `AllClear`        | pressed                                     | `EStoppedAndHeld` |
//! | `EStoppedAndHeld` | released                                    | `EStopped`        |
//! | `EStopped`        | held continuously for `hold_to_clear_ms`    | `EStoppedCleared` |
//! | `EStoppedCleared` | released                                    | `AllClear`        |
//!
//! The device stays stopped until the final release, so a stuck button can
//! never clear itself.

use embedded_hal::digital::InputPin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EStopState {
    AllClear,
    EStoppedAndHeld,
    EStopped,
    EStoppedCleared,
}

impl EStopState {
    pub fn is_stopped(self) -> bool {
        self != Self::AllClear
    }
}

/// Edges the application cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EStopEvent {
    Engaged,
    Cleared,
}

pub struct EStopMonitor<P> {
    pin: P,
    state: EStopState,
    hold_to_clear_ms: u64,
    last_pressed: bool,
    last_change_ms: u64,
    engaged_at_ms: u64,
}

impl<P: InputPin> EStopMonitor<P> {
    pub fn new(pin: P, hold_to_clear_ms: u32) -> Self {
        Self {
            pin,
            state: EStopState::AllClear,
            hold_to_clear_ms: u64::from(hold_to_clear_ms),
            last_pressed: false,
            last_change_ms: 0,
            engaged_at_ms: 0,
        }
    }

    pub fn state(&self) -> EStopState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.state.is_stopped()
    }

    /// When the current stop began, if stopped.
    pub fn engaged_at_ms(&self) -> Option<u64> {
        self.is_stopped().then_some(self.engaged_at_ms)
    }

    /// Sample the pin and advance the state machine.
    pub fn update(&mut self, now_ms: u64) -> Option<EStopEvent> {
        // A pin we cannot read counts as pressed.
        let pressed = self.pin.is_low().unwrap_or_else(|_| {
            log::warn!("EStop: pin read failed, treating as pressed");
            true
        });
        let changed = pressed != self.last_pressed;
        if changed {
            self.last_change_ms = now_ms;
        }

        let mut event = None;
        match self.state {
            EStopState::AllClear => {
                if pressed {
                    self.state = EStopState::EStoppedAndHeld;
                    self.engaged_at_ms = now_ms;
                    log::warn!("EStop: emergency stop engaged");
                    event = Some(EStopEvent::Engaged);
                }
            }
            EStopState::EStoppedAndHeld => {
                if !pressed {
                    self.state = EStopState::EStopped;
                }
            }
            EStopState::EStopped => {
                if pressed
                    && !changed
                    && now_ms.saturating_sub(self.last_change_ms) >= self.hold_to_clear_ms
                {
                    self.state = EStopState::EStoppedCleared;
                    log::info!("EStop: cleared, waiting for release");
                }
            }
            EStopState::EStoppedCleared => {
                if !pressed {
                    self.state = EStopState::AllClear;
                    log::info!("EStop: all clear");
                    event = Some(EStopEvent::Cleared);
                }
            }
        }

        self.last_pressed = pressed;
        event
    }
}
