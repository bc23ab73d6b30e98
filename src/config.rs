//! Radio configuration.
//!
//! Tunables for the transmission pipeline. The persisted form lives with
//! the configuration collaborator; it hands this module either the JSON
//! document or a postcard blob.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pins;
use crate::radio::pulse::MAX_TRAIN_SYMBOLS;
use crate::radio::transmitter::MAX_BURST_SYMBOLS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfConfig {
    // --- Radio ---
    /// GPIO wired to the transmitter module's data pin
    pub tx_pin: i32,
    /// Symbols per burst (one RMT write)
    pub max_burst_symbols: u16,
    /// Longest idle wait between cycles (ms)
    pub idle_wait_ms: u32,

    // --- Keep-alive ---
    pub keepalive_enabled: bool,
    /// Quiet time after a command before a device gets a keep-alive (ms)
    pub keepalive_interval_ms: u32,
    /// How long each keep-alive transmits (ms)
    pub keepalive_transmit_ms: u32,

    // --- Task ---
    /// FreeRTOS priority of the transmission task
    pub tx_task_priority: u8,
    pub tx_task_stack_kb: usize,

    // --- Emergency stop ---
    pub estop_enabled: bool,
    pub estop_pin: i32,
    /// Hold time needed to release a latched e-stop (ms)
    pub estop_hold_to_clear_ms: u32,
}

impl Default for RfConfig {
    fn default() -> Self {
        Self {
            // Radio
            tx_pin: pins::RF_TX_GPIO,
            max_burst_symbols: MAX_BURST_SYMBOLS as u16, // 8 frames of 43
            idle_wait_ms: 1_000,

            // Keep-alive
            keepalive_enabled: true,
            keepalive_interval_ms: 60_000, // 1/min
            keepalive_transmit_ms: 1_000,

            // Task
            tx_task_priority: 20,
            tx_task_stack_kb: 16,

            // E-stop
            estop_enabled: false,
            estop_pin: pins::ESTOP_GPIO,
            estop_hold_to_clear_ms: 5_000,
        }
    }
}

impl RfConfig {
    /// Parse the persisted JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed RF config JSON"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| Error::Config("RF config encode failed"))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let cfg: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("corrupted RF config blob"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range checks. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        if !(0..=pins::MAX_GPIO).contains(&self.tx_pin) {
            return Err(Error::Config("tx_pin is not a GPIO"));
        }
        let burst = usize::from(self.max_burst_symbols);
        if !(MAX_TRAIN_SYMBOLS..=MAX_BURST_SYMBOLS).contains(&burst) {
            return Err(Error::Config("max_burst_symbols must hold at least one frame"));
        }
        if self.idle_wait_ms == 0 {
            return Err(Error::Config("idle_wait_ms must be non-zero"));
        }
        if self.keepalive_transmit_ms == 0 || self.keepalive_transmit_ms >= self.keepalive_interval_ms {
            return Err(Error::Config(
                "keepalive_transmit_ms must be non-zero and below keepalive_interval_ms",
            ));
        }
        if self.tx_task_priority == 0 || self.tx_task_priority > 24 {
            return Err(Error::Config("tx_task_priority out of FreeRTOS range"));
        }
        if self.tx_task_stack_kb < 4 {
            return Err(Error::Config("tx_task_stack_kb too small"));
        }
        if self.estop_enabled {
            if !(0..=pins::MAX_GPIO).contains(&self.estop_pin) {
                return Err(Error::Config("estop_pin is not a GPIO"));
            }
            if self.estop_pin == self.tx_pin {
                return Err(Error::Config("estop_pin collides with tx_pin"));
            }
        }
        Ok(())
    }
}
