//! ShockRF firmware entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Esp32TimeAdapter (Clock)      RmtPulseSink (PulseSink)      │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │   CommandHandler ──▶ RadioHandle ──▶ [rf-tx task, APP_CPU]   │
//! │        ▲                                                     │
//! │   EStopMonitor (main loop poll)                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Gateway and serial collaborators receive a `CommandHandler` clone and
//! call it with decoded commands.
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;

use shockrf::adapters::rmt::RmtPulseSink;
use shockrf::adapters::time::Esp32TimeAdapter;
use shockrf::app::ports::Clock;
use shockrf::app::service::CommandHandler;
use shockrf::config::RfConfig;
use shockrf::drivers::estop::EStopMonitor;
use shockrf::radio::{EncoderRegistry, RfTransmitter};

/// E-stop poll period.
const ESTOP_POLL_MS: u64 = 20;
/// Stats line period.
const STATS_EVERY_MS: u64 = 60_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ShockRF v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    // The persisted document belongs to the config collaborator; boot
    // with defaults and let it push updates through `RfConfig::from_json`.
    let config = RfConfig::default();
    config.validate().context("invalid RF config")?;

    // ── 3. Radio ──────────────────────────────────────────────
    let peripherals = Peripherals::take().context("peripherals already taken")?;
    // SAFETY: `tx_pin` was range-checked by `validate()` and is not
    // claimed by any other driver in this firmware.
    let tx_pin = unsafe { AnyOutputPin::new(config.tx_pin) };
    let sink = RmtPulseSink::new(peripherals.rmt.channel0, tx_pin)
        .context("RMT channel init failed")?;

    let clock = Arc::new(Esp32TimeAdapter::new());
    let transmitter = RfTransmitter::start(
        EncoderRegistry::builtin(),
        sink,
        clock.clone(),
        &config,
    )
    .context("transmitter start failed")?;
    let handler = CommandHandler::new(transmitter.handle());
    info!("Radio ready on GPIO {}", config.tx_pin);

    // ── 4. Emergency stop ─────────────────────────────────────
    let mut estop = if config.estop_enabled {
        // SAFETY: validated, distinct from `tx_pin`.
        let pin = unsafe { AnyInputPin::new(config.estop_pin) };
        let mut driver = PinDriver::input(pin).context("e-stop pin init failed")?;
        driver.set_pull(Pull::Up).context("e-stop pull-up failed")?;
        info!("EStop: monitoring GPIO {}", config.estop_pin);
        Some(EStopMonitor::new(driver, config.estop_hold_to_clear_ms))
    } else {
        warn!("EStop: disabled by config");
        None
    };

    // ── 5. Main loop ──────────────────────────────────────────
    let mut next_stats_ms = clock.now_ms() + STATS_EVERY_MS;
    loop {
        let now = clock.now_ms();

        if let Some(monitor) = estop.as_mut() {
            if let Some(event) = monitor.update(now) {
                handler.on_estop_event(event);
            }
        }

        if now >= next_stats_ms {
            next_stats_ms = now + STATS_EVERY_MS;
            let s = handler.radio().stats();
            info!(
                "Stats: admitted={} rejected={} bursts={} tx_fail={} keepalive={}",
                s.admitted, s.rejected, s.bursts, s.transmit_failures, s.keepalives
            );
        }

        std::thread::sleep(Duration::from_millis(ESTOP_POLL_MS));
    }
}
