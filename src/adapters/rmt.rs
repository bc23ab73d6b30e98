//! Radio adapters implementing [`PulseSink`].
//!
//! - **`target_os = "espidf"`**: [`RmtPulseSink`] drives the RMT peripheral
//!   at 1 µs per tick (80 MHz APB / 80). Each [`Pulse`] becomes one RMT
//!   item: carrier high for `high_ticks`, low for `low_ticks`.
//! - **everywhere**: [`SimPulseSink`] logs the burst and sleeps for its
//!   on-air time, so the loop paces itself the same as on hardware.

use std::time::Duration;

use crate::app::ports::PulseSink;
use crate::error::TransmitError;
use crate::radio::pulse::Pulse;

#[cfg(target_os = "espidf")]
pub use esp::RmtPulseSink;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::gpio::OutputPin;
    use esp_idf_hal::peripheral::Peripheral;
    use esp_idf_hal::rmt::config::TransmitConfig;
    use esp_idf_hal::rmt::{
        PinState, Pulse as RmtPulse, PulseTicks, RmtChannel, TxRmtDriver, VariableLengthSignal,
    };
    use esp_idf_svc::sys::EspError;

    use super::{Pulse, PulseSink, TransmitError};

    /// APB runs at 80 MHz; divide down to 1 MHz.
    const CLOCK_DIVIDER: u8 = 80;

    pub struct RmtPulseSink<'d> {
        driver: TxRmtDriver<'d>,
    }

    impl<'d> RmtPulseSink<'d> {
        pub fn new<C: RmtChannel>(
            channel: impl Peripheral<P = C> + 'd,
            pin: impl Peripheral<P = impl OutputPin> + 'd,
        ) -> Result<Self, EspError> {
            let config = TransmitConfig::new().clock_divider(CLOCK_DIVIDER);
            let driver = TxRmtDriver::new(channel, pin, &config)?;
            log::info!("RFTX: RMT channel ready (1 tick = 1us)");
            Ok(Self { driver })
        }
    }

    fn ticks(n: u16) -> Result<PulseTicks, TransmitError> {
        PulseTicks::new(n).map_err(|_| TransmitError::InvalidPulse)
    }

    impl PulseSink for RmtPulseSink<'_> {
        fn transmit(&mut self, pulses: &[Pulse]) -> Result<(), TransmitError> {
            let mut signal = VariableLengthSignal::with_capacity(pulses.len() * 2);
            for p in pulses {
                let high = RmtPulse::new(PinState::High, ticks(p.high_ticks)?);
                let low = RmtPulse::new(PinState::Low, ticks(p.low_ticks)?);
                signal
                    .push([&high, &low])
                    .map_err(|_| TransmitError::InvalidPulse)?;
            }
            self.driver
                .start_blocking(&signal)
                .map_err(|e| TransmitError::Driver(e.code()))
        }
    }
}

/// Host stand-in for the radio.
#[derive(Debug, Default)]
pub struct SimPulseSink {
    bursts: u32,
    symbols: u64,
    /// Sleep for the burst's on-air time.
    realtime: bool,
}

impl SimPulseSink {
    pub fn new(realtime: bool) -> Self {
        Self {
            realtime,
            ..Self::default()
        }
    }

    pub fn bursts(&self) -> u32 {
        self.bursts
    }

    pub fn symbols(&self) -> u64 {
        self.symbols
    }
}

impl PulseSink for SimPulseSink {
    fn transmit(&mut self, pulses: &[Pulse]) -> Result<(), TransmitError> {
        let on_air_us: u64 = pulses.iter().map(|p| u64::from(p.ticks())).sum();
        self.bursts = self.bursts.wrapping_add(1);
        self.symbols += pulses.len() as u64;
        log::trace!(
            "RFTX(sim): burst #{} {} symbols, {}us",
            self.bursts,
            pulses.len(),
            on_air_us
        );
        if self.realtime {
            std::thread::sleep(Duration::from_micros(on_air_us));
        }
        Ok(())
    }
}
