//! Keep-alive scheduling.
//!
//! Many receivers power down after a few minutes without traffic. Once a
//! device's command expires it becomes *known*; every `interval_ms` the
//! loop then transmits its vibrate-at-zero frame for `transmit_ms`.
//!
//! A window stays open past `transmit_ms` until its frame has actually
//! been sent once, so a full burst delays a keep-alive but never drops it.
//!
//! The scheduler is owned by the transmission loop and never locked.

use heapless::Vec;

use super::pulse::PulseTrain;

/// Devices remembered for keep-alive. The least recently tracked one is
/// evicted when a new device expires into a full set.
pub const MAX_KEEPALIVE_DEVICES: usize = 16;

#[derive(Debug, Clone)]
struct KnownDevice {
    shocker_id: u16,
    zero_train: PulseTrain,
    next_due_ms: u64,
    window_end_ms: Option<u64>,
    /// The current window has put at least one frame on air.
    sent: bool,
}

#[derive(Debug)]
pub struct KeepAliveScheduler {
    devices: Vec<KnownDevice, MAX_KEEPALIVE_DEVICES>,
    interval_ms: u64,
    transmit_ms: u64,
}

impl KeepAliveScheduler {
    pub fn new(interval_ms: u32, transmit_ms: u32) -> Self {
        Self {
            devices: Vec::new(),
            interval_ms: u64::from(interval_ms),
            transmit_ms: u64::from(transmit_ms),
        }
    }

    /// Remember `shocker_id`, whose last command just expired at `now_ms`.
    pub fn track(&mut self, shocker_id: u16, zero_train: PulseTrain, now_ms: u64) {
        if let Some(pos) = self.devices.iter().position(|d| d.shocker_id == shocker_id) {
            self.devices.remove(pos);
        } else if self.devices.is_full() {
            let evicted = self.devices.remove(0);
            log::debug!("RFTX: keep-alive set full, evicting {}", evicted.shocker_id);
        }
        let pushed = self.devices.push(KnownDevice {
            shocker_id,
            zero_train,
            next_due_ms: now_ms.saturating_add(self.interval_ms),
            window_end_ms: None,
            sent: false,
        });
        // A slot was freed above.
        debug_assert!(pushed.is_ok());
    }

    pub fn forget_all(&mut self) {
        self.devices.clear();
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn contains(&self, shocker_id: u16) -> bool {
        self.devices.iter().any(|d| d.shocker_id == shocker_id)
    }

    /// Advance every device's window to `now_ms` and return the zero
    /// trains to transmit this cycle. Devices still waiting for their first
    /// frame of the window come first, then the rest in tracking order.
    ///
    /// Devices listed in `active` already have a command on air; that
    /// counts as this window's traffic and they are skipped.
    ///
    /// Call [`mark_sent`](Self::mark_sent) for the ones that made it into
    /// the burst.
    pub fn due(&mut self, now_ms: u64, active: &[u16]) -> Vec<(u16, &PulseTrain), MAX_KEEPALIVE_DEVICES> {
        for dev in &mut self.devices {
            if dev.window_end_ms.is_some_and(|end| now_ms >= end) && dev.sent {
                dev.window_end_ms = None;
            }
            if dev.window_end_ms.is_none() && now_ms >= dev.next_due_ms {
                dev.window_end_ms = Some(now_ms.saturating_add(self.transmit_ms));
                dev.next_due_ms = now_ms.saturating_add(self.interval_ms);
                dev.sent = false;
            }
            if dev.window_end_ms.is_some() && active.contains(&dev.shocker_id) {
                dev.sent = true;
            }
        }

        let open = |d: &&KnownDevice| d.window_end_ms.is_some() && !active.contains(&d.shocker_id);
        let mut out = Vec::new();
        let pending = self.devices.iter().filter(open).filter(|d| !d.sent);
        let repeats = self.devices.iter().filter(open).filter(|d| d.sent);
        for dev in pending.chain(repeats) {
            // `out` has the same capacity as `devices`.
            let pushed = out.push((dev.shocker_id, &dev.zero_train));
            debug_assert!(pushed.is_ok());
        }
        out
    }

    /// Record that `shocker_id`'s zero frame went out this window.
    pub fn mark_sent(&mut self, shocker_id: u16) {
        if let Some(dev) = self.devices.iter_mut().find(|d| d.shocker_id == shocker_id) {
            dev.sent = true;
        }
    }

    /// Milliseconds until the scheduler next needs the loop, if ever.
    pub fn ms_until_next(&self, now_ms: u64) -> Option<u64> {
        self.devices
            .iter()
            .map(|d| {
                if d.window_end_ms.is_some() {
                    0
                } else {
                    d.next_due_ms.saturating_sub(now_ms)
                }
            })
            .min()
    }
}
