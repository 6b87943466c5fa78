// src/asistenku/utils/time.rs
use crate::models::common::{TimestampMs, TimestampNs};
use std::cell::Cell;

pub const NANOS_PER_MILLI: u64 = 1_000_000;

/// Source of "now". Injected wherever expiry or creation times are computed
/// so that tests can pin the time.
pub trait Clock {
    fn now_ms(&self) -> TimestampMs;

    fn now_ns(&self) -> TimestampNs {
        self.now_ms().saturating_mul(NANOS_PER_MILLI)
    }
}

/// Wall clock: replica time inside a canister, system time elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        self.now_ns() / NANOS_PER_MILLI
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ns(&self) -> TimestampNs {
        ic_cdk::api::time()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ns(&self) -> TimestampNs {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    }
}

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<TimestampMs>,
}

impl ManualClock {
    pub fn new(now_ms: TimestampMs) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: TimestampMs) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> TimestampMs {
        self.now_ms.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now_ms(&self) -> TimestampMs {
        (**self).now_ms()
    }

    fn now_ns(&self) -> TimestampNs {
        (**self).now_ns()
    }
}

/// Converts a backend nanosecond timestamp to milliseconds.
pub fn ns_to_ms(ns: TimestampNs) -> TimestampMs {
    ns / NANOS_PER_MILLI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        assert_eq!(clock.now_ns(), 1_500 * NANOS_PER_MILLI);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
