//! System tick counter and the timing helpers built on it.
//!
//! The SysTick handler is the only writer. Delays and timeouts elsewhere
//! depend on it firing at a fixed 1 kHz, so its body stays a counter update
//! plus one callback.

use core::sync::atomic::AtomicPtr;
use portable_atomic::{AtomicU32, Ordering};

/// Platform periodic service invoked from every SysTick.
pub type PeriodicService = fn();

/// Millisecond tick counter. Behaviors: [K1]-[K5]
pub struct TickCounter {
    ticks: AtomicU32,
    service: AtomicPtr<()>,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
            service: AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    pub fn set_periodic_service(&self, service: PeriodicService) {
        self.service.store(service as *mut (), Ordering::Release);
    }

    pub fn clear_periodic_service(&self) {
        self.service.store(core::ptr::null_mut(), Ordering::Release);
    }

    /// [K1] +1 per call, wrapping at `u32::MAX`.
    #[inline]
    pub fn increment(&self) {
        self.ticks.fetch_add(1, Ordering::Release);
    }

    /// [K2] Increments, then runs the periodic service.
    #[inline]
    pub fn on_tick(&self) {
        self.increment();
        let ptr = self.service.load(Ordering::Acquire);
        if !ptr.is_null() {
            // SAFETY: only ever stored from a `PeriodicService`
            let service = unsafe { core::mem::transmute::<*mut (), PeriodicService>(ptr) };
            service();
        }
    }

    pub fn now(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }

    /// [K3] Ticks since `since`, correct across counter wrap.
    pub fn elapsed(&self, since: u32) -> u32 {
        self.now().wrapping_sub(since)
    }

    /// [K4] True once `timeout` ticks have passed since `start`.
    pub fn has_expired(&self, start: u32, timeout: u32) -> bool {
        self.elapsed(start) >= timeout
    }

    /// [K5] Busy-waits at least `ms` full ticks.
    ///
    /// One extra tick is added (except for `u32::MAX`) because the first
    /// tick may already be partly elapsed.
    pub fn delay(&self, ms: u32) {
        let start = self.now();
        let wait = if ms < u32::MAX { ms + 1 } else { ms };
        while !self.has_expired(start, wait) {
            core::hint::spin_loop();
        }
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// The counter advanced by the SysTick entry point.
pub static SYSTEM_TICK: TickCounter = TickCounter::new();
