// Cortex-M0 interrupt masking.
// Behaviors: [I1]-[I6] mask/restore cycle
//
// Only thread-mode code masks interrupts. Handlers never do: nested
// preemption stays legal for everything the vector table dispatches.

#[cfg(target_arch = "arm")]
mod arch {
    use cortex_m::register::primask;

    /// [I1] Masks interrupts, [I2] returns previous state
    #[inline(always)]
    pub fn disable() -> u32 {
        let was_active = primask::read().is_active(); // [I2] capture prev state
        cortex_m::interrupt::disable(); // [I1] set PRIMASK
        u32::from(was_active)
    }

    /// [I3] Restores previous state
    #[inline(always)]
    pub fn restore(state: u32) {
        if state != 0 {
            // SAFETY: interrupts were active when the matching disable() ran
            unsafe { cortex_m::interrupt::enable() };
        }
    }

    /// [I4] true when enabled, [I5] false when masked
    #[inline(always)]
    pub fn is_enabled() -> bool {
        primask::read().is_active()
    }
}

#[cfg(all(not(target_arch = "arm"), any(test, feature = "std")))]
mod arch {
    extern crate std;
    use std::cell::Cell;

    std::thread_local! {
        static ENABLED: Cell<bool> = const { Cell::new(true) };
    }

    /// [I1] Masks interrupts, [I2] returns previous state (mock impl)
    pub fn disable() -> u32 {
        let prev = is_enabled(); // [I2]
        ENABLED.with(|e| e.set(false)); // [I1]
        u32::from(prev)
    }

    /// [I3] Restores previous state (mock impl)
    pub fn restore(state: u32) {
        ENABLED.with(|e| e.set(state != 0));
    }

    /// [I4][I5] (mock impl)
    pub fn is_enabled() -> bool {
        ENABLED.with(Cell::get)
    }
}

#[cfg(all(not(target_arch = "arm"), not(any(test, feature = "std"))))]
mod arch {
    // Stub for no-std non-arm builds
    pub fn disable() -> u32 {
        0
    }

    pub fn restore(_state: u32) {}

    pub fn is_enabled() -> bool {
        true
    }
}

pub use arch::{disable, is_enabled, restore};

/// Masks interrupts until dropped, then restores the state found on entry.
pub struct InterruptGuard {
    state: u32,
}

impl InterruptGuard {
    pub fn new() -> Self {
        Self { state: disable() }
    }
}

impl Default for InterruptGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InterruptGuard {
    /// [I6] disable→restore preserves the outer state
    fn drop(&mut self) {
        restore(self.state);
    }
}

/// Runs `f` with interrupts masked.
pub fn free<R>(f: impl FnOnce() -> R) -> R {
    let _guard = InterruptGuard::new();
    f()
}
