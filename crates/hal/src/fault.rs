//! Terminal fault state.
//!
//! A hard fault means memory or control flow is already corrupt, so nothing
//! here tries to recover, report or log. The core parks forever and an
//! external debugger attributes the hang to the fault by the absence of
//! further markers.

/// [F1] Never returns, [F2] performs no side effects while parked.
#[inline(never)]
pub fn halt() -> ! {
    loop {
        park();
    }
}

#[cfg(target_arch = "arm")]
#[inline(always)]
fn park() {
    // HardFault runs at fixed priority -1; nothing configurable can preempt it
    core::hint::spin_loop();
}

#[cfg(all(not(target_arch = "arm"), any(test, feature = "std")))]
fn park() {
    // Host builds park the thread instead of burning a core; wakeups loop back
    std::thread::park();
}

#[cfg(all(not(target_arch = "arm"), not(any(test, feature = "std"))))]
#[inline(always)]
fn park() {
    core::hint::spin_loop();
}
