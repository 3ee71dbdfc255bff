//! Test-harness instrumentation around the timer interrupt.
//!
//! Every timer interrupt is bracketed: virtual time advances once before
//! the hardware is serviced and one execution marker fires after it. The
//! harness reads the virtual tick counter asynchronously and tolerates a
//! value up to one period stale.
//!
//! Behaviors: [T1]-[T6]

use crate::peripherals::BasicTimer;
use core::sync::atomic::{AtomicPtr, compiler_fence};
use portable_atomic::{AtomicU32, Ordering};

/// Externally supplied virtual-time advance function.
pub type AdvanceFn = fn();

/// Receives the name of every emitted marker (e.g. semihosting or RTT).
pub type MarkerSink = fn(&'static str);

/// Process-wide virtual time as seen by the harness.
pub struct VirtualClock {
    ticks: AtomicU32,
    advance: AtomicPtr<()>,
}

impl VirtualClock {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
            advance: AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    /// Installs the external advance function. Thread mode, before the timer
    /// interrupt is enabled.
    pub fn set_advance(&self, advance: AdvanceFn) {
        self.advance.store(advance as *mut (), Ordering::Release);
    }

    fn advance_fn(&self) -> Option<AdvanceFn> {
        let ptr = self.advance.load(Ordering::Acquire);
        if ptr.is_null() {
            None
        } else {
            // SAFETY: only ever stored from an `AdvanceFn` in `set_advance`
            Some(unsafe { core::mem::transmute::<*mut (), AdvanceFn>(ptr) })
        }
    }

    /// [T1] Calls the external advance function once and adds one tick.
    #[inline]
    pub fn advance(&self) {
        if let Some(advance) = self.advance_fn() {
            advance();
        }
        self.ticks.fetch_add(1, Ordering::Release); // [T1]
    }

    /// Current virtual tick count.
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

/// The clock the timer handler advances.
pub static VIRTUAL_CLOCK: VirtualClock = VirtualClock::new();

static MARKER_SINK: AtomicPtr<()> = AtomicPtr::new(core::ptr::null_mut());

/// Installs the marker sink.
pub fn set_marker_sink(sink: MarkerSink) {
    MARKER_SINK.store(sink as *mut (), Ordering::Release);
}

pub fn clear_marker_sink() {
    MARKER_SINK.store(core::ptr::null_mut(), Ordering::Release);
}

/// A named program point an external probe can detect.
///
/// Emitting calls the marker's probe, a non-inlined unmangled function named
/// after the marker that a debugger can break on, then forwards the name to
/// the installed sink.
pub struct Marker {
    name: &'static str,
    probe: extern "C" fn(),
}

impl Marker {
    #[doc(hidden)]
    pub const fn new(name: &'static str, probe: extern "C" fn()) -> Self {
        Self { name, probe }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn emit(&self) {
        (self.probe)();
        let ptr = MARKER_SINK.load(Ordering::Acquire);
        if !ptr.is_null() {
            // SAFETY: only ever stored from a `MarkerSink` in `set_marker_sink`
            let sink = unsafe { core::mem::transmute::<*mut (), MarkerSink>(ptr) };
            sink(self.name);
        }
    }
}

#[doc(hidden)]
#[inline(always)]
pub fn probe_barrier() {
    compiler_fence(Ordering::SeqCst);
}

/// Defines a [`Marker`] together with its probe symbol.
///
/// ```ignore
/// pub static DONE: Marker = marker!(Transfer_Done);
/// ```
#[macro_export]
macro_rules! marker {
    ($label:ident) => {{
        #[allow(non_snake_case)]
        #[inline(never)]
        #[unsafe(no_mangle)]
        extern "C" fn $label() {
            $crate::instrument::probe_barrier();
        }
        $crate::instrument::Marker::new(stringify!($label), $label)
    }};
}

/// Emitted once at the end of every TIM7 interrupt.
pub static TIM7_END: Marker = marker!(TIM7_IRQHandler_End);

/// The two instrumentation calls made around timer servicing.
pub trait TestHook {
    fn advance(&self);
    fn mark(&self, marker: &Marker);
}

/// Hook wired to a [`VirtualClock`] and the marker sink.
pub struct Harness<'a> {
    clock: &'a VirtualClock,
}

impl<'a> Harness<'a> {
    pub const fn new(clock: &'a VirtualClock) -> Self {
        Self { clock }
    }
}

impl TestHook for Harness<'_> {
    fn advance(&self) {
        self.clock.advance();
    }

    fn mark(&self, marker: &Marker) {
        marker.emit();
    }
}

/// [T2] advance, then service, then mark; [T3] each exactly once;
/// [T4] a missing timer still advances and marks.
#[inline]
pub fn bracket<H, T>(hook: &H, timer: Option<&mut T>, marker: &Marker)
where
    H: TestHook + ?Sized,
    T: BasicTimer + ?Sized,
{
    hook.advance();
    if let Some(timer) = timer {
        timer.service();
    }
    hook.mark(marker);
}
