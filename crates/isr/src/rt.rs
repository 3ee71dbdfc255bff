//! Target binding for `cortex-m-rt`: the device vector table and the core
//! exception handlers.

use crate::handlers;
use crate::vectors::{DEVICE_INTERRUPTS, DEVICE_TABLE, Vector};
use cortex_m_rt::{ExceptionFrame, exception};

#[used]
#[unsafe(link_section = ".vector_table.interrupts")]
#[unsafe(no_mangle)]
static __INTERRUPTS: [Vector; DEVICE_INTERRUPTS] = DEVICE_TABLE.vectors();

#[exception]
unsafe fn NonMaskableInt() {
    handlers::non_maskable_int();
}

#[exception]
unsafe fn HardFault(_frame: &ExceptionFrame) -> ! {
    handlers::fault()
}

#[exception]
fn SVCall() {
    handlers::sv_call();
}

#[exception]
fn PendSV() {
    handlers::pend_sv();
}

#[exception]
fn SysTick() {
    handlers::sys_tick();
}

// Core slots cortex-m-rt fills with DefaultHandler
#[exception]
unsafe fn DefaultHandler(_irqn: i16) {
    handlers::fault()
}
