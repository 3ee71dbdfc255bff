//! Interrupt entry points, one per vector.
//!
//! Invoked by hardware dispatch only (or by [`crate::vectors::raise`] on the
//! host). No parameters, no return value; bodies stay short and never block,
//! log or mask interrupts.

use crate::instrument::{self, Harness, TIM7_END, VIRTUAL_CLOCK};
use crate::peripherals::{self, BasicTimer};
use crate::{config, demux, shared, systick};
use dut_hal::fault;

/// Enters the terminal fault state.
#[inline(always)]
pub(crate) fn fault() -> ! {
    fault::halt()
}

// Placeholders: return immediately, no side effects.

pub(crate) extern "C" fn non_maskable_int() {}

pub(crate) extern "C" fn sv_call() {}

pub(crate) extern "C" fn pend_sv() {}

/// RCC and CRS global interrupt.
pub(crate) extern "C" fn rcc_crs() {}

pub(crate) extern "C" fn hard_fault() {
    fault()
}

/// Device vectors nobody bound. Enabling one is a wiring fault.
pub(crate) extern "C" fn unbound() {
    fault()
}

pub(crate) extern "C" fn sys_tick() {
    systick::SYSTEM_TICK.on_tick();
}

/// DMA1 channels 2 and 3: I2C1 TX sub-handler, then I2C1 RX.
pub(crate) extern "C" fn dma1_ch2_3() {
    shared::DMA1_CHANNEL2_3.fire();
}

/// TIM7: virtual time advance, hardware service, end marker.
pub(crate) extern "C" fn tim7() {
    let harness = Harness::new(&VIRTUAL_CLOCK);
    let serviced = peripherals::TIM7.with(|timer| instrument::bracket(&harness, Some(timer), &TIM7_END));
    if serviced.is_none() {
        // no driver handle, or a preempted occurrence holds it: the harness
        // still gets its tick and marker
        instrument::bracket::<_, dyn BasicTimer>(&harness, None, &TIM7_END);
    }
}

/// I2C1 event and error line.
pub(crate) extern "C" fn i2c1() {
    let errors = config::i2c_error_flags();
    peripherals::I2C1.with(|bus| demux::demultiplex(bus, errors));
}
