//! Fixed-order dispatch for one physical line shared by two sources.
//!
//! Both sub-handlers run on every firing, primary first. Neither is
//! pre-filtered here: each checks its own source and no-ops when idle.

use crate::peripherals::{DMA1_CH2_I2C1_TX, DMA1_CH3_I2C1_RX, LineSlot, LineSource};

/// A shared line bound to its two handle slots.
pub struct SharedLine<'a> {
    primary: &'a LineSlot,
    secondary: &'a LineSlot,
}

impl<'a> SharedLine<'a> {
    pub const fn new(primary: &'a LineSlot, secondary: &'a LineSlot) -> Self {
        Self { primary, secondary }
    }

    /// [S1] primary before secondary, [S2] an empty slot does not stop the other.
    #[inline]
    pub fn fire(&self) {
        self.primary.with(|h| h.on_interrupt());
        self.secondary.with(|h| h.on_interrupt());
    }
}

/// DMA1 channels 2 and 3: I2C1 transmit first, then receive.
pub static DMA1_CHANNEL2_3: SharedLine<'static> = SharedLine::new(&DMA1_CH2_I2C1_TX, &DMA1_CH3_I2C1_RX);
