//! Peripheral handles consumed by the interrupt handlers.
//!
//! The driver layer owns the state behind each handle and installs it into
//! the matching slot; handlers only borrow it for one invocation.

use crate::flags::I2cStatus;
use dut_hal::HandleCell;

/// An I2C peripheral whose event and error interrupts share one line.
pub trait I2cBus: Send {
    /// Reads the interrupt status register. Called once per interrupt.
    fn status(&self) -> I2cStatus;

    /// Error path. Clears the error flags it handles.
    fn on_error(&mut self, status: I2cStatus);

    /// Normal-event path. Must tolerate a spurious (empty) snapshot.
    fn on_event(&mut self, status: I2cStatus);
}

/// One sub-handler on a shared line.
///
/// Invoked every time the line fires, whether or not its own source raised
/// it; implementations check their own flags and return early when idle.
pub trait LineSource: Send {
    fn on_interrupt(&mut self);
}

/// A basic timer serviced from its update interrupt.
pub trait BasicTimer: Send {
    /// Hardware servicing: acknowledge the update flag, run period callbacks.
    fn service(&mut self);
}

pub type I2cSlot = HandleCell<dyn I2cBus>;
pub type LineSlot = HandleCell<dyn LineSource>;
pub type TimerSlot = HandleCell<dyn BasicTimer>;

/// I2C1 event + error line.
pub static I2C1: I2cSlot = HandleCell::new("I2C1");

/// DMA1 channel 2, I2C1 transmit. Primary on the channel 2/3 line.
pub static DMA1_CH2_I2C1_TX: LineSlot = HandleCell::new("DMA1_CH2/I2C1_TX");

/// DMA1 channel 3, I2C1 receive. Secondary on the channel 2/3 line.
pub static DMA1_CH3_I2C1_RX: LineSlot = HandleCell::new("DMA1_CH3/I2C1_RX");

/// TIM7, the harness time base.
pub static TIM7: TimerSlot = HandleCell::new("TIM7");
