#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Interrupt dispatch for an STM32F07x device under test.
//!
//! Maps the hardware vectors to peripheral handling paths and brackets the
//! TIM7 interrupt with the harness's virtual-time advance and end marker.
//!
//! Bring-up from thread mode, before unmasking interrupts:
//!
//! ```ignore
//! dut_isr::init(&dut_isr::Config {
//!     advance: Some(timer_advance),
//!     ..Default::default()
//! })?;
//! dut_isr::peripherals::TIM7.install(tim7_driver)?;
//! ```

pub mod config;
pub mod demux;
pub mod flags;
mod handlers;
pub mod instrument;
pub mod logger;
pub mod peripherals;
pub mod shared;
pub mod systick;
pub mod vectors;

#[cfg(all(feature = "rt", target_arch = "arm"))]
mod rt;

pub use config::{Config, ConfigError, init};
pub use demux::Path;
pub use dut_hal::{HandleCell, HandleError};
pub use flags::{DmaChannel, DmaChannelStatus, I2cStatus};
pub use instrument::{Marker, TestHook, VirtualClock};
pub use vectors::{Exception, Interrupt, VectorError};
