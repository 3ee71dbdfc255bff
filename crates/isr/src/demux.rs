//! Error/event demultiplexing for interrupt lines that carry both.
//!
//! The status register is read exactly once. That snapshot decides the path
//! and is handed to it, so the branch never observes flags that changed
//! after classification. Clearing happens inside the chosen path only.

use crate::flags::I2cStatus;
use crate::peripherals::I2cBus;
use bitflags::Flags;

/// Logical path chosen for one interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Path {
    /// At least one error flag was set.
    Error,
    /// Normal event, including a spurious wake with no flags set.
    Event,
}

/// [D1] any error flag selects `Error`, [D2] otherwise `Event`, [D3] empty
/// snapshot selects `Event`.
#[inline]
pub fn classify<F: Flags + Copy>(snapshot: F, errors: F) -> Path {
    if snapshot.intersects(errors) {
        Path::Error // [D1]
    } else {
        Path::Event // [D2][D3]
    }
}

/// [D4] Reads the bus status once, classifies, then runs exactly one path.
#[inline]
pub fn demultiplex<B: I2cBus + ?Sized>(bus: &mut B, errors: I2cStatus) -> Path {
    let snapshot = bus.status(); // [D4] single read
    let path = classify(snapshot, errors);
    match path {
        Path::Error => bus.on_error(snapshot),
        Path::Event => bus.on_event(snapshot),
    }
    path
}
