#![cfg_attr(not(any(test, feature = "std")), no_std)]

// Hardware layer for the interrupt bridge: PRIMASK control, the terminal
// fault primitive, and the slots that lend driver-owned peripheral handles to
// interrupt handlers.

pub mod fault;
pub mod interrupts;

use dut_error::define_error;
use spin::Mutex;

define_error! {
    /// Errors from installing or releasing a peripheral handle.
    pub enum HandleError(0x01) {
        /// The slot already holds a handle
        AlreadyInstalled = 0x01 => "Handle already installed",
        /// The owning handler is borrowing the handle right now
        Busy = 0x02 => "Handle borrowed by its interrupt handler",
        /// Nothing to release
        NotInstalled = 0x03 => "No handle installed",
    }
}

/// A slot lending a driver-owned peripheral handle to exactly one interrupt
/// handler.
///
/// The driver layer installs and releases the handle from thread mode with
/// interrupts masked. The owning handler borrows it with [`HandleCell::with`]
/// for the duration of one invocation and never masks interrupts. Every
/// access is a `try_lock`: a held slot is reported, never waited on.
/// Behaviors: [H1]-[H6]
pub struct HandleCell<T: ?Sized + 'static> {
    name: &'static str,
    slot: Mutex<Option<&'static mut T>>,
}

impl<T: ?Sized + 'static> HandleCell<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// [H1] Installs a handle, [H2] rejects a second install.
    pub fn install(&self, handle: &'static mut T) -> Result<(), HandleError> {
        let result = interrupts::free(|| {
            let mut slot = self.slot.try_lock().ok_or(HandleError::Busy)?;
            if slot.is_some() {
                return Err(HandleError::AlreadyInstalled); // [H2]
            }
            *slot = Some(handle); // [H1]
            Ok(())
        });
        match result {
            Ok(()) => log::debug!("{}: handle installed", self.name),
            Err(e) => log::warn!("{}: install rejected: {}", self.name, e),
        }
        result
    }

    /// [H3] Hands the handle back to the driver layer, [H4] errors when empty.
    pub fn release(&self) -> Result<&'static mut T, HandleError> {
        let result = interrupts::free(|| {
            let mut slot = self.slot.try_lock().ok_or(HandleError::Busy)?;
            slot.take().ok_or(HandleError::NotInstalled) // [H4]
        });
        if result.is_ok() {
            log::debug!("{}: handle released", self.name);
        }
        result
    }

    pub fn is_installed(&self) -> bool {
        // only an installed handle can be borrowed
        interrupts::free(|| self.slot.try_lock().is_none_or(|slot| slot.is_some()))
    }

    /// [H5] Borrows the handle for one handler invocation, [H6] `None` when
    /// nothing is installed or the slot is held.
    ///
    /// Interrupt-context path: does not mask interrupts and does not log.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut slot = self.slot.try_lock()?; // [H6]
        slot.as_deref_mut().map(f) // [H5]
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
