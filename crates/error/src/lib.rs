//! Error codes for the interrupt bridge.
//!
//! Only thread-mode APIs return errors; interrupt handlers route and never
//! report. Subsystem bytes in use:
//!
//! | Byte | Enum | Raised by |
//! |------|------|-----------|
//! | `0x01` | `HandleError` | handle install / release |
//! | `0x02` | `VectorError` | resolving an IRQ number |
//! | `0x03` | `ConfigError` | applying the runtime config |
//!
//! ```ignore
//! define_error! {
//!     pub enum VectorError(0x02) {
//!         OutOfRange = 0x01 => "IRQ number outside the vector table",
//!         Reserved = 0x02 => "Reserved vector slot",
//!     }
//! }
//!
//! // a bring-up layer wrapping it
//! define_error! {
//!     pub enum BringUpError(0x04) {
//!         Vector(VectorError) = 0x01 => "Vector wiring rejected",
//!     }
//! }
//! ```

#![no_std]

/// Defines the error enum of one interrupt-bridge subsystem.
///
/// Codes are `u16` with the subsystem in the high byte: `HandleError` is
/// subsystem `0x01`, so `HandleError::Busy` (variant `0x02`) reports `E0102`.
/// A variant may wrap the error of a lower layer; the wrapped error is
/// appended to the `Display` output and returned from `source()`.
#[macro_export]
macro_rules! define_error {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($subsystem:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(($inner:ty))? = $code:literal => $desc:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $(($inner))?,
            )*
        }

        impl $name {
            pub const SUBSYSTEM: u8 = $subsystem;

            const fn entry(&self) -> (u8, &'static str) {
                match self {
                    $($crate::define_error!(@arm $variant $(($inner))?) => ($code, $desc),)*
                }
            }

            /// Low byte of [`Self::code`].
            pub const fn variant(&self) -> u8 {
                self.entry().0
            }

            pub const fn code(&self) -> u16 {
                u16::from_be_bytes([Self::SUBSYSTEM, self.variant()])
            }

            pub const fn name(&self) -> &'static str {
                self.entry().1
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "E{:04X}: {}", self.code(), self.name())?;
                match core::error::Error::source(self) {
                    Some(inner) => write!(f, " ({inner})"),
                    None => Ok(()),
                }
            }
        }

        impl core::error::Error for $name {
            #[allow(clippy::match_same_arms)]
            fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
                match self {
                    $($crate::define_error!(@arm $variant $(($inner))? wrapped) => {
                        $crate::define_error!(@source $(($inner))? wrapped)
                    })*
                }
            }
        }
    };

    (@arm $variant:ident ($inner:ty) $bind:ident) => { Self::$variant($bind) };
    (@arm $variant:ident $bind:ident) => { Self::$variant };
    (@arm $variant:ident ($inner:ty)) => { Self::$variant(_) };
    (@arm $variant:ident) => { Self::$variant };

    (@source ($inner:ty) $bind:ident) => { Some($bind) };
    (@source $bind:ident) => { None };
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    define_error! {
        /// Slot errors used by the tests
        pub enum SlotError(0x0A) {
            /// Slot taken
            Taken = 0x01 => "Slot already taken",
            /// Slot empty
            Empty = 0x02 => "Slot empty",
        }
    }

    define_error! {
        pub enum BringUpError(0x0B) {
            Slot(SlotError) = 0x01 => "Bring-up failed",
            Timeout = 0x02 => "Bring-up timed out",
        }
    }

    /// Tests: [E1] code = subsystem << 8 | variant
    #[test]
    fn test_error_codes() {
        assert_eq!(SlotError::Taken.code(), 0x0A01);
        assert_eq!(SlotError::Empty.code(), 0x0A02);
        assert_eq!(BringUpError::Slot(SlotError::Empty).code(), 0x0B01);
        assert_eq!(BringUpError::Timeout.code(), 0x0B02);
    }

    /// Tests: [E2] nested variants report their own description
    #[test]
    fn test_error_names() {
        assert_eq!(SlotError::Taken.name(), "Slot already taken");
        assert_eq!(BringUpError::Slot(SlotError::Taken).name(), "Bring-up failed");
    }

    /// Tests: [E3] display includes the code, nested display includes the inner error
    #[test]
    fn test_display_format() {
        assert_eq!(format!("{}", SlotError::Empty), "E0A02: Slot empty");
        assert_eq!(
            format!("{}", BringUpError::Slot(SlotError::Taken)),
            "E0B01: Bring-up failed (E0A01: Slot already taken)"
        );
    }

    #[test]
    fn test_subsystem_constant() {
        assert_eq!(SlotError::SUBSYSTEM, 0x0A);
        assert_eq!(BringUpError::SUBSYSTEM, 0x0B);
    }

    /// Tests: [E4] wrapped error exposed through `source()`, plain variants have none
    #[test]
    fn test_source_chain() {
        use core::error::Error;
        let e = BringUpError::Slot(SlotError::Empty);
        let inner = e.source().map(std::string::ToString::to_string);
        assert_eq!(inner.as_deref(), Some("E0A02: Slot empty"));
        assert!(BringUpError::Timeout.source().is_none());
        assert!(SlotError::Taken.source().is_none());
        assert_eq!(e.variant(), 0x01);
    }

    #[test]
    fn test_usable_as_core_error() {
        fn describe(e: &dyn core::error::Error) -> std::string::String {
            format!("{e}")
        }
        assert!(describe(&BringUpError::Timeout).contains("timed out"));
    }
}
