//! Status flag sets read from peripheral handles.
//!
//! Layouts follow RM0091 (STM32F0x1/x2/x8).

use bitflags::bitflags;

bitflags! {
    /// I2C interrupt and status register (I2C_ISR).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct I2cStatus: u32 {
        /// Transmit data register empty
        const TXE     = 1 << 0;
        /// Transmit interrupt status
        const TXIS    = 1 << 1;
        /// Receive data register not empty
        const RXNE    = 1 << 2;
        /// Address matched (slave mode)
        const ADDR    = 1 << 3;
        /// Not acknowledge received
        const NACKF   = 1 << 4;
        /// Stop detection
        const STOPF   = 1 << 5;
        /// Transfer complete (master mode)
        const TC      = 1 << 6;
        /// Transfer complete reload
        const TCR     = 1 << 7;
        /// Bus error
        const BERR    = 1 << 8;
        /// Arbitration lost
        const ARLO    = 1 << 9;
        /// Overrun/underrun (slave mode)
        const OVR     = 1 << 10;
        /// PEC error in reception
        const PECERR  = 1 << 11;
        /// Timeout or tLOW detection
        const TIMEOUT = 1 << 12;
        /// SMBus alert
        const ALERT   = 1 << 13;
        /// Bus busy
        const BUSY    = 1 << 15;
        /// Transfer direction (slave mode)
        const DIR     = 1 << 16;
    }
}

impl I2cStatus {
    /// Flags routed to the error path by default.
    pub const ERRORS: Self = Self::BERR.union(Self::ARLO).union(Self::OVR);

    /// Every flag the peripheral can raise as an error condition.
    pub const ERROR_CAPABLE: Self = Self::ERRORS
        .union(Self::PECERR)
        .union(Self::TIMEOUT)
        .union(Self::ALERT);

    /// Interprets a raw I2C_ISR read; reserved and ADDCODE bits are dropped.
    #[inline]
    pub const fn from_register(raw: u32) -> Self {
        Self::from_bits_truncate(raw)
    }
}

bitflags! {
    /// One DMA channel's slice of the shared DMA interrupt status register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DmaChannelStatus: u8 {
        /// Global interrupt flag
        const GIF  = 1 << 0;
        /// Transfer complete
        const TCIF = 1 << 1;
        /// Half transfer
        const HTIF = 1 << 2;
        /// Transfer error
        const TEIF = 1 << 3;
    }
}

/// DMA1 channel number, 1-based as in the reference manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaChannel(u8);

impl DmaChannel {
    /// I2C1 transmit request line.
    pub const I2C1_TX: Self = Self(2);
    /// I2C1 receive request line.
    pub const I2C1_RX: Self = Self(3);

    /// Returns `None` outside channels 1..=7.
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number <= 7 {
            Some(Self(number))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    /// Extracts this channel's flags from a DMA_ISR read.
    ///
    /// Sub-handlers on a shared line use this to decide whether their own
    /// channel caused the interrupt.
    #[inline]
    pub const fn status(self, dma_isr: u32) -> DmaChannelStatus {
        let shift = 4 * (self.0 as u32 - 1);
        DmaChannelStatus::from_bits_truncate(((dma_isr >> shift) & 0xF) as u8)
    }
}

impl DmaChannelStatus {
    /// True when this channel raised the line.
    #[inline]
    pub const fn is_pending(self) -> bool {
        self.intersects(Self::GIF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i2c_error_set() {
        assert_eq!(I2cStatus::ERRORS.bits(), 0x0700);
        assert!(I2cStatus::ERROR_CAPABLE.contains(I2cStatus::ERRORS));
        assert!(!I2cStatus::ERROR_CAPABLE.intersects(I2cStatus::TXIS | I2cStatus::STOPF));
    }

    #[test]
    fn test_from_register_drops_addcode() {
        // ADDCODE lives in bits 17..=23
        let raw = (0x55 << 17) | I2cStatus::ADDR.bits() | I2cStatus::DIR.bits();
        assert_eq!(I2cStatus::from_register(raw), I2cStatus::ADDR | I2cStatus::DIR);
    }

    #[test]
    fn test_dma_channel_slices() {
        // Channel 2 complete (bits 4,5), channel 3 error (bits 8,11)
        let isr = 0b1001_0011_0000;
        assert_eq!(
            DmaChannel::I2C1_TX.status(isr),
            DmaChannelStatus::GIF | DmaChannelStatus::TCIF
        );
        assert_eq!(
            DmaChannel::I2C1_RX.status(isr),
            DmaChannelStatus::GIF | DmaChannelStatus::TEIF
        );
        assert!(!DmaChannel::new(1).unwrap().status(isr).is_pending());
    }

    #[test]
    fn test_dma_channel_range() {
        assert_eq!(DmaChannel::new(0), None);
        assert_eq!(DmaChannel::new(8), None);
        assert_eq!(DmaChannel::new(7).map(DmaChannel::number), Some(7));
    }
}
