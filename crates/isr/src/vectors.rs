//! Vector table for the STM32F07x (Cortex-M0).
//!
//! Entry order is the hardware's ABI: a handler in the wrong slot silently
//! receives another source's interrupts. The device table is therefore built
//! in a `const` and checked at compile time against the reference manual
//! layout; double binding or a missing binding fails the build.
//!
//! Behaviors: [V1]-[V7]

use crate::handlers;
use dut_error::define_error;

define_error! {
    /// Errors from resolving an IRQ number against the tables.
    pub enum VectorError(0x02) {
        /// Number is outside both the core and device tables
        OutOfRange = 0x01 => "IRQ number outside the vector table",
        /// Slot exists but the architecture reserves it
        Reserved = 0x02 => "Reserved vector slot",
    }
}

/// Number of device interrupt vectors after the 16 core entries.
pub const DEVICE_INTERRUPTS: usize = 32;

/// Device interrupt sources, discriminant = position after the core entries.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Interrupt {
    WWDG = 0,
    PVD_VDDIO2 = 1,
    RTC = 2,
    FLASH = 3,
    /// Clock control and clock recovery system
    RCC_CRS = 4,
    EXTI0_1 = 5,
    EXTI2_3 = 6,
    EXTI4_15 = 7,
    TSC = 8,
    DMA1_CH1 = 9,
    /// DMA1 channels 2 and 3 share this line
    DMA1_CH2_3 = 10,
    DMA1_CH4_5_6_7 = 11,
    ADC_COMP = 12,
    TIM1_BRK_UP_TRG_COM = 13,
    TIM1_CC = 14,
    TIM2 = 15,
    TIM3 = 16,
    TIM6_DAC = 17,
    TIM7 = 18,
    TIM14 = 19,
    TIM15 = 20,
    TIM16 = 21,
    TIM17 = 22,
    /// I2C1 events and errors (+ EXTI line 23 wakeup)
    I2C1 = 23,
    I2C2 = 24,
    SPI1 = 25,
    SPI2 = 26,
    USART1 = 27,
    USART2 = 28,
    USART3_4 = 29,
    CEC_CAN = 30,
    USB = 31,
}

/// RM0091 vector order for STM32F07x devices.
const LAYOUT: [Interrupt; DEVICE_INTERRUPTS] = {
    use Interrupt::*;
    [
        WWDG, PVD_VDDIO2, RTC, FLASH, RCC_CRS, EXTI0_1, EXTI2_3, EXTI4_15,
        TSC, DMA1_CH1, DMA1_CH2_3, DMA1_CH4_5_6_7, ADC_COMP, TIM1_BRK_UP_TRG_COM, TIM1_CC, TIM2,
        TIM3, TIM6_DAC, TIM7, TIM14, TIM15, TIM16, TIM17, I2C1,
        I2C2, SPI1, SPI2, USART1, USART2, USART3_4, CEC_CAN, USB,
    ]
};

// [V1] every discriminant equals its documented position
const _: () = {
    let mut i = 0;
    while i < DEVICE_INTERRUPTS {
        assert!(LAYOUT[i] as usize == i, "interrupt discriminant differs from RM0091 position");
        i += 1;
    }
};

impl Interrupt {
    #[inline]
    pub const fn number(self) -> u16 {
        self as u16
    }

    /// [V2] Resolves a device IRQ number.
    pub fn try_from_number(number: u16) -> Result<Self, VectorError> {
        LAYOUT
            .get(usize::from(number))
            .copied()
            .ok_or(VectorError::OutOfRange)
    }
}

/// ARMv6-M core exceptions this firmware handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exception {
    NonMaskableInt,
    HardFault,
    SVCall,
    PendSV,
    SysTick,
}

impl Exception {
    /// Signed IRQ number as used by CMSIS (`IRQn_Type`).
    pub const fn irqn(self) -> i16 {
        match self {
            Exception::NonMaskableInt => -14,
            Exception::HardFault => -13,
            Exception::SVCall => -5,
            Exception::PendSV => -2,
            Exception::SysTick => -1,
        }
    }

    /// Index in the full vector table (0 = initial stack pointer, 1 = reset).
    pub const fn vector_index(self) -> usize {
        (self.irqn() + 16) as usize
    }

    /// [V3] Resolves a negative IRQ number, [V4] reserved slots are errors.
    pub fn try_from_irqn(irqn: i16) -> Result<Self, VectorError> {
        match irqn {
            -14 => Ok(Exception::NonMaskableInt),
            -13 => Ok(Exception::HardFault),
            -5 => Ok(Exception::SVCall),
            -2 => Ok(Exception::PendSV),
            -1 => Ok(Exception::SysTick),
            // Reset and the ARMv6-M reserved slots
            -15..=-1 => Err(VectorError::Reserved), // [V4]
            _ => Err(VectorError::OutOfRange),
        }
    }

    /// Entry point bound to this exception.
    pub const fn handler(self) -> unsafe extern "C" fn() {
        match self {
            Exception::NonMaskableInt => handlers::non_maskable_int,
            Exception::HardFault => handlers::hard_fault,
            Exception::SVCall => handlers::sv_call,
            Exception::PendSV => handlers::pend_sv,
            Exception::SysTick => handlers::sys_tick,
        }
    }
}

// [V5] core layout per ARMv6-M: NMI 2, HardFault 3, SVCall 11, PendSV 14, SysTick 15
const _: () = {
    assert!(Exception::NonMaskableInt.vector_index() == 2);
    assert!(Exception::HardFault.vector_index() == 3);
    assert!(Exception::SVCall.vector_index() == 11);
    assert!(Exception::PendSV.vector_index() == 14);
    assert!(Exception::SysTick.vector_index() == 15);
};

/// One device table entry: the handler address the NVIC jumps to.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Vector {
    handler: unsafe extern "C" fn(),
}

const _: () = assert!(size_of::<Vector>() == size_of::<usize>());

/// Device interrupt table under construction.
#[derive(Clone, Copy)]
pub struct InterruptTable {
    vectors: [Vector; DEVICE_INTERRUPTS],
    bound: u32,
}

impl InterruptTable {
    /// Every slot starts at `default`.
    pub const fn new(default: unsafe extern "C" fn()) -> Self {
        Self {
            vectors: [Vector { handler: default }; DEVICE_INTERRUPTS],
            bound: 0,
        }
    }

    /// [V6] Binds `irq` to `handler`; binding a slot twice fails const evaluation.
    pub const fn bind(mut self, irq: Interrupt, handler: unsafe extern "C" fn()) -> Self {
        let bit = 1u32 << irq as u32;
        assert!(self.bound & bit == 0, "interrupt bound twice");
        self.vectors[irq as usize] = Vector { handler };
        self.bound |= bit;
        self
    }

    pub const fn is_bound(&self, irq: Interrupt) -> bool {
        self.bound & (1u32 << irq as u32) != 0
    }

    /// Raw entries in hardware order.
    pub const fn vectors(&self) -> [Vector; DEVICE_INTERRUPTS] {
        self.vectors
    }

    pub fn handler(&self, irq: Interrupt) -> unsafe extern "C" fn() {
        self.vectors[irq as usize].handler
    }
}

/// Device vectors wired by this firmware; everything else is unbound.
pub const DEVICE_TABLE: InterruptTable = InterruptTable::new(handlers::unbound)
    .bind(Interrupt::RCC_CRS, handlers::rcc_crs)
    .bind(Interrupt::DMA1_CH2_3, handlers::dma1_ch2_3)
    .bind(Interrupt::TIM7, handlers::tim7)
    .bind(Interrupt::I2C1, handlers::i2c1);

// [V7] the sources this firmware services must be wired
const _: () = {
    assert!(DEVICE_TABLE.is_bound(Interrupt::RCC_CRS));
    assert!(DEVICE_TABLE.is_bound(Interrupt::DMA1_CH2_3));
    assert!(DEVICE_TABLE.is_bound(Interrupt::TIM7));
    assert!(DEVICE_TABLE.is_bound(Interrupt::I2C1));
};

/// Dispatches `irqn` through the tables exactly as the NVIC would.
///
/// # Safety
/// Runs a handler outside exception context. The caller must ensure the
/// real handler for the same vector cannot run concurrently. Raising
/// `HardFault` or an unbound device interrupt never returns.
pub unsafe fn raise(irqn: i16) -> Result<(), VectorError> {
    let handler = if irqn >= 0 {
        DEVICE_TABLE.handler(Interrupt::try_from_number(irqn as u16)?)
    } else {
        Exception::try_from_irqn(irqn)?.handler()
    };
    unsafe { handler() };
    Ok(())
}
