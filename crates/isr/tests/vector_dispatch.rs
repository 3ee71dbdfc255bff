//! Drives the entry points through the vector table the way the NVIC would.
//!
//! Every test touches the process-wide slots and counters, so they run
//! serially.

use dut_isr::instrument::VIRTUAL_CLOCK;
use dut_isr::peripherals::{self, BasicTimer, I2cBus, LineSource};
use dut_isr::systick::SYSTEM_TICK;
use dut_isr::vectors::{Exception, Interrupt, raise};
use dut_isr::{Config, DmaChannel, I2cStatus, VectorError};
use serial_test::serial;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

static EVENTS: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());
static I2C_ISR: AtomicU32 = AtomicU32::new(0);
static DMA_ISR: AtomicU32 = AtomicU32::new(0);

fn record(event: &'static str) {
    EVENTS.lock().unwrap().push(event);
}

fn take_events() -> Vec<&'static str> {
    std::mem::take(&mut *EVENTS.lock().unwrap())
}

fn advance() {
    record("advance");
}

fn periodic() {
    record("periodic");
}

fn bring_up() {
    dut_isr::init(&Config {
        advance: Some(advance),
        marker_sink: Some(record),
        periodic_service: Some(periodic),
        ..Config::default()
    })
    .unwrap();
    take_events();
}

fn fire(irq: Interrupt) {
    unsafe { raise(irq.number() as i16) }.unwrap();
}

fn fire_exception(e: Exception) {
    unsafe { raise(e.irqn()) }.unwrap();
}

struct Tim7;

impl BasicTimer for Tim7 {
    fn service(&mut self) {
        record("service");
    }
}

struct Bus;

impl I2cBus for Bus {
    fn status(&self) -> I2cStatus {
        record("status");
        I2cStatus::from_register(I2C_ISR.load(Ordering::SeqCst))
    }

    fn on_error(&mut self, status: I2cStatus) {
        record("error");
        I2C_ISR.fetch_and(!status.intersection(I2cStatus::ERRORS).bits(), Ordering::SeqCst);
    }

    fn on_event(&mut self, _status: I2cStatus) {
        record("event");
    }
}

struct Channel {
    name: &'static str,
    channel: DmaChannel,
}

impl LineSource for Channel {
    fn on_interrupt(&mut self) {
        if self.channel.status(DMA_ISR.load(Ordering::SeqCst)).is_pending() {
            record(self.name);
        } else {
            record("idle");
        }
    }
}

#[test]
#[serial]
fn tim7_brackets_service_with_advance_and_marker() {
    bring_up();
    peripherals::TIM7.install(Box::leak(Box::new(Tim7))).unwrap();

    let start = VIRTUAL_CLOCK.ticks();
    for n in 1..=3 {
        fire(Interrupt::TIM7);
        assert_eq!(VIRTUAL_CLOCK.ticks(), start + n);
    }
    let events = take_events();
    assert_eq!(events.len(), 9);
    for occurrence in events.chunks(3) {
        assert_eq!(occurrence, ["advance", "service", "TIM7_IRQHandler_End"]);
    }

    peripherals::TIM7.release().unwrap();
}

#[test]
#[serial]
fn tim7_without_driver_still_ticks_and_marks() {
    bring_up();
    assert!(!peripherals::TIM7.is_installed());

    let start = VIRTUAL_CLOCK.ticks();
    fire(Interrupt::TIM7);
    assert_eq!(VIRTUAL_CLOCK.ticks(), start + 1);
    assert_eq!(take_events(), ["advance", "TIM7_IRQHandler_End"]);
}

#[test]
#[serial]
fn i2c1_routes_errors_and_events_exclusively() {
    bring_up();
    peripherals::I2C1.install(Box::leak(Box::new(Bus))).unwrap();

    I2C_ISR.store((I2cStatus::ARLO | I2cStatus::TXIS).bits(), Ordering::SeqCst);
    fire(Interrupt::I2C1);
    assert_eq!(take_events(), ["status", "error"]);

    // error cleared inside the error path; the next firing is a normal event
    fire(Interrupt::I2C1);
    assert_eq!(take_events(), ["status", "event"]);

    I2C_ISR.store(0, Ordering::SeqCst);
    fire(Interrupt::I2C1); // spurious
    assert_eq!(take_events(), ["status", "event"]);

    peripherals::I2C1.release().unwrap();
}

#[test]
#[serial]
fn i2c1_honours_configured_error_mask() {
    bring_up();
    peripherals::I2C1.install(Box::leak(Box::new(Bus))).unwrap();

    I2C_ISR.store(I2cStatus::TIMEOUT.bits(), Ordering::SeqCst);
    fire(Interrupt::I2C1);
    assert_eq!(take_events(), ["status", "event"]);

    dut_isr::config::set_i2c_error_flags(I2cStatus::ERRORS | I2cStatus::TIMEOUT).unwrap();
    fire(Interrupt::I2C1);
    assert_eq!(take_events(), ["status", "error"]);

    dut_isr::config::set_i2c_error_flags(I2cStatus::ERRORS).unwrap();
    I2C_ISR.store(0, Ordering::SeqCst);
    peripherals::I2C1.release().unwrap();
}

#[test]
#[serial]
fn dma_line_runs_tx_then_rx_for_any_cause() {
    bring_up();
    peripherals::DMA1_CH2_I2C1_TX
        .install(Box::leak(Box::new(Channel { name: "tx", channel: DmaChannel::I2C1_TX })))
        .unwrap();
    peripherals::DMA1_CH3_I2C1_RX
        .install(Box::leak(Box::new(Channel { name: "rx", channel: DmaChannel::I2C1_RX })))
        .unwrap();

    DMA_ISR.store(0x300, Ordering::SeqCst); // receive completed
    fire(Interrupt::DMA1_CH2_3);
    assert_eq!(take_events(), ["idle", "rx"]);

    DMA_ISR.store(0x030, Ordering::SeqCst); // transmit completed
    fire(Interrupt::DMA1_CH2_3);
    assert_eq!(take_events(), ["tx", "idle"]);

    DMA_ISR.store(0x330, Ordering::SeqCst);
    fire(Interrupt::DMA1_CH2_3);
    assert_eq!(take_events(), ["tx", "rx"]);

    DMA_ISR.store(0, Ordering::SeqCst); // spurious
    fire(Interrupt::DMA1_CH2_3);
    assert_eq!(take_events(), ["idle", "idle"]);

    peripherals::DMA1_CH2_I2C1_TX.release().unwrap();
    peripherals::DMA1_CH3_I2C1_RX.release().unwrap();
    DMA_ISR.store(0, Ordering::SeqCst);
}

#[test]
#[serial]
fn systick_counts_every_interrupt() {
    bring_up();
    let mut last = SYSTEM_TICK.now();
    for _ in 0..50 {
        fire_exception(Exception::SysTick);
        let now = SYSTEM_TICK.now();
        assert_eq!(now, last + 1);
        last = now;
    }
    assert_eq!(take_events().iter().filter(|e| **e == "periodic").count(), 50);
}

#[test]
#[serial]
fn placeholders_leave_no_trace() {
    bring_up();
    let ticks = SYSTEM_TICK.now();
    let virtual_ticks = VIRTUAL_CLOCK.ticks();

    fire_exception(Exception::NonMaskableInt);
    fire_exception(Exception::SVCall);
    fire_exception(Exception::PendSV);
    fire(Interrupt::RCC_CRS);

    assert_eq!(SYSTEM_TICK.now(), ticks);
    assert_eq!(VIRTUAL_CLOCK.ticks(), virtual_ticks);
    assert!(take_events().is_empty());
}

#[test]
#[serial]
fn out_of_table_numbers_are_rejected() {
    assert_eq!(unsafe { raise(32) }, Err(VectorError::OutOfRange));
    assert_eq!(unsafe { raise(-3) }, Err(VectorError::Reserved));
    assert_eq!(unsafe { raise(-15) }, Err(VectorError::Reserved));
    assert_eq!(unsafe { raise(-16) }, Err(VectorError::OutOfRange));
}

fn assert_halts(irqn: i16) {
    bring_up();
    let virtual_ticks = VIRTUAL_CLOCK.ticks();
    let faulted = thread::spawn(move || {
        let _ = unsafe { raise(irqn) };
        record("returned");
    });
    for _ in 0..5 {
        thread::sleep(Duration::from_millis(10));
        assert!(!faulted.is_finished());
    }
    assert!(take_events().is_empty());
    assert_eq!(VIRTUAL_CLOCK.ticks(), virtual_ticks);
}

#[test]
#[serial]
fn hard_fault_halts_forever() {
    assert_halts(Exception::HardFault.irqn());
}

#[test]
#[serial]
fn unbound_device_vector_halts() {
    assert_halts(Interrupt::WWDG.number() as i16);
}
