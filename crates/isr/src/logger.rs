//! Logger implementation.
//!
//! Implements `log::Log` and forwards records to a sink the application
//! provides (semihosting, RTT, a UART). Only thread-mode code logs; the
//! interrupt entry points never do.

use crate::config::ConfigError;
use core::fmt;
use core::sync::atomic::{AtomicPtr, Ordering};
use log::{LevelFilter, Metadata, Record};

/// Destination for formatted log lines.
pub type LogSink = fn(fmt::Arguments<'_>);

static LOGGER: SinkLogger = SinkLogger;
static SINK: AtomicPtr<()> = AtomicPtr::new(core::ptr::null_mut());

struct SinkLogger;

impl SinkLogger {
    fn sink(&self) -> Option<LogSink> {
        let ptr = SINK.load(Ordering::Acquire);
        if ptr.is_null() {
            None
        } else {
            // SAFETY: only ever stored from a `LogSink` in `init`
            Some(unsafe { core::mem::transmute::<*mut (), LogSink>(ptr) })
        }
    }
}

impl log::Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(sink) = self.sink() {
            sink(format_args!("[{}] {}: {}", record.level(), record.target(), record.args()));
        }
    }

    fn flush(&self) {}
}

/// Installs the logger. Call once, from thread mode, before interrupts run.
pub fn init(max_level: LevelFilter, sink: LogSink) -> Result<(), ConfigError> {
    #[cfg(target_has_atomic = "ptr")]
    log::set_logger(&LOGGER).map_err(|_| ConfigError::LoggerInUse)?;

    // No compare-and-swap on ARMv6-M; init runs before anything else logs
    #[cfg(not(target_has_atomic = "ptr"))]
    unsafe { log::set_logger_racy(&LOGGER) }.map_err(|_| ConfigError::LoggerInUse)?;

    SINK.store(sink as *mut (), Ordering::Release);
    log::set_max_level(max_level);
    Ok(())
}
