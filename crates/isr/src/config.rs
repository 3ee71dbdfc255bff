//! Runtime configuration applied once from thread mode before the
//! application unmasks interrupts.

use crate::flags::I2cStatus;
use crate::instrument::{self, AdvanceFn, MarkerSink, VIRTUAL_CLOCK};
use crate::logger::{self, LogSink};
use crate::systick::{PeriodicService, SYSTEM_TICK};
use core::sync::atomic::{AtomicU32, Ordering};
use dut_error::define_error;
use log::LevelFilter;

define_error! {
    /// Errors from applying a [`Config`].
    pub enum ConfigError(0x03) {
        /// Error mask empty or containing non-error flags
        InvalidErrorMask = 0x01 => "I2C error mask must be a non-empty set of error flags",
        /// A global logger was already installed
        LoggerInUse = 0x02 => "Logger already installed",
    }
}

#[cfg(feature = "verbose")]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Trace;
#[cfg(not(feature = "verbose"))]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Everything the application wires into the interrupt layer.
#[derive(Clone, Copy)]
pub struct Config {
    pub log_level: LevelFilter,
    /// Installs the global logger when set.
    pub log_sink: Option<LogSink>,
    /// Flags that send an I2C1 interrupt down the error path.
    pub i2c_errors: I2cStatus,
    /// Called from every SysTick after the tick counter moves.
    pub periodic_service: Option<PeriodicService>,
    /// External virtual-time advance, called from every TIM7 interrupt.
    pub advance: Option<AdvanceFn>,
    /// Receives every execution marker name.
    pub marker_sink: Option<MarkerSink>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            log_sink: None,
            i2c_errors: I2cStatus::ERRORS,
            periodic_service: None,
            advance: None,
            marker_sink: None,
        }
    }
}

static I2C_ERRORS: AtomicU32 = AtomicU32::new(I2cStatus::ERRORS.bits());

/// Error mask read by the I2C1 handler.
#[inline]
pub fn i2c_error_flags() -> I2cStatus {
    I2cStatus::from_bits_truncate(I2C_ERRORS.load(Ordering::Relaxed))
}

fn validate_error_mask(errors: I2cStatus) -> Result<(), ConfigError> {
    if errors.is_empty() || !I2cStatus::ERROR_CAPABLE.contains(errors) {
        return Err(ConfigError::InvalidErrorMask); // [C2]
    }
    Ok(())
}

/// [C1] accepts non-empty subsets of the error-capable flags, [C2] rejects others.
pub fn set_i2c_error_flags(errors: I2cStatus) -> Result<(), ConfigError> {
    validate_error_mask(errors)?;
    I2C_ERRORS.store(errors.bits(), Ordering::Relaxed); // [C1]
    Ok(())
}

/// [C3] Applies `config`; nothing is changed when it is rejected.
pub fn init(config: &Config) -> Result<(), ConfigError> {
    validate_error_mask(config.i2c_errors)?;
    if let Some(sink) = config.log_sink {
        logger::init(config.log_level, sink)?;
    }

    I2C_ERRORS.store(config.i2c_errors.bits(), Ordering::Relaxed);
    if let Some(service) = config.periodic_service {
        SYSTEM_TICK.set_periodic_service(service);
    }
    if let Some(advance) = config.advance {
        VIRTUAL_CLOCK.set_advance(advance);
    }
    if let Some(sink) = config.marker_sink {
        instrument::set_marker_sink(sink);
    }

    log::info!("interrupt bridge configured, i2c errors {:?}", config.i2c_errors);
    Ok(())
}
