#![doc = include_str!("../README.md")]
#![no_std]

pub mod bus;
pub mod codec;
mod eeprom;
pub mod error;
pub mod sensor;

pub use eeprom::{CAPACITY, Eeprom24fc256, PAGE_SIZE, SAMPLE_SIZE};
pub use error::Error;
pub use sensor::{TemperatureSensor, Tmp100};

use bus::I2cBus;

/// Seconds between log events.
pub const LOG_INTERVAL_SECS: u32 = 600;

/// Cursor wrap threshold. Advancing to this slot resets the cursor to 0,
/// which reserves the final two bytes of the store as unused.
pub const WRAP_THRESHOLD: u16 = (CAPACITY - SAMPLE_SIZE) as u16;

/// Monotonically non-decreasing elapsed-seconds source. Starts at 0 when
/// the controller starts; the only time surface the controller consumes.
pub trait Monotonic {
    fn elapsed_seconds(&self) -> u32;
}

/// Outcome of one completed log cycle, returned per operation so callers
/// can observe what happened without any ambient mutable state.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogEvent {
    /// Slot the sample was written to (or the write was attempted at).
    pub slot: u16,
    /// The value handed to the store, placeholder included.
    pub celsius: f32,
    /// False when the sensor failed and a placeholder was substituted.
    pub sensor_ok: bool,
    /// False when the store rejected or failed the write.
    pub stored: bool,
}

/// Circular-address logging controller.
///
/// Holds the write cursor and the interval clock, both volatile: a cold
/// start always begins logging at slot 0 and neither value is recovered
/// from storage. Each elapsed interval produces exactly one
/// capture-encode-store-advance cycle; the circular cursor makes running
/// indefinitely safe, so termination is the caller's policy, not the
/// controller's.
pub struct TempLogger<B> {
    store: Eeprom24fc256<B>,
    cursor: u16,
    last_log_time: u32,
    sample_count: u32,
}

impl<B: I2cBus> TempLogger<B> {
    pub fn new(store: Eeprom24fc256<B>) -> Self {
        Self {
            store,
            cursor: 0,
            last_log_time: 0,
            sample_count: 0,
        }
    }

    /// One control-loop iteration.
    ///
    /// Returns `None` until [`LOG_INTERVAL_SECS`] have elapsed since the
    /// last log event, then runs one cycle and reports it. Neither a
    /// sensor failure nor a store failure aborts the cycle: the sensor is
    /// replaced by a synthesized placeholder and the cursor advances
    /// regardless, so a misbehaving device never halts sampling. The
    /// [`LogEvent`] carries both facts for callers that want to react.
    pub fn poll<S, C>(&mut self, sensor: &mut S, clock: &C) -> Option<LogEvent>
    where
        S: TemperatureSensor,
        C: Monotonic,
    {
        let now = clock.elapsed_seconds();
        if now - self.last_log_time < LOG_INTERVAL_SECS {
            return None;
        }

        let (celsius, sensor_ok) = match sensor.read_celsius() {
            Ok(t) => (t, true),
            Err(_) => (20.0 + self.sample_count as f32 * 0.01, false),
        };

        let slot = self.cursor;
        let stored = self.store.write_sample(slot, celsius).is_ok();

        self.cursor += SAMPLE_SIZE as u16;
        if self.cursor >= WRAP_THRESHOLD {
            self.cursor = 0;
        }

        self.sample_count += 1;

        // Anchored to `now`, not `last + LOG_INTERVAL_SECS`: against a tick
        // source that misses exact interval multiples the trigger times
        // drift instead of catching up.
        self.last_log_time = now;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "log: slot {:#06x} = {} (sensor_ok={} stored={})",
            slot,
            celsius,
            sensor_ok,
            stored
        );

        Some(LogEvent {
            slot,
            celsius,
            sensor_ok,
            stored,
        })
    }

    /// Next slot a sample will be written to.
    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    /// Number of completed log cycles since construction.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Access to the underlying store, e.g. for reading samples back.
    pub fn store_mut(&mut self) -> &mut Eeprom24fc256<B> {
        &mut self.store
    }
}
