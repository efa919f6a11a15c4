//! 24FC256 EEPROM driver.
//!
//! Owns the store's safety contract: capacity and page-boundary checks
//! happen before any bus traffic, and every data write is followed by an
//! ACK poll that detects completion of the device's internal write cycle.

use crate::bus::I2cBus;
use crate::codec;
use crate::error::Error;

/// Addressable bytes in a 24FC256.
pub const CAPACITY: u32 = 32768;

/// Device page size. Writes that run past the end of a page wrap to the
/// start of the same page inside the device, so mid-store page crossings
/// are rejected.
pub const PAGE_SIZE: u32 = 64;

/// Bytes per encoded sample.
pub const SAMPLE_SIZE: u32 = 2;

// The internal write cycle completes in 5 ms max; 100 probes at ~100 us
// spacing gives a factor-of-two margin over that.
const ACK_POLL_ATTEMPTS: u32 = 100;
const ACK_POLL_SPIN: u32 = 1000;

/// Driver instance bound to one bus and one 7-bit device address.
///
/// Holds no state between calls; the write-cycle state lives in the device
/// and is only ever polled for.
pub struct Eeprom24fc256<B> {
    bus: B,
    address: u8,
}

impl<B: I2cBus> Eeprom24fc256<B> {
    /// Binds the driver to a bus and device address. The address is taken
    /// as configured and not validated.
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// Writes one sample at `mem_addr` and ACK-polls the write cycle.
    ///
    /// The sample must fit below [`CAPACITY`] and must not span two pages,
    /// except when the span ends exactly at the end of the store (there is
    /// nothing past it to corrupt). Both checks precede any bus traffic.
    ///
    /// Exhausting the ACK poll does not fail the call: the data transfer
    /// itself was already acknowledged, and only the completion probe
    /// stalled. See the failure-policy section of the crate docs.
    pub fn write_sample(&mut self, mem_addr: u16, celsius: f32) -> Result<(), Error> {
        let end = mem_addr as u32 + SAMPLE_SIZE;
        if end > CAPACITY {
            return Err(Error::CapacityExceeded);
        }
        if mem_addr as u32 / PAGE_SIZE != end / PAGE_SIZE && end < CAPACITY {
            return Err(Error::PageBoundaryViolation);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("write_sample: @{:#06x} = {}", mem_addr, celsius);

        let addr = mem_addr.to_be_bytes();
        let data = codec::encode(celsius).to_be_bytes();
        let payload = [addr[0], addr[1], data[0], data[1]];

        self.bus.write(self.address, &payload)?;
        self.wait_write_complete();
        Ok(())
    }

    /// Reads back one sample from `mem_addr`.
    ///
    /// Out-of-range addresses and failed transactions are reported as typed
    /// errors; a valid sample comes back decoded to degrees Celsius.
    pub fn read_sample(&mut self, mem_addr: u16) -> Result<f32, Error> {
        if mem_addr as u32 >= CAPACITY - 1 {
            return Err(Error::CapacityExceeded);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("read_sample: @{:#06x}", mem_addr);

        let tx = mem_addr.to_be_bytes();
        let mut rx = [0u8; SAMPLE_SIZE as usize];
        self.bus.write_read(self.address, &tx, &mut rx)?;

        Ok(codec::decode(i16::from_be_bytes(rx)))
    }

    /// ACK polling: during the internal write cycle the device NACKs its
    /// own address, and the first zero-length write that comes back
    /// acknowledged marks completion. Bounded, so a dead device cannot
    /// hang the caller.
    fn wait_write_complete(&mut self) {
        for _ in 0..ACK_POLL_ATTEMPTS {
            if self.bus.write(self.address, &[]).is_ok() {
                return;
            }

            // ~100 us between probes
            for _ in 0..ACK_POLL_SPIN {
                core::hint::spin_loop();
            }
        }

        // Exhaustion is swallowed: the data write already went through.
        #[cfg(feature = "defmt")]
        defmt::warn!("write cycle still busy after {} probes", ACK_POLL_ATTEMPTS);
    }
}
