use thiserror::Error;

/// Failure modes of a single bus transaction. A successful transaction is
/// the `Ok(())` arm of the result, so this covers everything else.
#[derive(Error, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Bus-level fault unrelated to device busy-state (arbitration loss,
    /// line stuck, invalid parameters).
    #[error("bus fault")]
    Bus,

    /// The device did not acknowledge its address. A device in the middle
    /// of an internal write cycle is present but NACKs every access, which
    /// is what the write-completion poll keys on.
    #[error("no acknowledge")]
    Nack,

    /// The transport's own time bound expired mid-transaction. Distinct
    /// from the caller-level polling bound in the EEPROM driver.
    #[error("transaction timed out")]
    Timeout,
}

/// Two-wire bus transaction primitives, addressed by 7-bit device id.
///
/// This is the whole hardware surface of the crate. Test doubles implement
/// it directly; real targets either implement it for their I2C peripheral
/// or enable the `embedded-hal` feature and use [`HalBus`].
pub trait I2cBus {
    /// START - ADDR+W - DATA - STOP.
    ///
    /// An empty `bytes` is a valid transaction: it carries no address or
    /// data semantics and only probes whether the device ACKs, which is how
    /// write-cycle completion is detected.
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError>;

    /// START - ADDR+R - DATA - STOP.
    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), BusError>;

    /// Combined write-then-read transaction.
    ///
    /// The default implementation issues a plain `write` followed by a
    /// plain `read`. That releases the bus between the two phases and loses
    /// the atomicity of a true repeated START; implementations backed by
    /// hardware that supports repeated START should override it.
    fn write_read(&mut self, addr: u8, tx: &[u8], rx: &mut [u8]) -> Result<(), BusError> {
        self.write(addr, tx)?;
        self.read(addr, rx)
    }
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
        (**self).write(addr, bytes)
    }

    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), BusError> {
        (**self).read(addr, buf)
    }

    fn write_read(&mut self, addr: u8, tx: &[u8], rx: &mut [u8]) -> Result<(), BusError> {
        (**self).write_read(addr, tx, rx)
    }
}

#[cfg(feature = "embedded-hal")]
mod hal {
    use super::{BusError, I2cBus};
    use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

    /// Adapter from a blocking `embedded-hal` I2C peripheral to [`I2cBus`].
    pub struct HalBus<I> {
        inner: I,
    }

    impl<I> HalBus<I> {
        pub fn new(inner: I) -> Self {
            Self { inner }
        }

        pub fn release(self) -> I {
            self.inner
        }
    }

    fn map_err(kind: ErrorKind) -> BusError {
        match kind {
            ErrorKind::NoAcknowledge(_) => BusError::Nack,
            _ => BusError::Bus,
        }
    }

    impl<I: I2c> I2cBus for HalBus<I> {
        fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
            self.inner.write(addr, bytes).map_err(|e| map_err(e.kind()))
        }

        fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), BusError> {
            self.inner.read(addr, buf).map_err(|e| map_err(e.kind()))
        }

        // hardware repeated START, keeps the transaction atomic
        fn write_read(&mut self, addr: u8, tx: &[u8], rx: &mut [u8]) -> Result<(), BusError> {
            self.inner
                .write_read(addr, tx, rx)
                .map_err(|e| map_err(e.kind()))
        }
    }
}

#[cfg(feature = "embedded-hal")]
pub use hal::HalBus;
