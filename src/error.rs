use crate::bus::BusError;
use thiserror::Error;

/// Errors returned by the EEPROM driver. Validation errors are raised
/// before any bus traffic, so a rejected operation has no side effects on
/// the device.
#[derive(Error, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The operation would touch bytes past the end of the 32768-byte
    /// address space.
    #[error("capacity exceeded")]
    CapacityExceeded,

    /// The 2-byte sample would span two pages mid-store. The device's
    /// internal address counter wraps within the destination page in that
    /// case, silently corrupting data, so the write is rejected up front.
    /// A span ending exactly at the end of the store is exempt.
    #[error("write would cross a page boundary")]
    PageBoundaryViolation,

    /// The underlying bus transaction failed.
    #[error("bus transport failed: {0}")]
    Bus(#[from] BusError),
}
