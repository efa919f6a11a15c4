//! TMP100 temperature sensor driver.
//!
//! 12-bit register-based I2C device, -55 to +125 °C at 0.0625 °C per LSB.
//! Bring-up is a single configuration write; conversion then runs
//! continuously and the temperature register can be read at any time.

use crate::bus::{BusError, I2cBus};

const REG_TEMPERATURE: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

const DEGREES_PER_LSB: f32 = 1.0 / 16.0;

/// Conversion resolution field of the configuration register (R1:R0 bits).
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Resolution {
    Bits9 = 0x00,
    Bits10 = 0x20,
    Bits11 = 0x40,
    /// 0.0625 °C per LSB, used by this driver.
    Bits12 = 0x60,
}

/// The single-operation sensor surface the logging controller consumes:
/// one reading, or a failure signal.
pub trait TemperatureSensor {
    fn read_celsius(&mut self) -> Result<f32, BusError>;
}

pub struct Tmp100<B> {
    bus: B,
    address: u8,
    config: u8,
}

impl<B: I2cBus> Tmp100<B> {
    pub fn new(bus: B, address: u8) -> Self {
        Self {
            bus,
            address,
            config: 0,
        }
    }

    /// Puts the sensor in 12-bit continuous conversion mode (SD = 0,
    /// TM = 0, R1:R0 = 11). The only bring-up step this driver performs.
    pub fn init(&mut self) -> Result<(), BusError> {
        self.write_config(Resolution::Bits12 as u8)
    }

    /// Last configuration value successfully written.
    pub fn config(&self) -> u8 {
        self.config
    }

    fn write_config(&mut self, value: u8) -> Result<(), BusError> {
        self.bus.write(self.address, &[REG_CONFIG, value])?;
        self.config = value;
        Ok(())
    }

    /// Reads the temperature register: two big-endian bytes with the
    /// 12-bit reading left-justified. The arithmetic shift by 4 recovers
    /// the value with the sign intact.
    pub fn read_temperature(&mut self) -> Result<f32, BusError> {
        let mut rx = [0u8; 2];
        self.bus
            .write_read(self.address, &[REG_TEMPERATURE], &mut rx)?;

        let raw = i16::from_be_bytes(rx) >> 4;
        Ok(raw as f32 * DEGREES_PER_LSB)
    }
}

impl<B: I2cBus> TemperatureSensor for Tmp100<B> {
    fn read_celsius(&mut self) -> Result<f32, BusError> {
        self.read_temperature()
    }
}
