#![allow(dead_code)]

// filename according to https://doc.rust-lang.org/book/ch11-03-test-organization.html
use core::cell::Cell;
use templog::Monotonic;
use templog::bus::{BusError, I2cBus};
use templog::sensor::TemperatureSensor;

pub const EEPROM_ADDR: u8 = 0x50;
pub const TMP100_ADDR: u8 = 0x48;
pub const CAPACITY: usize = 32768;

/// How many further bus accesses a data write keeps the EEPROM busy for,
/// i.e. how often the driver's ACK poll sees a NACK before completion.
pub const WRITE_CYCLE_PROBES: u32 = 5;

#[derive(Debug, PartialEq, Clone)]
pub enum Operation {
    Write { addr: u8, len: usize },
    Read { addr: u8, len: usize },
    WriteRead { addr: u8, tx_len: usize, rx_len: usize },
}

/// Mock bus with a 24FC256-style EEPROM at 0x50 and a TMP100-style sensor
/// at 0x48 behind it.
///
/// The EEPROM half keeps a full memory image (erased to 0xFF) and simulates
/// the internal write cycle: after accepting a data write it NACKs every
/// access until `WRITE_CYCLE_PROBES` further attempts have been made. The
/// sensor half answers temperature register reads with `simulated_temp`
/// rendered in the left-justified 12-bit wire format.
pub struct Bus {
    pub memory: Vec<u8>,
    pub simulated_temp: f32,
    pub sensor_config: Option<u8>,
    /// Force NACK on sensor transactions.
    pub sensor_fault: bool,
    /// Force a bus fault on EEPROM data writes.
    pub fail_writes: bool,
    /// Force NACK on EEPROM reads.
    pub fail_reads: bool,
    /// Never leave the write cycle, so the ACK poll runs out its bound.
    pub endless_write_cycle: bool,
    pub operations: Vec<Operation>,
    write_busy: u32,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            memory: vec![0xff; CAPACITY],
            simulated_temp: 22.5,
            sensor_config: None,
            sensor_fault: false,
            fail_writes: false,
            fail_reads: false,
            endless_write_cycle: false,
            operations: Vec::new(),
            write_busy: 0,
        }
    }

    /// Zero-length address probes issued against the EEPROM so far.
    pub fn probe_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Write { addr: EEPROM_ADDR, len: 0 }))
            .count()
    }

    fn busy(&mut self) -> bool {
        if self.write_busy == 0 {
            return false;
        }
        if self.write_busy != u32::MAX {
            self.write_busy -= 1;
        }
        true
    }

    fn eeprom_write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        if self.busy() {
            return Err(BusError::Nack);
        }

        // zero-length payload is a pure address probe
        if bytes.is_empty() {
            return Ok(());
        }
        if bytes.len() < 2 {
            return Err(BusError::Nack);
        }

        let addr = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        let data = &bytes[2..];
        if data.is_empty() {
            return Ok(());
        }
        if addr + data.len() > CAPACITY {
            return Err(BusError::Nack);
        }

        self.memory[addr..addr + data.len()].copy_from_slice(data);
        self.write_busy = if self.endless_write_cycle {
            u32::MAX
        } else {
            WRITE_CYCLE_PROBES
        };
        Ok(())
    }

    fn eeprom_read(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), BusError> {
        if self.busy() || self.fail_reads {
            return Err(BusError::Nack);
        }
        if tx.len() < 2 {
            return Err(BusError::Nack);
        }

        let addr = u16::from_be_bytes([tx[0], tx[1]]) as usize;
        if addr + rx.len() > CAPACITY {
            return Err(BusError::Nack);
        }

        rx.copy_from_slice(&self.memory[addr..addr + rx.len()]);
        Ok(())
    }

    fn sensor_write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        if self.sensor_fault {
            return Err(BusError::Nack);
        }
        // register write: [register, value]
        if bytes.len() >= 2 && bytes[0] == 0x01 {
            self.sensor_config = Some(bytes[1]);
        }
        Ok(())
    }

    fn sensor_read(&mut self, rx: &mut [u8]) -> Result<(), BusError> {
        if self.sensor_fault {
            return Err(BusError::Nack);
        }
        if rx.len() < 2 {
            return Err(BusError::Nack);
        }

        // 12-bit reading, left-justified in two big-endian bytes
        let raw = ((self.simulated_temp * 16.0) as i16) << 4;
        rx[..2].copy_from_slice(&raw.to_be_bytes());
        Ok(())
    }
}

impl I2cBus for Bus {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
        self.operations.push(Operation::Write {
            addr,
            len: bytes.len(),
        });

        if self.fail_writes && addr == EEPROM_ADDR && !bytes.is_empty() {
            return Err(BusError::Bus);
        }

        match addr {
            EEPROM_ADDR => self.eeprom_write(bytes),
            TMP100_ADDR => self.sensor_write(bytes),
            _ => Err(BusError::Nack),
        }
    }

    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.operations.push(Operation::Read {
            addr,
            len: buf.len(),
        });

        // both devices require the combined transaction for reads
        Err(BusError::Nack)
    }

    fn write_read(&mut self, addr: u8, tx: &[u8], rx: &mut [u8]) -> Result<(), BusError> {
        self.operations.push(Operation::WriteRead {
            addr,
            tx_len: tx.len(),
            rx_len: rx.len(),
        });

        match addr {
            EEPROM_ADDR => self.eeprom_read(tx, rx),
            TMP100_ADDR => self.sensor_read(rx),
            _ => Err(BusError::Nack),
        }
    }
}

/// Sensor double for controller tests that don't involve the bus.
pub struct FakeSensor {
    pub celsius: f32,
    pub fail: bool,
}

impl FakeSensor {
    pub fn new(celsius: f32) -> Self {
        Self {
            celsius,
            fail: false,
        }
    }
}

impl TemperatureSensor for FakeSensor {
    fn read_celsius(&mut self) -> Result<f32, BusError> {
        if self.fail {
            return Err(BusError::Nack);
        }
        Ok(self.celsius)
    }
}

/// Manually advanced elapsed-seconds source.
pub struct FakeClock(Cell<u32>);

impl FakeClock {
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    pub fn advance(&self, seconds: u32) {
        self.0.set(self.0.get() + seconds);
    }

    pub fn now(&self) -> u32 {
        self.0.get()
    }
}

impl Monotonic for FakeClock {
    fn elapsed_seconds(&self) -> u32 {
        self.0.get()
    }
}
