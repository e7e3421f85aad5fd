//! Cartridge bus access layer
//!
//! [`CartBus`] wraps a [`BusMaster`] and performs the address translation
//! between logical device registers / EEPROM word addresses and the raw
//! 32-bit transactions the bus actually carries.

mod address;

pub use address::{BusAddress, EepromAddress, CART_SELECT, EEPROM_BASE, IO_SELECT, OFFSET_MASK};

use crate::error::{Error, Result};
use crate::programmer::BusMaster;

/// Logical view of the cartridge over a raw bus master.
///
/// Every access validates the translated address against the master's
/// accessibility predicate before issuing the transaction. There is no
/// caching and no retry; one call is one bus transaction.
pub struct CartBus<M> {
    master: M,
}

impl<M: BusMaster> CartBus<M> {
    /// Wrap a bus master.
    pub fn new(master: M) -> Self {
        Self { master }
    }

    /// Release the underlying master.
    pub fn into_inner(self) -> M {
        self.master
    }

    /// Borrow the underlying master.
    pub fn master(&self) -> &M {
        &self.master
    }

    /// Mutably borrow the underlying master.
    pub fn master_mut(&mut self) -> &mut M {
        &mut self.master
    }

    /// Translate a cartridge-relative offset, checking accessibility.
    fn bus_address(&self, offset: u32) -> Result<BusAddress> {
        let addr = BusAddress::new(offset);
        if !self.master.is_accessible(addr.value()) {
            return Err(Error::AddressOutOfRange { addr: addr.value() });
        }
        Ok(addr)
    }

    /// Read a 32-bit word from a cartridge-relative offset.
    pub fn read_word(&mut self, offset: u32) -> Result<u32> {
        let addr = self.bus_address(offset)?;
        Ok(self.master.read32(addr.value()))
    }

    /// Write a 32-bit word to a cartridge-relative offset.
    pub fn write_word(&mut self, offset: u32, value: u32) -> Result<()> {
        let addr = self.bus_address(offset)?;
        self.master.write32(addr.value(), value);
        Ok(())
    }

    /// Read a 16-bit EEPROM word.
    ///
    /// Both ganged chips answer the read; the upper half of the 32-bit bus
    /// word is the authoritative copy.
    pub fn read_eeprom(&mut self, addr: EepromAddress) -> Result<u16> {
        Ok((self.read_word(addr.bus_offset())? >> 16) as u16)
    }

    /// Write a 16-bit EEPROM word.
    ///
    /// The value is replicated into both halves of the bus word so that both
    /// ganged chips receive the command/data simultaneously.
    pub fn write_eeprom(&mut self, addr: EepromAddress, value: u16) -> Result<()> {
        let doubled = ((value as u32) << 16) | (value as u32);
        self.write_word(addr.bus_offset(), doubled)
    }

    /// Read a 32-bit word from the cartridge's I/O-port window.
    pub fn read_io_port(&mut self, port: u16) -> Result<u32> {
        self.read_word(((IO_SELECT as u32) << 16) | (port as u32))
    }

    /// Write to the cartridge's I/O-port window.
    ///
    /// The port window drives the front-panel display hardware; like the
    /// EEPROM, it takes a high and a low 16-bit half per transaction.
    pub fn write_io_port(&mut self, port: u16, hi: u16, lo: u16) -> Result<()> {
        let value = ((hi as u32) << 16) | (lo as u32);
        self.write_word(((IO_SELECT as u32) << 16) | (port as u32), value)
    }

    /// Block for the specified number of microseconds.
    pub fn delay_us(&mut self, us: u32) {
        self.master.delay_us(us);
    }

    /// Block for the specified number of milliseconds.
    pub fn delay_ms(&mut self, ms: u32) {
        self.master.delay_ms(ms);
    }
}
