//! Cartridge bus address types
//!
//! The cartridge occupies a fixed 16 MiB window on the parallel bus: an
//! 8-bit device-select prefix over a 24-bit offset. The EEPROM array sits
//! behind a sub-window with an interleaved address encoding, because the
//! logical 16-bit-wide array is physically two ganged 8-bit chips with
//! logical address bit 0 routed to a high-order bus line.

/// Device-select prefix for the cartridge window (bits 24..32).
pub const CART_SELECT: u8 = 0x10;

/// Mask limiting a cartridge-relative offset to the 24-bit window.
pub const OFFSET_MASK: u32 = 0x00FF_FFFF;

/// Base of the EEPROM command/data sub-window within the cartridge window.
pub const EEPROM_BASE: u32 = 0x00E0_0000;

/// High half of the I/O-port sub-window (ports live at `0x40 << 16 | port`).
pub const IO_SELECT: u8 = 0x40;

/// A fully-formed physical bus address within the cartridge window.
///
/// Construction masks the offset to 24 bits and ORs in the device-select
/// prefix; whether the resulting address is actually reachable is checked
/// against the bus master before any access (see [`super::CartBus`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusAddress(u32);

impl BusAddress {
    /// Form a bus address from a cartridge-relative offset.
    pub const fn new(offset: u32) -> Self {
        Self(((CART_SELECT as u32) << 24) | (offset & OFFSET_MASK))
    }

    /// The raw 32-bit physical address.
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// A 19-bit logical word address into the EEPROM array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EepromAddress(u32);

impl EepromAddress {
    /// Largest valid word address (the array is 2^19 words).
    pub const MAX: u32 = 0x7_FFFF;

    /// Create a word address. Out-of-range bits are masked off.
    pub const fn new(addr: u32) -> Self {
        Self(addr & Self::MAX)
    }

    /// The logical word address.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Translate to a cartridge-relative bus offset.
    ///
    /// Bit 0 of the word address selects between the two address halves and
    /// is routed to bus bit 20; the remaining bits shift up by one; the
    /// whole thing lands in the EEPROM sub-window.
    pub const fn bus_offset(self) -> u32 {
        let lo = self.0 & 1;
        let hi = self.0 & 0x7_FFFE;
        (lo << 20) | (hi << 1) | EEPROM_BASE
    }

    /// Invert [`Self::bus_offset`].
    ///
    /// The translation is a bijection over the 19-bit word space; this is
    /// the exact inverse, used by device models and tests.
    pub const fn from_bus_offset(offset: u32) -> Self {
        Self(((offset >> 1) & 0x7_FFFE) | ((offset >> 20) & 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_address_masks_and_prefixes() {
        assert_eq!(BusAddress::new(0).value(), 0x1000_0000);
        assert_eq!(BusAddress::new(0x00C0_0000).value(), 0x10C0_0000);
        // Offsets wider than 24 bits are masked, not allowed to clobber the
        // device-select prefix
        assert_eq!(BusAddress::new(0xFF12_3456).value(), 0x1012_3456);
    }

    #[test]
    fn eeprom_translation_lands_in_window() {
        assert_eq!(EepromAddress::new(0).bus_offset(), EEPROM_BASE);
        // Odd addresses set the half-select line (bit 20)
        assert_eq!(EepromAddress::new(1).bus_offset(), EEPROM_BASE | (1 << 20));
        assert_eq!(EepromAddress::new(2).bus_offset(), EEPROM_BASE | (2 << 1));
        assert_eq!(
            EepromAddress::new(0x5555).bus_offset(),
            EEPROM_BASE | (1 << 20) | (0x5554 << 1)
        );
    }

    #[test]
    fn eeprom_translation_is_bijective() {
        // Exhaustive over the whole 19-bit word space
        for addr in 0..=EepromAddress::MAX {
            let fwd = EepromAddress::new(addr).bus_offset();
            assert_eq!(EepromAddress::from_bus_offset(fwd).value(), addr);
        }
    }

    #[test]
    fn eeprom_address_masks_high_bits() {
        assert_eq!(EepromAddress::new(0xFFFF_FFFF).value(), EepromAddress::MAX);
    }
}
