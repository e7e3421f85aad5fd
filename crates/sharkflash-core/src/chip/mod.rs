//! Supported chip definitions
//!
//! Exactly two EEPROM parts were ever fitted to these cartridges, and their
//! command encodings are fixed datasheet constants, so the variant set is a
//! closed enum rather than an open trait. Supporting a third part means
//! adding a variant case and its command sequences, not a plugin.

use crate::error::{Error, Result};

/// Composite identity of the SST 28LF040 pair (manufacturer 0xBF, device 0x04,
/// doubled across the two ganged chips).
pub const ID_SST_28LF040: u32 = 0xBFBF_0404;

/// Composite identity of the SST 29LE010 pair (manufacturer 0xBF, device 0x08,
/// doubled across the two ganged chips).
pub const ID_SST_29LE010: u32 = 0xBFBF_0808;

/// One of the two supported EEPROM families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipVariant {
    /// SST 28LF040: byte-alterable, 512 KiB per chip, 256-byte pages.
    Sst28lf040,
    /// SST 29LE010: page-write, 128 KiB per chip, 128-byte pages.
    Sst29le010,
}

impl ChipVariant {
    /// Select a variant from a composite identity read off the device.
    pub fn from_id(id: u32) -> Result<Self> {
        match id {
            ID_SST_28LF040 => Ok(Self::Sst28lf040),
            ID_SST_29LE010 => Ok(Self::Sst29le010),
            _ => Err(Error::UnrecognizedChip { id }),
        }
    }

    /// Human-readable part name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sst28lf040 => "SST 28LF040",
            Self::Sst29le010 => "SST 29LE010",
        }
    }

    /// The composite identity this variant dispatches on.
    pub const fn id(self) -> u32 {
        match self {
            Self::Sst28lf040 => ID_SST_28LF040,
            Self::Sst29le010 => ID_SST_29LE010,
        }
    }

    /// Total capacity of the ganged pair, in bytes.
    pub const fn capacity(self) -> usize {
        match self {
            Self::Sst28lf040 => 0x10_0000,
            Self::Sst29le010 => 0x4_0000,
        }
    }

    /// Page size of a single chip, in bytes.
    ///
    /// The program loop works in chunks of `page_size() * 2` because each
    /// 16-bit word spans both chips.
    pub const fn page_size(self) -> usize {
        match self {
            Self::Sst28lf040 => 256,
            Self::Sst29le010 => 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_dispatch() {
        assert_eq!(
            ChipVariant::from_id(0xBFBF_0808).unwrap(),
            ChipVariant::Sst29le010
        );
        assert_eq!(
            ChipVariant::from_id(0xBFBF_0404).unwrap(),
            ChipVariant::Sst28lf040
        );
        assert_eq!(
            ChipVariant::from_id(0xBFBF_0000),
            Err(Error::UnrecognizedChip { id: 0xBFBF_0000 })
        );
        assert_eq!(
            ChipVariant::from_id(0xFFFF_FFFF),
            Err(Error::UnrecognizedChip { id: 0xFFFF_FFFF })
        );
    }

    #[test]
    fn variant_geometry() {
        assert_eq!(ChipVariant::Sst28lf040.capacity(), 1_048_576);
        assert_eq!(ChipVariant::Sst29le010.capacity(), 262_144);
        assert_eq!(ChipVariant::Sst28lf040.page_size(), 256);
        assert_eq!(ChipVariant::Sst29le010.page_size(), 128);
    }
}
