//! Error types for sharkflash-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A logical address does not map to an accessible bus region.
    ///
    /// This is a programmer/configuration error: the cartridge window is
    /// fixed, so a well-formed caller never produces one of these. Fatal;
    /// abort the current operation.
    AddressOutOfRange {
        /// The physical bus address that failed the accessibility check
        addr: u32,
    },
    /// The firmware image exceeds the selected chip's capacity.
    ///
    /// Reported before any device mutation occurs; the caller may retry
    /// with a different image or device.
    FirmwareTooLarge {
        /// Image length in bytes
        len: usize,
        /// Chip capacity in bytes
        capacity: usize,
    },
    /// The identity query returned neither known chip ID.
    ///
    /// Recoverable: the caller may prompt for a different device and rescan.
    UnrecognizedChip {
        /// The 32-bit composite identity that was read
        id: u32,
    },
    /// Post-write readback differs from the source image.
    VerifyMismatch {
        /// Byte offset of the first mismatch
        offset: usize,
        /// The byte the image contains
        expected: u8,
        /// The byte read back from the device
        found: u8,
    },
    /// A bounded poll gave up before the device reported completion.
    ///
    /// Only produced when the caller configures a poll limit; the default
    /// polling mode waits indefinitely, matching the hardware protocol.
    Timeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressOutOfRange { addr } => {
                write!(f, "bus address 0x{:08X} is not accessible", addr)
            }
            Self::FirmwareTooLarge { len, capacity } => {
                write!(
                    f,
                    "firmware image ({} bytes) exceeds chip capacity ({} bytes)",
                    len, capacity
                )
            }
            Self::UnrecognizedChip { id } => {
                write!(f, "unrecognized EEPROM identity 0x{:08X}", id)
            }
            Self::VerifyMismatch {
                offset,
                expected,
                found,
            } => {
                write!(
                    f,
                    "verify failed at offset 0x{:06X}: expected 0x{:02X}, found 0x{:02X}",
                    offset, expected, found
                )
            }
            Self::Timeout => write!(f, "device did not report completion within the poll limit"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
