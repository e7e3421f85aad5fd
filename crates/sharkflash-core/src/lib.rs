//! sharkflash-core - Core library for GameShark cartridge EEPROM programming
//!
//! This crate implements the flash programming engine for the EEPROM array
//! inside a GameShark/Action Replay cartridge, driven indirectly through the
//! host console's parallel cartridge bus. It is `no_std` compatible so the
//! same engine can run on-console or inside a host-side simulator.
//!
//! The engine covers:
//!
//! - translation of logical EEPROM/register addresses onto the cartridge bus
//!   (the array is two ganged 8-bit chips presented as one 16-bit device)
//! - toggle-bit (DQ6) completion polling
//! - chip identification for the two supported parts (SST 28LF040 and
//!   SST 29LE010), each with its own ID-query protocol
//! - the per-family unlock/erase/protect/program command sequences
//! - the full programming session: unprotect, chip erase, paged program loop
//!   with progress reporting, re-protect
//!
//! The physical bus access itself is supplied by the caller through the
//! [`programmer::BusMaster`] trait; see the `sharkflash-dummy` crate for an
//! in-memory implementation used in tests.
//!
//! # Example
//!
//! ```ignore
//! use sharkflash_core::{bus::CartBus, flash, programmer::BusMaster};
//!
//! fn flash_cart<M: BusMaster>(master: M, image: &[u8]) {
//!     let mut bus = CartBus::new(master);
//!     match flash::probe(&mut bus) {
//!         Ok(variant) => {
//!             println!("Found: {}", variant.name());
//!             flash::write_firmware(
//!                 &mut bus,
//!                 variant,
//!                 image,
//!                 &flash::WriteOptions::default(),
//!                 &mut flash::NoProgress,
//!             )
//!             .unwrap();
//!         }
//!         Err(e) => println!("Probe failed: {}", e),
//!     }
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod bus;
pub mod chip;
pub mod error;
pub mod flash;
pub mod programmer;
pub mod protocol;

pub use error::{Error, Result};
